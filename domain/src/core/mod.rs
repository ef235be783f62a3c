//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`error_kind::ErrorKind`]: failure classification rendered by the front end
//! - [`ids`]: identifiers for locally stored questions and results

pub mod error;
pub mod error_kind;
pub mod ids;
