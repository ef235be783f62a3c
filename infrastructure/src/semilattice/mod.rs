//! Semilattice API client
//!
//! This module contains everything needed to talk to the remote service:
//!
//! - [`credentials`]: bearer key lookup at call time
//! - [`transport`]: authenticated JSON requests and error mapping
//! - [`protocol`]: request/response wire types and envelope helpers
//! - [`client`]: typed resource client in the style of the vendor SDK

pub mod client;
pub mod credentials;
pub mod protocol;
pub mod transport;

pub use client::SemilatticeClient;
pub use credentials::{ApiCredentials, DEFAULT_API_KEY_ENV};
pub use transport::{ApiSettings, DEFAULT_BASE_URL, HttpTransport};
