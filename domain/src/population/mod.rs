//! Population domain.
//!
//! - [`entities::PopulationId`]: opaque vendor-assigned identifier
//! - [`entities::Population`]: a named group of simulated respondents

pub mod entities;
