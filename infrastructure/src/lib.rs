//! Infrastructure layer for survey-sim
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Semilattice gateways, the SQLite store,
//! the JSONL event log and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod semilattice;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigSource, FileConfig};
pub use logging::JsonlSimulationLogger;
pub use providers::{TransportKind, build_gateway};
pub use semilattice::{ApiCredentials, ApiSettings, DEFAULT_API_KEY_ENV, SemilatticeClient};
pub use storage::SqliteSimulationStore;
