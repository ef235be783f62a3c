//! Progress reporting while a simulation is polled

pub mod reporter;
