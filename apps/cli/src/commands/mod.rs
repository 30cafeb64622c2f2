//! Command implementations for the Racer CLI.

pub mod metrics;
pub mod regions;
pub mod submit;
pub mod types;
