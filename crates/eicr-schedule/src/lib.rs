//! Library backing the EICR schedule-of-tests service: circuit compliance
//! evaluation plus the configuration, error, and telemetry plumbing shared
//! with the HTTP binary.

pub mod config;
pub mod error;
pub mod schedule;
pub mod telemetry;
