pub mod config;
pub mod error;
pub mod statistics;
pub mod telemetry;
