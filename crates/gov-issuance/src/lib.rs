pub mod config;
pub mod documents;
pub mod error;
pub mod sync;
pub mod telemetry;
