//! LiftGuard domain core.
//!
//! Pure domain logic shared by every other crate: common type aliases,
//! the domain error type, severity levels, the transient telemetry
//! reading, and the safety-rule engine.

pub mod error;
pub mod safety;
pub mod severity;
pub mod telemetry;
pub mod types;

pub use error::CoreError;
pub use severity::Severity;
pub use telemetry::TelemetryReading;
