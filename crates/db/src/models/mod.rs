//! Row models and create DTOs for the pipeline tables.

pub mod alert;
pub mod event;
pub mod telemetry;

pub use alert::Alert;
pub use event::Event;
pub use telemetry::{CreateTelemetry, Telemetry};
