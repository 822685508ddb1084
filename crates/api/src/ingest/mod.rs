//! Telemetry ingestion pipeline.

mod processor;

pub use processor::TelemetryProcessor;
