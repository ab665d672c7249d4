//! Observability setup for Ladle: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
