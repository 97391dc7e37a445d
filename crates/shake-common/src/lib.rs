//! Shake common types, naming, and errors.
//!
//! This crate provides foundational types shared across shake-core modules:
//! - Accelerometer samples and finalized sample buffers
//! - Measurement file naming (`<prefix>_<date>_<time>_<axis>.csv`)
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod naming;
pub mod output;
pub mod sample;
pub mod schema;

pub use error::{Error, Result};
pub use naming::MeasurementName;
pub use output::OutputFormat;
pub use sample::{Sample, SampleBuffer};
pub use schema::{CSV_HEADER, FIELD_PRECISION, SCHEMA_VERSION};
