//! Versions and on-disk layout constants.

/// Schema version stamped on JSON reports emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Header line of a raw accelerometer CSV file (without the newline).
pub const CSV_HEADER: &str = "#time,accel_x,accel_y,accel_z";

/// Column names, in order, as they appear in the header.
pub const CSV_COLUMNS: [&str; 4] = ["time", "accel_x", "accel_y", "accel_z"];

/// Field delimiter.
pub const CSV_DELIMITER: char = ',';

/// Digits after the decimal point for every numeric field.
pub const FIELD_PRECISION: usize = 6;

/// Comment marker; lines starting with it carry no samples.
pub const COMMENT_PREFIX: char = '#';
