//! Exit codes for the `shake` CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.

use crate::flush::FlushResult;
use shake_common::Error;

/// Exit codes for shake operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command finished; any flush completed within its bound
    Ok = 0,

    /// Flush abandoned after its timeout (worker may still be running)
    FlushTimedOut = 2,

    /// Configuration error
    ConfigError = 10,

    /// Malformed or missing sample data
    DataError = 11,

    /// Excitation could not be planned
    MotionError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Ok
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    pub fn from_flush(result: FlushResult) -> Self {
        match result {
            FlushResult::Completed => ExitCode::Ok,
            FlushResult::TimedOut => ExitCode::FlushTimedOut,
        }
    }

    pub fn from_error(err: &Error) -> Self {
        match err.code() {
            10..=19 => ExitCode::ConfigError,
            20..=29 => ExitCode::DataError,
            40..=49 => ExitCode::MotionError,
            60 => ExitCode::IoError,
            61 | 62 => ExitCode::DataError,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
