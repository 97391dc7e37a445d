//! Background flush settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default bound on how long a caller waits for a flush worker: 10 minutes.
pub const DEFAULT_FLUSH_TIMEOUT_SECS: u64 = 600;

/// Default niceness increment applied inside the flush worker.
pub const DEFAULT_NICE_INCREMENT: i32 = 10;

/// Where the flush runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationMode {
    /// Dedicated detached thread in the caller's process.
    #[default]
    Thread,
    /// Child process running the `write-csv` worker.
    Process,
}

/// Settings for the bounded background sample flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlushConfig {
    /// Seconds the caller waits for the worker before giving up.
    pub timeout_secs: u64,

    /// Niceness increment the worker requests for itself (best effort).
    pub nice_increment: i32,

    pub isolation: IsolationMode,

    /// Worker executable for `IsolationMode::Process`.
    /// Defaults to the running executable.
    pub worker_program: Option<PathBuf>,
}

impl FlushConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FLUSH_TIMEOUT_SECS,
            nice_increment: DEFAULT_NICE_INCREMENT,
            isolation: IsolationMode::Thread,
            worker_program: None,
        }
    }
}
