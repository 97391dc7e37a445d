//! Bounded background sample flush.
//!
//! A finalized [`SampleBuffer`] is written to disk from an isolated execution
//! context (a detached thread or a child process) while the caller waits at
//! most a fixed timeout for it to terminate:
//!
//! - terminated in time → [`FlushResult::Completed`]
//! - timeout elapsed    → [`FlushResult::TimedOut`], the worker is left to
//!   finish (or stall) on its own and is never killed
//!
//! Write errors inside the worker stay inside the worker. They are logged
//! there and never reach the caller.

pub mod priority;
pub mod worker;

use serde::Serialize;
use shake_common::{Error, Result, SampleBuffer};
use shake_config::{FlushConfig, IsolationMode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub use priority::lower_priority;
pub use worker::{run_worker, run_worker_stdin};

/// Outcome observed by the caller of a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushResult {
    /// The worker terminated within the timeout.
    Completed,
    /// The timeout elapsed first; the worker was detached.
    TimedOut,
}

impl fmt::Display for FlushResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushResult::Completed => write!(f, "completed"),
            FlushResult::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Execution context used for the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Isolation {
    /// Named, detached thread in this process.
    Thread,
    /// Child process running `<program> write-csv`.
    Process { program: PathBuf },
}

/// Options for a single flush.
#[derive(Debug, Clone)]
pub struct FlushOptions {
    pub timeout: Duration,
    pub nice_increment: i32,
    pub isolation: Isolation,
}

impl FlushOptions {
    /// Thread isolation with the given timeout and default niceness.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Build options from configuration. Process isolation without an
    /// explicit worker program uses the running executable.
    pub fn from_config(config: &FlushConfig) -> Result<Self> {
        let isolation = match config.isolation {
            IsolationMode::Thread => Isolation::Thread,
            IsolationMode::Process => {
                let program = match &config.worker_program {
                    Some(program) => program.clone(),
                    None => std::env::current_exe().map_err(|e| {
                        Error::FlushLaunch(format!("cannot locate worker executable: {e}"))
                    })?,
                };
                Isolation::Process { program }
            }
        };
        Ok(Self {
            timeout: config.timeout(),
            nice_increment: config.nice_increment,
            isolation,
        })
    }
}

impl Default for FlushOptions {
    fn default() -> Self {
        let config = FlushConfig::default();
        Self {
            timeout: config.timeout(),
            nice_increment: config.nice_increment,
            isolation: Isolation::Thread,
        }
    }
}

/// A running one-shot flush.
///
/// `wait` consumes the job, so a job is joined at most once.
#[derive(Debug)]
pub struct FlushJob {
    path: PathBuf,
    rows: usize,
    started: Instant,
    done: Receiver<()>,
}

impl FlushJob {
    /// Launch the worker for `buffer` → `path`.
    ///
    /// Only a failure to create the execution context is reported here;
    /// anything that goes wrong afterwards stays inside the worker.
    pub fn start(buffer: SampleBuffer, path: impl Into<PathBuf>, options: &FlushOptions) -> Result<Self> {
        let path = path.into();
        let rows = buffer.len();
        let started = Instant::now();
        let done = match &options.isolation {
            Isolation::Thread => worker::spawn_thread(buffer, path.clone(), options.nice_increment)?,
            Isolation::Process { program } => {
                worker::spawn_process(program, buffer, path.clone(), options.nice_increment)?
            }
        };
        debug!(path = %path.display(), rows, isolation = ?options.isolation, "flush started");
        Ok(Self {
            path,
            rows,
            started,
            done,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait up to `timeout` for the worker to terminate.
    pub fn wait(self, timeout: Duration) -> FlushResult {
        match self.done.recv_timeout(timeout) {
            // A worker that panicked drops its sender; it has terminated all the same.
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                info!(
                    path = %self.path.display(),
                    rows = self.rows,
                    elapsed_ms = self.started.elapsed().as_millis() as u64,
                    "sample flush completed"
                );
                FlushResult::Completed
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    path = %self.path.display(),
                    rows = self.rows,
                    timeout_secs = timeout.as_secs_f64(),
                    "sample flush timed out; worker detached"
                );
                FlushResult::TimedOut
            }
        }
    }
}

/// Persist `buffer` to `path` from an isolated context, waiting at most
/// `options.timeout`.
pub fn flush_to_file(buffer: &SampleBuffer, path: impl AsRef<Path>, options: &FlushOptions) -> Result<FlushResult> {
    let job = FlushJob::start(buffer.clone(), path.as_ref(), options)?;
    Ok(job.wait(options.timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shake_common::Sample;
    use tempfile::tempdir;

    fn buffer() -> SampleBuffer {
        SampleBuffer::new(vec![
            Sample::new(0.000000, 0.1, 0.2, 9.8),
            Sample::new(0.001000, 0.1, 0.2, 9.81),
        ])
    }

    #[test]
    fn thread_flush_completes_and_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        let result = flush_to_file(&buffer(), &path, &FlushOptions::with_timeout(Duration::from_secs(10))).unwrap();
        assert_eq!(result, FlushResult::Completed);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#time,accel_x,accel_y,accel_z\n\
             0.000000,0.100000,0.200000,9.800000\n\
             0.001000,0.100000,0.200000,9.810000\n"
        );
    }

    #[test]
    fn write_failure_is_not_propagated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("raw.csv");
        let result = flush_to_file(&buffer(), &path, &FlushOptions::with_timeout(Duration::from_secs(10))).unwrap();
        assert_eq!(result, FlushResult::Completed);
        assert!(!path.exists());
    }

    #[test]
    fn caller_keeps_its_buffer() {
        let dir = tempdir().unwrap();
        let original = buffer();
        let job = FlushJob::start(original.clone(), dir.path().join("a.csv"), &FlushOptions::default()).unwrap();
        assert_eq!(job.path(), dir.path().join("a.csv").as_path());
        assert_eq!(job.wait(Duration::from_secs(10)), FlushResult::Completed);
        assert_eq!(original.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn stalled_write_times_out() {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let fifo = dir.path().join("stall.fifo");
        let c_path = CString::new(fifo.as_os_str().as_bytes()).unwrap();
        // SAFETY: c_path is a valid NUL-terminated string.
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

        // Opening a FIFO for writing blocks until a reader shows up.
        let started = Instant::now();
        let result = flush_to_file(&buffer(), &fifo, &FlushOptions::with_timeout(Duration::from_millis(200))).unwrap();
        assert_eq!(result, FlushResult::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(5));

        // The detached worker is still alive and finishes once unblocked.
        let content = std::fs::read_to_string(&fifo).unwrap();
        assert!(content.starts_with("#time,accel_x,accel_y,accel_z\n"));
    }

    #[test]
    fn options_from_config() {
        let mut config = FlushConfig::default();
        config.timeout_secs = 3;
        config.isolation = IsolationMode::Process;
        config.worker_program = Some(PathBuf::from("/usr/local/bin/shake"));
        let options = FlushOptions::from_config(&config).unwrap();
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(
            options.isolation,
            Isolation::Process {
                program: PathBuf::from("/usr/local/bin/shake")
            }
        );
    }

    #[test]
    fn process_isolation_defaults_to_current_exe() {
        let config = FlushConfig {
            isolation: IsolationMode::Process,
            ..FlushConfig::default()
        };
        let options = FlushOptions::from_config(&config).unwrap();
        assert!(matches!(options.isolation, Isolation::Process { .. }));
    }
}
