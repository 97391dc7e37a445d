//! Flush worker bodies and launchers.
//!
//! Both launchers return a completion channel. The worker side sends one
//! `()` when it terminates; dropping the sender without sending (panic)
//! means the same thing to the waiting side.

use super::priority::lower_priority;
use crate::codec::write_samples;
use shake_common::{Error, Result, Sample, SampleBuffer};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{debug, warn};

/// Name given to flush threads (visible in `top -H`, debuggers, panics).
pub const FLUSH_THREAD_NAME: &str = "sample-flush";

/// Hidden CLI subcommand run by process-isolated workers.
pub const WORKER_SUBCOMMAND: &str = "write-csv";

/// Write samples to `path`, absorbing any I/O error.
fn write_absorbing(path: &Path, samples: &[Sample]) {
    match write_samples(path, samples) {
        Ok(rows) => debug!(path = %path.display(), rows, "samples written"),
        Err(e) => warn!(path = %path.display(), error = %e, "sample write failed; data not persisted"),
    }
}

/// Run the write on a detached thread.
pub(crate) fn spawn_thread(buffer: SampleBuffer, path: PathBuf, nice_increment: i32) -> Result<Receiver<()>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(FLUSH_THREAD_NAME.to_string())
        .spawn(move || {
            lower_priority(nice_increment);
            write_absorbing(&path, &buffer);
            let _ = tx.send(());
        })
        .map_err(|e| Error::FlushLaunch(format!("thread spawn failed: {e}")))?;
    // The JoinHandle is dropped here: the thread is detached and never
    // holds up process exit.
    Ok(rx)
}

/// Run the write in a child process. Samples are streamed to its stdin as a
/// JSON array from a detached feeder thread, which then reaps the child.
pub(crate) fn spawn_process(
    program: &Path,
    buffer: SampleBuffer,
    path: PathBuf,
    nice_increment: i32,
) -> Result<Receiver<()>> {
    let mut child = Command::new(program)
        .arg(WORKER_SUBCOMMAND)
        .arg("--output")
        .arg(&path)
        .arg("--nice")
        .arg(nice_increment.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| Error::FlushLaunch(format!("{}: {e}", program.display())))?;

    let stdin = child.stdin.take();
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("{FLUSH_THREAD_NAME}-reaper"))
        .spawn(move || {
            if let Some(stdin) = stdin {
                let mut writer = BufWriter::new(stdin);
                let fed = serde_json::to_writer(&mut writer, buffer.as_slice())
                    .map_err(std::io::Error::from)
                    .and_then(|()| writer.flush());
                if let Err(e) = fed {
                    warn!(path = %path.display(), error = %e, "could not feed flush worker");
                }
                // Dropping the writer closes the pipe so the worker sees EOF.
            }
            match child.wait() {
                Ok(status) if status.success() => debug!(pid = child.id(), "flush worker exited"),
                Ok(status) => warn!(pid = child.id(), %status, path = %path.display(), "flush worker failed"),
                Err(e) => warn!(pid = child.id(), error = %e, "could not reap flush worker"),
            }
            let _ = tx.send(());
        })
        .map_err(|e| Error::FlushLaunch(format!("reaper thread spawn failed: {e}")))?;
    Ok(rx)
}

/// Body of the `write-csv` worker: read a JSON sample array from `input`
/// and write it to `path`.
pub fn run_worker<R: Read>(input: R, path: &Path, nice_increment: i32) -> Result<usize> {
    lower_priority(nice_increment);
    let samples: Vec<Sample> = serde_json::from_reader(BufReader::new(input))?;
    let rows = write_samples(path, &samples)?;
    Ok(rows)
}

/// [`run_worker`] over this process's stdin.
pub fn run_worker_stdin(path: &Path, nice_increment: i32) -> Result<usize> {
    run_worker(std::io::stdin().lock(), path, nice_increment)
}
