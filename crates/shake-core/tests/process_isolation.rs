//! Flushes that run in a child `shake write-csv` process.

use shake_common::{Sample, SampleBuffer};
use shake_core::{flush_to_file, FlushJob, FlushOptions, FlushResult, Isolation};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn process_options(timeout: Duration) -> FlushOptions {
    FlushOptions::with_timeout(timeout).isolation(Isolation::Process {
        program: PathBuf::from(env!("CARGO_BIN_EXE_shake")),
    })
}

fn buffer() -> SampleBuffer {
    (0..250)
        .map(|i| {
            let t = i as f64 / 1000.0;
            Sample::new(t, 0.5 * t, -0.25, 9810.0)
        })
        .collect()
}

#[test]
fn child_process_writes_same_bytes_as_thread() {
    let dir = tempdir().unwrap();
    let via_process = dir.path().join("process.csv");
    let via_thread = dir.path().join("thread.csv");
    let samples = buffer();

    let result = flush_to_file(&samples, &via_process, &process_options(Duration::from_secs(60))).unwrap();
    assert_eq!(result, FlushResult::Completed);
    flush_to_file(&samples, &via_thread, &FlushOptions::with_timeout(Duration::from_secs(60))).unwrap();

    assert_eq!(
        std::fs::read(&via_process).unwrap(),
        std::fs::read(&via_thread).unwrap()
    );
}

#[test]
fn child_write_failure_still_completes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("raw.csv");
    let result = flush_to_file(&buffer(), &path, &process_options(Duration::from_secs(60))).unwrap();
    assert_eq!(result, FlushResult::Completed);
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn stalled_child_times_out_and_keeps_running() {
    use std::io::Read;
    use std::process::Command;
    use std::time::Instant;

    let dir = tempdir().unwrap();
    let fifo = dir.path().join("stall.csv");
    let status = Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success());

    let job = FlushJob::start(buffer(), &fifo, &process_options(Duration::from_secs(60))).unwrap();
    let started = Instant::now();
    assert_eq!(job.wait(Duration::from_millis(300)), FlushResult::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(5));

    // The child is still alive and blocked on open; draining the FIFO lets it finish.
    let mut content = String::new();
    std::fs::File::open(&fifo)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert!(content.starts_with("#time,accel_x,accel_y,accel_z\n"));
    assert_eq!(content.lines().count(), 251);
}
