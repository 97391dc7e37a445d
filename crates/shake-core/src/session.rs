//! Measurement sessions: collect samples, finalize, flush once.

use crate::flush::{flush_to_file, FlushJob, FlushOptions, FlushResult};
use shake_common::{Error, Result, Sample, SampleBuffer};
use std::path::Path;
use tracing::debug;

/// Upstream acquisition source (accelerometer driver, replay file, ...).
///
/// A session asks it for samples at most once, and only when no live
/// samples were pushed during the window.
pub trait SampleSource {
    fn samples(&mut self) -> Result<Vec<Sample>>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Result<Vec<Sample>>,
{
    fn samples(&mut self) -> Result<Vec<Sample>> {
        self()
    }
}

/// Source for sessions that are only ever fed through `push`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSource;

impl SampleSource for NoSource {
    fn samples(&mut self) -> Result<Vec<Sample>> {
        Ok(Vec::new())
    }
}

#[derive(Debug)]
enum State {
    Collecting(Option<Vec<Sample>>),
    Finalized(SampleBuffer),
    Flushed,
}

/// One sampling window.
///
/// Samples pushed during the window form the live buffer. `finish` freezes
/// it into a [`SampleBuffer`]; if nothing was pushed, the source is queried
/// once instead. A session starts at most one flush.
#[derive(Debug)]
pub struct MeasurementSession<S: SampleSource> {
    source: S,
    state: State,
}

impl<S: SampleSource> MeasurementSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: State::Collecting(None),
        }
    }

    /// Append a sample to the live buffer.
    pub fn push(&mut self, sample: Sample) -> Result<()> {
        match &mut self.state {
            State::Collecting(live) => {
                live.get_or_insert_with(Vec::new).push(sample);
                Ok(())
            }
            State::Finalized(_) => Err(Error::Acquisition(
                "sampling window already closed".to_string(),
            )),
            State::Flushed => Err(Error::AlreadyFlushed),
        }
    }

    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) -> Result<()> {
        samples.into_iter().try_for_each(|s| self.push(s))
    }

    /// Close the sampling window and return the finalized buffer.
    /// Calling it again returns the same snapshot.
    pub fn finish(&mut self) -> Result<SampleBuffer> {
        match &mut self.state {
            State::Finalized(buffer) => Ok(buffer.clone()),
            State::Flushed => Err(Error::AlreadyFlushed),
            State::Collecting(live) => {
                let samples = match live.take() {
                    Some(samples) => samples,
                    None => {
                        debug!("no live buffer held; querying sample source");
                        self.source.samples()?
                    }
                };
                let buffer = SampleBuffer::new(samples);
                self.state = State::Finalized(buffer.clone());
                Ok(buffer)
            }
        }
    }

    /// Finalize and launch the one flush this session is allowed.
    pub fn start_flush(&mut self, path: impl AsRef<Path>, options: &FlushOptions) -> Result<FlushJob> {
        let buffer = self.finish()?;
        let job = FlushJob::start(buffer, path.as_ref(), options)?;
        self.state = State::Flushed;
        Ok(job)
    }

    /// Finalize, flush, and wait up to `options.timeout`.
    pub fn write_to_file(&mut self, path: impl AsRef<Path>, options: &FlushOptions) -> Result<FlushResult> {
        let buffer = self.finish()?;
        let result = flush_to_file(&buffer, path, options)?;
        self.state = State::Flushed;
        Ok(result)
    }

    pub fn is_flushed(&self) -> bool {
        matches!(self.state, State::Flushed)
    }
}
