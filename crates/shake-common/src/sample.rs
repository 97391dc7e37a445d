//! Accelerometer samples and finalized sample buffers.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// One timestamped 3-axis accelerometer measurement.
///
/// `time` is in seconds; accelerations are in whatever unit the acquisition
/// source reports (mm/s² for Klipper-style chips).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
}

impl Sample {
    pub const fn new(time: f64, accel_x: f64, accel_y: f64, accel_z: f64) -> Self {
        Self {
            time,
            accel_x,
            accel_y,
            accel_z,
        }
    }

    /// Fields in on-disk column order.
    pub fn fields(&self) -> [f64; 4] {
        [self.time, self.accel_x, self.accel_y, self.accel_z]
    }
}

impl From<(f64, f64, f64, f64)> for Sample {
    fn from((time, x, y, z): (f64, f64, f64, f64)) -> Self {
        Sample::new(time, x, y, z)
    }
}

/// An ordered, finalized sequence of samples.
///
/// There is no mutating API: once a buffer is built, every clone shares the
/// same snapshot, so a flush worker can hold it while the producer moves on.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Arc<[Sample]>,
}

impl SampleBuffer {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Elapsed time between the first and last sample, in seconds.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (last.time - first.time).max(0.0),
            _ => 0.0,
        }
    }

    /// Mean sample rate in Hz, if at least two samples span a positive time.
    pub fn mean_rate(&self) -> Option<f64> {
        let duration = self.duration();
        if self.samples.len() < 2 || duration <= 0.0 {
            return None;
        }
        Some((self.samples.len() - 1) as f64 / duration)
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        SampleBuffer::new(Vec::new())
    }
}

impl Deref for SampleBuffer {
    type Target = [Sample];

    fn deref(&self) -> &[Sample] {
        &self.samples
    }
}

impl From<Vec<Sample>> for SampleBuffer {
    fn from(samples: Vec<Sample>) -> Self {
        SampleBuffer::new(samples)
    }
}

impl FromIterator<Sample> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        SampleBuffer::new(iter.into_iter().collect())
    }
}

impl Serialize for SampleBuffer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.samples.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SampleBuffer {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Sample>::deserialize(deserializer).map(SampleBuffer::new)
    }
}
