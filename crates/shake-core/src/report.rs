//! Summaries of recorded sample files.

use crate::codec::read_samples;
use serde::Serialize;
use shake_common::{MeasurementName, Result, SampleBuffer, SCHEMA_VERSION};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Largest absolute acceleration seen on each axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisPeaks {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// What `shake inspect` reports about one file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub schema_version: &'static str,
    pub path: PathBuf,
    /// Parsed file name, when it follows the measurement naming layout.
    pub measurement: Option<MeasurementName>,
    pub title: String,
    pub samples: usize,
    pub duration_secs: f64,
    pub mean_rate_hz: Option<f64>,
    pub peaks: AxisPeaks,
}

impl InspectReport {
    pub fn from_buffer(path: &Path, buffer: &SampleBuffer) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let measurement = MeasurementName::parse(&file_name);
        let title = match &measurement {
            Some(name) => name.title(),
            None => {
                warn!(file = %file_name, "file name does not follow the measurement layout");
                file_name.clone()
            }
        };

        let peaks = buffer.iter().fold(AxisPeaks::default(), |acc, s| AxisPeaks {
            x: acc.x.max(s.accel_x.abs()),
            y: acc.y.max(s.accel_y.abs()),
            z: acc.z.max(s.accel_z.abs()),
        });

        Self {
            schema_version: SCHEMA_VERSION,
            path: path.to_path_buf(),
            measurement,
            title,
            samples: buffer.len(),
            duration_secs: buffer.duration(),
            mean_rate_hz: buffer.mean_rate(),
            peaks,
        }
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  file:      {}", self.path.display())?;
        writeln!(f, "  samples:   {}", self.samples)?;
        writeln!(f, "  duration:  {:.3} s", self.duration_secs)?;
        match self.mean_rate_hz {
            Some(rate) => writeln!(f, "  rate:      {rate:.1} Hz")?,
            None => writeln!(f, "  rate:      n/a")?,
        }
        write!(
            f,
            "  peak |a|:  x={:.3} y={:.3} z={:.3}",
            self.peaks.x, self.peaks.y, self.peaks.z
        )
    }
}

/// Load `path` and summarize it.
pub fn inspect(path: &Path) -> Result<InspectReport> {
    let buffer = read_samples(path)?;
    Ok(InspectReport::from_buffer(path, &buffer))
}
