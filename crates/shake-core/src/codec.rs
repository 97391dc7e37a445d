//! Raw accelerometer CSV codec.
//!
//! Layout:
//!
//! ```text
//! #time,accel_x,accel_y,accel_z
//! 0.000000,0.100000,0.200000,9.800000
//! ```
//!
//! Every finite numeric field carries exactly six digits after the decimal
//! point and rows end with `\n`. Nothing follows the last row. Non-finite
//! values are written as Rust formats them (`NaN`, `inf`, `-inf`) and
//! [`write_samples`] logs a warning when a file contains any.

use shake_common::schema::{COMMENT_PREFIX, CSV_DELIMITER};
use shake_common::{Error, Result, Sample, SampleBuffer, CSV_HEADER, FIELD_PRECISION};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Row-oriented writer for the sample CSV layout.
pub struct SampleWriter<W: Write> {
    inner: W,
    rows: usize,
    non_finite_rows: usize,
}

impl<W: Write> SampleWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            rows: 0,
            non_finite_rows: 0,
        }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.inner, "{CSV_HEADER}")
    }

    pub fn write_sample(&mut self, sample: &Sample) -> io::Result<()> {
        if sample.fields().iter().any(|v| !v.is_finite()) {
            self.non_finite_rows += 1;
        }
        for (i, value) in sample.fields().iter().enumerate() {
            if i > 0 {
                write!(self.inner, "{CSV_DELIMITER}")?;
            }
            write!(self.inner, "{value:.prec$}", prec = FIELD_PRECISION)?;
        }
        writeln!(self.inner)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_samples(&mut self, samples: &[Sample]) -> io::Result<()> {
        samples.iter().try_for_each(|s| self.write_sample(s))
    }

    /// Data rows written so far (header excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows holding at least one NaN or infinite field.
    pub fn non_finite_rows(&self) -> usize {
        self.non_finite_rows
    }

    /// Flush buffered output and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write `samples` to `path`, creating or truncating it. Returns the number
/// of data rows written.
///
/// The file handle is scoped to this call and closed on every return path.
pub fn write_samples(path: &Path, samples: &[Sample]) -> io::Result<usize> {
    let file = File::create(path)?;
    let mut writer = SampleWriter::new(BufWriter::new(file));
    writer.write_header()?;
    writer.write_samples(samples)?;
    let rows = writer.rows();
    let non_finite = writer.non_finite_rows();
    writer.finish()?;
    if non_finite > 0 {
        warn!(path = %path.display(), rows = non_finite, "non-finite sample values written");
    }
    Ok(rows)
}

/// Render samples to an in-memory string.
pub fn to_csv_string(samples: &[Sample]) -> String {
    let mut writer = SampleWriter::new(Vec::new());
    // Writing into a Vec<u8> cannot fail.
    let _ = writer.write_header();
    let _ = writer.write_samples(samples);
    let bytes = writer.finish().unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Load a sample file written by [`write_samples`] (or any file with the
/// same four columns).
pub fn read_samples(path: &Path) -> Result<SampleBuffer> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    parse_samples(BufReader::new(file)).map(SampleBuffer::new)
}

/// Parse sample rows. `#` lines and blank lines are skipped.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        samples.push(parse_row(line, idx + 1)?);
    }
    Ok(samples)
}

fn parse_row(line: &str, line_no: usize) -> Result<Sample> {
    let mut fields = [0.0f64; 4];
    let mut count = 0;
    for raw in line.split(CSV_DELIMITER) {
        if count == fields.len() {
            return Err(Error::MalformedRow {
                line: line_no,
                reason: "more than 4 fields".to_string(),
            });
        }
        fields[count] = raw.trim().parse().map_err(|_| Error::MalformedRow {
            line: line_no,
            reason: format!("not a number: '{}'", raw.trim()),
        })?;
        count += 1;
    }
    if count != fields.len() {
        return Err(Error::MalformedRow {
            line: line_no,
            reason: format!("expected 4 fields, found {count}"),
        });
    }
    let [time, x, y, z] = fields;
    Ok(Sample::new(time, x, y, z))
}
