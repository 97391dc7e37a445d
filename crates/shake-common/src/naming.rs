//! Measurement file naming.
//!
//! Raw accelerometer files are named `<prefix>_<YYYYMMDD>_<HHMMSS>_<axis>.csv`,
//! e.g. `resonances_20240115_143022_x.csv`. Downstream graphing reads the
//! date, time, and axis back out of the name, so the layout is stable.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const DATE_FORMAT: &str = "%Y%m%d";
const TIME_FORMAT: &str = "%H%M%S";

/// Parsed components of a measurement file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementName {
    pub prefix: String,
    pub recorded_at: NaiveDateTime,
    pub axis: String,
}

impl MeasurementName {
    pub fn new(prefix: impl Into<String>, recorded_at: NaiveDateTime, axis: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            recorded_at,
            axis: axis.into(),
        }
    }

    /// Name a measurement taken now, in local time.
    pub fn now(prefix: impl Into<String>, axis: impl Into<String>) -> Self {
        let now: DateTime<Local> = Local::now();
        Self::new(prefix, now.naive_local(), axis)
    }

    /// File name with the `.csv` extension.
    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }

    /// Parse a file name (or path). Returns `None` when the name does not
    /// follow the layout; callers fall back to the raw name.
    pub fn parse(name: &str) -> Option<Self> {
        let file_name = Path::new(name).file_name()?.to_str()?;
        let stem = file_name.split('.').next()?;
        let mut parts = stem.split('_');
        let prefix = parts.next()?;
        let date = parts.next()?;
        let time = parts.next()?;
        let axis = parts.next()?;
        if prefix.is_empty() || axis.is_empty() {
            return None;
        }
        let recorded_at =
            NaiveDateTime::parse_from_str(&format!("{date} {time}"), &format!("{DATE_FORMAT} {TIME_FORMAT}"))
                .ok()?;
        Some(Self::new(prefix, recorded_at, axis))
    }

    /// Human title used by reports: `"<date> <time> -- <AXIS> axis"`.
    pub fn title(&self) -> String {
        let local = Local
            .from_local_datetime(&self.recorded_at)
            .single()
            .map(|dt| dt.format("%x %X").to_string())
            .unwrap_or_else(|| self.recorded_at.format("%x %X").to_string());
        format!("{local} -- {} axis", self.axis.to_uppercase())
    }
}

impl fmt::Display for MeasurementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.prefix,
            self.recorded_at.format(DATE_FORMAT),
            self.recorded_at.format(TIME_FORMAT),
            self.axis
        )
    }
}
