//! Semantic validation of a loaded configuration.

use crate::resolve::ShakeConfig;
use serde::Serialize;
use std::fmt;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Dotted path to the field, e.g. `flush.timeout_secs`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

const AXES: [&str; 3] = ["x", "y", "z"];

/// Check value ranges and cross-field consistency.
pub fn validate(config: &ShakeConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.flush.timeout_secs == 0 {
        result
            .errors
            .push(ValidationError::new("flush.timeout_secs", "must be at least 1"));
    }
    if !(0..=19).contains(&config.flush.nice_increment) {
        result.errors.push(ValidationError::new(
            "flush.nice_increment",
            format!("must be in [0, 19], got {}", config.flush.nice_increment),
        ));
    }

    let motion = &config.motion;
    for (i, axis) in AXES.iter().enumerate() {
        let (min, max, center) = (motion.limits_min[i], motion.limits_max[i], motion.center[i]);
        if !(min.is_finite() && max.is_finite()) || min >= max {
            result.errors.push(ValidationError::new(
                format!("motion.limits_{axis}"),
                format!("min {min} must be below max {max}"),
            ));
        } else if !(min..=max).contains(&center) {
            result.errors.push(ValidationError::new(
                format!("motion.center.{axis}"),
                format!("{center} outside [{min}, {max}]"),
            ));
        }
    }
    if !(motion.feedrate.is_finite() && motion.feedrate > 0.0) {
        result
            .errors
            .push(ValidationError::new("motion.feedrate", "must be positive"));
    }

    let sweep = &config.sweep;
    if !(sweep.freq_start > 0.0 && sweep.freq_end > sweep.freq_start && sweep.freq_end.is_finite()) {
        result.errors.push(ValidationError::new(
            "sweep.freq_end",
            format!(
                "need 0 < freq_start < freq_end, got {} .. {}",
                sweep.freq_start, sweep.freq_end
            ),
        ));
    }
    if !(sweep.hz_per_sec.is_finite() && sweep.hz_per_sec > 0.0) {
        result
            .errors
            .push(ValidationError::new("sweep.hz_per_sec", "must be positive"));
    }
    if !(sweep.accel_per_hz.is_finite() && sweep.gravity.is_finite()) {
        result.errors.push(ValidationError::new(
            "sweep.accel_per_hz",
            "accel_per_hz and gravity must be finite",
        ));
    }
    if !(sweep.sample_rate.is_finite() && sweep.sample_rate > 0.0) {
        result.errors.push(ValidationError::new(
            "sweep.sample_rate",
            format!("must be a positive number, got {}", sweep.sample_rate),
        ));
    } else if sweep.sample_rate < 2.0 * sweep.freq_end {
        result.warnings.push(format!(
            "sweep.sample_rate {} Hz is below Nyquist for freq_end {} Hz",
            sweep.sample_rate, sweep.freq_end
        ));
    }

    if config.output.prefix.is_empty() || config.output.prefix.contains(['_', '/', '.']) {
        result.errors.push(ValidationError::new(
            "output.prefix",
            "must be non-empty and contain no '_', '/' or '.'",
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let result = validate(&ShakeConfig::default());
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn center_outside_limits_rejected() {
        let mut config = ShakeConfig::default();
        config.motion.center[1] = 400.0;
        let result = validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "motion.center.y");
    }

    #[test]
    fn underscore_in_prefix_rejected() {
        let mut config = ShakeConfig::default();
        config.output.prefix = "my_run".to_string();
        let result = validate(&config);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "output.prefix");
    }

    #[test]
    fn low_sample_rate_warns() {
        let mut config = ShakeConfig::default();
        config.sweep.sample_rate = 200.0;
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn non_finite_sample_rate_rejected() {
        for rate in [f64::NAN, f64::INFINITY, 0.0] {
            let mut config = ShakeConfig::default();
            config.sweep.sample_rate = rate;
            let result = validate(&config);
            assert_eq!(result.errors.len(), 1, "rate {rate}");
            assert_eq!(result.errors[0].field, "sweep.sample_rate");
        }
    }

    #[test]
    fn inverted_sweep_rejected() {
        let mut config = ShakeConfig::default();
        config.sweep.freq_start = 200.0;
        assert!(!validate(&config).is_valid());
    }
}
