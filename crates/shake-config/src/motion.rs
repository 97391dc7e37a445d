//! Motion and excitation parameters.
//!
//! These replace the parameter defaults that calibration macros carry as
//! template variables. They are plain `Copy` values handed to the waypoint
//! calculation, so there is no shared state between runs.

use serde::{Deserialize, Serialize};

/// Toolhead geometry and feedrate used when computing excitation waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Point the excitation is centered on, `[x, y, z]` in mm.
    pub center: [f64; 3],

    /// Lower axis limits, `[x, y, z]` in mm.
    pub limits_min: [f64; 3],

    /// Upper axis limits, `[x, y, z]` in mm.
    pub limits_max: [f64; 3],

    /// Travel feedrate in mm/min.
    pub feedrate: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            center: [117.5, 117.5, 20.0],
            limits_min: [0.0, 0.0, 0.0],
            limits_max: [235.0, 235.0, 250.0],
            feedrate: 6000.0,
        }
    }
}

/// Frequency sweep parameters for a resonance run.
///
/// Defaults follow the usual `TEST_RESONANCES` values: 5 Hz to 133.33 Hz at
/// 1 Hz/s with 75 mm/s² of acceleration per Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub freq_start: f64,
    pub freq_end: f64,
    pub hz_per_sec: f64,
    pub accel_per_hz: f64,

    /// Accelerometer output data rate in Hz.
    pub sample_rate: f64,

    /// Static acceleration on the Z axis (gravity) in mm/s².
    pub gravity: f64,
}

impl SweepConfig {
    /// Seconds needed to sweep from `freq_start` to `freq_end`.
    pub fn duration(&self) -> f64 {
        if self.hz_per_sec <= 0.0 {
            return 0.0;
        }
        ((self.freq_end - self.freq_start) / self.hz_per_sec).max(0.0)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            freq_start: 5.0,
            freq_end: 133.33,
            hz_per_sec: 1.0,
            accel_per_hz: 75.0,
            sample_rate: 3200.0,
            gravity: 9810.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_duration() {
        let sweep = SweepConfig::default();
        assert!((sweep.duration() - 128.33).abs() < 1e-9);
    }

    #[test]
    fn zero_rate_sweep_has_no_duration() {
        let sweep = SweepConfig {
            hz_per_sec: 0.0,
            ..SweepConfig::default()
        };
        assert_eq!(sweep.duration(), 0.0);
    }

    #[test]
    fn default_center_is_inside_limits() {
        let motion = MotionConfig::default();
        for axis in 0..3 {
            assert!(motion.center[axis] >= motion.limits_min[axis]);
            assert!(motion.center[axis] <= motion.limits_max[axis]);
        }
    }
}
