//! Deterministic synthetic accelerometer source.
//!
//! Stands in for the accelerometer chip: produces the response of a rigid
//! toolhead to a linear frequency sweep along one direction, plus gravity on
//! Z and optional seeded noise.

use crate::motion::Direction;
use crate::session::SampleSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shake_common::{Error, Result, Sample};
use shake_config::SweepConfig;
use std::f64::consts::TAU;

/// Upper bound on one generated window (about 320 MB of samples).
pub const MAX_SAMPLES: usize = 10_000_000;

/// Linear chirp generator.
#[derive(Debug, Clone)]
pub struct SyntheticSweep {
    sweep: SweepConfig,
    direction: [f64; 3],
    noise: f64,
    seed: u64,
    duration: Option<f64>,
}

impl SyntheticSweep {
    pub fn new(sweep: SweepConfig, direction: Direction) -> Self {
        Self {
            sweep,
            direction: direction.vector(),
            noise: 0.0,
            seed: 0,
            duration: None,
        }
    }

    /// Add uniform noise of the given amplitude, reproducible from `seed`.
    /// A non-finite amplitude makes `generate` fail.
    pub fn with_noise(mut self, amplitude: f64, seed: u64) -> Self {
        self.noise = amplitude.abs();
        self.seed = seed;
        self
    }

    /// Cut the sweep short (or stretch it) to `seconds`. A negative or
    /// non-finite duration makes `generate` fail.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or_else(|| self.sweep.duration())
    }

    /// Number of samples `generate` produces.
    pub fn sample_count(&self) -> Result<usize> {
        let rate = self.sweep.sample_rate;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::Acquisition(format!("invalid sample rate {rate} Hz")));
        }
        let duration = self.duration();
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(Error::Acquisition(format!("invalid duration {duration} s")));
        }
        let span = (duration * rate).floor();
        if span >= MAX_SAMPLES as f64 {
            return Err(Error::Acquisition(format!(
                "{duration} s at {rate} Hz exceeds {MAX_SAMPLES} samples"
            )));
        }
        Ok(span as usize + 1)
    }

    /// Produce the full sample sequence, ordered by time.
    pub fn generate(&self) -> Result<Vec<Sample>> {
        if !self.noise.is_finite() {
            return Err(Error::Acquisition(format!("invalid noise amplitude {}", self.noise)));
        }
        let count = self.sample_count()?;
        let dt = 1.0 / self.sweep.sample_rate;
        let f0 = self.sweep.freq_start;
        let k = self.sweep.hz_per_sec;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let jitter = |rng: &mut StdRng| {
            if self.noise > 0.0 {
                rng.random_range(-self.noise..=self.noise)
            } else {
                0.0
            }
        };

        Ok((0..count)
            .map(|i| {
                let t = i as f64 * dt;
                let freq = f0 + k * t;
                let phase = TAU * (f0 * t + 0.5 * k * t * t);
                let accel = self.sweep.accel_per_hz * freq * phase.sin();
                let [dx, dy, dz] = self.direction;
                Sample::new(
                    t,
                    dx * accel + jitter(&mut rng),
                    dy * accel + jitter(&mut rng),
                    self.sweep.gravity + dz * accel + jitter(&mut rng),
                )
            })
            .collect())
    }
}

impl SampleSource for SyntheticSweep {
    fn samples(&mut self) -> Result<Vec<Sample>> {
        self.generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> SweepConfig {
        SweepConfig {
            freq_start: 10.0,
            freq_end: 20.0,
            hz_per_sec: 10.0,
            accel_per_hz: 50.0,
            sample_rate: 100.0,
            gravity: 9810.0,
        }
    }

    #[test]
    fn sample_count_covers_duration() {
        let sweep = SyntheticSweep::new(short(), Direction::X);
        assert_eq!(sweep.sample_count().unwrap(), 101);
        let samples = sweep.generate().unwrap();
        assert_eq!(samples.len(), 101);
        assert!((samples.last().unwrap().time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn timestamps_strictly_increase() {
        let samples = SyntheticSweep::new(short(), Direction::BeltA).generate().unwrap();
        assert!(samples.windows(2).all(|w| w[1].time > w[0].time));
    }

    #[test]
    fn x_excitation_leaves_y_quiet_and_z_at_gravity() {
        let samples = SyntheticSweep::new(short(), Direction::X).generate().unwrap();
        assert!(samples.iter().all(|s| s.accel_y == 0.0));
        assert!(samples.iter().all(|s| s.accel_z == 9810.0));
        assert!(samples.iter().any(|s| s.accel_x.abs() > 100.0));
    }

    #[test]
    fn amplitude_bounded_by_accel_per_hz() {
        let samples = SyntheticSweep::new(short(), Direction::Y).generate().unwrap();
        let bound = 50.0 * 20.0 + 1e-9;
        assert!(samples.iter().all(|s| s.accel_y.abs() <= bound));
    }

    #[test]
    fn noise_is_reproducible() {
        let a = SyntheticSweep::new(short(), Direction::X).with_noise(5.0, 7).generate().unwrap();
        let b = SyntheticSweep::new(short(), Direction::X).with_noise(5.0, 7).generate().unwrap();
        let c = SyntheticSweep::new(short(), Direction::X).with_noise(5.0, 8).generate().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn duration_override() {
        let sweep = SyntheticSweep::new(short(), Direction::Z).with_duration(0.5);
        assert_eq!(sweep.sample_count().unwrap(), 51);
    }

    #[test]
    fn oversized_window_is_an_error() {
        let sweep = SyntheticSweep::new(short(), Direction::X).with_duration(1e30);
        assert!(matches!(sweep.sample_count(), Err(Error::Acquisition(_))));
        assert!(sweep.generate().is_err());

        for seconds in [f64::INFINITY, f64::NAN, -1.0] {
            let sweep = SyntheticSweep::new(short(), Direction::X).with_duration(seconds);
            assert!(sweep.generate().is_err(), "duration {seconds}");
        }
    }

    #[test]
    fn non_finite_noise_is_an_error() {
        for amplitude in [f64::INFINITY, f64::NAN] {
            let sweep = SyntheticSweep::new(short(), Direction::X).with_noise(amplitude, 1);
            assert!(matches!(sweep.generate(), Err(Error::Acquisition(_))));
        }
    }

    #[test]
    fn bad_rate_is_an_error() {
        let mut config = short();
        config.sample_rate = f64::NAN;
        assert!(SyntheticSweep::new(config, Direction::X).sample_count().is_err());
    }
}
