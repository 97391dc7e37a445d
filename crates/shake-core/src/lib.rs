//! Shake core: accelerometer sample persistence for resonance calibration.
//!
//! - [`flush`]: bounded background flush of finalized sample buffers
//! - [`codec`]: raw sample CSV writer and loader
//! - [`session`]: sampling windows over an acquisition source
//! - [`sweep`]: synthetic chirp source standing in for a sensor
//! - [`motion`]: excitation directions and waypoint planning
//! - [`report`]: summaries of recorded sample files

pub mod codec;
pub mod exit_codes;
pub mod flush;
pub mod logging;
pub mod motion;
pub mod report;
pub mod session;
pub mod sweep;

pub use codec::{read_samples, write_samples, SampleWriter};
pub use exit_codes::ExitCode;
pub use flush::{
    flush_to_file, run_worker_stdin, FlushJob, FlushOptions, FlushResult, Isolation,
};
pub use motion::{to_gcode, waypoints, Direction, Waypoint};
pub use session::{MeasurementSession, NoSource, SampleSource};
pub use sweep::SyntheticSweep;
