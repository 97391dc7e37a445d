//! Named configuration presets.

use crate::resolve::ShakeConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Built-in presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    /// Full-length sweep, 10 minute flush bound.
    Default,
    /// Short sweep at a low data rate with a tight flush bound, for CI runs.
    FastCi,
}

impl PresetName {
    pub const ALL: [PresetName; 2] = [PresetName::Default, PresetName::FastCi];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::Default => "default",
            PresetName::FastCi => "fast-ci",
        }
    }
}

impl FromStr for PresetName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(PresetName::Default),
            "fast-ci" => Ok(PresetName::FastCi),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// Build the configuration for a preset.
pub fn get_preset(name: PresetName) -> ShakeConfig {
    let mut config = ShakeConfig::default();
    if name == PresetName::FastCi {
        config.flush.timeout_secs = 30;
        config.sweep.freq_start = 10.0;
        config.sweep.freq_end = 40.0;
        config.sweep.hz_per_sec = 10.0;
        config.sweep.sample_rate = 400.0;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn every_preset_validates() {
        for name in PresetName::ALL {
            let result = validate(&get_preset(name));
            assert!(result.is_valid(), "{}: {:?}", name.as_str(), result.errors);
        }
    }

    #[test]
    fn names_round_trip() {
        for name in PresetName::ALL {
            assert_eq!(name.as_str().parse::<PresetName>().unwrap(), name);
        }
        assert!("turbo".parse::<PresetName>().is_err());
    }

    #[test]
    fn fast_ci_is_short() {
        assert!(get_preset(PresetName::FastCi).sweep.duration() <= 3.0);
    }
}
