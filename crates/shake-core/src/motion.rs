//! Excitation directions and waypoint planning.
//!
//! A calibration run shakes the toolhead back and forth along one direction
//! around a center point. `waypoints` is a pure function of its inputs: the
//! same `(config, direction, size)` always yields the same sequence.

use serde::Serialize;
use shake_common::{Error, Result};
use shake_config::MotionConfig;
use std::fmt;
use std::str::FromStr;

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Direction of excitation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    X,
    Y,
    Z,
    /// CoreXY belt A, vector `(1, -1)`.
    BeltA,
    /// CoreXY belt B, vector `(1, 1)`.
    BeltB,
    /// In-plane direction at the given angle from +X, in degrees.
    Angle(f64),
}

impl Direction {
    /// Unit vector `[x, y, z]`.
    pub fn vector(self) -> [f64; 3] {
        let raw = match self {
            Direction::X => [1.0, 0.0, 0.0],
            Direction::Y => [0.0, 1.0, 0.0],
            Direction::Z => [0.0, 0.0, 1.0],
            Direction::BeltA => [1.0, -1.0, 0.0],
            Direction::BeltB => [1.0, 1.0, 0.0],
            Direction::Angle(deg) => {
                let rad = deg.to_radians();
                [rad.cos(), rad.sin(), 0.0]
            }
        };
        let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
        raw.map(|v| v / norm)
    }

    /// Short label used in file names (`x`, `a`, `angle45`, ...).
    pub fn label(self) -> String {
        match self {
            Direction::X => "x".to_string(),
            Direction::Y => "y".to_string(),
            Direction::Z => "z".to_string(),
            Direction::BeltA => "a".to_string(),
            Direction::BeltB => "b".to_string(),
            // '.' would end the file stem, so 22.5 becomes "angle22p5".
            Direction::Angle(deg) => format!("angle{}", deg).replace('.', "p"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Accepts `x`, `y`, `z`, `a`, `b` (case-insensitive), or an angle in
    /// degrees such as `45` or `angle45`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "x" => Ok(Direction::X),
            "y" => Ok(Direction::Y),
            "z" => Ok(Direction::Z),
            "a" => Ok(Direction::BeltA),
            "b" => Ok(Direction::BeltB),
            other => other
                .strip_prefix("angle")
                .unwrap_or(other)
                .replace('p', ".")
                .parse::<f64>()
                .ok()
                .filter(|deg| deg.is_finite())
                .map(Direction::Angle)
                .ok_or_else(|| Error::UnknownDirection(s.to_string())),
        }
    }
}

/// One toolhead target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// mm/min
    pub feedrate: f64,
}

impl Waypoint {
    fn at(pos: [f64; 3], feedrate: f64) -> Self {
        Self {
            x: pos[0],
            y: pos[1],
            z: pos[2],
            feedrate,
        }
    }
}

/// Plan `center → center + d·size/2 → center − d·size/2 → center`.
pub fn waypoints(config: MotionConfig, direction: Direction, size: f64) -> Result<Vec<Waypoint>> {
    if !(size.is_finite() && size > 0.0) {
        return Err(Error::InvalidSize(size));
    }
    let d = direction.vector();
    let half = size / 2.0;
    let offset = |sign: f64| -> [f64; 3] {
        std::array::from_fn(|i| config.center[i] + sign * d[i] * half)
    };

    let points = [config.center, offset(1.0), offset(-1.0), config.center];
    for point in &points {
        check_bounds(&config, point)?;
    }
    Ok(points
        .iter()
        .map(|p| Waypoint::at(*p, config.feedrate))
        .collect())
}

fn check_bounds(config: &MotionConfig, point: &[f64; 3]) -> Result<()> {
    for (i, axis) in AXIS_NAMES.iter().enumerate() {
        let (min, max) = (config.limits_min[i], config.limits_max[i]);
        // Tolerate float noise from normalizing diagonal vectors.
        if point[i] < min - 1e-9 || point[i] > max + 1e-9 {
            return Err(Error::OutOfBounds {
                axis: *axis,
                value: point[i],
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Render waypoints as `G1` moves.
pub fn to_gcode(points: &[Waypoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| {
            format!(
                "G1 X{:.3} Y{:.3} Z{:.3} F{:.0}",
                p.x, p.y, p.z, p.feedrate
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MotionConfig {
        MotionConfig {
            center: [100.0, 100.0, 20.0],
            limits_min: [0.0, 0.0, 0.0],
            limits_max: [200.0, 200.0, 100.0],
            feedrate: 6000.0,
        }
    }

    #[test]
    fn x_sweep_is_symmetric() {
        let points = waypoints(config(), Direction::X, 50.0).unwrap();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![100.0, 125.0, 75.0, 100.0]);
        assert!(points.iter().all(|p| p.y == 100.0 && p.z == 20.0));
    }

    #[test]
    fn z_moves_only_z() {
        let points = waypoints(config(), Direction::Z, 10.0).unwrap();
        let zs: Vec<f64> = points.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![20.0, 25.0, 15.0, 20.0]);
    }

    #[test]
    fn belt_vectors_are_unit_diagonals() {
        let a = Direction::BeltA.vector();
        let b = Direction::BeltB.vector();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((a[0] - s).abs() < 1e-12 && (a[1] + s).abs() < 1e-12);
        assert!((b[0] - s).abs() < 1e-12 && (b[1] - s).abs() < 1e-12);
    }

    #[test]
    fn angle_90_matches_y() {
        let v = Direction::Angle(90.0).vector();
        assert!(v[0].abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_size() {
        assert!(matches!(
            waypoints(config(), Direction::X, 0.0),
            Err(Error::InvalidSize(_))
        ));
        assert!(waypoints(config(), Direction::X, f64::NAN).is_err());
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = waypoints(config(), Direction::Z, 60.0).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { axis: 'z', .. }));
    }

    #[test]
    fn parses_directions() {
        assert_eq!("X".parse::<Direction>().unwrap(), Direction::X);
        assert_eq!("b".parse::<Direction>().unwrap(), Direction::BeltB);
        assert_eq!("angle45".parse::<Direction>().unwrap(), Direction::Angle(45.0));
        assert_eq!("30".parse::<Direction>().unwrap(), Direction::Angle(30.0));
        assert!("diagonal".parse::<Direction>().is_err());
        assert_eq!("angle22p5".parse::<Direction>().unwrap(), Direction::Angle(22.5));
        assert_eq!(Direction::Angle(22.5).label(), "angle22p5");
    }

    #[test]
    fn gcode_rendering() {
        let points = waypoints(config(), Direction::Y, 20.0).unwrap();
        assert_eq!(
            to_gcode(&points),
            vec![
                "G1 X100.000 Y100.000 Z20.000 F6000",
                "G1 X100.000 Y110.000 Z20.000 F6000",
                "G1 X100.000 Y90.000 Z20.000 F6000",
                "G1 X100.000 Y100.000 Z20.000 F6000",
            ]
        );
    }
}
