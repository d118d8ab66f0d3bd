//! Shared geometry building blocks
//!
//! Sample locations, voxelisation and noise priors appear in every Spec; the world
//! bounds are supplied once per run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 3D 向量 / 采样点
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn component(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Self::X, Self::Y, Self::Z];
    pub const HORIZONTAL: [Axis; 2] = [Self::X, Self::Y];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Voxel grid used to discretize the model volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voxelisation {
    /// Grid points per cube side along x
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub z_resolution: i32,
    /// Supersampling exponent
    pub supersample: u32,
}

impl Voxelisation {
    pub fn resolution(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x_resolution,
            Axis::Y => self.y_resolution,
            Axis::Z => self.z_resolution,
        }
    }

    pub fn resolutions(&self) -> [i32; 3] {
        [self.x_resolution, self.y_resolution, self.z_resolution]
    }
}

/// Inverse-gamma noise prior hyperparameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    pub inverse_gamma_alpha: f64,
    pub inverse_gamma_beta: f64,
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN is never contained
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Axis-aligned world extent supplied by the world-geometry provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSpec {
    pub x_bounds: Bounds,
    pub y_bounds: Bounds,
    /// Only consulted by kinds that check the vertical bound
    pub z_bounds: Bounds,
}

impl WorldSpec {
    pub fn bounds(&self, axis: Axis) -> Bounds {
        match axis {
            Axis::X => self.x_bounds,
            Axis::Y => self.y_bounds,
            Axis::Z => self.z_bounds,
        }
    }
}
