#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;

use serde::{Deserialize, Serialize};

/// A 3-vector, used for positions (meters), directions, and Euler angles (radians).
///
/// Serialized as a `[x, y, z]` array to match the catalog format.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// `self + dir * t`, per axis.
    #[must_use]
    pub fn add_scaled(self, dir: Self, t: f64) -> Self {
        Self {
            x: dir.x.mul_add(t, self.x),
            y: dir.y.mul_add(t, self.y),
            z: dir.z.mul_add(t, self.z),
        }
    }

    /// Round every component to `decimals` places.
    #[must_use]
    pub fn rounded(self, decimals: i32) -> Self {
        let scale = 10_f64.powi(decimals);
        let round = |v: f64| (v * scale).round() / scale;
        Self { x: round(self.x), y: round(self.y), z: round(self.z) }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// Position plus Euler rotation of one instance, in its parent's space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Pose {
    #[must_use]
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    #[must_use]
    pub fn rounded(self, decimals: i32) -> Self {
        Self { position: self.position.rounded(decimals), rotation: self.rotation.rounded(decimals) }
    }
}
