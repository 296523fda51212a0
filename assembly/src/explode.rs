//! Explosion engine: per-instance linear separation along direction vectors.
//!
//! Every instance moves from its rest position along its own explosion
//! direction, scaled by one shared factor. There is no easing and no
//! sequencing beyond what the direction magnitudes encode.

#[cfg(test)]
#[path = "explode_test.rs"]
mod explode_test;

use serde::{Deserialize, Serialize};

use crate::catalog::PartInstance;
use crate::consts::{EXPLOSION_MAX, EXPLOSION_MIN, EXPLOSION_STEPS_PER_UNIT};
use crate::math::Pose;

/// The shared explosion scalar, always within `[0, 0.5]` on a `0.001` grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ExplosionFactor(f64);

impl ExplosionFactor {
    pub const ZERO: Self = Self(0.0);

    /// Clamp to the allowed range and snap to the slider step. Non-finite
    /// input maps to zero.
    #[must_use]
    pub fn new(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::ZERO;
        }
        let clamped = raw.clamp(EXPLOSION_MIN, EXPLOSION_MAX);
        let snapped = (clamped * EXPLOSION_STEPS_PER_UNIT).round() / EXPLOSION_STEPS_PER_UNIT;
        Self(snapped.clamp(EXPLOSION_MIN, EXPLOSION_MAX))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for ExplosionFactor {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

impl From<ExplosionFactor> for f64 {
    fn from(factor: ExplosionFactor) -> Self {
        factor.0
    }
}

/// Live pose of `instance` at `factor`: rest position offset along the
/// explosion direction; rotation is left at rest.
///
/// Takes the raw scalar so callers can interpolate outside the slider grid.
#[must_use]
pub fn live_pose(instance: &PartInstance, factor: f64) -> Pose {
    Pose {
        position: instance.rest_position.add_scaled(instance.explosion_direction, factor),
        rotation: instance.rest_rotation,
    }
}

/// A committed pose and the factor it was committed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinned {
    pub pose: Pose,
    pub factor: ExplosionFactor,
}

/// Pose of `instance` as displayed at `factor`. A pinned pose is returned
/// unchanged while `factor` equals its commit factor; otherwise the pose is
/// interpolated from rest.
#[must_use]
pub fn placed_pose(instance: &PartInstance, factor: ExplosionFactor) -> Pose {
    match instance.pinned {
        Some(pin) if pin.factor == factor => pin.pose,
        _ => live_pose(instance, factor.value()),
    }
}

/// Displayed poses for every instance, in order.
pub fn live_poses<'a>(parts: &'a [PartInstance], factor: ExplosionFactor) -> impl Iterator<Item = (&'a PartInstance, Pose)> {
    parts.iter().map(move |p| (p, placed_pose(p, factor)))
}
