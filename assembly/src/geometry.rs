//! Geometry load state reported back by the renderer.
//!
//! The renderer owns one canonical geometry per locator and loads it
//! asynchronously. The engine only tracks whether each locator is usable yet;
//! an instance whose geometry isn't `Ready` is simply not drawn.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::GeometryRef;
use crate::group::GroupIndex;

/// Load state of one geometry locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryState {
    /// Requested, not yet resolved.
    #[default]
    Pending,
    /// Loaded and drawable.
    Ready,
    /// The renderer gave up; retries are its business.
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryTracker {
    states: HashMap<GeometryRef, GeometryState>,
}

impl GeometryTracker {
    /// Every locator of the index starts `Pending`.
    #[must_use]
    pub fn init(groups: &GroupIndex) -> Self {
        Self { states: groups.geometry_refs().map(|r| (r.to_owned(), GeometryState::Pending)).collect() }
    }

    #[must_use]
    pub fn state(&self, geometry_ref: &str) -> GeometryState {
        self.states.get(geometry_ref).copied().unwrap_or_default()
    }

    /// Record a load result. Locators outside the active assembly are ignored.
    pub fn set(&mut self, geometry_ref: &str, state: GeometryState) -> bool {
        match self.states.get_mut(geometry_ref) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    /// Locators still waiting on the renderer.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.states.values().filter(|s| **s == GeometryState::Pending).count()
    }
}
