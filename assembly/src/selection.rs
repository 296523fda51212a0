//! Selection model: transform modes, the selected instance, and the gizmo gesture.
//!
//! `TransformMode` is the gizmo mode chosen on the toolbar. `Selection` is the
//! persistent state visible to the renderer (which instance, which mode).
//! `Gesture` is the manipulation in progress between gizmo grab and release;
//! on release the controller writes the new pose back into the instance and
//! produces a [`PoseRecord`] for the operator to copy into the catalog.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Assembly, InstanceId, PartInstance};
use crate::consts::RECORD_DECIMALS;
use crate::explode::{ExplosionFactor, Pinned};
use crate::math::{Pose, Vec3};

/// Which gizmo is attached to the selected instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Move along the gizmo axes (default).
    #[default]
    Translate,
    /// Rotate around the gizmo axes.
    Rotate,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate => f.write_str("translate"),
            Self::Rotate => f.write_str("rotate"),
        }
    }
}

/// Controller state as a two-state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected.
    Idle,
    /// One instance selected with the given gizmo mode.
    Selected { id: InstanceId, mode: TransformMode },
}

/// Manipulation in progress on the selected instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No gizmo handle grabbed.
    #[default]
    Idle,
    /// A gizmo handle is held.
    Manipulating {
        /// Instance under manipulation.
        id: InstanceId,
        /// Live pose when the handle was grabbed, used to revert on cancel.
        origin: Pose,
    },
}

/// Pose emitted on transform commit, rounded for copying into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub id: InstanceId,
    /// Committed local position.
    pub position: Vec3,
    /// Committed local rotation (radians).
    pub rotation: Vec3,
    /// Rest position that reproduces `position` at the current explosion
    /// factor; equals `position` when the assembly is not exploded.
    pub rest_position: Vec3,
}

impl PoseRecord {
    /// Catalog-format snippet, four decimals per component.
    #[must_use]
    pub fn to_catalog_snippet(&self) -> String {
        let v = |v: Vec3| format!("[{:.4}, {:.4}, {:.4}]", v.x, v.y, v.z);
        format!(
            "{{ id: \"{}\", default_pos: {}, rotation: {} }}",
            self.id,
            v(self.rest_position),
            v(self.rotation)
        )
    }
}

/// Persistent selection state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected_id: Option<InstanceId>,
    mode: TransformMode,
    gesture: Gesture,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        match &self.selected_id {
            Some(id) => SelectionState::Selected { id: id.clone(), mode: self.mode },
            None => SelectionState::Idle,
        }
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    /// The active mode while selected, or the mode the next selection gets.
    #[must_use]
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Select `id` if it belongs to `assembly`. Returns `false` (and changes
    /// nothing) for unknown ids.
    pub fn select(&mut self, assembly: &Assembly, id: &str) -> bool {
        if assembly.part(id).is_none() {
            tracing::debug!(%id, assembly_id = %assembly.id, "select ignored: unknown instance");
            return false;
        }
        if self.selected_id.as_deref() != Some(id) {
            self.gesture = Gesture::Idle;
        }
        self.selected_id = Some(id.to_owned());
        true
    }

    /// Drop the selection and any gesture in progress.
    pub fn deselect(&mut self) -> bool {
        self.gesture = Gesture::Idle;
        self.selected_id.take().is_some()
    }

    /// Set the gizmo mode. Returns `true` if the mode changed.
    pub fn set_mode(&mut self, mode: TransformMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Grab the gizmo on the selected instance. `origin` is its current live pose.
    pub fn begin_manipulation(&mut self, origin: Pose) -> bool {
        let Some(id) = self.selected_id.clone() else {
            return false;
        };
        self.gesture = Gesture::Manipulating { id, origin };
        true
    }

    /// Abandon the gesture, returning the instance and the pose to restore.
    pub fn cancel_manipulation(&mut self) -> Option<(InstanceId, Pose)> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Manipulating { id, origin } => Some((id, origin)),
            Gesture::Idle => None,
        }
    }

    /// Release the gizmo: write `pose` (the object's resulting local pose) into
    /// the selected instance and emit its record.
    ///
    /// The instance is pinned to `pose` at `factor`, so reads at that factor
    /// return it bit for bit. The rest pose is back-solved against `factor` for
    /// every other factor. Commits for anything but the selected instance are
    /// ignored.
    pub fn commit_transform(
        &mut self,
        parts: &mut [PartInstance],
        id: &str,
        pose: Pose,
        factor: ExplosionFactor,
    ) -> Option<PoseRecord> {
        if !self.is_selected(id) {
            tracing::debug!(%id, selected = ?self.selected_id, "commit ignored: instance not selected");
            return None;
        }
        let part = parts.iter_mut().find(|p| p.id == id)?;
        self.gesture = Gesture::Idle;

        part.rest_position = pose.position.add_scaled(part.explosion_direction, -factor.value());
        part.rest_rotation = pose.rotation;
        part.pinned = Some(Pinned { pose, factor });

        let rounded = pose.rounded(RECORD_DECIMALS);
        Some(PoseRecord {
            id: part.id.clone(),
            position: rounded.position,
            rotation: rounded.rotation,
            rest_position: part.rest_position.rounded(RECORD_DECIMALS),
        })
    }
}
