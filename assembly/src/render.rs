//! Read model: what the renderer consumes on every update.
//!
//! Nothing here mutates session state. The functions take read-only views of
//! the active assembly and its derived state and produce plain serializable
//! rows: one [`RenderItem`] per instance in catalog order, and one [`GroupRow`]
//! per geometry group for the sidebar.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{Assembly, AssemblyId, GeometryRef, InstanceId};
use crate::explode::{ExplosionFactor, live_poses};
use crate::geometry::{GeometryState, GeometryTracker};
use crate::group::GroupIndex;
use crate::math::Vec3;
use crate::selection::{Selection, SelectionState, TransformMode};
use crate::visibility::VisibilityStore;

/// One instance as the renderer should place it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderItem {
    pub id: InstanceId,
    pub geometry_ref: GeometryRef,
    pub position: Vec3,
    pub rotation: Vec3,
    pub visible: bool,
    pub selected: bool,
    /// Gizmo mode, present only on the selected instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_mode: Option<TransformMode>,
    pub geometry: GeometryState,
}

impl RenderItem {
    /// Visible and its geometry has loaded.
    #[must_use]
    pub fn should_draw(&self) -> bool {
        self.visible && self.geometry == GeometryState::Ready
    }

    /// Whether the renderer should attach a gizmo to this item.
    #[must_use]
    pub fn shows_gizmo(&self) -> bool {
        self.selected && self.should_draw()
    }
}

/// One sidebar row: a geometry group with its aggregate state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    pub geometry_ref: GeometryRef,
    pub name: String,
    pub count: usize,
    /// The representative member's visibility.
    pub visible: bool,
    /// Sidebar checkbox state.
    pub checked: bool,
    /// The representative member is the selected instance.
    pub active: bool,
}

/// Full read model of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub assembly_id: AssemblyId,
    pub assembly_name: String,
    pub generation: u64,
    pub explosion_factor: f64,
    pub transform_mode: TransformMode,
    pub selected_id: Option<InstanceId>,
    pub items: Vec<RenderItem>,
    pub groups: Vec<GroupRow>,
    pub note: String,
}

/// Per-instance rows in catalog order.
#[must_use]
pub fn items(
    assembly: &Assembly,
    factor: ExplosionFactor,
    visibility: &VisibilityStore,
    selection: &Selection,
    geometry: &GeometryTracker,
) -> Vec<RenderItem> {
    let selected_mode = match selection.state() {
        SelectionState::Selected { mode, .. } => Some(mode),
        SelectionState::Idle => None,
    };
    live_poses(&assembly.parts, factor)
        .map(|(part, pose)| {
            let selected = selection.is_selected(&part.id);
            RenderItem {
                id: part.id.clone(),
                geometry_ref: part.geometry_ref.clone(),
                position: pose.position,
                rotation: pose.rotation,
                visible: visibility.is_visible(&part.id),
                selected,
                transform_mode: if selected { selected_mode } else { None },
                geometry: geometry.state(&part.geometry_ref),
            }
        })
        .collect()
}

/// Sidebar rows in group order.
#[must_use]
pub fn group_rows(
    groups: &GroupIndex,
    visibility: &VisibilityStore,
    selection: &Selection,
    marks: &HashSet<GeometryRef>,
) -> Vec<GroupRow> {
    groups
        .groups()
        .iter()
        .map(|group| GroupRow {
            geometry_ref: group.geometry_ref.clone(),
            name: group.display_name().to_owned(),
            count: group.len(),
            visible: visibility.group_visible(group),
            checked: marks.contains(&group.geometry_ref),
            active: group.representative().is_some_and(|id| selection.is_selected(id)),
        })
        .collect()
}
