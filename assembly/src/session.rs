//! Viewing session: the orchestrator over catalog, groups, explosion,
//! visibility, selection, and notes.
//!
//! DESIGN
//! ======
//! Everything tied to the active assembly lives in one `ActiveAssembly` value.
//! Activation builds a complete replacement and swaps it in with a single
//! assignment, so no reader can see new groups next to an old selection.
//! Each activation gets a fresh generation number; asynchronous results carry
//! the [`Activation`] they were started under and are dropped when it is no
//! longer current. Notes sit outside `ActiveAssembly` and survive switches.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Assembly, AssemblyId, Catalog, GeometryRef, InstanceId};
use crate::explode::{ExplosionFactor, placed_pose};
use crate::geometry::{GeometryState, GeometryTracker};
use crate::group::{GroupCache, GroupIndex};
use crate::math::{Pose, Vec3};
use crate::notes::Notes;
use crate::render::{self, GroupRow, RenderItem, Snapshot};
use crate::selection::{PoseRecord, Selection, SelectionState, TransformMode};
use crate::visibility::VisibilityStore;

/// Actions returned from session operations for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// A new assembly became active.
    Activated { assembly_id: AssemblyId, name: String, fell_back: bool },
    /// The user released the gizmo; the record is ready to copy into the catalog.
    TransformCommitted { record: PoseRecord },
    /// The gizmo gesture was abandoned; the instance goes back to `origin`.
    ManipulationCancelled { id: InstanceId, origin: Pose },
    /// The read model changed.
    RenderNeeded,
}

/// Identity of one activation, carried by asynchronous work so stale results
/// can be recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub generation: u64,
    pub assembly_id: AssemblyId,
}

/// State owned by the active assembly; replaced wholesale on activation.
#[derive(Debug)]
struct ActiveAssembly {
    generation: u64,
    assembly: Assembly,
    groups: Arc<GroupIndex>,
    factor: ExplosionFactor,
    visibility: VisibilityStore,
    selection: Selection,
    marks: HashSet<GeometryRef>,
    geometry: GeometryTracker,
}

/// One user's viewing session over a catalog.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    cache: GroupCache,
    active: ActiveAssembly,
    notes: Notes,
    generation: u64,
}

impl Session {
    /// Start a session on the catalog's default assembly.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let mut cache = GroupCache::new();
        let active = Self::build_active(&mut cache, catalog.default_assembly(), 1);
        Self { catalog, cache, active, notes: Notes::new(), generation: 1 }
    }

    fn build_active(cache: &mut GroupCache, assembly: &Assembly, generation: u64) -> ActiveAssembly {
        let groups = cache.get_or_build(assembly);
        let geometry = GeometryTracker::init(&groups);
        ActiveAssembly {
            generation,
            assembly: assembly.clone(),
            groups,
            factor: ExplosionFactor::ZERO,
            visibility: VisibilityStore::init(assembly),
            selection: Selection::new(),
            marks: HashSet::new(),
            geometry,
        }
    }

    // --- Assembly switching ---

    /// Make `assembly_id` the active assembly, falling back to the catalog's
    /// first assembly when the id is unknown. Resets explosion, selection,
    /// transform mode, visibility, group marks, and geometry state.
    pub fn activate(&mut self, assembly_id: &str) -> Vec<Action> {
        let (assembly, fell_back) = self.catalog.resolve(assembly_id);
        if fell_back {
            tracing::warn!(requested = %assembly_id, fallback = %assembly.id, "unknown assembly; using default");
        }
        self.generation += 1;
        let next = Self::build_active(&mut self.cache, assembly, self.generation);
        self.active = next;

        tracing::info!(
            assembly_id = %self.active.assembly.id,
            name = %self.active.assembly.name,
            parts = self.active.assembly.parts.len(),
            groups = self.active.groups.len(),
            generation = self.generation,
            "assembly activated"
        );
        vec![
            Action::Activated {
                assembly_id: self.active.assembly.id.clone(),
                name: self.active.assembly.name.clone(),
                fell_back,
            },
            Action::RenderNeeded,
        ]
    }

    /// Token identifying the current activation.
    #[must_use]
    pub fn activation(&self) -> Activation {
        Activation { generation: self.active.generation, assembly_id: self.active.assembly.id.clone() }
    }

    // --- Explosion ---

    /// Set the explosion factor (clamped to `[0, 0.5]`, snapped to `0.001`).
    pub fn set_explosion_factor(&mut self, raw: f64) -> Vec<Action> {
        let factor = ExplosionFactor::new(raw);
        if factor == self.active.factor {
            return Vec::new();
        }
        self.active.factor = factor;
        vec![Action::RenderNeeded]
    }

    // --- Visibility ---

    /// Flip every instance of the group to the opposite of its first member.
    /// Unknown locators are ignored.
    pub fn toggle_group(&mut self, geometry_ref: &str) -> Vec<Action> {
        let Some(group) = self.active.groups.get(geometry_ref) else {
            tracing::debug!(%geometry_ref, "toggle ignored: unknown group");
            return Vec::new();
        };
        match self.active.visibility.toggle_group(group) {
            Some(visible) => {
                tracing::debug!(
                    %geometry_ref,
                    visible,
                    members = group.len(),
                    hidden = self.active.visibility.hidden_count(),
                    "group visibility toggled"
                );
                vec![Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Tick or untick the group's sidebar checkbox.
    pub fn toggle_group_mark(&mut self, geometry_ref: &str) -> Vec<Action> {
        if self.active.groups.get(geometry_ref).is_none() {
            tracing::debug!(%geometry_ref, "mark ignored: unknown group");
            return Vec::new();
        }
        if !self.active.marks.remove(geometry_ref) {
            self.active.marks.insert(geometry_ref.to_owned());
        }
        vec![Action::RenderNeeded]
    }

    // --- Selection ---

    /// Select an instance of the active assembly. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> Vec<Action> {
        if self.active.selection.is_selected(id) {
            return Vec::new();
        }
        if self.active.selection.select(&self.active.assembly, id) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Select the first instance of a group (sidebar row click).
    pub fn select_group(&mut self, geometry_ref: &str) -> Vec<Action> {
        let Some(id) = self.active.groups.get(geometry_ref).and_then(|g| g.representative()).map(str::to_owned)
        else {
            tracing::debug!(%geometry_ref, "select ignored: unknown group");
            return Vec::new();
        };
        self.select(&id)
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        if self.active.selection.deselect() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Set the gizmo mode; applies to the next selection when idle.
    pub fn set_transform_mode(&mut self, mode: TransformMode) -> Vec<Action> {
        let changed = self.active.selection.set_mode(mode);
        if changed && self.active.selection.selected_id().is_some() {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Gizmo gesture ---

    /// The user grabbed the gizmo on the selected instance.
    pub fn begin_manipulation(&mut self) -> Vec<Action> {
        let Some(origin) = self.active.selection.selected_id().and_then(|id| self.live_pose(id)) else {
            return Vec::new();
        };
        self.active.selection.begin_manipulation(origin);
        Vec::new()
    }

    /// The gesture was abandoned; the renderer should snap back to the read model.
    pub fn cancel_manipulation(&mut self) -> Vec<Action> {
        match self.active.selection.cancel_manipulation() {
            Some((id, origin)) => vec![Action::ManipulationCancelled { id, origin }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// The user released the gizmo with the object at `pose` (local space).
    pub fn commit_transform(&mut self, id: &str, pose: Pose) -> Vec<Action> {
        let active = &mut self.active;
        let Some(record) =
            active.selection.commit_transform(&mut active.assembly.parts, id, pose, active.factor)
        else {
            return Vec::new();
        };
        tracing::info!(
            id = %record.id,
            position = ?record.position,
            rotation = ?record.rotation,
            "transform committed: {}",
            record.to_catalog_snippet()
        );
        vec![Action::TransformCommitted { record }, Action::RenderNeeded]
    }

    // --- Geometry ---

    /// Apply an asynchronous geometry load result started under `activation`.
    /// Returns `false` when the result is stale or the locator is unknown.
    pub fn apply_geometry(&mut self, activation: &Activation, geometry_ref: &str, state: GeometryState) -> bool {
        if activation.generation != self.active.generation {
            tracing::debug!(
                %geometry_ref,
                stale = activation.generation,
                current = self.active.generation,
                "geometry result discarded: superseded activation"
            );
            return false;
        }
        let applied = self.active.geometry.set(geometry_ref, state);
        if applied {
            tracing::debug!(%geometry_ref, ?state, pending = self.active.geometry.pending(), "geometry state updated");
        }
        applied
    }

    /// Locators the renderer should load for the active assembly, once each.
    pub fn geometry_manifest(&self) -> impl Iterator<Item = &str> {
        self.active.groups.geometry_refs()
    }

    // --- Notes ---

    #[must_use]
    pub fn note(&self) -> &str {
        self.notes.get()
    }

    pub fn set_note(&mut self, text: impl Into<String>) {
        self.notes.set(text);
    }

    // --- Queries ---

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active assembly, including any committed pose edits.
    #[must_use]
    pub fn assembly(&self) -> &Assembly {
        &self.active.assembly
    }

    #[must_use]
    pub fn groups(&self) -> &GroupIndex {
        &self.active.groups
    }

    #[must_use]
    pub fn explosion_factor(&self) -> ExplosionFactor {
        self.active.factor
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        self.active.selection.state()
    }

    #[must_use]
    pub fn transform_mode(&self) -> TransformMode {
        self.active.selection.mode()
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.active.visibility.is_visible(id)
    }

    #[must_use]
    pub fn is_marked(&self, geometry_ref: &str) -> bool {
        self.active.marks.contains(geometry_ref)
    }

    #[must_use]
    pub fn geometry_state(&self, geometry_ref: &str) -> GeometryState {
        self.active.geometry.state(geometry_ref)
    }

    /// Displayed pose of an instance at the current explosion factor.
    #[must_use]
    pub fn live_pose(&self, id: &str) -> Option<Pose> {
        self.active.assembly.part(id).map(|p| placed_pose(p, self.active.factor))
    }

    /// Where the camera should ease toward: the selected instance's live position.
    #[must_use]
    pub fn focus_target(&self) -> Option<Vec3> {
        self.active.selection.selected_id().and_then(|id| self.live_pose(id)).map(|p| p.position)
    }

    /// Group indexes built so far (cache misses).
    #[must_use]
    pub fn group_builds(&self) -> usize {
        self.cache.builds()
    }

    // --- Read model ---

    #[must_use]
    pub fn render_items(&self) -> Vec<RenderItem> {
        let a = &self.active;
        render::items(&a.assembly, a.factor, &a.visibility, &a.selection, &a.geometry)
    }

    #[must_use]
    pub fn group_rows(&self) -> Vec<GroupRow> {
        let a = &self.active;
        render::group_rows(&a.groups, &a.visibility, &a.selection, &a.marks)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            assembly_id: self.active.assembly.id.clone(),
            assembly_name: self.active.assembly.name.clone(),
            generation: self.active.generation,
            explosion_factor: self.active.factor.value(),
            transform_mode: self.active.selection.mode(),
            selected_id: self.active.selection.selected_id().map(str::to_owned),
            items: self.render_items(),
            groups: self.group_rows(),
            note: self.notes.get().to_owned(),
        }
    }
}
