//! Grouping index: instances that share one geometry locator.
//!
//! DESIGN
//! ======
//! Grouping depends only on each instance's `geometry_ref`, which never changes
//! at runtime, so a group stores member ids rather than instance copies; pose
//! edits on the instances can't make a group stale. The index is a pure
//! function of the assembly and is memoized per assembly id by [`GroupCache`].

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Assembly, AssemblyId, GeometryRef, InstanceId};
use crate::consts::GEOMETRY_EXTENSION;

/// All instances of one assembly that place the same geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub geometry_ref: GeometryRef,
    /// Member ids in catalog order. Never empty.
    pub members: Vec<InstanceId>,
}

impl Group {
    /// The member whose state stands for the whole group.
    #[must_use]
    pub fn representative(&self) -> Option<&str> {
        self.members.first().map(String::as_str)
    }

    /// Human-readable name: the last path segment without the `.glb` suffix.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.geometry_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// `"/models/Drone/Arm gear.glb"` → `"Arm gear"`.
#[must_use]
pub fn display_name(geometry_ref: &str) -> &str {
    let file = geometry_ref.rsplit('/').next().unwrap_or(geometry_ref);
    file.strip_suffix(GEOMETRY_EXTENSION).unwrap_or(file)
}

/// Ordered partition of an assembly's instances by `geometry_ref`.
///
/// Groups appear in order of their first member in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    groups: Vec<Group>,
    by_ref: HashMap<GeometryRef, usize>,
    by_instance: HashMap<InstanceId, usize>,
}

impl GroupIndex {
    /// Groups in display order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn get(&self, geometry_ref: &str) -> Option<&Group> {
        self.by_ref.get(geometry_ref).map(|&i| &self.groups[i])
    }

    /// The group an instance belongs to.
    #[must_use]
    pub fn group_of(&self, instance_id: &str) -> Option<&Group> {
        self.by_instance.get(instance_id).map(|&i| &self.groups[i])
    }

    /// Unique geometry locators in group order; the renderer loads each once.
    pub fn geometry_refs(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.geometry_ref.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Build the grouping index for an assembly.
#[must_use]
pub fn build_groups(assembly: &Assembly) -> GroupIndex {
    let mut index = GroupIndex::default();
    for part in &assembly.parts {
        let slot = match index.by_ref.get(&part.geometry_ref) {
            Some(&slot) => slot,
            None => {
                let slot = index.groups.len();
                index.groups.push(Group { geometry_ref: part.geometry_ref.clone(), members: Vec::new() });
                index.by_ref.insert(part.geometry_ref.clone(), slot);
                slot
            }
        };
        index.groups[slot].members.push(part.id.clone());
        index.by_instance.insert(part.id.clone(), slot);
    }
    index
}

/// Memo of grouping indexes keyed by assembly id.
#[derive(Debug, Default)]
pub struct GroupCache {
    entries: HashMap<AssemblyId, Arc<GroupIndex>>,
    builds: usize,
}

impl GroupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `assembly`, building it on first use.
    pub fn get_or_build(&mut self, assembly: &Assembly) -> Arc<GroupIndex> {
        if let Some(index) = self.entries.get(&assembly.id) {
            return Arc::clone(index);
        }
        let index = Arc::new(build_groups(assembly));
        self.builds += 1;
        tracing::debug!(assembly_id = %assembly.id, groups = index.len(), "group index built");
        self.entries.insert(assembly.id.clone(), Arc::clone(&index));
        index
    }

    /// How many indexes have been built (cache misses).
    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds
    }
}
