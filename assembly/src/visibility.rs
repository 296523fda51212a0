//! Per-instance visibility, mutated one group at a time.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use std::collections::HashMap;

use crate::catalog::{Assembly, InstanceId};
use crate::group::Group;

/// Visibility of every instance in the active assembly.
///
/// Unknown ids read as visible, so a missing entry never hides an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityStore {
    visible: HashMap<InstanceId, bool>,
}

impl VisibilityStore {
    /// Every instance of `assembly` visible.
    #[must_use]
    pub fn init(assembly: &Assembly) -> Self {
        Self { visible: assembly.parts.iter().map(|p| (p.id.clone(), true)).collect() }
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.get(id).copied().unwrap_or(true)
    }

    /// Visibility of the group as shown in the sidebar: its first member's.
    #[must_use]
    pub fn group_visible(&self, group: &Group) -> bool {
        group.representative().is_none_or(|id| self.is_visible(id))
    }

    /// Flip the whole group to the opposite of its representative's current
    /// state. Returns the new state, or `None` for an empty group.
    pub fn toggle_group(&mut self, group: &Group) -> Option<bool> {
        let representative = group.representative()?;
        let next = !self.is_visible(representative);
        for id in &group.members {
            self.visible.insert(id.clone(), next);
        }
        Some(next)
    }

    /// Number of instances currently hidden.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.visible.values().filter(|v| !**v).count()
    }
}
