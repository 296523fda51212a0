//! Wire form of user intents.
//!
//! A [`Command`] is one UI event (slider move, sidebar click, gizmo release)
//! as a tagged JSON object, e.g. `{"op":"explode","factor":0.25}`. The CLI
//! reads them one per line; [`Session::apply`] routes each to the matching
//! session operation and returns its actions.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

use crate::catalog::{AssemblyId, GeometryRef, InstanceId};
use crate::geometry::GeometryState;
use crate::math::{Pose, Vec3};
use crate::selection::TransformMode;
use crate::session::{Action, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Route change: make an assembly active.
    Activate { assembly: AssemblyId },
    /// Explosion slider.
    Explode { factor: f64 },
    /// Gizmo mode buttons.
    Mode { mode: TransformMode },
    /// Click on an instance in the viewport.
    Select { id: InstanceId },
    /// Click on a sidebar row.
    SelectGroup { geometry_ref: GeometryRef },
    /// Click on empty space.
    Deselect,
    /// Sidebar eye icon.
    ToggleGroup { geometry_ref: GeometryRef },
    /// Sidebar checkbox.
    CheckGroup { geometry_ref: GeometryRef },
    /// Gizmo grabbed.
    Begin,
    /// Gizmo gesture abandoned.
    Cancel,
    /// Gizmo released with the object at this local pose.
    Commit {
        id: InstanceId,
        position: Vec3,
        #[serde(default)]
        rotation: Vec3,
    },
    /// Renderer finished loading a locator for the current activation.
    Loaded { geometry_ref: GeometryRef, state: GeometryState },
    /// Annotation panel edit.
    Note { text: String },
}

impl Session {
    /// Apply one command and return the actions it produced.
    pub fn apply(&mut self, command: Command) -> Vec<Action> {
        tracing::trace!(?command, "apply");
        match command {
            Command::Activate { assembly } => self.activate(&assembly),
            Command::Explode { factor } => self.set_explosion_factor(factor),
            Command::Mode { mode } => self.set_transform_mode(mode),
            Command::Select { id } => self.select(&id),
            Command::SelectGroup { geometry_ref } => self.select_group(&geometry_ref),
            Command::Deselect => self.deselect(),
            Command::ToggleGroup { geometry_ref } => self.toggle_group(&geometry_ref),
            Command::CheckGroup { geometry_ref } => self.toggle_group_mark(&geometry_ref),
            Command::Begin => self.begin_manipulation(),
            Command::Cancel => self.cancel_manipulation(),
            Command::Commit { id, position, rotation } => self.commit_transform(&id, Pose::new(position, rotation)),
            Command::Loaded { geometry_ref, state } => {
                let activation = self.activation();
                if self.apply_geometry(&activation, &geometry_ref, state) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::Note { text } => {
                self.set_note(text);
                Vec::new()
            }
        }
    }
}
