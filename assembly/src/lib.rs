//! Assembly state engine for the exploded-view viewer.
//!
//! This crate sits between the static part catalog and the render loop. It owns
//! the full lifecycle of a viewing session: resolving the active assembly,
//! deriving each instance's live pose from the explosion factor, grouping
//! instances that share one geometry, gating visibility per group, and tracking
//! the selected instance and its transform gizmo. The host (a 3D engine, or the
//! `explodeview` CLI) feeds [`command::Command`]s in and consumes the
//! [`render`] read model and the [`session::Action`]s that come back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Top-level [`session::Session`] orchestrating everything below |
//! | [`catalog`] | Part instances, assemblies, and the catalog loader |
//! | [`group`] | Grouping of instances by shared geometry locator |
//! | [`explode`] | Explosion factor and live-pose interpolation |
//! | [`visibility`] | Group-granular visibility store |
//! | [`selection`] | Selection, transform mode, and the gizmo gesture |
//! | [`geometry`] | Per-locator load state reported by the renderer |
//! | [`notes`] | Session-scoped free-text annotation |
//! | [`render`] | Read model handed to the renderer each update |
//! | [`command`] | Typed control surface mirroring the viewer toolbar |
//! | [`math`] | `Vec3` and `Pose` |
//! | [`consts`] | Shared numeric constants (factor range, rounding, defaults) |

pub mod catalog;
pub mod command;
pub mod consts;
pub mod explode;
pub mod geometry;
pub mod group;
pub mod math;
pub mod notes;
pub mod render;
pub mod selection;
pub mod session;
pub mod visibility;
