//! Catalog model: part instances, assemblies, and the read-only catalog.
//!
//! This module defines what an assembly is made of (`PartInstance`), the named
//! ordered collection the viewer switches between (`Assembly`), and the
//! validated, immutable list of assemblies (`Catalog`).
//!
//! Data flows into this layer from a catalog file (YAML or JSON) or from the
//! bundled built-in catalog. The session copies the active assembly's parts out
//! of the catalog on activation; the catalog itself is never mutated.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::explode::Pinned;
use crate::math::Vec3;

/// Identifier of a part instance, unique within its assembly.
pub type InstanceId = String;

/// Identifier of an assembly, unique within the catalog.
pub type AssemblyId = String;

/// Opaque locator of a geometry asset (URL or path). Instances sharing a
/// locator are physically identical parts.
pub type GeometryRef = String;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported catalog format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("catalog contains no assemblies")]
    Empty,
    #[error("duplicate assembly id: {0}")]
    DuplicateAssembly(AssemblyId),
    #[error("duplicate instance id {instance} in assembly {assembly}")]
    DuplicateInstance { assembly: AssemblyId, instance: InstanceId },
}

/// One placed occurrence of a geometry asset within an assembly.
///
/// Field names on the wire follow the catalog format (`url`, `default_pos`,
/// `direction`, `rotation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInstance {
    /// Unique identifier within the assembly.
    pub id: InstanceId,
    /// Locator of the shared geometry this instance places.
    #[serde(rename = "url")]
    pub geometry_ref: GeometryRef,
    /// Position at explosion factor zero, in meters.
    #[serde(rename = "default_pos")]
    pub rest_position: Vec3,
    /// Explosion vector. Its magnitude is both the travel distance at full
    /// factor and the implicit separation order.
    #[serde(rename = "direction")]
    pub explosion_direction: Vec3,
    /// Euler rotation in radians at rest.
    #[serde(rename = "rotation", default)]
    pub rest_rotation: Vec3,
    /// Last committed pose, shown verbatim while its factor is active.
    #[serde(skip)]
    pub pinned: Option<Pinned>,
}

impl PartInstance {
    #[must_use]
    pub fn new(id: &str, geometry_ref: &str, rest_position: Vec3, explosion_direction: Vec3) -> Self {
        Self {
            id: id.to_owned(),
            geometry_ref: geometry_ref.to_owned(),
            rest_position,
            explosion_direction,
            rest_rotation: Vec3::ZERO,
            pinned: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rest_rotation: Vec3) -> Self {
        self.rest_rotation = rest_rotation;
        self
    }
}

/// A named, ordered collection of part instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub id: AssemblyId,
    pub name: String,
    pub parts: Vec<PartInstance>,
}

impl Assembly {
    /// Look up an instance by id.
    #[must_use]
    pub fn part(&self, id: &str) -> Option<&PartInstance> {
        self.parts.iter().find(|p| p.id == id)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.parts.len());
        for part in &self.parts {
            if !seen.insert(part.id.as_str()) {
                return Err(CatalogError::DuplicateInstance {
                    assembly: self.id.clone(),
                    instance: part.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Validated, immutable list of assemblies. Always holds at least one assembly;
/// the first one is the fallback for unrecognized ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    assemblies: Vec<Assembly>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`], [`CatalogError::DuplicateAssembly`] or
    /// [`CatalogError::DuplicateInstance`].
    pub fn new(assemblies: Vec<Assembly>) -> Result<Self, CatalogError> {
        if assemblies.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(assemblies.len());
        for assembly in &assemblies {
            if !seen.insert(assembly.id.as_str()) {
                return Err(CatalogError::DuplicateAssembly(assembly.id.clone()));
            }
            assembly.validate()?;
        }
        Ok(Self { assemblies })
    }

    /// The catalog bundled with the crate (Drone, LeafSpring, MachineVice,
    /// RobotArm, RobotGripper, Suspension, V4 Engine).
    ///
    /// # Errors
    ///
    /// Only if the bundled data is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Parse a YAML catalog: a top-level sequence of assemblies.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] for malformed input, or a validation error.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let assemblies: Vec<Assembly> = serde_yaml::from_str(text)?;
        Self::new(assemblies)
    }

    /// Parse a JSON catalog: a top-level array of assemblies.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, or a validation error.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let assemblies: Vec<Assembly> = serde_json::from_str(text)?;
        Self::new(assemblies)
    }

    /// Load a catalog file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file can't be read,
    /// [`CatalogError::UnsupportedFormat`] for unknown extensions, or any
    /// parse/validation error.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !matches!(ext.as_str(), "yaml" | "yml" | "json") {
            return Err(CatalogError::UnsupportedFormat(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.display().to_string(), source })?;
        if ext == "json" {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// All assemblies in catalog order.
    #[must_use]
    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    /// Look up an assembly by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Assembly> {
        self.assemblies.iter().find(|a| a.id == id)
    }

    /// The fallback assembly: the first in catalog order.
    #[must_use]
    pub fn default_assembly(&self) -> &Assembly {
        // Non-empty by construction.
        &self.assemblies[0]
    }

    /// Resolve an id, falling back to the default assembly. The flag is `true`
    /// when the fallback was taken.
    #[must_use]
    pub fn resolve(&self, id: &str) -> (&Assembly, bool) {
        match self.get(id) {
            Some(assembly) => (assembly, false),
            None => (self.default_assembly(), true),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    /// Always `false` for a constructed catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}
