//! The snapshot document: every type and action of one generation run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{ActionDescriptor, TypeDescriptor, TypeId};
use crate::error::{GenError, Result};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
    #[serde(default)]
    actions: Vec<ActionDescriptor>,
}

/// Ordered, immutable view of the backend for one run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    types: Vec<TypeDescriptor>,
    actions: Vec<ActionDescriptor>,
    index: HashMap<TypeId, usize>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = String;

    fn try_from(raw: RawSnapshot) -> std::result::Result<Self, Self::Error> {
        Self::new(raw.types, raw.actions)
    }
}

impl Snapshot {
    /// Build a snapshot, rejecting two descriptors with the same identity.
    pub fn new(
        types: Vec<TypeDescriptor>,
        actions: Vec<ActionDescriptor>,
    ) -> std::result::Result<Self, String> {
        let mut index = HashMap::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            if index.insert(ty.id(), i).is_some() {
                return Err(format!("duplicate type descriptor '{}'", ty.id()));
            }
        }
        Ok(Self {
            types,
            actions,
            index,
        })
    }

    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|err| GenError::SnapshotRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let snapshot = Self::from_json(&json)?;
        debug!(
            path = %path.display(),
            types = snapshot.types.len(),
            actions = snapshot.actions.len(),
            "Loaded model snapshot."
        );
        Ok(snapshot)
    }

    /// Type descriptors in snapshot order.
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Action descriptors in snapshot order.
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Descriptor with the given identity.
    pub fn get(&self, id: &TypeId) -> Option<&TypeDescriptor> {
        self.index.get(id).and_then(|&i| self.types.get(i))
    }
}
