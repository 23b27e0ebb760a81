//! In-memory scene snapshot implementing the host boundary.
//!
//! A snapshot is a flat list of entity records that reference each other by
//! id, plus the ordered selection. It is what the CLI loads from disk and what
//! the tests build by hand.
//!
//! ```json
//! {
//!   "path": "/models/boat.skp",
//!   "entities": [
//!     {"id": 1, "kind": "Group", "name": "Hull", "entities": [2]},
//!     {"id": 2, "kind": "Face", "edges": [3]},
//!     {"id": 3, "kind": "Edge", "faces": [2]}
//!   ],
//!   "selection": [1]
//! }
//! ```
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::host::{Entity, EntityKind, PersistentId};

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntityData {
    pub id: PersistentId,
    pub kind: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub name: String,
    /// Owned entities (groups).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<PersistentId>,
    /// Bounding edges (faces).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<PersistentId>,
    /// Adjacent faces (edges).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<PersistentId>,
}

impl SceneEntityData {
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        Self {
            id: PersistentId(id),
            kind: kind.into(),
            deleted: false,
            visible: true,
            name: String::new(),
            entities: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneModel {
    /// Location of the host document; drives the default output path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    entities: Vec<SceneEntityData>,
    #[serde(default)]
    selection: Vec<PersistentId>,
    #[serde(skip)]
    index: HashMap<PersistentId, usize>,
    /// member id -> owning group id
    #[serde(skip)]
    owner: HashMap<PersistentId, PersistentId>,
}

impl SceneModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot. Ownership must form a tree: every id is listed in
    /// at most one group's `entities`, and no group owns itself or an
    /// ancestor.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let mut model: SceneModel = serde_json::from_str(s)?;
        model.reindex()?;
        Ok(model)
    }

    /// Load a snapshot file. Without an explicit `path` inside, the snapshot
    /// file itself stands in as the host document.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut model = Self::from_json_str(&data)?;
        if model.path.is_none() {
            model.path = Some(path.to_path_buf());
        }
        debug!(
            path = %path.display(),
            entities = model.entities.len(),
            selected = model.selection.len(),
            "loaded scene"
        );
        Ok(model)
    }

    fn reindex(&mut self) -> Result<()> {
        self.index.clear();
        self.owner.clear();
        for i in 0..self.entities.len() {
            let (id, members) = (self.entities[i].id, self.entities[i].entities.clone());
            self.claim_members(id, &members)?;
            // First record wins on duplicate ids.
            self.index.entry(id).or_insert(i);
        }
        Ok(())
    }

    fn is_ancestor(&self, candidate: PersistentId, of: PersistentId) -> bool {
        let mut cur = of;
        while let Some(&up) = self.owner.get(&cur) {
            if up == candidate {
                return true;
            }
            cur = up;
        }
        false
    }

    // Checks every member before recording any, so a rejected group leaves
    // the ownership map untouched.
    fn claim_members(&mut self, group: PersistentId, members: &[PersistentId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(members.len());
        for &m in members {
            if m == group || self.is_ancestor(m, group) {
                return Err(Error::OwnershipCycle(m));
            }
            if self.owner.contains_key(&m) || !seen.insert(m) {
                return Err(Error::MultipleOwners(m));
            }
        }
        for &m in members {
            self.owner.insert(m, group);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add a record; fails if its `entities` would break the ownership tree.
    pub fn insert(&mut self, data: SceneEntityData) -> Result<()> {
        self.claim_members(data.id, &data.entities)?;
        self.push(data);
        Ok(())
    }

    fn push(&mut self, data: SceneEntityData) {
        let id = data.id;
        self.entities.push(data);
        self.index.entry(id).or_insert(self.entities.len() - 1);
    }

    pub fn add_entity(&mut self, id: u64, kind: &str) {
        self.push(SceneEntityData::new(id, kind));
    }

    pub fn add_group(&mut self, id: u64, name: &str, members: &[u64]) -> Result<()> {
        let mut data = SceneEntityData::new(id, EntityKind::GROUP);
        data.name = name.to_string();
        data.entities = members.iter().copied().map(PersistentId).collect();
        self.insert(data)
    }

    pub fn add_face(&mut self, id: u64, edges: &[u64]) {
        let mut data = SceneEntityData::new(id, EntityKind::FACE);
        data.edges = edges.iter().copied().map(PersistentId).collect();
        self.push(data);
    }

    pub fn add_edge(&mut self, id: u64, faces: &[u64]) {
        let mut data = SceneEntityData::new(id, EntityKind::EDGE);
        data.faces = faces.iter().copied().map(PersistentId).collect();
        self.push(data);
    }

    fn data_mut(&mut self, id: PersistentId) -> Result<&mut SceneEntityData> {
        let i = *self.index.get(&id).ok_or(Error::UnknownEntity(id))?;
        Ok(&mut self.entities[i])
    }

    /// Mark an entity deleted, the way the host invalidates it.
    pub fn delete(&mut self, id: PersistentId) -> Result<()> {
        self.data_mut(id)?.deleted = true;
        Ok(())
    }

    pub fn set_visible(&mut self, id: PersistentId, visible: bool) -> Result<()> {
        self.data_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn select(&mut self, ids: &[u64]) {
        self.selection = ids.iter().copied().map(PersistentId).collect();
    }

    pub fn selection_ids(&self) -> &[PersistentId] {
        &self.selection
    }

    pub fn entity(&self, id: PersistentId) -> Option<SceneEntity<'_>> {
        self.index.get(&id).map(|_| self.handle(id))
    }

    // Dangling references still get a handle; it reads as deleted.
    fn handle(&self, id: PersistentId) -> SceneEntity<'_> {
        SceneEntity {
            model: self,
            id,
            data: self.index.get(&id).map(|&i| &self.entities[i]),
        }
    }

    /// Resolve ids to handles in the given order, duplicates included.
    pub fn resolve(&self, ids: &[PersistentId]) -> Result<Vec<SceneEntity<'_>>> {
        ids.iter()
            .map(|&id| self.entity(id).ok_or(Error::UnknownEntity(id)))
            .collect()
    }

    /// The snapshot's own selection.
    pub fn selection(&self) -> Result<Vec<SceneEntity<'_>>> {
        self.resolve(&self.selection)
    }
}

/// Handle to one entity of a [`SceneModel`].
#[derive(Clone, Copy)]
pub struct SceneEntity<'a> {
    model: &'a SceneModel,
    id: PersistentId,
    data: Option<&'a SceneEntityData>,
}

impl core::fmt::Debug for SceneEntity<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneEntity")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("deleted", &self.is_deleted())
            .finish()
    }
}

impl<'a> SceneEntity<'a> {
    fn related(&self, ids: impl Fn(&'a SceneEntityData) -> &'a [PersistentId]) -> Vec<Self> {
        match self.data {
            Some(d) => ids(d).iter().map(|&id| self.model.handle(id)).collect(),
            None => Vec::new(),
        }
    }
}

impl Entity for SceneEntity<'_> {
    fn kind(&self) -> &str {
        self.data.map_or(EntityKind::UNKNOWN, |d| d.kind.as_str())
    }

    fn is_deleted(&self) -> bool {
        self.data.is_none_or(|d| d.deleted)
    }

    fn persistent_id(&self) -> PersistentId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.data.is_some_and(|d| d.visible)
    }

    fn owned_entities(&self) -> Vec<Self> {
        self.related(|d| d.entities.as_slice())
    }

    fn label(&self) -> String {
        self.data.map(|d| d.name.clone()).unwrap_or_default()
    }

    fn bounding_edges(&self) -> Vec<Self> {
        self.related(|d| d.edges.as_slice())
    }

    fn adjacent_faces(&self) -> Vec<Self> {
        self.related(|d| d.faces.as_slice())
    }
}
