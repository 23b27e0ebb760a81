use serde::{Deserialize, Serialize};

use crate::host::PersistentId;

/// Structured description of one entity.
///
/// Field order is the JSON key order. A deleted entity carries only `type`
/// and `deleted`; every other field is present or absent depending on the
/// kind of reader that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_id: Option<PersistentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    pub deleted: bool,
    /// Group members, fully described.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Descriptor>>,
    /// Face boundary, ids only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<PersistentId>>,
    /// Edge adjacency, ids only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<PersistentId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set on a group whose members were not read because of the depth limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

impl Descriptor {
    pub fn deleted(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            persistent_id: None,
            visible: None,
            deleted: true,
            children: None,
            edges: None,
            faces: None,
            name: None,
            truncated: None,
        }
    }

    pub fn live(kind: impl Into<String>, id: PersistentId, visible: bool) -> Self {
        Self {
            persistent_id: Some(id),
            visible: Some(visible),
            deleted: false,
            ..Self::deleted(kind)
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Number of descriptors in this tree, counting `self`.
    pub fn tree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(Descriptor::tree_len)
            .sum::<usize>()
    }
}
