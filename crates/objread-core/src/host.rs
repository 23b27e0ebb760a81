//! Read-only boundary to the host model.
//!
//! The host owns the entities; the readers only ever query them through
//! [`Entity`]. A handle may become stale at any point (the host deleted the
//! entity), so every reader checks [`Entity::is_deleted`] before anything else.

use serde::{Deserialize, Serialize};

/// Stable handle to an entity, valid only while the entity is not deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistentId(pub u64);

impl core::fmt::Display for PersistentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PersistentId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Kind tags of the entities that have specialized readers by default.
pub struct EntityKind;

impl EntityKind {
    pub const GROUP: &'static str = "Group";
    pub const FACE: &'static str = "Face";
    pub const EDGE: &'static str = "Edge";
    /// Kind reported for references the host cannot resolve at all.
    pub const UNKNOWN: &'static str = "Entity";
}

/// An entity handle as exposed by the host.
///
/// Kind-specific queries (`owned_entities`, `label`, `bounding_edges`,
/// `adjacent_faces`) return empty values on kinds that do not have them.
/// None of the queries other than `kind` and `is_deleted` are meaningful on a
/// deleted entity.
pub trait Entity: Sized {
    fn kind(&self) -> &str;
    fn is_deleted(&self) -> bool;
    fn persistent_id(&self) -> PersistentId;
    fn is_visible(&self) -> bool;

    /// Entities directly owned by a group, in host order.
    fn owned_entities(&self) -> Vec<Self>;
    /// Group label; may be empty and is not unique.
    fn label(&self) -> String;

    /// Edges bounding a face, in host order.
    fn bounding_edges(&self) -> Vec<Self>;
    /// Faces adjacent to an edge, in host order.
    fn adjacent_faces(&self) -> Vec<Self>;
}
