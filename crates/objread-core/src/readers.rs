//! Readers that turn host entities into [`Descriptor`]s.
//!
//! The [`Registry`] maps an entity kind to the reader responsible for it and
//! falls back to [`GenericReader`] for every kind it does not know, so
//! [`Registry::read_entity`] is total. Composite readers recurse through the
//! registry, never through a fixed reader, so a new kind only needs a
//! `register` call.
//!
//! Group membership is expanded into full child descriptors. Face/edge
//! adjacency is emitted as ids only: a face names its edges and each edge
//! names the face back, so expanding either side would loop.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::descriptor::Descriptor;
use crate::host::{Entity, EntityKind, PersistentId};

#[derive(Clone, Copy, Debug)]
pub struct ReadOpts {
    /// Deepest group nesting level whose members are still enumerated.
    pub max_depth: usize,
}

impl ReadOpts {
    /// Upper bound for `max_depth`. Every group level adds two JSON levels
    /// (object and `children` array), and a saved document must stay under
    /// serde_json's 128-level parse limit to load back.
    pub const MAX_DEPTH: usize = 60;
}

impl Default for ReadOpts {
    fn default() -> Self {
        Self {
            max_depth: Self::MAX_DEPTH,
        }
    }
}

/// Produces the description of one entity kind.
///
/// `depth` is the group nesting level of `entity` (0 for a selected entity).
pub trait EntityReader<E: Entity> {
    fn read_entity(&self, registry: &Registry<E>, entity: &E, depth: usize) -> Descriptor;
}

/// Kind → reader dispatch table.
pub struct Registry<E: Entity> {
    readers: HashMap<String, Box<dyn EntityReader<E>>>,
    opts: ReadOpts,
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Registry<E> {
    /// Registry with the default reader set: Group, Face, Edge.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        reg.register(EntityKind::GROUP, GroupReader);
        reg.register(EntityKind::FACE, FaceReader);
        reg.register(EntityKind::EDGE, EdgeReader);
        reg
    }

    /// Registry without specialized readers; everything reads generically.
    pub fn empty() -> Self {
        Self {
            readers: HashMap::new(),
            opts: ReadOpts::default(),
        }
    }

    /// Set read options; `max_depth` is clamped to [`ReadOpts::MAX_DEPTH`].
    pub fn with_opts(mut self, opts: ReadOpts) -> Self {
        self.opts = ReadOpts {
            max_depth: opts.max_depth.min(ReadOpts::MAX_DEPTH),
        };
        self
    }

    pub fn opts(&self) -> ReadOpts {
        self.opts
    }

    /// Install `reader` for `kind`, replacing any previous reader.
    pub fn register<R>(&mut self, kind: impl Into<String>, reader: R)
    where
        R: EntityReader<E> + 'static,
    {
        self.readers.insert(kind.into(), Box::new(reader));
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.readers.contains_key(kind)
    }

    pub fn read_entity(&self, entity: &E) -> Descriptor {
        self.read_at(entity, 0)
    }

    /// Dispatch at an explicit nesting depth; used by composite readers.
    pub fn read_at(&self, entity: &E, depth: usize) -> Descriptor {
        match self.readers.get(entity.kind()) {
            Some(reader) => {
                trace!(kind = entity.kind(), depth, "specialized reader");
                reader.read_entity(self, entity, depth)
            }
            None => {
                trace!(kind = entity.kind(), depth, "generic reader");
                GenericReader.read_entity(self, entity, depth)
            }
        }
    }
}

/// Fields common to every entity: identity, deletion state, visibility.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericReader;

impl<E: Entity> EntityReader<E> for GenericReader {
    fn read_entity(&self, _registry: &Registry<E>, entity: &E, _depth: usize) -> Descriptor {
        // Deleted entities can not be queried
        if entity.is_deleted() {
            return Descriptor::deleted(entity.kind());
        }
        Descriptor::live(entity.kind(), entity.persistent_id(), entity.is_visible())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GroupReader;

impl<E: Entity> EntityReader<E> for GroupReader {
    fn read_entity(&self, registry: &Registry<E>, group: &E, depth: usize) -> Descriptor {
        let mut info = GenericReader.read_entity(registry, group, depth);
        if info.is_deleted() {
            return info;
        }

        if depth >= registry.opts().max_depth {
            warn!(
                id = %group.persistent_id(),
                depth,
                "group nesting exceeds max depth; members not read"
            );
            info.truncated = Some(true);
        } else {
            let children = group
                .owned_entities()
                .iter()
                .map(|child| registry.read_at(child, depth + 1))
                .collect();
            info.children = Some(children);
        }
        info.name = Some(group.label());
        info
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FaceReader;

impl<E: Entity> EntityReader<E> for FaceReader {
    fn read_entity(&self, registry: &Registry<E>, face: &E, depth: usize) -> Descriptor {
        let mut info = GenericReader.read_entity(registry, face, depth);
        if info.is_deleted() {
            return info;
        }
        info.edges = Some(live_ids(face.bounding_edges()));
        info
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeReader;

impl<E: Entity> EntityReader<E> for EdgeReader {
    fn read_entity(&self, registry: &Registry<E>, edge: &E, depth: usize) -> Descriptor {
        let mut info = GenericReader.read_entity(registry, edge, depth);
        if info.is_deleted() {
            return info;
        }
        info.faces = Some(live_ids(edge.adjacent_faces()));
        info
    }
}

// A stale neighbour has no id left to reference, so it is dropped; the list
// is then shorter than the host's adjacency count for this entity.
fn live_ids<E: Entity>(entities: Vec<E>) -> Vec<PersistentId> {
    entities
        .iter()
        .filter_map(|e| {
            if e.is_deleted() {
                debug!(kind = e.kind(), "skipping deleted adjacent entity");
                None
            } else {
                Some(e.persistent_id())
            }
        })
        .collect()
}
