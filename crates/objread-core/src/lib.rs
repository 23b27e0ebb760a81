//! objread-core: Entity readers, selection traversal, and JSON export
//!
//! This crate focuses on a small, well-factored surface:
//! - Host boundary (`Entity`) the readers query, read-only
//! - Reader registry dispatching on the entity's kind, generic fallback
//! - Group/Face/Edge readers layered over the generic reader
//! - Selection traversal and the pretty-printed JSON document writer
//! - An in-memory scene snapshot implementing the host boundary
//!
pub mod descriptor;
pub mod error;
pub mod host;
pub mod paths;
pub mod readers;
pub mod scene;
pub mod selection;
pub mod writer;

pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use host::{Entity, EntityKind, PersistentId};
pub use paths::json_filename;
pub use readers::{
    EdgeReader, EntityReader, FaceReader, GenericReader, GroupReader, ReadOpts, Registry,
};
pub use scene::{SceneEntity, SceneEntityData, SceneModel};
pub use selection::read_selection;
pub use writer::{load, save, to_json_string};
