//! Error types for objread-core
//!
//! Reading entities never fails: stale entities and unknown kinds are data.
//! Only loading a scene and writing the document report errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::PersistentId;

#[derive(Debug, Error)]
pub enum Error {
    /// IO error on a specific file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Moving the finished temp file over the destination failed
    #[error("could not replace {}: {}", path.display(), source.error)]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    /// A selection or lookup named an id the scene does not contain
    #[error("unknown entity id: {0}")]
    UnknownEntity(PersistentId),

    /// A group owns itself, directly or through its members
    #[error("ownership cycle through entity {0}")]
    OwnershipCycle(PersistentId),

    /// An entity is listed as a member more than once
    #[error("entity {0} is owned more than once")]
    MultipleOwners(PersistentId),

    /// The scene has never been saved, so no output path can be derived
    #[error("scene has no path; an explicit output path is required")]
    NoDefaultOutput,
}

pub type Result<T> = std::result::Result<T, Error>;
