//! Pretty-printed JSON document of descriptors.
//!
//! The document is a bare top-level array, one entry per selected entity.
//! Saving goes through a temp file in the destination directory that is
//! renamed over the destination once fully written, so a failed save leaves
//! either no file or the previous complete one.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};

pub fn to_json_string(descriptors: &[Descriptor]) -> Result<String> {
    let mut s = serde_json::to_string_pretty(descriptors)?;
    s.push('\n');
    Ok(s)
}

/// Write `descriptors` to `path`, creating or replacing it. Returns the number
/// of bytes written.
pub fn save(descriptors: &[Descriptor], path: &Path) -> Result<usize> {
    let s = to_json_string(descriptors)?;
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = temp_builder().tempfile_in(dir).map_err(io_err)?;
    tmp.write_all(s.as_bytes()).map_err(io_err)?;
    // Replacing keeps the destination's mode.
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|source| Error::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = s.len(), "saved document");
    Ok(s.len())
}

// New files get the umask default like a plain create, not tempfile's 0600.
fn temp_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    builder.prefix(".objread");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

/// Read a document written by [`save`].
pub fn load(path: &Path) -> Result<Vec<Descriptor>> {
    let data = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}
