use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Default output file for a model document: next to it, same stem, `.json`.
///
/// A model that is itself a `.json` file gets `<stem>.objects.json` instead so
/// the export never replaces its input.
pub fn json_filename(model_path: &Path) -> PathBuf {
    let mut name = model_path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("model"));
    let is_json = model_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    name.push(if is_json { ".objects.json" } else { ".json" });
    model_path.with_file_name(name)
}
