//! `.ics` file names: extension guessing, discovery and output naming.

use std::io;
use std::path::{Path, PathBuf};

pub const ICS_EXTENSION: &str = ".ics";
pub const DEFAULT_ICS_FILE_NAME: &str = "calendar";
const MARKDOWN_EXTENSION: &str = ".md";

pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

pub fn is_ics_file(name: &str) -> bool {
    name.ends_with(ICS_EXTENSION)
}

pub fn add_ics_extension(name: &str) -> String {
    if is_ics_file(name) {
        name.to_string()
    } else {
        format!("{name}{ICS_EXTENSION}")
    }
}

/// Accept a calendar name with or without its extension.
///
/// Returns `name` when it already ends in `.ics` or exists as given,
/// otherwise `name.ics` if that file exists, otherwise `name` unchanged.
pub fn elastic_extension(name: &str) -> String {
    if is_ics_file(name) || file_exists(name) {
        return name.to_string();
    }

    let with_extension = add_ics_extension(name);
    if file_exists(&with_extension) {
        tracing::debug!(name, resolved = %with_extension, "added missing .ics extension");
        return with_extension;
    }

    name.to_string()
}

/// Name of a calendar with its `.ics` extension removed.
pub fn stem(name: &str) -> &str {
    name.strip_suffix(ICS_EXTENSION).unwrap_or(name)
}

/// `.md` file name for a source base name; the default name when there is none.
pub fn output_file_name(base_name: Option<&str>) -> String {
    let stem = base_name
        .map(stem)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ICS_FILE_NAME);
    format!("{stem}{MARKDOWN_EXTENSION}")
}

pub fn output_path(dir: &Path, base_name: Option<&str>) -> PathBuf {
    dir.join(output_file_name(base_name))
}

/// `.ics` files (not directories) directly inside `dir`, sorted by name.
pub fn list_ics_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_ics_file(name))
        .collect();

    names.sort();
    Ok(names)
}
