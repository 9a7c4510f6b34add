use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A directory surfaced to the folder browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub parent: Option<PathBuf>,
    pub has_children: bool,
}

/// List the immediate child directories of `dir`.
///
/// Regular files are skipped. The result is sorted case-insensitively by
/// name; the sort is stable so names equal up to case keep their
/// enumeration order.
pub fn list_directories(dir: impl AsRef<Path>) -> io::Result<Vec<DirEntry>> {
    let dir_path = dir.as_ref();
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir_path)?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let has_children = has_child_directory(&path);
        entries.push(DirEntry {
            name,
            parent: Some(dir_path.to_path_buf()),
            path,
            has_children,
        });
    }

    entries.sort_by_key(|entry| entry.name.to_lowercase());
    Ok(entries)
}

fn has_child_directory(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|read_dir| read_dir.flatten().any(|entry| entry.path().is_dir()))
        .unwrap_or(false)
}

/// Make `path` absolute without the `\\?\` prefix Windows canonicalization adds.
pub fn resolve_absolute(path: &Path) -> io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Folder the save dialog opens in when no start directory is configured.
pub fn default_start_dir() -> PathBuf {
    dirs::document_dir()
        .filter(|dir| dir.is_dir())
        .or_else(|| dirs::home_dir().filter(|dir| dir.is_dir()))
        .unwrap_or_else(|| PathBuf::from("."))
}
