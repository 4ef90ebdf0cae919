use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::resolve::is_sidecar_name;

/// Recursively collect every Takeout sidecar under `root`, in file-name order.
///
/// Entries that cannot be read are logged and skipped.
pub fn sidecar_candidates(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("{}", err);
                None
            }
        })
        .filter(|entry| {
            // Symlinked sidecars count; directory links are still not followed.
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(is_sidecar_name)
        })
        .map(|entry| {
            log::trace!("Found sidecar {}", entry.path().display());
            entry.into_path()
        })
}
