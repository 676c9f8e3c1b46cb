//! Directory walk shared by the activity signals.
//!
//! The same skip rules apply to every scan: hidden entries are ignored, and
//! so are well-known dependency caches and build output directories. Errors
//! on individual entries are swallowed so one unreadable subtree never
//! aborts an analysis.

use std::fs;
use std::path::Path;

/// Hidden entries (leading dot) are skipped everywhere, files and
/// directories alike. This also covers version-control internals.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn is_excluded_dir(name: &str, skip_dirs: &[String]) -> bool {
    skip_dirs.iter().any(|d| d == name)
}

/// Depth-first walk over regular files under `root`, invoking `visit` for
/// each one. Entries are visited in name order so repeated walks over an
/// unchanged tree observe the same sequence.
pub fn walk_files<F>(root: &Path, skip_dirs: &[String], visit: &mut F)
where
    F: FnMut(&Path, &fs::Metadata),
{
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %root.display(), %err, "cannot enumerate directory, skipping");
            return;
        }
    };

    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if is_hidden(&name) {
            continue;
        }
        // DirEntry::metadata does not traverse symlinks, which keeps the
        // walk from looping through link cycles.
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(_) => continue,
        };
        let path = entry.path();
        if meta.is_dir() {
            if is_excluded_dir(&name, skip_dirs) {
                continue;
            }
            walk_files(&path, skip_dirs, visit);
        } else if meta.is_file() {
            visit(&path, &meta);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
