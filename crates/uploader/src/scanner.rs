//! Candidate discovery for a render directory.
//!
//! The host export step drops one or more files (possibly in dated
//! subfolders) under a single directory; the batch uploads everything
//! found beneath it.

use std::path::{Path, PathBuf};

/// Recursively collects the files under `root`, sorted for a stable batch
/// order.
pub fn collect_candidates(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            walk(&path, files)?;
        } else if metadata.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
