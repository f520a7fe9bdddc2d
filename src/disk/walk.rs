use crate::error::Result;
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

/// Bytes found under a directory plus the number of entries that could not
/// be read and were counted as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirSize {
    pub bytes: u64,
    pub unreadable: usize,
}

/// Sum the sizes of every non-directory entry below `path`. Symlinks are not
/// followed. Only an unreadable `path` itself is an error.
pub fn dir_size(path: &Path) -> Result<DirSize> {
    let mut size = DirSize::default();

    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                trace!(error = %e, "skipping unreadable entry");
                size.unreadable += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => size.bytes += meta.len(),
            Err(e) => {
                trace!(path = %entry.path().display(), error = %e, "cannot stat entry");
                size.unreadable += 1;
            }
        }
    }

    Ok(size)
}
