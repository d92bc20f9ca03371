//! Persisted image collaborators: byte-verbatim copies of the whole store
//! to and from a file.

use std::path::Path;

use tracing::debug;

use crate::fs::FileSystem;
use crate::store::BlockStore;
use crate::Result;

/// Writes the full byte region of `filesystem` to `path`.
pub fn save_disk(filesystem: &FileSystem, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(&path, filesystem.store().as_bytes())?;
    debug!(path = %path.as_ref().display(), "saved disk image");
    Ok(())
}

/// Reads an image file and mounts it. The byte length and the superblock
/// magic are both validated before any structure in the image is trusted.
pub fn load_disk(path: impl AsRef<Path>) -> Result<FileSystem> {
    let bytes = std::fs::read(&path)?;
    let store = BlockStore::from_bytes(bytes)?;
    let filesystem = FileSystem::mount(store)?;
    debug!(path = %path.as_ref().display(), "loaded disk image");
    Ok(filesystem)
}
