//! Path resolution and manipulation utilities.

use tracing::trace;

use crate::config::*;
use crate::directory::read_directory;
use crate::error::FsError;
use crate::inode::get_inode;
use crate::store::BlockStore;
use crate::structs::InodeNumber;
use crate::Result;

pub fn is_root_path(path: &str) -> bool {
    path == "/"
}

/// Final component of a path, or `None` when the path ends in a separator.
pub fn final_token(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => Some(last),
        Some(_) => None,
        None if !path.is_empty() => Some(path),
        None => None,
    }
}

/// Outcome of a path walk. Callers need to distinguish "fully resolved"
/// from "parent exists, leaf missing" (the create-target case) from
/// "an intermediate directory is missing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every component was consumed; `inode` is the directory the path
    /// names (the root for `/`).
    Existing { inode: InodeNumber },
    /// The parent chain exists but the final component is not an enterable
    /// entry of `parent`; `endname` is that final component.
    ParentEndname { parent: InodeNumber, endname: String },
    /// An intermediate component is missing; `deepest` is the deepest
    /// directory that was reached.
    Incomplete { deepest: InodeNumber },
}

/// Walks `path` from the root directory, one `/`-delimited component at a
/// time. Empty components collapse, so `a//b` and `/a/b` resolve alike.
///
/// Descending through a name that exists but is not a directory is a
/// `NotDirectory` error; the same mismatch on the final component is not an
/// error but a `ParentEndname`, which is what lets `ls` name a single file.
pub fn resolve(store: &BlockStore, path: &str) -> Result<Resolution> {
    if path.len() > DIRNAME_MAX_LEN {
        return Err(FsError::InvalidFileName);
    }
    if is_root_path(path) {
        return Ok(Resolution::Existing { inode: ROOT_INODE });
    }

    let components: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut current = ROOT_INODE;

    for (i, &token) in components.iter().enumerate() {
        let is_final = i + 1 == components.len();
        let dir_inode = get_inode(store, current)?;
        let dir = read_directory(store, &dir_inode)?;

        match dir.lookup(token.as_bytes()) {
            Some(child) => {
                if get_inode(store, child)?.is_directory() {
                    current = child;
                } else if is_final {
                    trace!(path, token, "resolved to parent, endname is a file");
                    return Ok(Resolution::ParentEndname {
                        parent: current,
                        endname: token.to_owned(),
                    });
                } else {
                    return Err(FsError::NotDirectory);
                }
            }
            None if is_final => {
                trace!(path, token, "resolved to parent, endname missing");
                return Ok(Resolution::ParentEndname {
                    parent: current,
                    endname: token.to_owned(),
                });
            }
            None => {
                trace!(path, token, "incomplete, intermediate directory missing");
                return Ok(Resolution::Incomplete { deepest: current });
            }
        }
    }

    Ok(Resolution::Existing { inode: current })
}
