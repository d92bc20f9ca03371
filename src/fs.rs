use tracing::debug;

use crate::bitmap::{self, alloc_data_block, mark_inode_used};
use crate::config::*;
use crate::directory::{dir_insert, populate_new_directory, read_directory};
use crate::error::FsError;
use crate::inode::{alloc_inode, get_inode, init_directory_inode, init_file_inode};
use crate::path::{resolve, Resolution};
use crate::store::BlockStore;
use crate::structs::*;
use crate::superblock::{read_superblock, write_superblock};
use crate::Result;

/// The filesystem context object. It owns the block store outright; every
/// operation goes through it, so there is no shared mutable state anywhere
/// else. Callers needing concurrent access must wrap the whole instance in
/// a lock, since an operation's bitmap, inode, and directory writes have to
/// appear atomic together.
#[derive(Debug)]
pub struct FileSystem {
    store: BlockStore,
}

impl FileSystem {
    /// Creates a fresh filesystem on a zeroed store: superblock, root inode
    /// marked and initialized as a directory, and a root directory whose
    /// `.` and `..` both point back at the root.
    pub fn format() -> Result<Self> {
        let mut store = BlockStore::new();
        let root_addr = store.inode_address(ROOT_INODE)?;
        write_superblock(&mut store, &SuperBlock::new(LocalPointer(root_addr as u32)))?;
        mark_inode_used(&mut store, ROOT_INODE)?;
        let datablock = alloc_data_block(&mut store)?;
        init_directory_inode(&mut store, ROOT_INODE, datablock)?;
        populate_new_directory(&mut store, datablock, ROOT_INODE, ROOT_INODE)?;
        debug!("formatted fresh filesystem");
        Ok(Self { store })
    }

    /// Mounts an existing store. The superblock magic is validated before
    /// anything else in the image is trusted.
    pub fn mount(store: BlockStore) -> Result<Self> {
        let superblock = read_superblock(&store)?;
        debug!(fs_root = superblock.fs_root.0, "mounted filesystem");
        Ok(Self { store })
    }

    pub fn resolve(&self, path: &str) -> Result<Resolution> {
        resolve(&self.store, path)
    }

    /// Lists a directory's entries, or a single name when the path's final
    /// component names a file in an existing parent.
    pub fn ls(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.ls_i(path)?.into_iter().map(|(_, name)| name).collect())
    }

    /// Same as [`ls`](Self::ls), with each entry's inode number.
    pub fn ls_i(&self, path: &str) -> Result<Vec<(InodeNumber, String)>> {
        match self.resolve(path)? {
            Resolution::Existing { inode } => {
                let dir = read_directory(&self.store, &get_inode(&self.store, inode)?)?;
                Ok(dir
                    .live_entries()
                    .map(|e| (e.inode_number, e.name_lossy()))
                    .collect())
            }
            Resolution::ParentEndname { parent, endname } => {
                let dir = read_directory(&self.store, &get_inode(&self.store, parent)?)?;
                match dir.lookup(endname.as_bytes()) {
                    Some(inode) => Ok(vec![(inode, endname)]),
                    None => Err(FsError::NotFound),
                }
            }
            Resolution::Incomplete { .. } => Err(FsError::PathIncomplete),
        }
    }

    /// Creates a directory at `path`. The parent must exist and the final
    /// component must be free; the new directory gets its own data block
    /// with `.` and `..` already in place.
    pub fn mkdir(&mut self, path: &str) -> Result<InodeNumber> {
        let (parent, entry) = self.prepare_create(path)?;
        let inode_number = alloc_inode(&mut self.store)?;
        let datablock = alloc_data_block(&mut self.store)?;
        init_directory_inode(&mut self.store, inode_number, datablock)?;
        populate_new_directory(&mut self.store, datablock, inode_number, parent)?;
        let parent_inode = get_inode(&self.store, parent)?;
        let entry = DirEntry { inode_number, ..entry };
        dir_insert(&mut self.store, &parent_inode, &entry)?;
        debug!(path, inode = %inode_number, "created directory");
        Ok(inode_number)
    }

    /// Creates an empty regular file at `path`, with an allocated (zeroed)
    /// data block. Same precondition as [`mkdir`](Self::mkdir).
    pub fn creat(&mut self, path: &str) -> Result<InodeNumber> {
        let (parent, entry) = self.prepare_create(path)?;
        let inode_number = alloc_inode(&mut self.store)?;
        let datablock = alloc_data_block(&mut self.store)?;
        init_file_inode(&mut self.store, inode_number, datablock)?;
        let parent_inode = get_inode(&self.store, parent)?;
        let entry = DirEntry { inode_number, ..entry };
        dir_insert(&mut self.store, &parent_inode, &entry)?;
        debug!(path, inode = %inode_number, "created file");
        Ok(inode_number)
    }

    /// Shared precondition of `mkdir` and `creat`: the path must resolve to
    /// a valid parent with a free final component. Every failure is checked
    /// here, before any allocation, so a refused operation leaves the
    /// bitmaps and the parent directory untouched.
    fn prepare_create(&self, path: &str) -> Result<(InodeNumber, DirEntry)> {
        match self.resolve(path)? {
            Resolution::Existing { .. } => Err(FsError::AlreadyExists),
            Resolution::Incomplete { .. } => Err(FsError::PathIncomplete),
            Resolution::ParentEndname { parent, endname } => {
                // The inode number is patched in after allocation.
                let entry = DirEntry::new(endname.as_bytes(), InodeNumber(0))?;
                let dir = read_directory(&self.store, &get_inode(&self.store, parent)?)?;
                if dir.lookup(endname.as_bytes()).is_some() {
                    return Err(FsError::AlreadyExists);
                }
                if dir.first_free_slot().is_none() {
                    return Err(FsError::DirectoryFull);
                }
                Ok((parent, entry))
            }
        }
    }

    pub fn root_inode_number(&self) -> InodeNumber {
        ROOT_INODE
    }

    pub fn get_inode(&self, inode_number: InodeNumber) -> Result<Inode> {
        get_inode(&self.store, inode_number)
    }

    pub fn superblock(&self) -> Result<SuperBlock> {
        read_superblock(&self.store)
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn inode_allocated(&self, inode_number: InodeNumber) -> Result<bool> {
        bitmap::inode_allocated(&self.store, inode_number)
    }

    pub fn data_block_allocated(&self, index: usize) -> Result<bool> {
        bitmap::data_block_allocated(&self.store, index)
    }

    /// Human-readable usage summary.
    pub fn dump(&self) -> Result<String> {
        let superblock = read_superblock(&self.store)?;
        let mut used_inodes = 0;
        for i in 0..MAX_INODES {
            if self.inode_allocated(InodeNumber(i as u32))? {
                used_inodes += 1;
            }
        }
        let mut used_blocks = 0;
        for i in 0..BLOCKS_COUNT {
            if self.data_block_allocated(i)? {
                used_blocks += 1;
            }
        }
        Ok(format!(
            "vsfs: root inode {} at offset {}; {}/{} inodes used; {}/{} data blocks used",
            ROOT_INODE,
            superblock.fs_root.0,
            used_inodes,
            MAX_INODES,
            used_blocks,
            DATA_BLOCKS_COUNT,
        ))
    }
}
