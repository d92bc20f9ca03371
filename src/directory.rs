//! Directory structure: a fixed table of name → inode-number entries
//! stored in the single data block of a directory inode.

use tracing::debug;

use crate::config::*;
use crate::error::FsError;
use crate::inode::get_inode;
use crate::store::BlockStore;
use crate::structs::{DirEntry, Directory, Inode, InodeNumber, LocalPointer};
use crate::Result;

/// Strips the NUL padding from a stored name.
pub fn trim_zero(name: &[u8]) -> &[u8] {
    let mut end = name.len();
    while end > 0 && name[end - 1] == 0 {
        end -= 1;
    }
    &name[..end]
}

fn name_cmp(n1: &[u8], n2: &[u8]) -> bool {
    trim_zero(n1) == trim_zero(n2)
}

impl DirEntry {
    /// An entry is a free slot iff its name starts with NUL.
    pub fn is_free(&self) -> bool {
        self.name[0] == 0
    }

    pub fn name_bytes(&self) -> &[u8] {
        trim_zero(&self.name)
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    pub fn name_eq(&self, name: &[u8]) -> bool {
        name_cmp(&self.name, name)
    }
}

impl Directory {
    /// Inode number behind `name`, if a live entry carries it.
    pub fn lookup(&self, name: &[u8]) -> Option<InodeNumber> {
        self.entries
            .iter()
            .find(|e| !e.is_free() && e.name_eq(name))
            .map(|e| e.inode_number)
    }

    pub fn first_free_slot(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_free())
    }

    pub fn live_entries(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter().filter(|e| !e.is_free())
    }
}

/// Decodes the entry table behind a directory inode.
pub fn read_directory(store: &BlockStore, dir_inode: &Inode) -> Result<Directory> {
    if !dir_inode.is_directory() {
        return Err(FsError::NotDirectory);
    }
    let block = dir_inode
        .datablock
        .ok_or(FsError::CorruptImage("directory inode has no data block"))?;
    let offset = store.data_address(block)?;
    Directory::decode(store.read(offset, BLOCK_SIZE)?)
}

pub fn write_directory(store: &mut BlockStore, dir_inode: &Inode, dir: &Directory) -> Result<()> {
    if !dir_inode.is_directory() {
        return Err(FsError::NotDirectory);
    }
    let block = dir_inode
        .datablock
        .ok_or(FsError::CorruptImage("directory inode has no data block"))?;
    let offset = store.data_address(block)?;
    let mut buf = [0u8; BLOCK_SIZE];
    dir.encode_into(&mut buf);
    store.write(offset, &buf)
}

/// True iff `name` exists in `dir` and the entry's inode is itself a
/// directory. A file with a matching name is not enterable.
pub fn dir_has_subdirectory(store: &BlockStore, dir: &Directory, name: &[u8]) -> Result<bool> {
    match dir.lookup(name) {
        Some(child) => Ok(get_inode(store, child)?.is_directory()),
        None => Ok(false),
    }
}

/// Writes `entry` into the first free slot of the directory behind
/// `dir_inode`. Entry names are unique within one directory.
pub fn dir_insert(store: &mut BlockStore, dir_inode: &Inode, entry: &DirEntry) -> Result<()> {
    let mut dir = read_directory(store, dir_inode)?;
    if dir.lookup(entry.name_bytes()).is_some() {
        return Err(FsError::AlreadyExists);
    }
    let Some(slot) = dir.first_free_slot() else {
        return Err(FsError::DirectoryFull);
    };
    dir.entries[slot] = *entry;
    debug!(
        name = %entry.name_lossy(),
        inode = %entry.inode_number,
        slot,
        "directory entry added"
    );
    write_directory(store, dir_inode, &dir)
}

/// Writes the conventional first two entries of a fresh directory:
/// `.` (self) and `..` (parent).
pub fn populate_new_directory(
    store: &mut BlockStore,
    datablock: LocalPointer,
    this: InodeNumber,
    parent: InodeNumber,
) -> Result<()> {
    let mut dir = Directory::empty();
    dir.entries[0] = DirEntry::new(DOT_NAME, this)?;
    dir.entries[1] = DirEntry::new(DOTDOT_NAME, parent)?;
    let offset = store.data_address(datablock)?;
    let mut buf = [0u8; BLOCK_SIZE];
    dir.encode_into(&mut buf);
    store.write(offset, &buf)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitmap::alloc_data_block;
    use crate::inode::init_directory_inode;

    #[test]
    fn test_name_cmp() {
        assert!(name_cmp(b"test", b"test"));
        assert!(name_cmp(b"test\0\0", b"test"));
        assert!(!name_cmp(b"test", b"test1"));
        assert!(!name_cmp(b"test", b"tes"));
    }

    #[test]
    fn test_lookup_and_slots() {
        let mut dir = Directory::empty();
        assert_eq!(dir.first_free_slot(), Some(0));
        dir.entries[0] = DirEntry::new(b".", InodeNumber(2)).unwrap();
        dir.entries[1] = DirEntry::new(b"..", InodeNumber(2)).unwrap();
        dir.entries[2] = DirEntry::new(b"notes", InodeNumber(5)).unwrap();
        assert_eq!(dir.lookup(b"notes"), Some(InodeNumber(5)));
        assert_eq!(dir.lookup(b"."), Some(InodeNumber(2)));
        assert_eq!(dir.lookup(b"missing"), None);
        assert_eq!(dir.first_free_slot(), Some(3));
        assert_eq!(dir.live_entries().count(), 3);
    }

    #[test]
    fn test_insert_until_full() {
        let mut store = BlockStore::new();
        let block = alloc_data_block(&mut store).unwrap();
        init_directory_inode(&mut store, InodeNumber(3), block).unwrap();
        populate_new_directory(&mut store, block, InodeNumber(3), InodeNumber(2)).unwrap();
        let dir_inode = get_inode(&store, InodeNumber(3)).unwrap();

        for i in 0..DIR_MAX_ENTRIES - 2 {
            let name = format!("entry{i}");
            let entry = DirEntry::new(name.as_bytes(), InodeNumber(10 + i as u32)).unwrap();
            dir_insert(&mut store, &dir_inode, &entry).unwrap();
        }
        let overflow = DirEntry::new(b"overflow", InodeNumber(99)).unwrap();
        assert!(matches!(
            dir_insert(&mut store, &dir_inode, &overflow),
            Err(FsError::DirectoryFull)
        ));
    }

    #[test]
    fn test_insert_rejects_duplicate_name() {
        let mut store = BlockStore::new();
        let block = alloc_data_block(&mut store).unwrap();
        init_directory_inode(&mut store, InodeNumber(3), block).unwrap();
        populate_new_directory(&mut store, block, InodeNumber(3), InodeNumber(2)).unwrap();
        let dir_inode = get_inode(&store, InodeNumber(3)).unwrap();

        let entry = DirEntry::new(b"twin", InodeNumber(7)).unwrap();
        dir_insert(&mut store, &dir_inode, &entry).unwrap();
        let twin = DirEntry::new(b"twin", InodeNumber(8)).unwrap();
        assert!(matches!(
            dir_insert(&mut store, &dir_inode, &twin),
            Err(FsError::AlreadyExists)
        ));
    }

    #[test]
    fn test_has_subdirectory_checks_type() {
        let mut store = BlockStore::new();
        let block = alloc_data_block(&mut store).unwrap();
        init_directory_inode(&mut store, InodeNumber(3), block).unwrap();

        let sub_block = alloc_data_block(&mut store).unwrap();
        init_directory_inode(&mut store, InodeNumber(4), sub_block).unwrap();
        let file_block = alloc_data_block(&mut store).unwrap();
        crate::inode::init_file_inode(&mut store, InodeNumber(5), file_block).unwrap();

        let dir_inode = get_inode(&store, InodeNumber(3)).unwrap();
        populate_new_directory(&mut store, block, InodeNumber(3), InodeNumber(2)).unwrap();
        dir_insert(&mut store, &dir_inode, &DirEntry::new(b"sub", InodeNumber(4)).unwrap()).unwrap();
        dir_insert(&mut store, &dir_inode, &DirEntry::new(b"file", InodeNumber(5)).unwrap()).unwrap();

        let dir = read_directory(&store, &dir_inode).unwrap();
        assert!(dir_has_subdirectory(&store, &dir, b"sub").unwrap());
        assert!(!dir_has_subdirectory(&store, &dir, b"file").unwrap());
        assert!(!dir_has_subdirectory(&store, &dir, b"absent").unwrap());
    }
}
