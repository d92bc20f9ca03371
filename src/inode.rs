//! Management of reading and writing to the inode table.

use crate::bitmap;
use crate::config::*;
use crate::store::BlockStore;
use crate::structs::{FileType, Inode, InodeNumber, LocalPointer};
use crate::Result;

pub fn get_inode(store: &BlockStore, inode_number: InodeNumber) -> Result<Inode> {
    let addr = store.inode_address(inode_number)?;
    Inode::decode(store.read(addr, INODE_SIZE)?)
}

pub fn write_inode(store: &mut BlockStore, inode_number: InodeNumber, inode: &Inode) -> Result<()> {
    let addr = store.inode_address(inode_number)?;
    let mut buf = [0u8; INODE_SIZE];
    inode.encode_into(&mut buf);
    store.write(addr, &buf)
}

/// Allocates a fresh inode number, marking it in the inode bitmap.
/// The record itself is written by one of the init functions below.
pub fn alloc_inode(store: &mut BlockStore) -> Result<InodeNumber> {
    bitmap::alloc_inode_id(store)
}

/// New inodes always start with refcount 1; there is no decrement
/// operation, deletion being out of scope.
pub fn init_directory_inode(
    store: &mut BlockStore,
    inode_number: InodeNumber,
    datablock: LocalPointer,
) -> Result<()> {
    let inode = Inode {
        ftype: FileType::Directory,
        refcount: 1,
        datablock: Some(datablock),
    };
    write_inode(store, inode_number, &inode)
}

pub fn init_file_inode(
    store: &mut BlockStore,
    inode_number: InodeNumber,
    datablock: LocalPointer,
) -> Result<()> {
    let inode = Inode {
        ftype: FileType::Regular,
        refcount: 1,
        datablock: Some(datablock),
    };
    write_inode(store, inode_number, &inode)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::FsError;

    #[test]
    fn test_inode_table_round_trip() {
        let mut store = BlockStore::new();
        let inode = Inode {
            ftype: FileType::Regular,
            refcount: 1,
            datablock: Some(LocalPointer(DATA_START as u32)),
        };
        write_inode(&mut store, InodeNumber(3), &inode).unwrap();
        assert_eq!(get_inode(&store, InodeNumber(3)).unwrap(), inode);
        // The neighbouring slot is still uninitialized.
        assert!(matches!(
            get_inode(&store, InodeNumber(4)),
            Err(FsError::CorruptImage(_))
        ));
    }

    #[test]
    fn test_init_helpers() {
        let mut store = BlockStore::new();
        init_directory_inode(&mut store, InodeNumber(3), LocalPointer(DATA_START as u32)).unwrap();
        let inode = get_inode(&store, InodeNumber(3)).unwrap();
        assert!(inode.is_directory());
        assert_eq!(inode.refcount, 1);

        init_file_inode(&mut store, InodeNumber(4), LocalPointer(DATA_START as u32)).unwrap();
        let inode = get_inode(&store, InodeNumber(4)).unwrap();
        assert_eq!(inode.ftype, FileType::Regular);
    }
}
