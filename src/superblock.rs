use crate::config::*;
use crate::error::FsError;
use crate::store::BlockStore;
use crate::structs::SuperBlock;
use crate::Result;

/// Reads block 0 and validates the magic before anything else in the image
/// is trusted. A mismatched magic means a foreign or corrupt image.
pub fn read_superblock(store: &BlockStore) -> Result<SuperBlock> {
    let raw = store.read(SUPERBLOCK_START, BLOCK_SIZE)?;
    let superblock = SuperBlock::decode(raw)?;
    if !superblock.magic_valid() {
        return Err(FsError::InvalidMagic);
    }
    Ok(superblock)
}

pub fn write_superblock(store: &mut BlockStore, superblock: &SuperBlock) -> Result<()> {
    let mut buf = [0u8; BLOCK_SIZE];
    superblock.encode_into(&mut buf);
    store.write(SUPERBLOCK_START, &buf)
}
