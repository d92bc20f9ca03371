//! Management of the inode bitmap and the data bitmap.
//! One block each; bit *i* of the inode map marks inode *i* allocated, bit
//! *i* of the data map marks the *i*-th data block allocated.

use tracing::{trace, warn};

use crate::config::*;
use crate::error::FsError;
use crate::store::BlockStore;
use crate::structs::{InodeNumber, LocalPointer};
use crate::Result;

/// Marks a bit used. Bits are LSB-first within each byte.
/// Setting an already-set bit is suspicious but not corrected: warn and
/// leave the bit set.
fn set_bit(store: &mut BlockStore, bitmap_start: usize, bit_number: usize) -> Result<()> {
    let offset = bit_number / 8;
    let mask = 1u8 << (bit_number % 8);
    if offset >= BLOCK_CHAR_COUNT {
        return Err(FsError::OutOfBounds);
    }
    let byte = store.read(bitmap_start + offset, 1)?[0];
    if byte & mask != 0 {
        warn!(bit_number, "bit set, but already set");
    }
    store.write(bitmap_start + offset, &[byte | mask])
}

fn get_bit(store: &BlockStore, bitmap_start: usize, bit_number: usize) -> Result<bool> {
    let offset = bit_number / 8;
    let mask = 1u8 << (bit_number % 8);
    if offset >= BLOCK_CHAR_COUNT {
        return Err(FsError::OutOfBounds);
    }
    Ok(store.read(bitmap_start + offset, 1)?[0] & mask != 0)
}

/// Linear scan of `[start, end)` for the first unset bit.
/// Adequate at this scale; the bitmaps cover at most a few thousand bits.
fn find_first_free(
    store: &BlockStore,
    bitmap_start: usize,
    start: usize,
    end: usize,
) -> Result<Option<usize>> {
    for bit in start..end {
        if !get_bit(store, bitmap_start, bit)? {
            return Ok(Some(bit));
        }
    }
    Ok(None)
}

fn find_first_free_and_mark(
    store: &mut BlockStore,
    bitmap_start: usize,
    start: usize,
    end: usize,
) -> Result<Option<usize>> {
    match find_first_free(store, bitmap_start, start, end)? {
        Some(bit) => {
            set_bit(store, bitmap_start, bit)?;
            Ok(Some(bit))
        }
        None => Ok(None),
    }
}

// Public API for the two bitmap instances.

/// Allocates an inode number. The scan starts past the reserved root inode,
/// so inode 2 is never returned.
pub fn alloc_inode_id(store: &mut BlockStore) -> Result<InodeNumber> {
    let first = FIRST_ALLOCATABLE_INODE as usize;
    match find_first_free_and_mark(store, IMAP_START, first, MAX_INODES)? {
        Some(bit) => {
            trace!(inode = bit, "allocated inode");
            Ok(InodeNumber(bit as u32))
        }
        None => Err(FsError::OutOfInodes),
    }
}

/// Marks a specific inode allocated; used for the root inode at format
/// time. Idempotent apart from the double-set warning.
pub fn mark_inode_used(store: &mut BlockStore, inode_number: InodeNumber) -> Result<()> {
    set_bit(store, IMAP_START, inode_number.0 as usize)
}

/// Allocates a data block and returns its local pointer. The block is
/// zeroed so directories and fresh files start empty.
pub fn alloc_data_block(store: &mut BlockStore) -> Result<LocalPointer> {
    let Some(index) = find_first_free(store, DMAP_START, 0, BLOCKS_COUNT)? else {
        return Err(FsError::OutOfSpace);
    };
    let ptr = LocalPointer((DATA_START + index * BLOCK_SIZE) as u32);
    // The data map carries BLOCKS_COUNT bits but only DATA_BLOCKS_COUNT
    // blocks fit behind the data area; a pointer past the region means the
    // usable blocks are gone. Must be checked before the bit is marked.
    let Ok(offset) = store.data_address(ptr) else {
        return Err(FsError::OutOfSpace);
    };
    set_bit(store, DMAP_START, index)?;
    store.write(offset, &[0u8; BLOCK_SIZE])?;
    trace!(index, ptr = ptr.0, "allocated data block");
    Ok(ptr)
}

pub fn inode_allocated(store: &BlockStore, inode_number: InodeNumber) -> Result<bool> {
    get_bit(store, IMAP_START, inode_number.0 as usize)
}

pub fn data_block_allocated(store: &BlockStore, index: usize) -> Result<bool> {
    get_bit(store, DMAP_START, index)
}
