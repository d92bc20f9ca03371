//! The flat in-memory byte region standing in for the block device, and
//! the fixed-layout address arithmetic over it.

use crate::config::*;
use crate::error::FsError;
use crate::structs::{InodeNumber, LocalPointer};
use crate::Result;

/// Owns all `DISK_SIZE` bytes of the simulated disk. Every other structure
/// in the crate is a decoded view over a sub-range of this region; nothing
/// holds a reference into it across operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    bytes: Box<[u8]>,
}

impl BlockStore {
    /// A zeroed disk, as `format` expects.
    pub fn new() -> Self {
        Self { bytes: vec![0; DISK_SIZE].into_boxed_slice() }
    }

    /// Wraps a loaded image. The region is never resized, so the byte count
    /// must match exactly.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != DISK_SIZE {
            return Err(FsError::CorruptImage("image size mismatch"));
        }
        Ok(Self { bytes: bytes.into_boxed_slice() })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn block_address(&self, block_index: usize) -> Result<usize> {
        if block_index >= BLOCKS_COUNT {
            return Err(FsError::OutOfBounds);
        }
        Ok(block_index * BLOCK_SIZE)
    }

    pub fn sector_address(&self, sector_index: usize) -> Result<usize> {
        let offset = sector_index * SECTOR_SIZE;
        if offset >= DISK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        Ok(offset)
    }

    /// Byte offset of an inode record inside the inode table.
    ///
    /// Each block holds 16 inodes in 8 sectors, so each sector holds two;
    /// the owning sector is derived from the inode's byte position and the
    /// inode number's parity selects which half of the sector is meant.
    pub fn inode_address(&self, inode_number: InodeNumber) -> Result<usize> {
        let n = inode_number.0 as usize;
        if n >= MAX_INODES {
            return Err(FsError::OutOfBounds);
        }
        let blk = (n * INODE_SIZE) / BLOCK_SIZE;
        let remainder = (n * INODE_SIZE) % BLOCK_SIZE;
        let sector = (blk * BLOCK_SIZE + INODE_START + remainder) / SECTOR_SIZE;
        let sector_start = self.sector_address(sector)?;
        if n % 2 == 0 {
            Ok(sector_start)
        } else {
            Ok(sector_start + INODE_SIZE)
        }
    }

    /// Byte offset of a data block referenced by a local pointer. The whole
    /// block must lie inside the store.
    pub fn data_address(&self, ptr: LocalPointer) -> Result<usize> {
        let offset = ptr.0 as usize;
        if offset >= DISK_SIZE || offset + BLOCK_SIZE > DISK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        Ok(offset)
    }

    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8]> {
        if offset >= DISK_SIZE || offset + len > DISK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        Ok(&self.bytes[offset..offset + len])
    }

    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if offset >= DISK_SIZE || offset + data.len() > DISK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}
