use crate::structs::InodeNumber;

pub const FS_MAGIC: [u8; 4] = *b"vsfs";

pub const BLOCK_SIZE: usize = 4096;
pub const BLOCKS_COUNT: usize = 64;
pub const DISK_SIZE: usize = BLOCKS_COUNT * BLOCK_SIZE;

// The disk is additionally divided into 512-byte sectors; inodes are
// addressed with sector granularity, two inodes per sector.
pub const SECTOR_SIZE: usize = 512;

// Bytes per bitmap; each bitmap occupies exactly one block.
pub const BLOCK_CHAR_COUNT: usize = BLOCK_SIZE;
pub const BITMAP_BITS: usize = BLOCK_CHAR_COUNT * 8;

// Linear layout: superblock, inode bitmap, data bitmap, inode table, data.
pub const SUPERBLOCK_START: usize = 0;
pub const IMAP_START: usize = BLOCK_SIZE;
pub const DMAP_START: usize = 2 * BLOCK_SIZE;
pub const INODE_START: usize = 3 * BLOCK_SIZE;
pub const DATA_START: usize = 8 * BLOCK_SIZE;

pub const INODE_SIZE: usize = 256;
pub const INODE_BLOCKS_COUNT: usize = 5;
pub const MAX_INODES: usize = (BLOCK_SIZE / INODE_SIZE) * INODE_BLOCKS_COUNT;

// Blocks used: (1) super; (1) imap; (1) dmap; (5) inode table.
// The remaining blocks form the data area.
pub const DATA_BLOCKS_COUNT: usize = BLOCKS_COUNT - 8;

/// The root inode is typically 2 on Unix filesystems (ext4 reserves a list
/// of well-known inodes the same way). It is never handed out by the
/// allocator.
pub const ROOT_INODE: InodeNumber = InodeNumber(2);
pub const FIRST_ALLOCATABLE_INODE: u32 = 3;

pub const DIR_MAX_ENTRIES: usize = 16;
pub const DIRNAME_MAX_LEN: usize = 251;
pub const DIR_ENTRY_SIZE: usize = 256;
pub const DOT_NAME: &[u8] = b".";
pub const DOTDOT_NAME: &[u8] = b"..";

// Layout invariants the rest of the crate assumes.
const _: () = assert!(DIR_MAX_ENTRIES == BLOCK_SIZE / DIR_ENTRY_SIZE);
const _: () = assert!(INODE_SIZE * 2 == SECTOR_SIZE);
const _: () = assert!(MAX_INODES == 80);
const _: () = assert!(DATA_START + DATA_BLOCKS_COUNT * BLOCK_SIZE == DISK_SIZE);
