//! VSFS is a minimal on-disk filesystem emulated inside a single
//! contiguous in-memory region standing in for a block device.
//! Only metadata and directory structure are modeled; file content I/O,
//! permissions, timestamps, and deletion are out of scope.
//!
//! VSFS's linear layout (64 blocks of 4096 bytes):
//! - Block 0: superblock (magic + root pointer)
//! - Block 1: inode bitmap
//! - Block 2: data bitmap
//! - Blocks 3-7: inode table (256-byte inodes, 80 total, root is inode 2)
//! - Blocks 8+: data area (directory tables and file blocks)
//!
//! Every metadata structure is a typed view decoded from the flat store;
//! on-disk references are store-relative byte offsets ([`LocalPointer`]),
//! never native pointers. Path walks go through a small state machine
//! ([`Resolution`]) that tells "fully resolved" from "parent resolved,
//! leaf missing" from "intermediate directory missing", which is the
//! distinction every operation ([`FileSystem::ls`], [`FileSystem::mkdir`],
//! [`FileSystem::creat`]) is built on.

#![forbid(unsafe_code)]

mod bitmap;
mod config;
mod directory;
mod error;
mod fs;
mod image;
mod inode;
mod path;
mod store;
mod structs;
mod superblock;

pub use config::*;
pub use directory::*;
pub use error::FsError;
pub use error::Result;
pub use fs::*;
pub use image::*;
pub use inode::*;
pub use path::*;
pub use store::*;
pub use structs::*;
pub use superblock::*;
