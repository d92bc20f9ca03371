//! On-disk record types and their byte layout.
//!
//! Every record has a fixed size and an explicit little-endian codec; the
//! store is the only owner of bytes and these types are decoded views over
//! it. Field order and widths are part of the image format and must not
//! change.

use core::fmt;

use crate::config::*;
use crate::error::FsError;
use crate::Result;

/// An inode number in `[0, MAX_INODES)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InodeNumber(pub u32);

impl fmt::Display for InodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A store-relative byte offset, used wherever an on-disk structure must
/// reference another location in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPointer(pub u32);

/// Sentinel for an inode with no data block assigned.
const NO_DATABLOCK: u32 = u32::MAX;

/// Block 0. Only the magic and the root pointer carry information; the
/// rest of the block is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    pub magic: [u8; 4],
    pub fs_root: LocalPointer,
}

impl SuperBlock {
    pub fn new(fs_root: LocalPointer) -> Self {
        Self { magic: FS_MAGIC, fs_root }
    }

    /// Layout: `[0,4)` magic, `[4,8)` root pointer LE, rest reserved.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < 8 {
            return Err(FsError::CorruptImage("short superblock"));
        }
        let magic = [raw[0], raw[1], raw[2], raw[3]];
        let fs_root = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        Ok(Self { magic, fs_root: LocalPointer(fs_root) })
    }

    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.fs_root.0.to_le_bytes());
    }

    pub fn magic_valid(&self) -> bool {
        self.magic == FS_MAGIC
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileType {
    Regular = b'f',
    Directory = b'd',
}

impl TryFrom<u8> for FileType {
    type Error = FsError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            b'f' => Ok(FileType::Regular),
            b'd' => Ok(FileType::Directory),
            _ => Err(FsError::CorruptImage("unknown inode type tag")),
        }
    }
}

/// A 256-byte inode record: type tag, reference count, and a single
/// data-block pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inode {
    pub ftype: FileType,
    pub refcount: u8,
    pub datablock: Option<LocalPointer>,
}

impl Inode {
    /// Layout: byte 0 type tag (`'d'`/`'f'`), byte 1 refcount,
    /// `[2,6)` data-block pointer LE (`0xFFFF_FFFF` = unset), rest padding.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < 6 {
            return Err(FsError::CorruptImage("short inode record"));
        }
        let ftype = FileType::try_from(raw[0])?;
        let refcount = raw[1];
        let datablock = match u32::from_le_bytes([raw[2], raw[3], raw[4], raw[5]]) {
            NO_DATABLOCK => None,
            ptr => Some(LocalPointer(ptr)),
        };
        Ok(Self { ftype, refcount, datablock })
    }

    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[0] = self.ftype as u8;
        buf[1] = self.refcount;
        let ptr = self.datablock.map_or(NO_DATABLOCK, |p| p.0);
        buf[2..6].copy_from_slice(&ptr.to_le_bytes());
    }

    pub fn is_directory(&self) -> bool {
        self.ftype == FileType::Directory
    }
}

/// A 256-byte directory entry: NUL-padded name plus an inode number.
/// An entry whose first name byte is NUL is a free slot.
#[derive(Debug, Clone, Copy)]
pub struct DirEntry {
    pub name: [u8; DIRNAME_MAX_LEN + 1],
    pub inode_number: InodeNumber,
}

impl DirEntry {
    pub const FREE: Self = Self {
        name: [0; DIRNAME_MAX_LEN + 1],
        inode_number: InodeNumber(0),
    };

    pub fn new(name: &[u8], inode_number: InodeNumber) -> Result<Self> {
        if name.is_empty() || name.len() > DIRNAME_MAX_LEN {
            return Err(FsError::InvalidFileName);
        }
        if name.contains(&0) {
            return Err(FsError::InvalidFileName);
        }
        let mut arr = [0; DIRNAME_MAX_LEN + 1];
        arr[..name.len()].copy_from_slice(name);
        Ok(Self { name: arr, inode_number })
    }

    /// Layout: `[0,252)` name, `[252,256)` inode number LE.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < DIR_ENTRY_SIZE {
            return Err(FsError::CorruptImage("short directory entry"));
        }
        let mut name = [0; DIRNAME_MAX_LEN + 1];
        name.copy_from_slice(&raw[..DIRNAME_MAX_LEN + 1]);
        let ino = u32::from_le_bytes([raw[252], raw[253], raw[254], raw[255]]);
        Ok(Self { name, inode_number: InodeNumber(ino) })
    }

    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[..DIRNAME_MAX_LEN + 1].copy_from_slice(&self.name);
        buf[DIRNAME_MAX_LEN + 1..DIR_ENTRY_SIZE]
            .copy_from_slice(&self.inode_number.0.to_le_bytes());
    }
}

/// One data block's worth of directory entries.
#[derive(Debug, Clone)]
pub struct Directory {
    pub entries: [DirEntry; DIR_MAX_ENTRIES],
}

impl Directory {
    pub fn empty() -> Self {
        Self { entries: [DirEntry::FREE; DIR_MAX_ENTRIES] }
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < BLOCK_SIZE {
            return Err(FsError::CorruptImage("short directory block"));
        }
        let mut dir = Self::empty();
        for (i, slot) in dir.entries.iter_mut().enumerate() {
            *slot = DirEntry::decode(&raw[i * DIR_ENTRY_SIZE..(i + 1) * DIR_ENTRY_SIZE])?;
        }
        Ok(dir)
    }

    pub fn encode_into(&self, buf: &mut [u8]) {
        for (i, entry) in self.entries.iter().enumerate() {
            entry.encode_into(&mut buf[i * DIR_ENTRY_SIZE..(i + 1) * DIR_ENTRY_SIZE]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_superblock_layout() {
        let sb = SuperBlock::new(LocalPointer(12800));
        let mut buf = [0u8; BLOCK_SIZE];
        sb.encode_into(&mut buf);
        assert_eq!(&buf[..4], b"vsfs");
        assert_eq!(buf[4..8], 12800u32.to_le_bytes());
        assert_eq!(SuperBlock::decode(&buf).unwrap(), sb);
    }

    #[test]
    fn test_inode_layout() {
        let inode = Inode {
            ftype: FileType::Directory,
            refcount: 1,
            datablock: Some(LocalPointer(DATA_START as u32)),
        };
        let mut buf = [0u8; INODE_SIZE];
        inode.encode_into(&mut buf);
        assert_eq!(buf[0], b'd');
        assert_eq!(buf[1], 1);
        assert_eq!(buf[2..6], (DATA_START as u32).to_le_bytes());
        assert!(buf[6..].iter().all(|&b| b == 0));
        assert_eq!(Inode::decode(&buf).unwrap(), inode);
    }

    #[test]
    fn test_inode_unset_datablock() {
        let inode = Inode { ftype: FileType::Regular, refcount: 1, datablock: None };
        let mut buf = [0u8; INODE_SIZE];
        inode.encode_into(&mut buf);
        assert_eq!(buf[2..6], [0xff; 4]);
        assert_eq!(Inode::decode(&buf).unwrap().datablock, None);
    }

    #[test]
    fn test_inode_rejects_unknown_tag() {
        let buf = [0u8; INODE_SIZE];
        assert!(matches!(
            Inode::decode(&buf),
            Err(FsError::CorruptImage(_))
        ));
    }

    #[test]
    fn test_dir_entry_layout() {
        let entry = DirEntry::new(b"file1", InodeNumber(7)).unwrap();
        let mut buf = [0u8; DIR_ENTRY_SIZE];
        entry.encode_into(&mut buf);
        assert_eq!(&buf[..5], b"file1");
        assert!(buf[5..DIRNAME_MAX_LEN + 1].iter().all(|&b| b == 0));
        assert_eq!(buf[252..256], 7u32.to_le_bytes());
        let back = DirEntry::decode(&buf).unwrap();
        assert_eq!(back.inode_number, InodeNumber(7));
        assert_eq!(back.name, entry.name);
    }

    #[test]
    fn test_dir_entry_name_limits() {
        assert!(DirEntry::new(b"", InodeNumber(3)).is_err());
        assert!(DirEntry::new(&[b'a'; DIRNAME_MAX_LEN], InodeNumber(3)).is_ok());
        assert!(DirEntry::new(&[b'a'; DIRNAME_MAX_LEN + 1], InodeNumber(3)).is_err());
        assert!(DirEntry::new(b"bad\0name", InodeNumber(3)).is_err());
    }
}
