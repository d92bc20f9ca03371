use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad filesystem magic")]
    InvalidMagic,
    #[error("corrupt filesystem image: {0}")]
    CorruptImage(&'static str),
    #[error("address or bit index out of bounds")]
    OutOfBounds,
    #[error("no free inodes left")]
    OutOfInodes,
    #[error("no free data blocks left")]
    OutOfSpace,
    #[error("directory has no free entry slot")]
    DirectoryFull,
    #[error("intermediate path component does not exist")]
    PathIncomplete,
    #[error("entry already exists")]
    AlreadyExists,
    #[error("no such file or directory")]
    NotFound,
    #[error("not a directory")]
    NotDirectory,
    #[error("invalid file name")]
    InvalidFileName,
}

pub type Result<T> = core::result::Result<T, FsError>;
