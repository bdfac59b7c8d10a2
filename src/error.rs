use thiserror::Error;

pub type Result<T> = std::result::Result<T, BkTreeError>;

#[derive(Error, Debug)]
pub enum BkTreeError {
    /// Reading, writing or renaming a snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tree could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bincode::Error),

    /// The blob is truncated or not a snapshot at all.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] bincode::Error),

    /// The blob decoded but does not describe a single well-formed tree.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}
