//! Error types for container loading

use std::path::PathBuf;

use crate::gid::Gid;
use crate::guid::Guid;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while loading, resolving or preparing a container
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The container path does not exist
    #[error("cannot find the file specified: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The first six bytes are not `GORGON`
    #[error("signature mismatch: found {found:?}")]
    Signature { found: [u8; 6] },

    /// The file was written by a newer format revision
    #[error("version mismatch: file version {found:#010x} is newer than supported {supported:#010x}")]
    VersionMismatch { found: u32, supported: u32 },

    /// The top-level chunk is not a folder, or no folder loader is registered
    #[error("container does not start with a folder chunk (found {found})")]
    MissingRootFolder { found: Gid },

    /// A read would run past the end of the stream
    #[error("truncated container at offset {offset:#x}: need {need} bytes, {have} available")]
    Truncated { offset: u64, need: u64, have: u64 },

    /// A nested chunk declares a size that crosses its parent's boundary
    #[error("chunk {gid} at offset {offset:#x} overruns its parent boundary {end:#x}")]
    ChunkOverrun { gid: Gid, offset: u64, end: u64 },

    /// Chunks nest deeper than the loader allows
    #[error("chunk at offset {offset:#x} nests deeper than {limit} levels")]
    NestingTooDeep { offset: u64, limit: usize },

    /// An uncompressed pixel payload does not match the image dimensions
    #[error("image data size mismatch: expected {expected} bytes, found {found}")]
    ImageSizeMismatch { expected: usize, found: usize },

    /// Prepare reached an image whose pixels were never fetched
    #[error("image {guid} has no pixel data in memory; call load() before prepare()")]
    ImageNotLoaded { guid: Guid },

    /// A reference field was read before it was resolved
    #[error("target is not set (link to {guid})")]
    TargetNotSet { guid: Guid },

    /// An operation needs a loaded container
    #[error("container is not loaded")]
    NotLoaded,

    /// `prepare()` may only run once per load
    #[error("container is already prepared")]
    AlreadyPrepared,

    /// Frame lookup on an empty animation
    #[error("no frames")]
    NoFrames,

    /// Payload decoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Underlying stream failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors reported by pixel and sample codecs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// No codec is registered for the compression tag
    #[error("no codec registered for compression {compression}")]
    Unsupported { compression: Gid },

    /// The codec rejected the payload
    #[error("decode failed: {0}")]
    Decode(String),

    /// The decoded payload has an unexpected length
    #[error("decoded length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::VersionMismatch {
                found: 0x0001_0001,
                supported: 0x0001_0000
            }
            .to_string(),
            "version mismatch: file version 0x00010001 is newer than supported 0x00010000"
        );
        assert_eq!(
            Error::MissingRootFolder {
                found: Gid::IMAGE
            }
            .to_string(),
            "container does not start with a folder chunk (found 0x02020000)"
        );
        assert_eq!(
            Error::TargetNotSet {
                guid: Guid::from_u64(0x1122)
            }
            .to_string(),
            "target is not set (link to 0000000000001122)"
        );
    }

    #[test]
    fn test_codec_error_converts() {
        let err: Error = CodecError::Unsupported {
            compression: Gid::LZMA,
        }
        .into();
        assert!(matches!(err, Error::Codec(CodecError::Unsupported { .. })));
        assert_eq!(err.to_string(), "no codec registered for compression 0xF0030100");
    }
}
