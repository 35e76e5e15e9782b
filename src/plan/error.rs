use thiserror::Error;

use crate::RangeError;

/// Bootloader attributes or planning options that cannot describe a valid transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("packet length {max_packet_length} leaves no payload after a {header_size}-byte header")]
    NoPayload {
        max_packet_length: usize,
        header_size: usize,
    },

    #[error(
        "payload of {available} bytes holds no whole {write_size}-byte write of {word_size_bytes}-byte words"
    )]
    ZeroChunkSize {
        available: usize,
        write_size: usize,
        word_size_bytes: usize,
    },

    #[error("write size must be non-zero")]
    ZeroWriteSize,

    #[error("max packet length must be non-zero")]
    ZeroPacketLength,

    #[error("word size must be non-zero")]
    ZeroWordSize,

    #[error("write size {write_size} is not a multiple of word size {word_size_bytes}")]
    WriteSizeNotWordMultiple {
        write_size: usize,
        word_size_bytes: usize,
    },

    #[error("segment at {address:#X} has word size {found}, expected {expected}")]
    WordSizeMismatch {
        address: u32,
        expected: usize,
        found: usize,
    },

    #[error("segment at {address:#X} lies below the alignment origin {origin:#X}")]
    BelowAlignmentOrigin { address: u32, origin: u32 },

    #[error("filler pattern is empty")]
    EmptyFiller,

    #[error("invalid filler pattern: {0}")]
    InvalidFiller(String),

    #[error("invalid memory range: {0}")]
    MemoryRange(#[from] RangeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("image has no data in the writable range")]
    EmptyImage,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
