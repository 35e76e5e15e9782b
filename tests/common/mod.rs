#![allow(dead_code)]

use std::path::Path;

use flashchunk::{Chunk, FirmwareImage, HexDecoder, MemoryRange, MemorySegment};

pub fn seg(start: u32, data: Vec<u8>) -> MemorySegment {
    MemorySegment::bytes(start, data).unwrap()
}

pub fn range(low: u32, high: u32) -> MemoryRange {
    MemoryRange::from_start_end(low, high).unwrap()
}

/// Concatenate chunk payloads.
pub fn flatten(chunks: impl IntoIterator<Item = Chunk>) -> Vec<u8> {
    chunks.into_iter().flat_map(|c| c.data).collect()
}

#[derive(Debug, PartialEq, Eq)]
pub struct DecodeFailed(pub String);

impl std::fmt::Display for DecodeFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bad record: {}", self.0)
    }
}

impl std::error::Error for DecodeFailed {}

/// Decoder that hands back a prepared image, or fails for any path containing "broken".
pub struct StaticDecoder(pub FirmwareImage);

impl HexDecoder for StaticDecoder {
    type Error = DecodeFailed;

    fn decode(&self, path: &Path) -> Result<FirmwareImage, DecodeFailed> {
        if path.to_string_lossy().contains("broken") {
            return Err(DecodeFailed(path.display().to_string()));
        }
        Ok(self.0.clone())
    }
}
