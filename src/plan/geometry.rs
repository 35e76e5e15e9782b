use super::ConfigurationError;

/// Chunk dimensions derived from the protocol constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGeometry {
    /// Words per chunk.
    pub chunk_size: usize,
    /// Words per flash write unit.
    pub align: usize,
    pub word_size_bytes: usize,
    pub write_size: usize,
}

impl ChunkGeometry {
    /// Derive the chunk size from the packet budget.
    ///
    /// The payload left after the command header is rounded down to whole flash writes, then
    /// expressed in words.
    pub fn derive(
        max_packet_length: usize,
        header_size: usize,
        write_size: usize,
        word_size_bytes: usize,
    ) -> Result<Self, ConfigurationError> {
        if write_size == 0 {
            return Err(ConfigurationError::ZeroWriteSize);
        }
        if word_size_bytes == 0 {
            return Err(ConfigurationError::ZeroWordSize);
        }
        if write_size % word_size_bytes != 0 {
            return Err(ConfigurationError::WriteSizeNotWordMultiple {
                write_size,
                word_size_bytes,
            });
        }

        let mut available = match max_packet_length.checked_sub(header_size) {
            Some(available) if available > 0 => available,
            _ => {
                return Err(ConfigurationError::NoPayload {
                    max_packet_length,
                    header_size,
                });
            }
        };
        available -= available % write_size;

        let chunk_size = available / word_size_bytes;
        if chunk_size == 0 {
            return Err(ConfigurationError::ZeroChunkSize {
                available: max_packet_length - header_size,
                write_size,
                word_size_bytes,
            });
        }

        Ok(Self {
            chunk_size,
            align: write_size / word_size_bytes,
            word_size_bytes,
            write_size,
        })
    }

    /// Bytes in every chunk but the last.
    pub fn chunk_bytes(&self) -> usize {
        self.chunk_size * self.word_size_bytes
    }

    /// Start of the flash write holding `address`, with writes counted from `origin`.
    ///
    /// `address` must not be below `origin`.
    pub fn write_floor(&self, address: u64, origin: u64) -> u64 {
        address - (address - origin) % self.write_size as u64
    }

    /// First write boundary at or above `address`, counted from `origin`.
    pub fn write_ceil(&self, address: u64, origin: u64) -> u64 {
        origin + (address - origin).next_multiple_of(self.write_size as u64)
    }

    /// Chunks needed to cover `span_len` bytes.
    pub fn chunk_count(&self, span_len: u64) -> u64 {
        span_len.div_ceil(self.chunk_bytes() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_rounds_to_write_size() {
        // 64-byte packets, 11-byte header: 53 bytes of payload, 48 after rounding to 8
        let g = ChunkGeometry::derive(64, 11, 8, 1).unwrap();
        assert_eq!(g.chunk_size, 48);
        assert_eq!(g.align, 8);
        assert_eq!(g.chunk_bytes(), 48);
    }

    #[test]
    fn test_derive_in_words() {
        let g = ChunkGeometry::derive(256, 11, 8, 2).unwrap();
        // 245 -> 240 bytes -> 120 words
        assert_eq!(g.chunk_size, 120);
        assert_eq!(g.align, 4);
        assert_eq!(g.chunk_bytes(), 240);
    }

    #[test]
    fn test_derive_exact_fit() {
        let g = ChunkGeometry::derive(20, 4, 8, 1).unwrap();
        assert_eq!(g.chunk_size, 16);
    }

    #[test]
    fn test_header_consumes_packet() {
        assert_eq!(
            ChunkGeometry::derive(11, 11, 4, 1),
            Err(ConfigurationError::NoPayload {
                max_packet_length: 11,
                header_size: 11
            })
        );
        assert!(matches!(
            ChunkGeometry::derive(8, 11, 4, 1),
            Err(ConfigurationError::NoPayload { .. })
        ));
    }

    #[test]
    fn test_payload_smaller_than_write_is_zero_chunk() {
        assert_eq!(
            ChunkGeometry::derive(16, 11, 8, 1),
            Err(ConfigurationError::ZeroChunkSize {
                available: 5,
                write_size: 8,
                word_size_bytes: 1
            })
        );
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(
            ChunkGeometry::derive(64, 11, 0, 1),
            Err(ConfigurationError::ZeroWriteSize)
        );
        assert_eq!(
            ChunkGeometry::derive(64, 11, 8, 0),
            Err(ConfigurationError::ZeroWordSize)
        );
        assert!(matches!(
            ChunkGeometry::derive(64, 11, 6, 4),
            Err(ConfigurationError::WriteSizeNotWordMultiple { .. })
        ));
    }

    #[test]
    fn test_write_bounds() {
        let g = ChunkGeometry::derive(20, 4, 8, 1).unwrap();
        assert_eq!(g.write_floor(0x105, 0), 0x100);
        assert_eq!(g.write_floor(0x100, 0), 0x100);
        assert_eq!(g.write_ceil(0x101, 0), 0x108);
        assert_eq!(g.write_ceil(0x108, 0), 0x108);

        // boundaries counted from an unaligned origin
        assert_eq!(g.write_floor(0x1006, 0x1002), 0x1002);
        assert_eq!(g.write_floor(0x100A, 0x1002), 0x100A);
        assert_eq!(g.write_ceil(0x1003, 0x1002), 0x100A);
        assert_eq!(g.write_ceil(0x1002, 0x1002), 0x1002);
    }

    #[test]
    fn test_chunk_count() {
        let g = ChunkGeometry::derive(20, 4, 8, 1).unwrap();
        assert_eq!(g.chunk_count(24), 2);
        assert_eq!(g.chunk_count(32), 2);
        assert_eq!(g.chunk_count(40), 3);
    }
}
