use thiserror::Error;

use crate::MemoryRange;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("word size must be at least one byte")]
    ZeroWordSize,

    #[error(
        "segment at {address:#X} holds {length} bytes, not a whole number of {word_size}-byte words"
    )]
    PartialWord {
        address: u32,
        length: usize,
        word_size: u32,
    },

    #[error("segment at {address:#X} with {length} bytes overflows the 32-bit address space")]
    AddressOverflow { address: u32, length: usize },

    #[error(
        "data at {start:#X}..{end:#X} is not adjacent to segment {segment_start:#X}..{segment_end:#X}"
    )]
    NotAdjacent {
        start: u64,
        end: u64,
        segment_start: u64,
        segment_end: u64,
    },

    #[error("word size {found} does not match segment word size {expected}")]
    WordSizeMismatch { expected: u32, found: u32 },
}

/// A contiguous run of firmware data.
///
/// Addresses are byte addresses. The start is inclusive and [`end_address`](Self::end_address)
/// is exclusive, so `end_address() - start_address() == len_bytes()`. Data always holds a whole
/// number of words of `word_size_bytes` each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySegment {
    start_address: u32,
    data: Vec<u8>,
    word_size_bytes: u32,
}

impl MemorySegment {
    pub fn new(
        start_address: u32,
        data: Vec<u8>,
        word_size_bytes: u32,
    ) -> Result<Self, SegmentError> {
        if word_size_bytes == 0 {
            return Err(SegmentError::ZeroWordSize);
        }
        if data.len() % word_size_bytes as usize != 0 {
            return Err(SegmentError::PartialWord {
                address: start_address,
                length: data.len(),
                word_size: word_size_bytes,
            });
        }
        // The exclusive end may be 2^32, but no byte may sit above u32::MAX.
        if u64::from(start_address) + data.len() as u64 > 1 << 32 {
            return Err(SegmentError::AddressOverflow {
                address: start_address,
                length: data.len(),
            });
        }
        Ok(Self {
            start_address,
            data,
            word_size_bytes,
        })
    }

    /// Segment of a byte-addressed image.
    pub fn bytes(start_address: u32, data: Vec<u8>) -> Result<Self, SegmentError> {
        Self::new(start_address, data, 1)
    }

    pub fn start_address(&self) -> u32 {
        self.start_address
    }

    /// First address past the segment.
    pub fn end_address(&self) -> u64 {
        u64::from(self.start_address) + self.data.len() as u64
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn word_size_bytes(&self) -> u32 {
        self.word_size_bytes
    }

    pub fn len_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn len_words(&self) -> usize {
        self.data.len() / self.word_size_bytes as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the part of this segment inside `range`, or `None` if nothing is left.
    ///
    /// Bounds that fall inside a word are moved inward so only whole words survive.
    pub fn cropped(&self, range: &MemoryRange) -> Option<MemorySegment> {
        let start = u64::from(self.start_address);
        let (lo, hi) = range.clip_span(start, self.end_address())?;
        let word = u64::from(self.word_size_bytes);

        let lo_offset = (lo - start).next_multiple_of(word);
        let hi_offset = (hi - start) / word * word;
        if hi_offset <= lo_offset {
            return None;
        }

        Some(MemorySegment {
            start_address: self.start_address + lo_offset as u32,
            data: self.data[lo_offset as usize..hi_offset as usize].to_vec(),
            word_size_bytes: self.word_size_bytes,
        })
    }

    /// Join an adjacent segment onto either end of this one.
    pub fn extend(&mut self, other: MemorySegment) -> Result<(), SegmentError> {
        if other.word_size_bytes != self.word_size_bytes {
            return Err(SegmentError::WordSizeMismatch {
                expected: self.word_size_bytes,
                found: other.word_size_bytes,
            });
        }
        if u64::from(other.start_address) == self.end_address() {
            self.data.extend(other.data);
        } else if other.end_address() == u64::from(self.start_address) {
            let mut data = other.data;
            data.append(&mut self.data);
            self.data = data;
            self.start_address = other.start_address;
        } else {
            return Err(SegmentError::NotAdjacent {
                start: u64::from(other.start_address),
                end: other.end_address(),
                segment_start: u64::from(self.start_address),
                segment_end: self.end_address(),
            });
        }
        Ok(())
    }
}
