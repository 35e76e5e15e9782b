use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range at {start:#X} with length {length:#X} overflows the 32-bit address space")]
    Overflow { start: u32, length: u32 },

    #[error("word address {low:#X} is past the 32-bit byte space with {word_size_bytes}-byte words")]
    ByteOverflow { low: u32, word_size_bytes: u32 },

    #[error("range low address ({low:#X}) exceeds high address ({high:#X})")]
    LowExceedsHigh { low: u32, high: u32 },

    #[error("zero length range at {start:#X}")]
    ZeroLength { start: u32 },
}

/// Writable memory region of a bootloader. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRange {
    low: u32,
    high: u32,
}

impl MemoryRange {
    /// Create range from inclusive low and high addresses.
    pub fn from_start_end(low: u32, high: u32) -> Result<Self, RangeError> {
        if low > high {
            return Err(RangeError::LowExceedsHigh { low, high });
        }
        Ok(Self { low, high })
    }

    /// Create range from start address and length in bytes.
    pub fn from_start_length(start: u32, length: u32) -> Result<Self, RangeError> {
        if length == 0 {
            return Err(RangeError::ZeroLength { start });
        }
        let high = start
            .checked_add(length - 1)
            .ok_or(RangeError::Overflow { start, length })?;
        Ok(Self { low: start, high })
    }

    /// Create range from a start address and an exclusive end address, the
    /// form bootloaders report in their memory range response.
    pub fn from_half_open(start: u32, end: u32) -> Result<Self, RangeError> {
        if end <= start {
            return Err(RangeError::ZeroLength { start });
        }
        Ok(Self {
            low: start,
            high: end - 1,
        })
    }

    /// Convert a range of word addresses into the byte addresses it covers.
    ///
    /// The byte range ends on the last byte of the last word, clamped to the top of the 32-bit
    /// byte space. Zero-byte words cover nothing.
    pub fn to_bytes(&self, word_size_bytes: u32) -> Result<Self, RangeError> {
        if word_size_bytes == 0 {
            return Err(RangeError::ZeroLength { start: self.low });
        }
        let word = u64::from(word_size_bytes);
        let low =
            u32::try_from(u64::from(self.low) * word).map_err(|_| RangeError::ByteOverflow {
                low: self.low,
                word_size_bytes,
            })?;
        let high = (self.end() * word - 1).min(u64::from(u32::MAX)) as u32;
        Self::from_start_end(low, high)
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    /// Exclusive end address. Widened so a range ending at `u32::MAX` is representable.
    pub fn end(&self) -> u64 {
        u64::from(self.high) + 1
    }

    pub fn length(&self) -> u64 {
        self.end() - u64::from(self.low)
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr >= self.low && addr <= self.high
    }

    /// Whether the half-open span `[start, end)` shares at least one address with this range.
    pub fn overlaps_span(&self, start: u64, end: u64) -> bool {
        start < self.end() && u64::from(self.low) < end
    }

    /// Clip the half-open span `[start, end)` to this range.
    pub fn clip_span(&self, start: u64, end: u64) -> Option<(u64, u64)> {
        if !self.overlaps_span(start, end) {
            return None;
        }
        Some((start.max(u64::from(self.low)), end.min(self.end())))
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}-{:#X}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_start_end_is_inclusive() {
        let r = MemoryRange::from_start_end(0x1000, 0x57FF).unwrap();
        assert_eq!(r.low(), 0x1000);
        assert_eq!(r.high(), 0x57FF);
        assert_eq!(r.end(), 0x5800);
        assert_eq!(r.length(), 0x4800);
    }

    #[test]
    fn test_from_half_open() {
        let r = MemoryRange::from_half_open(0x1000, 0x5800).unwrap();
        assert_eq!(r, MemoryRange::from_start_end(0x1000, 0x57FF).unwrap());
        assert!(matches!(
            MemoryRange::from_half_open(0x1000, 0x1000),
            Err(RangeError::ZeroLength { start: 0x1000 })
        ));
    }

    #[test]
    fn test_low_exceeds_high_error() {
        assert_eq!(
            MemoryRange::from_start_end(0x2000, 0x1000),
            Err(RangeError::LowExceedsHigh {
                low: 0x2000,
                high: 0x1000
            })
        );
    }

    #[test]
    fn test_full_address_space() {
        let r = MemoryRange::from_start_end(0, u32::MAX).unwrap();
        assert_eq!(r.length(), 1 << 32);
        assert!(r.contains(u32::MAX));
    }

    #[test]
    fn test_clip_span() {
        let r = MemoryRange::from_start_end(0x1000, 0x1FFF).unwrap();
        assert_eq!(r.clip_span(0x0F00, 0x1100), Some((0x1000, 0x1100)));
        assert_eq!(r.clip_span(0x1F00, 0x2100), Some((0x1F00, 0x2000)));
        assert_eq!(r.clip_span(0x1000, 0x2000), Some((0x1000, 0x2000)));
        // adjacent on either side
        assert_eq!(r.clip_span(0x0F00, 0x1000), None);
        assert_eq!(r.clip_span(0x2000, 0x2100), None);
    }

    #[test]
    fn test_from_start_length_overflow() {
        assert_eq!(
            MemoryRange::from_start_length(0xFFFF_FF00, 0x200),
            Err(RangeError::Overflow {
                start: 0xFFFF_FF00,
                length: 0x200
            })
        );
        let r = MemoryRange::from_start_length(0xFFFF_FF00, 0x100).unwrap();
        assert_eq!(r.high(), u32::MAX);
    }

    #[test]
    fn test_to_bytes() {
        let words = MemoryRange::from_half_open(0x1800, 0x15800).unwrap();
        let bytes = words.to_bytes(2).unwrap();
        assert_eq!(bytes.low(), 0x3000);
        assert_eq!(bytes.end(), 0x2B000);
        assert_eq!(words.to_bytes(1).unwrap(), words);
    }

    #[test]
    fn test_to_bytes_at_top_of_address_space() {
        let words = MemoryRange::from_start_end(0x4000_0000, u32::MAX).unwrap();
        let bytes = words.to_bytes(2).unwrap();
        assert_eq!(bytes.low(), 0x8000_0000);
        assert_eq!(bytes.high(), u32::MAX);

        assert_eq!(
            words.to_bytes(4),
            Err(RangeError::ByteOverflow {
                low: 0x4000_0000,
                word_size_bytes: 4
            })
        );
    }

    #[test]
    fn test_display() {
        let r = MemoryRange::from_start_end(0x800, 0xABFF).unwrap();
        assert_eq!(r.to_string(), "0x800-0xABFF");
    }
}
