use crate::{ConfigurationError, MemoryRange};

/// Bootloader attributes, as read from the device before flashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootloaderAttributes {
    /// Addresses the application may be flashed to, in device words as the bootloader reports
    /// them. See [`byte_range`](Self::byte_range).
    pub memory_range: MemoryRange,
    /// Maximum bytes per packet, including the command header
    pub max_packet_length: usize,
    /// Size of a flash write block in bytes; writes must align with it
    pub write_size: usize,
    /// Size of a flash erase page in bytes
    pub erase_size: usize,
    pub version: u16,
    pub device_id: u16,
    /// Whether the bootloader can checksum a flash region on request
    pub has_checksum: bool,
}

impl BootloaderAttributes {
    /// Attributes with the planning constraints set and the informational fields zeroed.
    pub fn new(memory_range: MemoryRange, max_packet_length: usize, write_size: usize) -> Self {
        Self {
            memory_range,
            max_packet_length,
            write_size,
            erase_size: 0,
            version: 0,
            device_id: 0,
            has_checksum: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.write_size == 0 {
            return Err(ConfigurationError::ZeroWriteSize);
        }
        if self.max_packet_length == 0 {
            return Err(ConfigurationError::ZeroPacketLength);
        }
        Ok(())
    }

    /// The writable region in byte addresses for an image with `word_size_bytes`-byte words.
    pub fn byte_range(&self, word_size_bytes: u32) -> Result<MemoryRange, ConfigurationError> {
        Ok(self.memory_range.to_bytes(word_size_bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RangeError;

    fn attrs(max_packet_length: usize, write_size: usize) -> BootloaderAttributes {
        BootloaderAttributes::new(
            MemoryRange::from_half_open(0x1800, 0x15800).unwrap(),
            max_packet_length,
            write_size,
        )
    }

    #[test]
    fn test_validate() {
        assert_eq!(attrs(256, 8).validate(), Ok(()));
        assert_eq!(
            attrs(256, 0).validate(),
            Err(ConfigurationError::ZeroWriteSize)
        );
        assert_eq!(
            attrs(0, 8).validate(),
            Err(ConfigurationError::ZeroPacketLength)
        );
    }

    #[test]
    fn test_byte_range_scales_word_addresses() {
        let a = attrs(256, 8);
        let bytes = a.byte_range(2).unwrap();
        assert_eq!(bytes.low(), 0x3000);
        assert_eq!(bytes.high(), 0x2AFFF);
        assert_eq!(a.byte_range(1).unwrap(), a.memory_range);
    }

    #[test]
    fn test_unaddressable_range_is_configuration_error() {
        let mut a = attrs(256, 8);
        a.memory_range = MemoryRange::from_start_end(0x8000_0000, 0x8000_FFFF).unwrap();
        assert!(matches!(
            a.byte_range(2),
            Err(ConfigurationError::MemoryRange(RangeError::ByteOverflow { .. }))
        ));
    }
}
