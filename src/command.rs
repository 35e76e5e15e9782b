/// Source of the per-packet header overhead.
///
/// Implemented by whatever serializes bootloader commands; planning only needs the size.
pub trait CommandHeader {
    fn header_size(&self) -> usize;
}

/// A command header of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader(pub usize);

impl FixedHeader {
    /// MCC 16-bit bootloader: command (u8), data length (u16), unlock sequence (u32),
    /// address (u32).
    pub const MCC_16BIT: FixedHeader = FixedHeader(1 + 2 + 4 + 4);
}

impl CommandHeader for FixedHeader {
    fn header_size(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcc_header_size() {
        assert_eq!(FixedHeader::MCC_16BIT.header_size(), 11);
    }
}
