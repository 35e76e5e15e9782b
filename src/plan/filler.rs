use std::str::FromStr;

use super::ConfigurationError;

/// Byte pattern written into gaps and trailing padding.
///
/// Every filler run starts at the first pattern byte and is truncated to the run length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filler {
    pattern: Vec<u8>,
}

impl Filler {
    pub fn new(pattern: Vec<u8>) -> Result<Self, ConfigurationError> {
        if pattern.is_empty() {
            return Err(ConfigurationError::EmptyFiller);
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Append `len` filler bytes to `buf`, continuing a run that already has `phase` bytes.
    pub(crate) fn extend_into(&self, buf: &mut Vec<u8>, phase: u64, len: usize) {
        let start = (phase % self.pattern.len() as u64) as usize;
        buf.extend(self.pattern.iter().cycle().skip(start).take(len));
    }
}

impl Default for Filler {
    fn default() -> Self {
        Self {
            pattern: vec![0x00, 0x00],
        }
    }
}

impl FromStr for Filler {
    type Err = ConfigurationError;

    /// Hex digits, optionally split by whitespace and prefixed with `0x` ("FF FF", "0xDEAD").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut digits = String::new();
        for part in s.split_whitespace() {
            let part = part
                .strip_prefix("0x")
                .or_else(|| part.strip_prefix("0X"))
                .unwrap_or(part);
            digits.push_str(part);
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigurationError::InvalidFiller(format!(
                "non-hex digit in '{s}'"
            )));
        }
        if digits.len() % 2 != 0 {
            return Err(ConfigurationError::InvalidFiller(format!(
                "odd number of hex digits in '{s}'"
            )));
        }

        let pattern = (0..digits.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&digits[i..i + 2], 16)
                    .map_err(|e| ConfigurationError::InvalidFiller(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Filler::new(pattern)
    }
}
