use std::path::Path;

use crate::FirmwareImage;

/// Turns a firmware file into memory segments.
///
/// Record parsing lives outside this crate. Errors are passed through to the caller of
/// [`chunked`](crate::chunked) untouched.
pub trait HexDecoder {
    type Error;

    fn decode(&self, path: &Path) -> Result<FirmwareImage, Self::Error>;
}
