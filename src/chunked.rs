use std::path::Path;

use tracing::{debug, info};

use crate::{
    BootloaderAttributes, ChunkPlan, CommandHeader, Error, Filler, HexDecoder, Layout,
    PlanError, PlanOptions, plan,
};

/// Options for [`chunked`].
#[derive(Debug, Clone, Default)]
pub struct ChunkingOptions {
    pub filler: Filler,
    pub layout: Layout,
}

/// Decode a firmware file and split it into chunks for the given bootloader.
///
/// The bootloader's memory range is given in device words. It is scaled by the image's word
/// size, the image is restricted to the resulting byte range, and chunk boundaries are aligned
/// relative to the start of that range.
pub fn chunked<D: HexDecoder>(
    decoder: &D,
    path: &Path,
    attributes: &BootloaderAttributes,
    header: &impl CommandHeader,
    options: &ChunkingOptions,
) -> Result<ChunkPlan, Error<D::Error>> {
    attributes.validate().map_err(PlanError::from)?;
    info!(
        version = attributes.version,
        device_id = format_args!("{:#06X}", attributes.device_id),
        memory_range = %attributes.memory_range,
        max_packet_length = attributes.max_packet_length,
        write_size = attributes.write_size,
        "planning firmware transfer"
    );

    let image = decoder.decode(path).map_err(Error::Decode)?;
    debug!(
        path = %path.display(),
        segments = image.segments().len(),
        gaps = image.gap_count(),
        bytes = image.total_bytes(),
        word_size_bytes = image.word_size_bytes(),
        "decoded firmware image"
    );

    let byte_range = attributes
        .byte_range(image.word_size_bytes())
        .map_err(PlanError::from)?;
    debug!(%byte_range, "writable range in bytes");

    let word_size_bytes = image.word_size_bytes() as usize;
    let restricted = image.restricted(&byte_range);

    let plan_options = PlanOptions {
        max_packet_length: attributes.max_packet_length,
        header_size: header.header_size(),
        write_size: attributes.write_size,
        word_size_bytes,
        filler: options.filler.clone(),
        layout: options.layout,
        alignment_origin: byte_range.low(),
    };
    Ok(plan(restricted.into_segments(), &plan_options)?)
}
