mod chunks;
mod error;
mod filler;
mod geometry;

pub use chunks::{Chunk, Chunks};
pub use error::{ConfigurationError, PlanError};
pub use filler::Filler;
pub use geometry::ChunkGeometry;

use std::ops::Range;

use tracing::debug;

use crate::MemorySegment;

/// How sparse segments are laid out over flash writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Every segment is chunked on its own, from the write boundary at or below its start to
    /// the write boundary at or above its end. Leading and trailing space in those writes is
    /// filler, and a write shared by two segments is emitted once, with the later segment.
    /// Chunks never span a gap.
    #[default]
    Segmented,
    /// One address-contiguous stream from the first segment's write boundary to the last
    /// segment end. Leading space and gaps between segments are filled.
    Contiguous,
}

/// Options for [`plan`].
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Maximum bytes per transport write, header included
    pub max_packet_length: usize,
    /// Bytes taken by the command header in every packet
    pub header_size: usize,
    /// Flash write granularity in bytes
    pub write_size: usize,
    pub word_size_bytes: usize,
    pub filler: Filler,
    pub layout: Layout,
    /// Address write boundaries are measured from. No segment may start below it.
    pub alignment_origin: u32,
}

impl PlanOptions {
    /// Byte-addressed defaults: word size 1, `00 00` filler, segmented layout, origin 0.
    pub fn new(max_packet_length: usize, header_size: usize, write_size: usize) -> Self {
        Self {
            max_packet_length,
            header_size,
            write_size,
            word_size_bytes: 1,
            filler: Filler::default(),
            layout: Layout::default(),
            alignment_origin: 0,
        }
    }

    pub fn with_word_size(mut self, word_size_bytes: usize) -> Self {
        self.word_size_bytes = word_size_bytes;
        self
    }

    pub fn with_filler(mut self, filler: Filler) -> Self {
        self.filler = filler;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_alignment_origin(mut self, origin: u32) -> Self {
        self.alignment_origin = origin;
        self
    }
}

/// Result of [`plan`]: the padded byte count and the chunks that carry it.
#[derive(Debug)]
pub struct ChunkPlan {
    pub total_bytes: u64,
    pub geometry: ChunkGeometry,
    pub chunks: Chunks,
}

impl ChunkPlan {
    pub fn into_parts(self) -> (u64, Chunks) {
        (self.total_bytes, self.chunks)
    }
}

impl IntoIterator for ChunkPlan {
    type Item = Chunk;
    type IntoIter = Chunks;

    fn into_iter(self) -> Chunks {
        self.chunks
    }
}

/// Plan the transfer of already-restricted segments.
///
/// Everything is validated here; the returned [`Chunks`] cannot fail.
pub fn plan(segments: Vec<MemorySegment>, options: &PlanOptions) -> Result<ChunkPlan, PlanError> {
    let geometry = ChunkGeometry::derive(
        options.max_packet_length,
        options.header_size,
        options.write_size,
        options.word_size_bytes,
    )?;

    let mut segments: Vec<_> = segments.into_iter().filter(|s| !s.is_empty()).collect();
    if let Some(other) = segments
        .iter()
        .find(|s| s.word_size_bytes() as usize != geometry.word_size_bytes)
    {
        return Err(ConfigurationError::WordSizeMismatch {
            address: other.start_address(),
            expected: geometry.word_size_bytes,
            found: other.word_size_bytes() as usize,
        }
        .into());
    }
    segments.sort_by_key(|s| s.start_address());

    let Some(first) = segments.first() else {
        return Err(PlanError::EmptyImage);
    };
    if first.start_address() < options.alignment_origin {
        return Err(ConfigurationError::BelowAlignmentOrigin {
            address: first.start_address(),
            origin: options.alignment_origin,
        }
        .into());
    }

    let origin = u64::from(options.alignment_origin);
    let spans = match options.layout {
        Layout::Segmented => segmented_spans(&segments, &geometry, origin),
        Layout::Contiguous => contiguous_span(&segments, &geometry, origin),
    };
    let raw_total: u64 = segments.iter().map(|s| s.len_bytes() as u64).sum();
    let span_count = spans.len();

    let chunks = Chunks::new(segments, spans, &geometry, options.filler.clone());
    let total_bytes = chunks.remaining_bytes();
    debug!(
        layout = ?options.layout,
        chunk_size = geometry.chunk_size,
        align = geometry.align,
        raw_total,
        total_bytes,
        spans = span_count,
        chunks = chunks.len(),
        "planned chunks"
    );

    Ok(ChunkPlan {
        total_bytes,
        geometry,
        chunks,
    })
}

/// One write-aligned span per segment. A write shared with the previous segment moves into
/// this segment's span, and a previous span left empty by that is dropped.
fn segmented_spans(
    segments: &[MemorySegment],
    geometry: &ChunkGeometry,
    origin: u64,
) -> Vec<Range<u64>> {
    let mut spans: Vec<Range<u64>> = Vec::with_capacity(segments.len());
    for segment in segments {
        let start = geometry.write_floor(u64::from(segment.start_address()), origin);
        let end = geometry.write_ceil(segment.end_address(), origin);
        if let Some(previous) = spans.last_mut()
            && start < previous.end
        {
            previous.end = start;
            if previous.is_empty() {
                spans.pop();
            }
        }
        spans.push(start..end);
    }
    spans
}

fn contiguous_span(
    segments: &[MemorySegment],
    geometry: &ChunkGeometry,
    origin: u64,
) -> Vec<Range<u64>> {
    let (Some(first), Some(last_end)) = (
        segments.first(),
        segments.iter().map(|s| s.end_address()).max(),
    ) else {
        return vec![];
    };
    let start = geometry.write_floor(u64::from(first.start_address()), origin);
    vec![start..geometry.write_ceil(last_end, origin)]
}
