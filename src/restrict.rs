use tracing::{debug, trace};

use crate::{MemoryRange, MemorySegment};

/// Crop segments to the bootloader's writable range.
///
/// Segments are sorted by start address first. Segments entirely outside `range` are dropped,
/// those straddling an edge are truncated. Input segments are assumed not to overlap.
pub fn restrict(
    segments: impl IntoIterator<Item = MemorySegment>,
    range: &MemoryRange,
) -> Vec<MemorySegment> {
    let mut sorted: Vec<_> = segments.into_iter().collect();
    sorted.sort_by_key(|s| s.start_address());

    let before = sorted.len();
    let restricted: Vec<_> = sorted
        .iter()
        .filter_map(|segment| {
            trace!(
                start = format_args!("{:#X}", segment.start_address()),
                end = format_args!("{:#X}", segment.end_address()),
                "segment before crop"
            );
            segment.cropped(range)
        })
        .collect();

    debug!(
        %range,
        before,
        after = restricted.len(),
        "restricted segments to writable range"
    );
    restricted
}
