use crate::{MemoryRange, MemorySegment, SegmentError, restrict};

/// Segments decoded from one firmware image, with the image's word size.
///
/// This is what a [`HexDecoder`](crate::HexDecoder) hands over. Segments are kept in the order
/// they were given; [`restricted`](Self::restricted) sorts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    segments: Vec<MemorySegment>,
    word_size_bytes: u32,
}

impl FirmwareImage {
    pub fn new(word_size_bytes: u32) -> Result<Self, SegmentError> {
        if word_size_bytes == 0 {
            return Err(SegmentError::ZeroWordSize);
        }
        Ok(Self {
            segments: vec![],
            word_size_bytes,
        })
    }

    /// Build an image from decoded segments. Empty segments are dropped.
    pub fn with_segments(
        segments: Vec<MemorySegment>,
        word_size_bytes: u32,
    ) -> Result<Self, SegmentError> {
        let mut image = Self::new(word_size_bytes)?;
        for segment in segments {
            image.add_segment(segment)?;
        }
        Ok(image)
    }

    /// Add a segment, joining it onto the previous one when they are adjacent.
    pub fn add_segment(&mut self, segment: MemorySegment) -> Result<(), SegmentError> {
        if segment.word_size_bytes() != self.word_size_bytes {
            return Err(SegmentError::WordSizeMismatch {
                expected: self.word_size_bytes,
                found: segment.word_size_bytes(),
            });
        }
        if segment.is_empty() {
            return Ok(());
        }
        if let Some(last) = self.segments.last_mut()
            && last.end_address() == u64::from(segment.start_address())
        {
            return last.extend(segment);
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[MemorySegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<MemorySegment> {
        self.segments
    }

    pub fn word_size_bytes(&self) -> u32 {
        self.word_size_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn min_address(&self) -> Option<u32> {
        self.segments.iter().map(|s| s.start_address()).min()
    }

    /// Exclusive end of the highest segment.
    pub fn max_address(&self) -> Option<u64> {
        self.segments.iter().map(|s| s.end_address()).max()
    }

    pub fn total_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.len_bytes()).sum()
    }

    /// Count gaps between segments (after sorting).
    pub fn gap_count(&self) -> usize {
        if self.segments.len() <= 1 {
            return 0;
        }
        let mut sorted: Vec<_> = self.segments.iter().collect();
        sorted.sort_by_key(|s| s.start_address());
        sorted
            .windows(2)
            .filter(|w| w[0].end_address() != u64::from(w[1].start_address()))
            .count()
    }

    /// Keep only data inside `range`, sorted by address.
    pub fn restricted(self, range: &MemoryRange) -> FirmwareImage {
        FirmwareImage {
            segments: restrict(self.segments, range),
            word_size_bytes: self.word_size_bytes,
        }
    }
}
