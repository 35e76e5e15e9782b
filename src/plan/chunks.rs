use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::Range;

use tracing::trace;

use super::{ChunkGeometry, Filler};
use crate::MemorySegment;

/// One transport write worth of firmware data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Device byte address of `data[0]`. Every following byte belongs at the next address.
    pub address: u32,
    pub data: Vec<u8>,
    pub word_size_bytes: u32,
}

impl Chunk {
    /// Address in words, as word-addressed bootloaders expect it.
    pub fn word_address(&self) -> u32 {
        self.address / self.word_size_bytes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Lazy, single-pass sequence of chunks produced by [`plan`](super::plan).
///
/// The plan is a list of address spans, each a whole number of flash writes. Chunks are cut
/// from the front of each span and never cross into the next one. Each call to `next` builds
/// exactly one chunk, segments are released once the stream has moved past them, and dropping
/// the iterator early is always fine.
#[derive(Debug)]
pub struct Chunks {
    segments: VecDeque<MemorySegment>,
    spans: std::vec::IntoIter<Range<u64>>,
    // unemitted part of the span in progress
    span: Range<u64>,
    span_start: u64,
    // end of the last segment the stream has moved past
    data_end: u64,
    emitted: u64,
    total_bytes: u64,
    remaining_chunks: usize,
    chunk_bytes: u64,
    word_size_bytes: u32,
    filler: Filler,
}

impl Chunks {
    /// `segments` must be sorted and non-overlapping. `spans` must be ascending, non-empty and
    /// cover every segment byte.
    pub(super) fn new(
        segments: Vec<MemorySegment>,
        spans: Vec<Range<u64>>,
        geometry: &ChunkGeometry,
        filler: Filler,
    ) -> Self {
        let total_bytes = spans.iter().map(|s| s.end - s.start).sum();
        let remaining_chunks = spans
            .iter()
            .map(|s| geometry.chunk_count(s.end - s.start) as usize)
            .sum();
        Self {
            segments: segments.into(),
            spans: spans.into_iter(),
            span: 0..0,
            span_start: 0,
            data_end: 0,
            emitted: 0,
            total_bytes,
            remaining_chunks,
            chunk_bytes: geometry.chunk_bytes() as u64,
            word_size_bytes: geometry.word_size_bytes as u32,
            filler,
        }
    }

    /// Bytes still to be emitted.
    pub fn remaining_bytes(&self) -> u64 {
        self.total_bytes - self.emitted
    }

    /// Segment data for the addresses in `window`, with filler wherever no segment has data.
    fn read(&mut self, window: Range<u64>) -> Vec<u8> {
        let mut data = Vec::with_capacity((window.end - window.start) as usize);
        let mut at = window.start;
        while at < window.end {
            while let Some(front) = self.segments.front()
                && front.end_address() <= at
            {
                self.data_end = front.end_address();
                self.segments.pop_front();
            }

            match self.segments.front() {
                Some(segment) if u64::from(segment.start_address()) <= at => {
                    let offset = (at - u64::from(segment.start_address())) as usize;
                    let n = (segment.end_address().min(window.end) - at) as usize;
                    data.extend_from_slice(&segment.data()[offset..offset + n]);
                    at += n as u64;
                }
                next => {
                    let gap_end =
                        next.map_or(window.end, |s| u64::from(s.start_address()).min(window.end));
                    // a filler run starts where data last ended, or at the span start
                    let phase = at.saturating_sub(self.data_end.max(self.span_start));
                    self.filler.extend_into(&mut data, phase, (gap_end - at) as usize);
                    at = gap_end;
                }
            }
        }
        data
    }
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.span.is_empty() {
            let span = self.spans.next()?;
            self.span_start = span.start;
            self.span = span;
        }

        let start = self.span.start;
        let end = self.span.end.min(start + self.chunk_bytes);
        self.span.start = end;

        let data = self.read(start..end);
        self.emitted += end - start;
        self.remaining_chunks -= 1;

        trace!(
            address = format_args!("{start:#X}"),
            len = data.len(),
            remaining = self.remaining_bytes(),
            "emitting chunk"
        );
        // Chunk starts are write boundaries below the end of some segment, so they fit in 32 bits.
        Some(Chunk {
            address: start as u32,
            data,
            word_size_bytes: self.word_size_bytes,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining_chunks, Some(self.remaining_chunks))
    }
}

impl ExactSizeIterator for Chunks {}

impl FusedIterator for Chunks {}
