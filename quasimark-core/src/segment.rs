//! Partitioning of the sample stream into regions that carry one bit each.
//!
//! Two strategies are available:
//!
//! - [`Mode::Direct`]: fixed-length regions starting just past the header.
//!   A trailing partial region is never used.
//! - [`Mode::Quasi`]: the stream is cut into fixed raw segments which are
//!   folded together while they stay within `quasi_epsilon` of the most
//!   recently accepted boundary segment. The last region absorbs whatever
//!   is left of the buffer.

use crate::config::MarkConfig;
use crate::error::{Error, Result};

/// Segmentation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Direct,
    Quasi,
}

/// Half-open byte range `[start, end)` of the buffer carrying one watermark bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same region expressed relative to a slice that begins at `self.start`.
    pub fn localized(&self) -> Self {
        Self::new(0, self.len())
    }
}

/// Compute the regions of `buffer` for the given mode.
pub fn regions(buffer: &[u8], mode: Mode, config: &MarkConfig) -> Result<Vec<Region>> {
    let found = match mode {
        Mode::Direct => direct_regions(buffer.len(), config),
        Mode::Quasi => quasi_regions(buffer, config)?,
    };
    log::debug!(
        "{mode:?} segmentation: {} regions over {} bytes",
        found.len(),
        buffer.len()
    );
    Ok(found)
}

/// Smallest buffer length that yields at least one region in `mode`.
pub fn min_buffer_len(mode: Mode, config: &MarkConfig) -> usize {
    match mode {
        Mode::Direct => config.header_size + config.direct_lead_in + config.region_length() + 1,
        Mode::Quasi => config.header_size + config.region_length(),
    }
}

/// Fixed-length regions of `region_length` bytes.
///
/// The first region starts at `header_size + direct_lead_in`. A region is
/// emitted only while `start + region_length < buffer_len`.
pub fn direct_regions(buffer_len: usize, config: &MarkConfig) -> Vec<Region> {
    let length = config.region_length();
    let mut found = Vec::new();
    let mut start = config.header_size + config.direct_lead_in;
    while start + length < buffer_len {
        found.push(Region::new(start, start + length));
        start += length;
    }
    found
}

/// Adaptive regions over the header-stripped stream, in buffer coordinates.
///
/// Boundary `k` maps to byte `header_size + boundary[k] * region_length`.
/// Each region ends where the next one begins; the last ends at the end of
/// the buffer. A stream shorter than one raw segment yields no regions.
pub fn quasi_regions(buffer: &[u8], config: &MarkConfig) -> Result<Vec<Region>> {
    let length = config.region_length();
    let stream = buffer.get(config.header_size..).unwrap_or_default();
    let quasi = QuasiStationary::new(stream, length, config.quasi_epsilon);
    if quasi.segment_count() == 0 {
        return Ok(Vec::new());
    }

    let boundaries = quasi.split()?;
    let starts: Vec<usize> = boundaries
        .iter()
        .map(|&b| config.header_size + b * length)
        .collect();
    let found = starts
        .iter()
        .enumerate()
        .map(|(k, &start)| {
            let end = starts.get(k + 1).copied().unwrap_or(buffer.len());
            Region::new(start, end)
        })
        .collect();
    Ok(found)
}

/// Quasi-stationary splitter over equal-length raw segments of a stream.
pub struct QuasiStationary<'a> {
    segments: Vec<&'a [u8]>,
    epsilon: f64,
}

impl<'a> QuasiStationary<'a> {
    /// Cut `stream` into `segment_length`-byte segments. A trailing remainder
    /// shorter than one segment is dropped.
    pub fn new(stream: &'a [u8], segment_length: usize, epsilon: f64) -> Self {
        let segments = if segment_length == 0 {
            Vec::new()
        } else {
            stream.chunks_exact(segment_length).collect()
        };
        Self { segments, epsilon }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns the segment indexes where quasi-stationary areas start.
    ///
    /// Always begins with 0. Each segment is compared with the most recently
    /// accepted boundary segment and becomes a new boundary when the distance
    /// exceeds epsilon.
    pub fn split(&self) -> Result<Vec<usize>> {
        let mut boundaries = vec![0usize];
        let mut anchor = 0usize;

        for i in 1..self.segments.len() {
            let distance = segment_distance(self.segments[anchor], self.segments[i])?;
            if distance > self.epsilon {
                log::trace!("quasi boundary at segment {i} (distance {distance:.1})");
                boundaries.push(i);
                anchor = i;
            }
        }

        Ok(boundaries)
    }
}

/// Euclidean distance between two equal-length byte segments.
pub fn segment_distance(a: &[u8], b: &[u8]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::SegmentLengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as f64;
            d * d
        })
        .sum();
    Ok(sum.sqrt())
}
