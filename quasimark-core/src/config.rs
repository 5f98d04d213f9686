use crate::error::{Error, Result};

/// Samples on each side of the mark index that carry the parity signature.
pub const NEIGHBORHOOD: usize = 3;

/// Configuration for watermark embedding and extraction.
///
/// Embed and extract must agree on every field, otherwise the regions and
/// mark indexes computed on each side will not line up.
#[derive(Debug, Clone)]
pub struct MarkConfig {
    /// Bytes at the start of the buffer that are never touched (WAV header). Default: 44.
    pub header_size: usize,
    /// Bytes per sample position. Default: 2 (16-bit PCM).
    pub sample_length: usize,
    /// Sample positions per fixed region / raw quasi segment. Default: 512.
    pub chunk_length: usize,
    /// Extra bytes skipped after the header before the first direct region. Default: 4.
    pub direct_lead_in: usize,
    /// Distance above which a segment opens a new quasi-stationary region. Default: 3500.0.
    pub quasi_epsilon: f64,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            header_size: 44,
            sample_length: 2,
            chunk_length: 512,
            direct_lead_in: 4,
            quasi_epsilon: 3500.0,
        }
    }
}

impl MarkConfig {
    /// Length of one direct region (and one raw quasi segment) in bytes.
    pub fn region_length(&self) -> usize {
        self.sample_length * self.chunk_length
    }

    /// Byte offset `stride_count` sample positions away from `position`.
    ///
    /// Callers only step inside a region that was sized to contain the
    /// neighborhood, so the result never underflows for valid regions.
    pub fn sample_offset(&self, position: usize, stride_count: isize) -> usize {
        position.wrapping_add_signed(stride_count * self.sample_length as isize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_length == 0 {
            return Err(Error::InvalidConfig("sample_length must be at least 1".into()));
        }
        let min_chunk = 2 * NEIGHBORHOOD + 1;
        if self.chunk_length < min_chunk {
            return Err(Error::InvalidConfig(format!(
                "chunk_length must be at least {min_chunk}, got {}",
                self.chunk_length
            )));
        }
        if !self.quasi_epsilon.is_finite() || self.quasi_epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "quasi_epsilon must be a finite non-negative number, got {}",
                self.quasi_epsilon
            )));
        }
        Ok(())
    }
}
