use crate::bits::text_to_bits;
use crate::config::MarkConfig;
use crate::error::{Error, Result};
use crate::mark::{find_max_amplitude_index, set_mark};
use crate::segment::{self, Mode, Region};

/// Result of embedding a watermark into a PCM buffer.
#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    /// Watermarked copy of the input buffer.
    pub buffer: Vec<u8>,
    /// Bit sequence that was embedded (cycled across regions).
    pub original_bits: Vec<u8>,
    /// Mark index chosen in each region, in processing order.
    pub inserted_indexes: Vec<usize>,
    /// Regions used for embedding.
    pub regions: Vec<Region>,
}

/// Embed `watermark` into a copy of `buffer`.
///
/// One bit is embedded per region; the bit sequence wraps around when there
/// are more regions than bits. A buffer without a single full region is
/// returned unchanged with empty index and region lists.
pub fn embed(
    buffer: &[u8],
    mode: Mode,
    watermark: &str,
    config: &MarkConfig,
) -> Result<EmbedOutcome> {
    embed_bits(buffer, mode, &text_to_bits(watermark), config)
}

/// Embed an arbitrary bit sequence (one 0/1 value per element) into a copy
/// of `buffer`.
pub fn embed_bits(
    buffer: &[u8],
    mode: Mode,
    bits: &[u8],
    config: &MarkConfig,
) -> Result<EmbedOutcome> {
    config.validate()?;
    if let Some(&bad) = bits.iter().find(|&&b| b > 1) {
        return Err(Error::InvalidMarkBit(bad));
    }

    let original_bits = bits.to_vec();
    let mut marked = buffer.to_vec();
    let regions = segment::regions(&marked, mode, config)?;

    let mut inserted_indexes = Vec::with_capacity(regions.len());
    if !original_bits.is_empty() {
        for (region_idx, &region) in regions.iter().enumerate() {
            let mark_index = find_max_amplitude_index(&marked, region, config);
            let bit = original_bits[region_idx % original_bits.len()];
            log::trace!("region {region_idx} {region:?}: bit {bit} at {mark_index}");

            inserted_indexes.push(mark_index);
            set_mark(&mut marked, bit, mark_index, config)?;
        }
    }

    log::debug!(
        "embedded {} bits of a {}-bit watermark ({mode:?})",
        inserted_indexes.len(),
        original_bits.len()
    );

    Ok(EmbedOutcome {
        buffer: marked,
        original_bits,
        inserted_indexes,
        regions,
    })
}
