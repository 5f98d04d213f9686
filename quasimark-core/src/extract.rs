use crate::config::MarkConfig;
use crate::error::Result;
use crate::mark::{find_max_amplitude_index, get_mark};
use crate::segment::{self, Mode, Region};

/// Result of extracting a watermark from a PCM buffer.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// Copy of the input with each decoded bit XORed back out of its mark byte.
    pub buffer: Vec<u8>,
    /// One decoded bit per region, in region order.
    pub bits: Vec<u8>,
    /// Mark index found in each region, in processing order.
    pub extracted_indexes: Vec<usize>,
}

impl ExtractOutcome {
    /// Decoded bits reinterpreted as text (8 bits per byte, MSB first).
    pub fn text(&self) -> String {
        crate::bits::bits_to_text(&self.bits)
    }
}

/// Extract watermark bits from a copy of `buffer`.
///
/// Regions are recomputed from `buffer` itself. In quasi mode they can
/// therefore differ from the regions used when embedding if the embedding
/// moved a segment across the stationarity threshold. Use
/// [`extract_in_regions`] to decode against a known region list.
pub fn extract(buffer: &[u8], mode: Mode, config: &MarkConfig) -> Result<ExtractOutcome> {
    config.validate()?;
    let regions = segment::regions(buffer, mode, config)?;
    Ok(extract_regions(buffer, &regions, config))
}

/// Extract watermark bits using caller-supplied regions.
///
/// Regions that do not fit inside `buffer` or are too short to hold the mark
/// neighborhood are skipped.
pub fn extract_in_regions(
    buffer: &[u8],
    regions: &[Region],
    config: &MarkConfig,
) -> Result<ExtractOutcome> {
    config.validate()?;
    let min_len = (2 * crate::config::NEIGHBORHOOD + 1) * config.sample_length;
    let usable: Vec<Region> = regions
        .iter()
        .copied()
        .filter(|r| r.end <= buffer.len() && r.len() >= min_len)
        .collect();
    if usable.len() != regions.len() {
        log::warn!(
            "skipping {} regions that do not fit a {}-byte buffer",
            regions.len() - usable.len(),
            buffer.len()
        );
    }
    Ok(extract_regions(buffer, &usable, config))
}

fn extract_regions(buffer: &[u8], regions: &[Region], config: &MarkConfig) -> ExtractOutcome {
    let mut restored = buffer.to_vec();
    let mut bits = Vec::with_capacity(regions.len());
    let mut extracted_indexes = Vec::with_capacity(regions.len());

    for (region_idx, &region) in regions.iter().enumerate() {
        let mark_index = find_max_amplitude_index(&restored, region, config);
        let bit = get_mark(&mut restored, mark_index, config);
        log::trace!("region {region_idx} {region:?}: bit {bit} at {mark_index}");

        extracted_indexes.push(mark_index);
        bits.push(bit);
    }

    log::debug!("extracted {} bits", bits.len());

    ExtractOutcome {
        buffer: restored,
        bits,
        extracted_indexes,
    }
}
