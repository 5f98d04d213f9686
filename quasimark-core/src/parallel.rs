//! Optional parallel processing using rayon.
//!
//! Enable with the `parallel` feature flag. Regions never overlap and the
//! mark neighborhood always stays inside its region, so every region can be
//! processed on its own mutable sub-slice. Results are identical to
//! [`crate::embed`] and [`crate::extract`].

use rayon::prelude::*;

use crate::bits::text_to_bits;
use crate::config::MarkConfig;
use crate::embed::EmbedOutcome;
use crate::error::Result;
use crate::extract::ExtractOutcome;
use crate::mark::{find_max_amplitude_index, get_mark, set_mark};
use crate::segment::{self, Mode, Region};

/// Embed a watermark, processing regions in parallel.
pub fn embed_parallel(
    buffer: &[u8],
    mode: Mode,
    watermark: &str,
    config: &MarkConfig,
) -> Result<EmbedOutcome> {
    config.validate()?;

    let original_bits = text_to_bits(watermark);
    let mut marked = buffer.to_vec();
    let regions = segment::regions(&marked, mode, config)?;

    let inserted_indexes = if original_bits.is_empty() {
        Vec::new()
    } else {
        region_slices_mut(&mut marked, &regions)
            .into_par_iter()
            .enumerate()
            .map(|(region_idx, (region, slice))| -> Result<usize> {
                let local = find_max_amplitude_index(slice, region.localized(), config);
                let bit = original_bits[region_idx % original_bits.len()];
                set_mark(slice, bit, local, config)?;
                Ok(region.start + local)
            })
            .collect::<Result<Vec<usize>>>()?
    };

    Ok(EmbedOutcome {
        buffer: marked,
        original_bits,
        inserted_indexes,
        regions,
    })
}

/// Extract watermark bits, processing regions in parallel.
pub fn extract_parallel(buffer: &[u8], mode: Mode, config: &MarkConfig) -> Result<ExtractOutcome> {
    config.validate()?;

    let mut restored = buffer.to_vec();
    let regions = segment::regions(&restored, mode, config)?;

    let (extracted_indexes, bits): (Vec<usize>, Vec<u8>) =
        region_slices_mut(&mut restored, &regions)
            .into_par_iter()
            .map(|(region, slice)| {
                let local = find_max_amplitude_index(slice, region.localized(), config);
                let bit = get_mark(slice, local, config);
                (region.start + local, bit)
            })
            .unzip();

    Ok(ExtractOutcome {
        buffer: restored,
        bits,
        extracted_indexes,
    })
}

/// Split `buffer` into one mutable sub-slice per region.
///
/// Regions must be sorted and non-overlapping, which both segmenters guarantee.
fn region_slices_mut<'a>(buffer: &'a mut [u8], regions: &[Region]) -> Vec<(Region, &'a mut [u8])> {
    let mut slices = Vec::with_capacity(regions.len());
    let mut rest = buffer;
    let mut consumed = 0usize;

    for &region in regions {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(region.start - consumed);
        let (slice, tail) = tail.split_at_mut(region.len());
        slices.push((region, slice));
        rest = tail;
        consumed = region.end;
    }

    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_pcm(num_regions: usize) -> Vec<u8> {
        let config = MarkConfig::default();
        let len = 48 + num_regions * config.region_length() + 100;
        let mut bytes: Vec<u8> = (0..len).map(|i| 0x20 + (i % 5) as u8).collect();
        for region in segment::direct_regions(len, &config) {
            let edge = region.start + 200;
            bytes[edge + 2] = 0xF1;
            bytes[edge + 4] = 0x80;
        }
        bytes
    }

    #[test]
    fn parallel_matches_sequential() {
        let config = MarkConfig::default();
        let original = make_test_pcm(24);

        for mode in [Mode::Direct, Mode::Quasi] {
            let seq = crate::embed(&original, mode, "par", &config).unwrap();
            let par = embed_parallel(&original, mode, "par", &config).unwrap();
            assert_eq!(seq.buffer, par.buffer);
            assert_eq!(seq.inserted_indexes, par.inserted_indexes);

            let seq = crate::extract(&seq.buffer, mode, &config).unwrap();
            let par = extract_parallel(&par.buffer, mode, &config).unwrap();
            assert_eq!(seq.bits, par.bits);
            assert_eq!(seq.extracted_indexes, par.extracted_indexes);
            assert_eq!(seq.buffer, par.buffer);
        }
    }

    #[test]
    fn region_slices_follow_regions() {
        let mut buffer: Vec<u8> = (0..100).collect();
        let regions = [Region::new(10, 30), Region::new(30, 45), Region::new(60, 100)];
        let slices = region_slices_mut(&mut buffer, &regions);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].1[0], 10);
        assert_eq!(slices[1].1.len(), 15);
        assert_eq!(slices[2].1[0], 60);
        assert_eq!(slices[2].1.len(), 40);
    }
}
