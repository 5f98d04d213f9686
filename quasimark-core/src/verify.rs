//! Round-trip diagnostics: how much of an embedded watermark survives
//! extraction, by bits and by mark position.

use std::fmt;

use crate::config::MarkConfig;
use crate::embed::{EmbedOutcome, embed};
use crate::error::Result;
use crate::extract::{ExtractOutcome, extract};
use crate::segment::Mode;

/// Percentage of extracted bits matching the original sequence.
///
/// Both sequences are indexed modulo their own length, so a short watermark
/// is compared cyclically against every extracted bit. Returns 0.0 when
/// either sequence is empty.
pub fn bit_match_percentage(original: &[u8], extracted: &[u8]) -> f64 {
    if original.is_empty() || extracted.is_empty() {
        return 0.0;
    }
    let count = extracted.len();
    let matches = (0..count)
        .filter(|&i| extracted[i % extracted.len()] == original[i % original.len()])
        .count();
    matches as f64 / count as f64 * 100.0
}

/// Percentage of mark indexes found at the same position on both sides,
/// compared pairwise up to the shorter list. Returns 0.0 when either is empty.
pub fn index_match_percentage(inserted: &[usize], extracted: &[usize]) -> f64 {
    let count = inserted.len().min(extracted.len());
    if count == 0 {
        return 0.0;
    }
    let matches = inserted
        .iter()
        .zip(extracted)
        .filter(|(a, b)| a == b)
        .count();
    matches as f64 / count as f64 * 100.0
}

/// Embed-then-extract report.
#[derive(Debug, Clone)]
pub struct RoundTripReport {
    pub embedded: EmbedOutcome,
    pub extracted: ExtractOutcome,
    pub bit_match: f64,
    pub index_match: f64,
}

impl RoundTripReport {
    /// Text decoded from the extracted bits.
    pub fn recovered_text(&self) -> String {
        self.extracted.text()
    }
}

impl fmt::Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identity: {:.0}% / {:.0}% -> {}",
            self.bit_match,
            self.index_match,
            self.recovered_text()
        )
    }
}

/// Embed `watermark` into `buffer`, extract it again and compare.
pub fn round_trip(
    buffer: &[u8],
    mode: Mode,
    watermark: &str,
    config: &MarkConfig,
) -> Result<RoundTripReport> {
    let embedded = embed(buffer, mode, watermark, config)?;
    let extracted = extract(&embedded.buffer, mode, config)?;

    let bit_match = bit_match_percentage(&embedded.original_bits, &extracted.bits);
    let index_match =
        index_match_percentage(&embedded.inserted_indexes, &extracted.extracted_indexes);

    Ok(RoundTripReport {
        embedded,
        extracted,
        bit_match,
        index_match,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_match_cycles_original() {
        let original = [0, 1];
        let extracted = [0, 1, 0, 1, 0, 0];
        let pct = bit_match_percentage(&original, &extracted);
        assert!((pct - 500.0 / 6.0).abs() < 1e-9, "got {pct}");
    }

    #[test]
    fn bit_match_counts_extracted_length() {
        // Only the first two original bits are checked
        assert_eq!(bit_match_percentage(&[1, 1, 0, 0], &[1, 1]), 100.0);
    }

    #[test]
    fn bit_match_empty() {
        assert_eq!(bit_match_percentage(&[], &[1]), 0.0);
        assert_eq!(bit_match_percentage(&[1], &[]), 0.0);
    }

    #[test]
    fn index_match_uses_shorter_length() {
        assert_eq!(index_match_percentage(&[10, 20, 30], &[10, 21]), 50.0);
        assert_eq!(index_match_percentage(&[], &[1, 2]), 0.0);
    }

    #[test]
    fn report_display_format() {
        let config = MarkConfig::default();
        // 44-byte header plus alternating 0x0000 / 0xFFFF samples
        let mut buffer = vec![0u8; 44];
        buffer.extend((0..(2000 - 44) / 2).flat_map(|k| {
            let v = if k % 2 == 0 { 0x00 } else { 0xFF };
            [v, v]
        }));

        let report = round_trip(&buffer, Mode::Direct, "A", &config).unwrap();
        assert_eq!(report.extracted.bits, vec![0]);
        assert_eq!(report.to_string(), "Identity: 100% / 100% -> ");
    }
}
