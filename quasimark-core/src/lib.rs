pub mod bits;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod mark;
pub mod segment;
pub mod verify;

#[cfg(feature = "parallel")]
pub mod parallel;

// Re-export primary API types
pub use config::MarkConfig;
pub use embed::EmbedOutcome;
pub use error::Error;
pub use extract::ExtractOutcome;
pub use segment::{Mode, Region};
pub use verify::RoundTripReport;

#[cfg(feature = "parallel")]
pub use parallel::{embed_parallel, extract_parallel};

/// Embed a text watermark into a copy of a 16-bit PCM byte buffer.
///
/// The input is never modified. The returned outcome carries the watermarked
/// buffer, the watermark's bit sequence and the mark index used per region.
pub fn embed(
    buffer: &[u8],
    mode: Mode,
    watermark: &str,
    config: &MarkConfig,
) -> error::Result<EmbedOutcome> {
    embed::embed(buffer, mode, watermark, config)
}

/// Embed a raw bit sequence (values 0 or 1) into a copy of a 16-bit PCM
/// byte buffer.
pub fn embed_bits(
    buffer: &[u8],
    mode: Mode,
    bits: &[u8],
    config: &MarkConfig,
) -> error::Result<EmbedOutcome> {
    embed::embed_bits(buffer, mode, bits, config)
}

/// Extract watermark bits from a copy of a 16-bit PCM byte buffer.
///
/// Returns one bit per region along with the mark indexes and the buffer
/// with each decoded bit XORed back out.
pub fn extract(buffer: &[u8], mode: Mode, config: &MarkConfig) -> error::Result<ExtractOutcome> {
    extract::extract(buffer, mode, config)
}

/// Extract watermark bits from caller-supplied regions instead of
/// recomputing them from the buffer.
pub fn extract_in_regions(
    buffer: &[u8],
    regions: &[Region],
    config: &MarkConfig,
) -> error::Result<ExtractOutcome> {
    extract::extract_in_regions(buffer, regions, config)
}

/// Embed then extract, reporting bit and mark-index agreement.
pub fn round_trip(
    buffer: &[u8],
    mode: Mode,
    watermark: &str,
    config: &MarkConfig,
) -> error::Result<RoundTripReport> {
    verify::round_trip(buffer, mode, watermark, config)
}
