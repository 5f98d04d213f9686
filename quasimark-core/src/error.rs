use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Mark byte should be in a range [0, 1], got {0}")]
    InvalidMarkBit(u8),

    #[error("segments should be the same length: {left} vs {right} bytes")]
    SegmentLengthMismatch { left: usize, right: usize },

    #[error("bit position should be in range [0..7], got {0}")]
    BitPositionOutOfRange(u8),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
