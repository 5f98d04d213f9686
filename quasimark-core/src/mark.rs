use crate::config::{MarkConfig, NEIGHBORHOOD};
use crate::error::{Error, Result};
use crate::segment::Region;

const N: isize = NEIGHBORHOOD as isize;

/// Find the byte index of steepest amplitude change inside `region`.
///
/// Scans sample positions from `NEIGHBORHOOD` positions past the start to
/// `NEIGHBORHOOD` positions before the end, maximizing
/// `|bytes[i] - bytes[i + sample_length]|`. The first maximum wins. The
/// seed candidate is the first scanned position, so a region too short to
/// scan still returns it.
pub fn find_max_amplitude_index(bytes: &[u8], region: Region, config: &MarkConfig) -> usize {
    let first = config.sample_offset(region.start, N);
    let last = region.end.saturating_sub(NEIGHBORHOOD * config.sample_length);

    let amplitude = |i: usize| bytes[i].abs_diff(bytes[config.sample_offset(i, 1)]);

    let mut best_index = first;
    if first >= last {
        return best_index;
    }
    let mut best = amplitude(first);

    for i in (first + config.sample_length..last).step_by(config.sample_length) {
        let current = amplitude(i);
        if current > best {
            best = current;
            best_index = i;
        }
    }

    best_index
}

/// Embed `mark` (0 or 1) at `mark_index`.
///
/// The bit is XORed into the LSB of the mark byte. For 0 the LSBs of the three
/// preceding sample positions are cleared, for 1 those of the three following.
pub fn set_mark(bytes: &mut [u8], mark: u8, mark_index: usize, config: &MarkConfig) -> Result<()> {
    if mark > 1 {
        return Err(Error::InvalidMarkBit(mark));
    }

    bytes[mark_index] ^= mark;

    let direction = if mark == 0 { -1 } else { 1 };
    for k in 1..=N {
        bytes[config.sample_offset(mark_index, direction * k)] &= 0xFE;
    }

    Ok(())
}

/// Recover the bit stored at `mark_index` and undo its XOR on the mark byte.
///
/// The side with fewer set LSBs is the one cleared at embed time: a noisier
/// right side means 0, anything else (ties included) means 1.
pub fn get_mark(bytes: &mut [u8], mark_index: usize, config: &MarkConfig) -> u8 {
    let lsb_sum = |direction: isize| -> u32 {
        (1..=N)
            .map(|k| (bytes[config.sample_offset(mark_index, direction * k)] & 0x01) as u32)
            .sum()
    };
    let left_sum = lsb_sum(-1);
    let right_sum = lsb_sum(1);

    let mark = if right_sum > left_sum { 0 } else { 1 };
    bytes[mark_index] ^= mark;
    mark
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MarkConfig {
        MarkConfig::default()
    }

    /// Flat low-amplitude region of `len` bytes with one steep edge at `edge`.
    fn region_with_edge(len: usize, edge: usize) -> Vec<u8> {
        let mut bytes: Vec<u8> = (0..len).map(|i| 0x20 + (i % 3) as u8).collect();
        bytes[edge + 2] = 0xF1;
        bytes[edge + 4] = 0x80;
        bytes
    }

    #[test]
    fn finds_steepest_edge() {
        let bytes = region_with_edge(256, 100);
        let index = find_max_amplitude_index(&bytes, Region::new(0, 256), &config());
        assert_eq!(index, 100);
    }

    #[test]
    fn flat_region_returns_seed() {
        let bytes = vec![0x55u8; 64];
        let index = find_max_amplitude_index(&bytes, Region::new(10, 64), &config());
        assert_eq!(index, 16);
    }

    #[test]
    fn first_maximum_wins() {
        let mut bytes = vec![0u8; 64];
        bytes[20] = 0x90;
        bytes[40] = 0x90;
        let index = find_max_amplitude_index(&bytes, Region::new(0, 64), &config());
        assert_eq!(index, 18);
    }

    #[test]
    fn search_skips_neighborhood_at_edges() {
        let mut bytes = vec![0u8; 64];
        // Edges within three positions of either end are never candidates
        bytes[2] = 0xFF;
        bytes[60] = 0xFF;
        bytes[30] = 0x10;
        let index = find_max_amplitude_index(&bytes, Region::new(0, 64), &config());
        assert_eq!(index, 28);
    }

    #[test]
    fn set_mark_rejects_non_bits() {
        let mut bytes = vec![0u8; 32];
        let err = set_mark(&mut bytes, 2, 16, &config()).unwrap_err();
        assert!(matches!(err, Error::InvalidMarkBit(2)));
        assert_eq!(err.to_string(), "Mark byte should be in a range [0, 1], got 2");
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn set_mark_zero_clears_left_side() {
        let mut bytes = vec![0xFFu8; 32];
        set_mark(&mut bytes, 0, 16, &config()).unwrap();
        assert_eq!(bytes[16], 0xFF);
        for i in [10, 12, 14] {
            assert_eq!(bytes[i], 0xFE);
        }
        for i in [18, 20, 22] {
            assert_eq!(bytes[i], 0xFF);
        }
    }

    #[test]
    fn set_mark_one_clears_right_side() {
        let mut bytes = vec![0xFFu8; 32];
        set_mark(&mut bytes, 1, 16, &config()).unwrap();
        assert_eq!(bytes[16], 0xFE);
        for i in [10, 12, 14] {
            assert_eq!(bytes[i], 0xFF);
        }
        for i in [18, 20, 22] {
            assert_eq!(bytes[i], 0xFE);
        }
        // Odd bytes (high halves of samples) are untouched
        assert!(bytes.iter().skip(1).step_by(2).all(|&b| b == 0xFF));
    }

    #[test]
    fn get_mark_decodes_and_restores() {
        let original = vec![0x21u8; 32];
        for bit in [0u8, 1] {
            let mut bytes = original.clone();
            set_mark(&mut bytes, bit, 16, &config()).unwrap();
            assert_eq!(get_mark(&mut bytes, 16, &config()), bit);
            assert_eq!(bytes[16], original[16]);
        }
    }

    #[test]
    fn get_mark_tie_decodes_one() {
        let mut bytes = vec![0x20u8; 32];
        assert_eq!(get_mark(&mut bytes, 16, &config()), 1);
        assert_eq!(bytes[16], 0x21);
    }
}
