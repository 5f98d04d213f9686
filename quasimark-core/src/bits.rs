//! Bit and text helpers shared by the watermarking engine and its callers.

use crate::error::{Error, Result};

/// Convert text into its watermark bit sequence.
///
/// Each UTF-8 byte contributes 8 bits, most significant bit first. Bits are
/// stored one per `u8` (0 or 1) so they can be fed straight into the codec.
pub fn text_to_bits(text: &str) -> Vec<u8> {
    bytes_to_bits(text.as_bytes())
}

/// Expand raw bytes into bits (MSB first).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for j in (0..8).rev() {
            bits.push((byte >> j) & 1);
        }
    }
    bits
}

/// Pack bits (MSB first) back into bytes. A trailing partial byte is dropped.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1)))
        .collect()
}

/// Reconstruct text from a bit sequence; invalid UTF-8 is replaced.
pub fn bits_to_text(bits: &[u8]) -> String {
    String::from_utf8_lossy(&bits_to_bytes(bits)).into_owned()
}

/// Render bits as a string of `0`/`1` characters.
pub fn format_bits(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
}

/// Read the bit at `position` (0 = LSB).
pub fn check_bit(byte: u8, position: u8) -> Result<u8> {
    if position > 7 {
        return Err(Error::BitPositionOutOfRange(position));
    }
    Ok((byte >> position) & 1)
}

/// Return `byte` with the bit at `position` set to 1.
pub fn set_bit(byte: u8, position: u8) -> Result<u8> {
    if position > 7 {
        return Err(Error::BitPositionOutOfRange(position));
    }
    Ok(byte | (1 << position))
}

/// Parse a hex string such as `"DE-AD-BE-EF"` or `"deadbeef"` into bytes.
pub fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let cleaned: String = hex.trim().chars().filter(|&c| c != '-').collect();
    if cleaned.len() % 2 != 0 {
        return Err(Error::InvalidHex(format!(
            "odd number of digits ({})",
            cleaned.len()
        )));
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            let pair = cleaned
                .get(i..i + 2)
                .ok_or_else(|| Error::InvalidHex(cleaned.clone()))?;
            u8::from_str_radix(pair, 16).map_err(|_| Error::InvalidHex(pair.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_bits() {
        assert_eq!(text_to_bits("A"), vec![0, 1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn text_round_trip() {
        let bits = text_to_bits("Hi there, ünïcode");
        assert_eq!(bits.len() % 8, 0);
        assert_eq!(bits_to_text(&bits), "Hi there, ünïcode");
    }

    #[test]
    fn partial_byte_is_ignored() {
        let mut bits = text_to_bits("ok");
        bits.extend_from_slice(&[1, 0, 1]);
        assert_eq!(bits_to_text(&bits), "ok");
    }

    #[test]
    fn format_bits_renders_digits() {
        assert_eq!(format_bits(&text_to_bits("A")), "01000001");
    }

    #[test]
    fn check_bit_reads_positions() {
        assert_eq!(check_bit(1, 0).unwrap(), 1);
        assert_eq!(check_bit(1, 1).unwrap(), 0);
        assert_eq!(check_bit(0x80, 7).unwrap(), 1);
        assert!(matches!(check_bit(1, 8), Err(Error::BitPositionOutOfRange(8))));
    }

    #[test]
    fn set_bit_sets_positions() {
        assert_eq!(set_bit(0, 0).unwrap(), 0x01);
        assert_eq!(set_bit(0x01, 4).unwrap(), 0x11);
        assert_eq!(set_bit(0xFF, 7).unwrap(), 0xFF);
        assert!(set_bit(0, 9).is_err());
    }

    #[test]
    fn parse_hex_accepts_separators() {
        assert_eq!(parse_hex(" DE-AD-be-ef ").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }
}
