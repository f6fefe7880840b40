//! Conversion between text and bit sequences.
//!
//! Text is encoded to bytes in a [`Charset`] and every byte is emitted as 8
//! bits in MSB-first (most significant bit first) order. Decoding groups bits
//! back into bytes the same way.
//!
//! # Short input
//!
//! Two decode behaviors exist and callers pick one through [`DecodeMode`]:
//! - `Strict`: a bit count that is not a multiple of 8, or bytes that are not
//!   valid in the charset, is an error
//! - `Permissive`: the trailing incomplete group is dropped, and bytes forming
//!   invalid sequences are skipped
//!
//! # Example
//! ```
//! use linecode_sim_core::bits::{self, Charset, DecodeMode};
//!
//! let bits = bits::encode("Hi", Charset::Utf8).unwrap();
//! assert_eq!(bits.to_string(), "0100100001101001");
//!
//! let text = bits::decode(&bits, Charset::Utf8, DecodeMode::Strict).unwrap();
//! assert_eq!(text, "Hi");
//! ```

use crate::error::{BitCodecError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single binary symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }

    /// The other bit value.
    pub fn flipped(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A value outside {0, 1} where a bit was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value {value} at index {position} is not a bit (expected 0 or 1)")]
pub struct InvalidBitValue {
    pub value: u8,
    pub position: usize,
}

/// An ordered sequence of bits.
///
/// Serializes as a list of 0/1 integers, which is the `data` field of the
/// persisted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BitSequence {
    bits: Vec<Bit>,
}

impl BitSequence {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: Bit) {
        self.bits.push(bit);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[Bit] {
        &self.bits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bit> {
        self.bits.iter()
    }

    /// Bits as 0/1 integers.
    pub fn to_u8_vec(&self) -> Vec<u8> {
        self.bits.iter().map(|b| b.as_u8()).collect()
    }
}

impl From<Vec<Bit>> for BitSequence {
    fn from(bits: Vec<Bit>) -> Self {
        Self { bits }
    }
}

impl FromIterator<Bit> for BitSequence {
    fn from_iter<I: IntoIterator<Item = Bit>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = &'a Bit;
    type IntoIter = std::slice::Iter<'a, Bit>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}

impl TryFrom<Vec<u8>> for BitSequence {
    type Error = InvalidBitValue;

    fn try_from(values: Vec<u8>) -> std::result::Result<Self, Self::Error> {
        values
            .into_iter()
            .enumerate()
            .map(|(position, value)| match value {
                0 => Ok(Bit::Zero),
                1 => Ok(Bit::One),
                _ => Err(InvalidBitValue { value, position }),
            })
            .collect()
    }
}

impl From<BitSequence> for Vec<u8> {
    fn from(seq: BitSequence) -> Self {
        seq.to_u8_vec()
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

/// Character set used to turn text into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1: one byte per character, U+0000..=U+00FF
    Latin1,
    /// 7-bit US-ASCII
    Ascii,
}

impl Charset {
    /// Number of bytes `text` occupies in this charset.
    ///
    /// Assumes `text` is representable, as any text decoded in this charset is.
    pub fn encoded_len(&self, text: &str) -> usize {
        match self {
            Charset::Utf8 => text.len(),
            Charset::Latin1 | Charset::Ascii => text.chars().count(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "ASCII",
        };
        f.write_str(name)
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Charset::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Charset::Latin1),
            "ascii" | "us-ascii" => Ok(Charset::Ascii),
            other => Err(Error::Config(format!("unknown charset: {}", other))),
        }
    }
}

/// How to treat input that does not form whole, valid bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Reject partial bytes and invalid text
    #[default]
    Strict,
    /// Drop partial trailing bytes and invalid byte sequences
    Permissive,
}

impl FromStr for DecodeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(DecodeMode::Strict),
            "permissive" => Ok(DecodeMode::Permissive),
            other => Err(Error::Config(format!("unknown decode mode: {}", other))),
        }
    }
}

/// Encode text into bits, MSB-first per byte.
///
/// # Errors
/// Returns `BitCodecError::Unencodable` if a character has no representation
/// in `charset`. UTF-8 encoding never fails.
pub fn encode(text: &str, charset: Charset) -> Result<BitSequence> {
    let bytes = text_to_bytes(text, charset)?;
    Ok(bytes_to_bits(&bytes))
}

/// Decode bits back into text.
///
/// # Errors
/// In `Strict` mode:
/// - `BitCodecError::InvalidLength` if the bit count is not a multiple of 8
/// - `BitCodecError::InvalidText` if the bytes are not valid in `charset`
///
/// `Permissive` mode never fails.
pub fn decode(bits: &BitSequence, charset: Charset, mode: DecodeMode) -> Result<String> {
    if mode == DecodeMode::Strict && bits.len() % 8 != 0 {
        return Err(BitCodecError::InvalidLength { len: bits.len() }.into());
    }

    let bytes = bits_to_bytes(bits.as_slice());
    bytes_to_text(&bytes, charset, mode)
}

/// Expand bytes into bits, MSB first.
pub fn bytes_to_bits(bytes: &[u8]) -> BitSequence {
    let mut seq = BitSequence::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            seq.push(Bit::from_bool((byte >> shift) & 1 == 1));
        }
    }
    seq
}

/// Pack bits into bytes, MSB first.
///
/// Only complete groups of 8 are packed; a trailing partial group is ignored.
pub fn bits_to_bytes(bits: &[Bit]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|group| {
            group
                .iter()
                .fold(0u8, |byte, bit| (byte << 1) | bit.as_u8())
        })
        .collect()
}

fn text_to_bytes(text: &str, charset: Charset) -> Result<Vec<u8>> {
    match charset {
        Charset::Utf8 => Ok(text.as_bytes().to_vec()),
        Charset::Latin1 => text
            .chars()
            .map(|ch| {
                u8::try_from(u32::from(ch))
                    .map_err(|_| Error::from(BitCodecError::Unencodable { ch, charset }))
            })
            .collect(),
        Charset::Ascii => text
            .chars()
            .map(|ch| {
                if ch.is_ascii() {
                    Ok(ch as u8)
                } else {
                    Err(Error::from(BitCodecError::Unencodable { ch, charset }))
                }
            })
            .collect(),
    }
}

fn bytes_to_text(bytes: &[u8], charset: Charset, mode: DecodeMode) -> Result<String> {
    match (charset, mode) {
        (Charset::Utf8, DecodeMode::Strict) => String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::from(BitCodecError::InvalidText {
                charset,
                reason: e.utf8_error().to_string(),
            })
        }),
        (Charset::Utf8, DecodeMode::Permissive) => Ok(utf8_skip_invalid(bytes)),
        // Every byte is a valid Latin-1 character
        (Charset::Latin1, _) => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        (Charset::Ascii, DecodeMode::Strict) => {
            if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(BitCodecError::InvalidText {
                    charset,
                    reason: format!(
                        "byte {:#04x} at index {} is outside 7-bit range",
                        bytes[position], position
                    ),
                }
                .into());
            }
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        (Charset::Ascii, DecodeMode::Permissive) => Ok(bytes
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| char::from(b))
            .collect()),
    }
}

/// Decode UTF-8, skipping every invalid or truncated byte sequence.
fn utf8_skip_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                // The prefix up to valid_up_to() is well-formed
                out.push_str(&String::from_utf8_lossy(valid));

                // error_len() is None for a sequence cut off at the end of input
                let skip = err.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_from_str(s: &str) -> BitSequence {
        s.chars()
            .map(|c| Bit::from_bool(c == '1'))
            .collect()
    }

    #[test]
    fn test_encode_hi() {
        let bits = encode("Hi", Charset::Utf8).unwrap();
        assert_eq!(
            bits.to_u8_vec(),
            vec![0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1]
        );
    }

    #[test]
    fn test_msb_first() {
        let bits = bytes_to_bits(&[0b1000_0001, 0x41]);
        assert_eq!(bits.to_string(), "1000000101000001");
        assert_eq!(bits_to_bytes(bits.as_slice()), vec![0b1000_0001, 0x41]);
    }

    #[test]
    fn test_utf8_multibyte_round_trip() {
        let text = "Olá Gustavo! ✓";
        let bits = encode(text, Charset::Utf8).unwrap();
        assert_eq!(bits.len(), text.len() * 8);
        assert_eq!(decode(&bits, Charset::Utf8, DecodeMode::Strict).unwrap(), text);
    }

    #[test]
    fn test_empty_text() {
        let bits = encode("", Charset::Utf8).unwrap();
        assert!(bits.is_empty());
        assert_eq!(decode(&bits, Charset::Utf8, DecodeMode::Strict).unwrap(), "");
    }

    #[test]
    fn test_strict_rejects_partial_byte() {
        let bits = bits_from_str("0100100001");
        let result = decode(&bits, Charset::Utf8, DecodeMode::Strict);
        assert!(matches!(
            result,
            Err(Error::BitCodec(BitCodecError::InvalidLength { len: 10 }))
        ));
    }

    #[test]
    fn test_permissive_drops_partial_byte() {
        let bits = bits_from_str("0100100001");
        let text = decode(&bits, Charset::Utf8, DecodeMode::Permissive).unwrap();
        assert_eq!(text, "H");
    }

    #[test]
    fn test_strict_rejects_invalid_utf8() {
        // 0xC3 alone is a truncated two-byte sequence
        let bits = bytes_to_bits(&[0x48, 0xC3]);
        let result = decode(&bits, Charset::Utf8, DecodeMode::Strict);
        assert!(matches!(
            result,
            Err(Error::BitCodec(BitCodecError::InvalidText { .. }))
        ));
    }

    #[test]
    fn test_permissive_skips_invalid_utf8() {
        let bits = bytes_to_bits(&[0x48, 0xFF, 0x69, 0xC3]);
        let text = decode(&bits, Charset::Utf8, DecodeMode::Permissive).unwrap();
        assert_eq!(text, "Hi");
    }

    #[test]
    fn test_permissive_keeps_replacement_char_in_input() {
        let text = "a\u{FFFD}b";
        let bits = encode(text, Charset::Utf8).unwrap();
        assert_eq!(decode(&bits, Charset::Utf8, DecodeMode::Permissive).unwrap(), text);
    }

    #[test]
    fn test_latin1() {
        let bits = encode("Olá", Charset::Latin1).unwrap();
        assert_eq!(bits.len(), 24);
        assert_eq!(bits_to_bytes(bits.as_slice()), vec![b'O', b'l', 0xE1]);
        assert_eq!(decode(&bits, Charset::Latin1, DecodeMode::Strict).unwrap(), "Olá");

        let result = encode("✓", Charset::Latin1);
        assert!(matches!(
            result,
            Err(Error::BitCodec(BitCodecError::Unencodable { ch: '✓', .. }))
        ));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Charset::Utf8.encoded_len("Olá"), 4);
        assert_eq!(Charset::Latin1.encoded_len("Olá"), 3);
        assert_eq!(Charset::Ascii.encoded_len("ok"), 2);
    }

    #[test]
    fn test_ascii() {
        assert!(encode("á", Charset::Ascii).is_err());

        let bits = bytes_to_bits(&[b'o', 0xE1, b'k']);
        assert!(decode(&bits, Charset::Ascii, DecodeMode::Strict).is_err());
        assert_eq!(
            decode(&bits, Charset::Ascii, DecodeMode::Permissive).unwrap(),
            "ok"
        );
    }

    #[test]
    fn test_bit_values_from_integers() {
        let seq = BitSequence::try_from(vec![1, 0, 1]).unwrap();
        assert_eq!(seq.to_string(), "101");

        let err = BitSequence::try_from(vec![0, 1, 2]).unwrap_err();
        assert_eq!(err, InvalidBitValue { value: 2, position: 2 });
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("UTF-8".parse::<Charset>().unwrap(), Charset::Utf8);
        assert_eq!("latin1".parse::<Charset>().unwrap(), Charset::Latin1);
        assert!("ebcdic".parse::<Charset>().is_err());
        assert_eq!("permissive".parse::<DecodeMode>().unwrap(), DecodeMode::Permissive);
    }
}
