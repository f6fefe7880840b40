//! Manchester line coding.
//!
//! Each logical bit becomes a pair of chips carrying a mid-bit transition:
//!
//! ```text
//! bit 1  ->  chips 1 0   (high-low)
//! bit 0  ->  chips 0 1   (low-high)
//! ```
//!
//! Decoding reads chips in pairs. A pair without a transition (`00`, `11`)
//! or a trailing lone chip cannot have been produced by the encoder, so it
//! decodes to [`LineSymbol::Invalid`]. Decoding never fails: corruption is
//! reported inline so the caller can decide what to do with it.
//!
//! # Example
//! ```
//! use linecode_sim_core::line::{self, LineSymbol, ManchesterSequence};
//!
//! let chips: ManchesterSequence = "100111".parse().unwrap();
//! assert_eq!(
//!     line::decode(&chips),
//!     vec![LineSymbol::One, LineSymbol::Zero, LineSymbol::Invalid]
//! );
//! ```

use crate::bits::{Bit, BitSequence};
use crate::error::{Error, LineCodingError, Result};
use std::fmt;
use std::str::FromStr;

/// Result of decoding one chip pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSymbol {
    Zero,
    One,
    /// Pair without a mid-bit transition, or an incomplete trailing pair
    Invalid,
}

impl LineSymbol {
    /// The carried bit, or `None` for an invalid symbol.
    pub fn bit(self) -> Option<Bit> {
        match self {
            LineSymbol::Zero => Some(Bit::Zero),
            LineSymbol::One => Some(Bit::One),
            LineSymbol::Invalid => None,
        }
    }

    pub fn is_invalid(self) -> bool {
        self == LineSymbol::Invalid
    }
}

impl From<Bit> for LineSymbol {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => LineSymbol::Zero,
            Bit::One => LineSymbol::One,
        }
    }
}

impl fmt::Display for LineSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            LineSymbol::Zero => '0',
            LineSymbol::One => '1',
            LineSymbol::Invalid => '?',
        };
        write!(f, "{}", c)
    }
}

/// Which line code, if any, sits between the source coder and the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCoding {
    /// Bits go on the wire unchanged, one chip per bit
    None,
    #[default]
    Manchester,
}

impl FromStr for LineCoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "nrz" => Ok(LineCoding::None),
            "manchester" => Ok(LineCoding::Manchester),
            other => Err(Error::Config(format!("unknown line coding: {}", other))),
        }
    }
}

/// Chips on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ManchesterSequence {
    chips: Vec<Bit>,
}

impl ManchesterSequence {
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn as_slice(&self) -> &[Bit] {
        &self.chips
    }

    pub fn into_chips(self) -> Vec<Bit> {
        self.chips
    }
}

impl From<Vec<Bit>> for ManchesterSequence {
    fn from(chips: Vec<Bit>) -> Self {
        Self { chips }
    }
}

impl fmt::Display for ManchesterSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chip in &self.chips {
            write!(f, "{}", chip)?;
        }
        Ok(())
    }
}

impl FromStr for ManchesterSequence {
    type Err = Error;

    /// Parse a string of '0'/'1' characters.
    fn from_str(s: &str) -> Result<Self> {
        let chips = s
            .chars()
            .enumerate()
            .map(|(position, ch)| match ch {
                '0' => Ok(Bit::Zero),
                '1' => Ok(Bit::One),
                _ => Err(Error::from(LineCodingError::InvalidChip { ch, position })),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { chips })
    }
}

/// Manchester-encode a bit sequence. Output has twice as many chips as input bits.
pub fn encode(bits: &BitSequence) -> ManchesterSequence {
    let mut chips = Vec::with_capacity(bits.len() * 2);
    for bit in bits {
        match bit {
            Bit::One => chips.extend_from_slice(&[Bit::One, Bit::Zero]),
            Bit::Zero => chips.extend_from_slice(&[Bit::Zero, Bit::One]),
        }
    }
    ManchesterSequence { chips }
}

/// Decode chips two at a time.
///
/// Returns one symbol per pair, plus one `Invalid` for a trailing lone chip.
pub fn decode(chips: &ManchesterSequence) -> Vec<LineSymbol> {
    chips
        .chips
        .chunks(2)
        .map(|pair| match pair {
            [Bit::One, Bit::Zero] => LineSymbol::One,
            [Bit::Zero, Bit::One] => LineSymbol::Zero,
            _ => LineSymbol::Invalid,
        })
        .collect()
}

/// Render decoded symbols as `0`/`1`/`?`.
pub fn symbols_to_string(symbols: &[LineSymbol]) -> String {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// Put bits on the wire using `coding`.
pub fn encode_with(coding: LineCoding, bits: &BitSequence) -> ManchesterSequence {
    match coding {
        LineCoding::None => ManchesterSequence::from(bits.as_slice().to_vec()),
        LineCoding::Manchester => encode(bits),
    }
}

/// Read symbols off the wire using `coding`.
///
/// Without a line code every chip is taken at face value and nothing can be
/// flagged as invalid.
pub fn decode_with(coding: LineCoding, chips: &ManchesterSequence) -> Vec<LineSymbol> {
    match coding {
        LineCoding::None => chips.chips.iter().map(|&c| LineSymbol::from(c)).collect(),
        LineCoding::Manchester => decode(chips),
    }
}
