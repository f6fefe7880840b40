//! End-to-end composition of the codec stages.
//!
//! ```text
//! text -> bits::encode -> source::encode_source -> line::encode -> chips
//! chips -> line::decode -> recover_bits -> source::decode_source -> bits::decode -> text
//! ```
//!
//! The line decoder reports corrupted pairs as [`LineSymbol::Invalid`].
//! [`Pipeline::recover_bits`] decides what happens to them: `Strict` mode
//! refuses to reconstruct text from a damaged stream, `Permissive` mode
//! drops every byte that contains a damaged symbol and keeps the rest.
//!
//! No framing travels with the chips, so the receiver assumes the `raw`
//! source method.

use crate::bits::{self, BitSequence, Charset, DecodeMode};
use crate::error::{BitCodecError, Result};
use crate::line::{self, LineCoding, LineSymbol, ManchesterSequence};
use crate::source::{self, EncodedPayload, Method};

/// Options shared by both directions of a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub charset: Charset,
    pub line_coding: LineCoding,
    pub mode: DecodeMode,
}

/// Everything the encoder side produced.
#[derive(Debug, Clone)]
pub struct Transmission {
    /// Output of the bit codec
    pub source_bits: BitSequence,

    /// Source-coded payload (what gets persisted)
    pub payload: EncodedPayload,

    /// Line-coded chips (what goes on the wire)
    pub chips: ManchesterSequence,
}

/// Everything the decoder side recovered.
#[derive(Debug, Clone)]
pub struct Reception {
    /// Line decoder output, including invalid symbols
    pub symbols: Vec<LineSymbol>,

    /// Bits kept after invalid symbols were handled
    pub bits: BitSequence,

    /// Reconstructed text
    pub text: String,

    /// Number of invalid symbols seen
    pub invalid_symbols: usize,

    /// Bytes discarded because they contained an invalid symbol
    pub dropped_bytes: usize,
}

impl Reception {
    pub fn is_clean(&self) -> bool {
        self.invalid_symbols == 0
    }
}

/// A configured text <-> chips pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the encoder side: text to payload and chips.
    pub fn encode(&self, text: &str) -> Result<Transmission> {
        let source_bits = bits::encode(text, self.options.charset)?;
        let payload = source::encode_source(&source_bits);
        let chips = line::encode_with(self.options.line_coding, &payload.data);

        log::debug!(
            "encoded {} chars -> {} bits -> {} chips ({:?})",
            text.chars().count(),
            source_bits.len(),
            chips.len(),
            self.options.line_coding
        );

        Ok(Transmission {
            source_bits,
            payload,
            chips,
        })
    }

    /// Run the decoder side on received chips.
    ///
    /// # Errors
    /// In `Strict` mode, `BitCodecError::InvalidSymbol` if any symbol is
    /// invalid, plus any error from [`Pipeline::decode_payload`].
    pub fn decode_chips(&self, chips: &ManchesterSequence) -> Result<Reception> {
        let symbols = line::decode_with(self.options.line_coding, chips);
        let invalid_symbols = symbols.iter().filter(|s| s.is_invalid()).count();

        if invalid_symbols > 0 {
            log::warn!(
                "line decoder flagged {} of {} symbols as invalid",
                invalid_symbols,
                symbols.len()
            );
        }

        let (bits, dropped_bytes) = self.recover_bits(&symbols)?;
        let payload = EncodedPayload::new(Method::Raw, bits);
        let text = self.decode_payload(&payload)?;

        Ok(Reception {
            symbols,
            bits: payload.data,
            text,
            invalid_symbols,
            dropped_bytes,
        })
    }

    /// Decode a source-coded payload (e.g. one loaded from disk) to text.
    pub fn decode_payload(&self, payload: &EncodedPayload) -> Result<String> {
        let bits = source::decode_source(payload)?;
        bits::decode(&bits, self.options.charset, self.options.mode)
    }

    /// Turn line symbols back into bits.
    ///
    /// Returns the bits and the number of whole bytes dropped.
    ///
    /// # Errors
    /// In `Strict` mode, `BitCodecError::InvalidSymbol` at the first invalid symbol.
    pub fn recover_bits(&self, symbols: &[LineSymbol]) -> Result<(BitSequence, usize)> {
        match self.options.mode {
            DecodeMode::Strict => {
                let bits = symbols
                    .iter()
                    .enumerate()
                    .map(|(position, s)| {
                        s.bit()
                            .ok_or(BitCodecError::InvalidSymbol { position })
                    })
                    .collect::<std::result::Result<BitSequence, _>>()?;
                Ok((bits, 0))
            }
            DecodeMode::Permissive => {
                let mut bits = BitSequence::with_capacity(symbols.len());
                let mut dropped = 0;

                for group in symbols.chunks(8) {
                    if group.iter().any(|s| s.is_invalid()) {
                        // A partial trailing group is discarded by the bit codec anyway
                        if group.len() == 8 {
                            dropped += 1;
                        }
                        continue;
                    }
                    for bit in group.iter().filter_map(|s| s.bit()) {
                        bits.push(bit);
                    }
                }

                if dropped > 0 {
                    log::warn!("dropped {} damaged bytes", dropped);
                }
                Ok((bits, dropped))
            }
        }
    }
}
