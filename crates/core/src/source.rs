//! Source coding: wrapping a bit sequence in a method-tagged payload.
//!
//! Only the identity coder (`raw`) exists. New coders implement
//! [`SourceCoder`] and get a [`Method`] variant; [`coder_for`] is the single
//! place that maps a tag to its implementation.

use crate::bits::BitSequence;
use crate::error::{Result, SourceCodingError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Identifies the source coding applied to a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Bits are carried unchanged
    #[default]
    Raw,
}

impl Method {
    /// Wire tag of this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Raw => "raw",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SourceCodingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Method::Raw),
            other => Err(SourceCodingError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

/// A bit sequence tagged with the source coding method that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub method: Method,
    pub data: BitSequence,
}

impl EncodedPayload {
    pub fn new(method: Method, data: BitSequence) -> Self {
        Self { method, data }
    }
}

/// A reversible transformation of a bit sequence.
pub trait SourceCoder {
    /// Tag written alongside the coded data.
    fn method(&self) -> Method;

    fn encode(&self, bits: &BitSequence) -> BitSequence;

    fn decode(&self, data: &BitSequence) -> Result<BitSequence>;
}

/// Identity coder: no compression, no transformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCoder;

impl SourceCoder for RawCoder {
    fn method(&self) -> Method {
        Method::Raw
    }

    fn encode(&self, bits: &BitSequence) -> BitSequence {
        bits.clone()
    }

    fn decode(&self, data: &BitSequence) -> Result<BitSequence> {
        Ok(data.clone())
    }
}

/// Look up the coder implementing `method`.
pub fn coder_for(method: Method) -> &'static dyn SourceCoder {
    match method {
        Method::Raw => &RawCoder,
    }
}

/// Encode bits with the default (raw) method.
pub fn encode_source(bits: &BitSequence) -> EncodedPayload {
    encode_with(Method::Raw, bits)
}

/// Encode bits with a specific method.
pub fn encode_with(method: Method, bits: &BitSequence) -> EncodedPayload {
    let coder = coder_for(method);
    EncodedPayload::new(coder.method(), coder.encode(bits))
}

/// Decode a payload back into the bits it carries.
pub fn decode_source(payload: &EncodedPayload) -> Result<BitSequence> {
    coder_for(payload.method).decode(&payload.data)
}

/// Decode a payload whose method tag has not been validated yet.
///
/// # Errors
/// Returns `SourceCodingError::UnsupportedMethod` if `method` is not a known tag.
pub fn decode_tagged(method: &str, data: &BitSequence) -> Result<BitSequence> {
    let method: Method = method.parse()?;
    coder_for(method).decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{self, Charset};
    use crate::error::Error;

    #[test]
    fn test_raw_round_trip() {
        let bits = bits::encode("Olá Mundo! Teste 123", Charset::Utf8).unwrap();
        let payload = encode_source(&bits);

        assert_eq!(payload.method, Method::Raw);
        assert_eq!(payload.data, bits);
        assert_eq!(decode_source(&payload).unwrap(), bits);
    }

    #[test]
    fn test_raw_is_identity_for_any_length() {
        // Source coding does not care about byte alignment
        let bits = BitSequence::try_from(vec![1, 0, 1]).unwrap();
        assert_eq!(decode_source(&encode_source(&bits)).unwrap(), bits);

        let empty = BitSequence::new();
        assert_eq!(decode_source(&encode_source(&empty)).unwrap(), empty);
    }

    #[test]
    fn test_rejects_foreign_tag() {
        let bits = BitSequence::try_from(vec![0, 1]).unwrap();
        let result = decode_tagged("huffman", &bits);

        match result {
            Err(Error::SourceCoding(SourceCodingError::UnsupportedMethod { method })) => {
                assert_eq!(method, "huffman");
            }
            other => panic!("expected UnsupportedMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_is_case_sensitive() {
        assert!("RAW".parse::<Method>().is_err());
        assert_eq!("raw".parse::<Method>().unwrap(), Method::Raw);
        assert_eq!(Method::Raw.to_string(), "raw");
    }

    #[test]
    fn test_decode_tagged_raw() {
        let bits = BitSequence::try_from(vec![1, 1, 0]).unwrap();
        assert_eq!(decode_tagged("raw", &bits).unwrap(), bits);
    }
}
