//! linecode-sim-core: Educational text transmission pipeline with Manchester line coding
//!
//! This library provides the core components for a learning-focused system that:
//! - Converts text to bits, MSB-first per byte
//! - Wraps the bits in a method-tagged source-coded payload (identity coding only)
//! - Manchester-encodes the bits into chips and back, flagging corrupted pairs
//! - Simulates a noisy wire (chip flips, truncation) with seeded randomness
//! - Saves and loads payloads as JSON
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bits`: Text <-> bit sequence conversion
//! - `source`: Source coding and the method tag
//! - `line`: Manchester line coding
//! - `persist`: JSON persistence of encoded payloads
//! - `channel`: Noisy channel simulator with seeded randomness
//! - `pipeline`: End-to-end composition of the stages
//! - `metrics`: Observable system behavior
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Corruption is data**: The line decoder reports damage inline instead of failing
//! - **Deterministic**: Seeded randomness makes runs reproducible

pub mod bits;
pub mod channel;
pub mod error;
pub mod line;
pub mod metrics;
pub mod persist;
pub mod pipeline;
pub mod source;

// Re-export commonly used types
pub use bits::{Bit, BitSequence, Charset, DecodeMode};
pub use error::{Error, Result};
pub use line::{LineCoding, LineSymbol, ManchesterSequence};
pub use pipeline::{Pipeline, PipelineOptions};
pub use source::{EncodedPayload, Method};
