//! Metrics collection and reporting for a pipeline run.
//!
//! This module provides observable insights into system behavior:
//! - Text in/out and the bits/chips each stage produced
//! - Line overhead (chips per source bit)
//! - Channel damage and how much of it the line decoder detected
//! - Timing information
//!
//! # Design
//!
//! Metrics are collected in a simple struct with explicit updates at each
//! pipeline stage. The struct is NOT thread-safe.

use crate::bits::Charset;
use crate::channel::ChannelStats;
use crate::pipeline::{Reception, Transmission};
use std::time::{Duration, Instant};

/// Counters for one or more pipeline runs.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Text ===
    /// Encoded size of the input text in bytes
    pub input_bytes: u64,

    /// Encoded size of the reconstructed text in bytes
    pub output_bytes: u64,

    /// Whether the reconstructed text equals the input
    pub text_matches: Option<bool>,

    // === Encoding ===
    /// Bits produced by the bit codec
    pub source_bits: u64,

    /// Chips produced by the line coder
    pub line_chips: u64,

    // === Channel ===
    /// Chips inverted in transit
    pub chips_flipped: u64,

    /// Chips lost to truncation
    pub chips_truncated: u64,

    // === Decoding ===
    /// Symbols read by the line decoder
    pub symbols_decoded: u64,

    /// Symbols flagged invalid by the line decoder
    pub invalid_symbols: u64,

    /// Bytes discarded because they contained an invalid symbol
    pub bytes_dropped: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            text_matches: None,
            source_bits: 0,
            line_chips: 0,
            chips_flipped: 0,
            chips_truncated: 0,
            symbols_decoded: 0,
            invalid_symbols: 0,
            bytes_dropped: 0,
        }
    }

    /// Record the encoder side of a run.
    pub fn record_transmission(&mut self, tx: &Transmission) {
        self.input_bytes += (tx.source_bits.len() / 8) as u64;
        self.source_bits += tx.source_bits.len() as u64;
        self.line_chips += tx.chips.len() as u64;
    }

    /// Record what the channel did.
    pub fn record_channel(&mut self, stats: &ChannelStats) {
        self.chips_flipped = stats.chips_flipped;
        self.chips_truncated = stats.chips_truncated;
    }

    /// Record the decoder side of a run.
    ///
    /// `charset` is the one the text was decoded with.
    pub fn record_reception(&mut self, rx: &Reception, charset: Charset) {
        self.output_bytes += charset.encoded_len(&rx.text) as u64;
        self.symbols_decoded += rx.symbols.len() as u64;
        self.invalid_symbols += rx.invalid_symbols as u64;
        self.bytes_dropped += rx.dropped_bytes as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Chips per source bit: 2.0 with Manchester, 1.0 without.
    ///
    /// Returns 0.0 if nothing was encoded.
    pub fn line_overhead(&self) -> f64 {
        if self.source_bits == 0 {
            0.0
        } else {
            self.line_chips as f64 / self.source_bits as f64
        }
    }

    /// Fraction of decoded symbols flagged invalid.
    pub fn symbol_error_rate(&self) -> f64 {
        if self.symbols_decoded == 0 {
            0.0
        } else {
            self.invalid_symbols as f64 / self.symbols_decoded as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} µs", self.duration().as_micros());
        println!();

        println!("Input:  {} bytes", self.input_bytes);
        println!("Output: {} bytes", self.output_bytes);
        match self.text_matches {
            Some(true) => println!("Verification: PASSED ✓"),
            Some(false) => println!("Verification: FAILED ✗ (text differs)"),
            None => println!("Verification: not run"),
        }
        println!();

        println!("=== Encoding ===");
        println!("Source bits: {}", self.source_bits);
        println!("Line chips: {}", self.line_chips);
        println!("Line overhead: {:.1}x", self.line_overhead());
        println!();

        println!("=== Channel ===");
        println!("Chips flipped: {}", self.chips_flipped);
        println!("Chips truncated: {}", self.chips_truncated);
        println!();

        println!("=== Decoding ===");
        println!("Symbols decoded: {}", self.symbols_decoded);
        println!(
            "Invalid symbols: {} ({:.2}%)",
            self.invalid_symbols,
            self.symbol_error_rate() * 100.0
        );
        println!("Bytes dropped: {}", self.bytes_dropped);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_us={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             source_bits={}\n\
             line_chips={}\n\
             chips_flipped={}\n\
             chips_truncated={}\n\
             symbols_decoded={}\n\
             invalid_symbols={}\n\
             symbol_error_rate={:.4}\n\
             bytes_dropped={}\n",
            self.duration().as_micros(),
            self.input_bytes,
            self.output_bytes,
            self.source_bits,
            self.line_chips,
            self.chips_flipped,
            self.chips_truncated,
            self.symbols_decoded,
            self.invalid_symbols,
            self.symbol_error_rate(),
            self.bytes_dropped,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{self, DecodeMode};
    use crate::line::{LineCoding, ManchesterSequence};
    use crate::pipeline::{Pipeline, PipelineOptions};

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.text_matches.is_none());
        assert_eq!(metrics.line_overhead(), 0.0);
        assert_eq!(metrics.symbol_error_rate(), 0.0);
    }

    #[test]
    fn test_symbol_error_rate() {
        let mut metrics = Metrics::new();
        metrics.symbols_decoded = 200;
        metrics.invalid_symbols = 5;

        assert_eq!(metrics.symbol_error_rate(), 0.025);
    }

    #[test]
    fn test_records_a_clean_run() {
        let pipeline = Pipeline::new(PipelineOptions::default());
        let tx = pipeline.encode("Hi").unwrap();
        let rx = pipeline.decode_chips(&tx.chips).unwrap();

        let mut metrics = Metrics::new();
        metrics.record_transmission(&tx);
        metrics.record_reception(&rx, Charset::Utf8);
        metrics.complete();

        assert_eq!(metrics.input_bytes, 2);
        assert_eq!(metrics.output_bytes, 2);
        assert_eq!(metrics.source_bits, 16);
        assert_eq!(metrics.line_chips, 32);
        assert_eq!(metrics.line_overhead(), 2.0);
        assert_eq!(metrics.symbols_decoded, 16);
        assert_eq!(metrics.invalid_symbols, 0);
    }

    #[test]
    fn test_output_bytes_exclude_skipped_bytes() {
        let pipeline = Pipeline::new(PipelineOptions {
            line_coding: LineCoding::None,
            mode: DecodeMode::Permissive,
            ..PipelineOptions::default()
        });
        // 'H' followed by a byte that is never valid UTF-8
        let bits = bits::bytes_to_bits(&[0x48, 0xFF]);
        let chips = ManchesterSequence::from(bits.as_slice().to_vec());
        let rx = pipeline.decode_chips(&chips).unwrap();
        assert_eq!(rx.text, "H");

        let mut metrics = Metrics::new();
        metrics.record_reception(&rx, Charset::Utf8);

        assert_eq!(metrics.output_bytes, 1);
        assert_eq!(metrics.symbols_decoded, 16);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.input_bytes = 12;
        metrics.source_bits = 96;
        metrics.invalid_symbols = 3;

        let text = metrics.export_text();
        assert!(text.contains("input_bytes=12"));
        assert!(text.contains("source_bits=96"));
        assert!(text.contains("invalid_symbols=3"));
    }
}
