//! Configuration for the linecode-sim application.
//!
//! Handles parsing command-line arguments and resolving defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then runs the fixed
//! demonstration over a perfect channel. The seed is always resolved, and
//! printed whenever the channel is noisy so the run can be reproduced.

use crate::input_gen;
use anyhow::Result;
use clap::Parser;
use linecode_sim_core::bits::{Charset, DecodeMode};
use linecode_sim_core::channel::ChannelConfig;
use linecode_sim_core::line::LineCoding;
use linecode_sim_core::PipelineOptions;
use std::path::PathBuf;

/// Text used when neither --text nor --random-text is given
pub const DEMO_TEXT: &str = "Olá Gustavo!";

/// Output file used when --out is not given
pub const DEMO_OUTPUT: &str = "saida_raw.json";

/// linecode-sim: text -> bits -> RAW source coding -> Manchester line coding, and back
#[derive(Parser, Debug)]
#[command(name = "linecode-sim")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Text to transmit (default: the demonstration sentence)
    #[arg(long, conflicts_with = "random_text")]
    pub text: Option<String>,

    /// Transmit N characters of seeded random text instead
    #[arg(long, value_name = "N")]
    pub random_text: Option<usize>,

    /// Where to save the source-coded payload
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Character set: utf8, latin1 or ascii
    #[arg(long, default_value = "utf8")]
    pub charset: Charset,

    /// Line coding: manchester or none
    #[arg(long, default_value = "manchester")]
    pub line: LineCoding,

    /// Decode mode: strict or permissive
    #[arg(long, default_value = "strict")]
    pub mode: DecodeMode,

    /// Per-chip flip probability on the simulated wire, 0.0-1.0
    #[arg(long, default_value_t = 0.0)]
    pub flip_rate: f64,

    /// Chips lost from the end of the transmission
    #[arg(long, default_value_t = 0)]
    pub truncate: usize,

    /// Random seed for determinism (default: time-based)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,

    /// Log level filter (overrides RUST_LOG), e.g. debug
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input / Output ===
    /// Text to transmit
    pub text: String,

    /// Payload output path
    pub output_file: PathBuf,

    // === Pipeline ===
    pub options: PipelineOptions,

    // === Channel ===
    pub channel: ChannelConfig,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// If --seed is not provided, a time-based seed is used.
    pub fn from_args(args: Args) -> Result<Self> {
        let seed = args.seed.unwrap_or_else(time_seed);

        let text = match (args.text, args.random_text) {
            (Some(text), _) => text,
            (None, Some(len)) => input_gen::generate_sample_text(seed, len, args.charset),
            (None, None) => DEMO_TEXT.to_string(),
        };

        let channel = ChannelConfig {
            flip_rate: args.flip_rate,
            truncate_chips: args.truncate,
            seed,
        };
        channel.validate()?;

        Ok(Config {
            text,
            output_file: args.out.unwrap_or_else(|| PathBuf::from(DEMO_OUTPUT)),
            options: PipelineOptions {
                charset: args.charset,
                line_coding: args.line,
                mode: args.mode,
            },
            channel,
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
        })
    }

    /// Line announcing the seed of a noisy run, with the flag that repeats it.
    ///
    /// `None` for a perfect channel, where the seed changes nothing.
    pub fn seed_notice(&self) -> Option<String> {
        if self.channel.is_perfect() {
            return None;
        }
        Some(format!(
            "Seed: {} (rerun with --seed {} to reproduce)",
            self.channel.seed, self.channel.seed
        ))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Text: {:?}", self.text);
        println!("Output file: {}", self.output_file.display());
        println!();
        println!("=== Pipeline ===");
        println!("Charset: {}", self.options.charset);
        println!("Line coding: {:?}", self.options.line_coding);
        println!("Decode mode: {:?}", self.options.mode);
        println!();
        println!("=== Channel Simulation ===");
        println!("Seed: {}", self.channel.seed);
        println!("Flip rate: {:.4}%", self.channel.flip_rate * 100.0);
        println!("Truncated chips: {}", self.channel.truncate_chips);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
