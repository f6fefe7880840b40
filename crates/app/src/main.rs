//! linecode-sim: demonstration run of the text transmission pipeline.
//!
//! With no arguments: encode the demo sentence to bits, save the RAW payload,
//! Manchester-encode it, pass it over a perfect wire, decode it back and print
//! every intermediate sequence along the way.

mod config;
mod input_gen;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, Config};
use linecode_sim_core::channel::NoisyChannel;
use linecode_sim_core::line::{self, LineCoding};
use linecode_sim_core::metrics::Metrics;
use linecode_sim_core::{persist, Pipeline};

/// Longest chip string printed in full
const CHIP_PREVIEW: usize = 120;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = Config::from_args(args)?;
    if config.print_config {
        config.print();
    }

    run(&config)
}

fn init_logging(level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(level) = level {
        builder.parse_filters(level);
    }

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

fn run(config: &Config) -> Result<()> {
    let mut metrics = Metrics::new();
    let pipeline = Pipeline::new(config.options);

    if let Some(notice) = config.seed_notice() {
        println!("{}", notice);
    }

    println!("\nOriginal text: {}", config.text);

    // 1) Text -> bits -> RAW payload
    let tx = pipeline
        .encode(&config.text)
        .context("failed to encode input text")?;
    metrics.record_transmission(&tx);

    println!("\n[RAW] Source bits:");
    println!("{}", tx.source_bits);

    persist::save(&config.output_file, &tx.payload).with_context(|| {
        format!("failed to save payload to {}", config.output_file.display())
    })?;
    println!("\nPayload saved: {}", config.output_file.display());

    // 2) Line coding
    let label = match config.options.line_coding {
        LineCoding::Manchester => "MANCHESTER",
        LineCoding::None => "NO LINE CODE",
    };
    println!("\n[{}] Encoded:", label);
    println!("{}", preview(&tx.chips.to_string()));

    // 3) Wire
    let mut channel = NoisyChannel::new(config.channel)?;
    let received = channel.transmit(&tx.chips);
    metrics.record_channel(&channel.stats());

    // 4) Line decoding -> bits -> text
    let rx = pipeline
        .decode_chips(&received)
        .context("failed to decode received chips")?;
    metrics.record_reception(&rx, config.options.charset);

    println!("\n[{}] Decoded (bits):", label);
    println!("{}", line::symbols_to_string(&rx.symbols));

    println!("\nReconstructed text: {}", rx.text);

    // 5) The saved payload decodes on its own, without the wire
    let loaded = persist::load(&config.output_file).with_context(|| {
        format!("failed to load payload from {}", config.output_file.display())
    })?;
    let from_file = pipeline
        .decode_payload(&loaded)
        .context("failed to decode saved payload")?;
    println!("Text from {}: {}", config.output_file.display(), from_file);

    metrics.text_matches = Some(rx.text == config.text);
    metrics.complete();

    if config.print_metrics {
        metrics.print_summary();
    }

    if rx.text != config.text {
        log::warn!("reconstructed text differs from the input");
    }

    Ok(())
}

fn preview(chips: &str) -> String {
    if chips.len() <= CHIP_PREVIEW {
        chips.to_string()
    } else {
        format!("{} ...", &chips[..CHIP_PREVIEW])
    }
}
