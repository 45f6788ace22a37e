//! Frame inspector binary.
//!
//! Decodes hex-encoded control-plane frames into JSON or text, and emits
//! sample frames of every type for use as decode input.

use anyhow::Context;
use broker_common::{Id, Tags, WellKnownKey};
use broker_frames::{
    Address, BrokerInfo, Frame, FrameFlags, RouteJoin, RouteRemove, RouteSetup,
};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::{InspectConfig, OutputFormat};
use logging::InspectLogFormatter;

/// Routing broker frame inspector
#[derive(Parser, Debug)]
#[command(name = "frame-inspect", version, about = "Decode and generate routing broker frames")]
struct Args {
    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Disable ANSI colours in log output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode hex-encoded frames, one per line
    Decode {
        /// Input file (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print one hex-encoded sample frame of each type
    Sample {
        /// Header flags for the sample frames (low 10 bits)
        #[arg(long, default_value_t = 0)]
        flags: u16,
    },
}

/// Outcome of a decode run
#[derive(Debug, Default, PartialEq, Eq)]
struct DecodeSummary {
    decoded: usize,
    failed: usize,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("frame_inspect={}", args.log_level).parse()?)
        .add_directive(format!("broker_frames={}", args.log_level).parse()?)
        .add_directive(format!("routing_broker={}", args.log_level).parse()?);

    let formatter = if args.no_color {
        InspectLogFormatter::plain("frame-inspect")
    } else {
        InspectLogFormatter::new("frame-inspect")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .event_format(formatter)
        .init();

    info!("Starting frame inspector v{}", env!("CARGO_PKG_VERSION"));

    let config = InspectConfig::load(args.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Decode { input } => {
            let summary = match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("failed to open input {:?}", path))?;
                    decode_lines(BufReader::new(file), &mut out, &config)?
                }
                None => decode_lines(io::stdin().lock(), &mut out, &config)?,
            };

            crate::component_info!(
                "decode",
                "Decoded {} frame(s), {} failure(s)",
                summary.decoded,
                summary.failed
            );

            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Sample { flags } => {
            let flags = FrameFlags::from_raw(flags);
            for frame in sample_frames(flags) {
                crate::component_debug!("sample", "Generated {} sample", frame.frame_type());
                writeln!(out, "{}", hex::encode(frame.encode()))?;
            }
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Decode every frame line from `reader`, writing results to `out`.
///
/// A line that fails to decode is logged and counted; only I/O errors abort
/// the run.
fn decode_lines<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    config: &InspectConfig,
) -> anyhow::Result<DecodeSummary> {
    let mut summary = DecodeSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match decode_line(trimmed, config) {
            Ok(frame) => {
                write_frame(out, &frame, config.output)?;
                summary.decoded += 1;
            }
            Err(e) => {
                crate::component_error!("decode", "Line {}: {:#}", line_no, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn decode_line(hex_frame: &str, config: &InspectConfig) -> anyhow::Result<Frame> {
    let bytes = hex::decode(hex_frame).context("invalid hex")?;
    if bytes.len() > config.max_frame_size {
        anyhow::bail!(
            "frame of {} bytes exceeds max_frame_size {}",
            bytes.len(),
            config.max_frame_size
        );
    }
    Ok(Frame::decode(&bytes)?)
}

fn write_frame<W: Write>(out: &mut W, frame: &Frame, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(frame)?)?,
        OutputFormat::Pretty => writeln!(out, "{}", serde_json::to_string_pretty(frame)?)?,
        OutputFormat::Text => writeln!(out, "{}", frame)?,
    }
    Ok(())
}

/// One frame of each type, sharing a broker id and a route id
fn sample_frames(flags: FrameFlags) -> Vec<Frame> {
    let broker_id = Id::random();
    let route_id = Id::random();
    let timestamp = chrono::Utc::now().timestamp_millis();
    let tags = Tags::builder()
        .with(WellKnownKey::MajorVersion, "1")
        .with(WellKnownKey::MinorVersion, "0")
        .with("mycustomtag", "mycustomtagvalue")
        .build();
    let metadata = Tags::builder()
        .with("mycustommetadata", "mycustommetadatavalue")
        .build();

    vec![
        RouteSetup::new(route_id, "myService", tags.clone(), flags).into(),
        RouteJoin::new(broker_id, route_id, timestamp, "myService", tags.clone(), flags).into(),
        RouteRemove::new(broker_id, route_id, timestamp, flags).into(),
        BrokerInfo::new(broker_id, timestamp, tags.clone(), flags).into(),
        Address::new(route_id, metadata, tags, flags).into(),
    ]
}
