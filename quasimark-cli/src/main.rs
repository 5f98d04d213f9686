use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use quasimark_core::bits::{bits_to_text, bytes_to_bits, format_bits, parse_hex, text_to_bits};
use quasimark_core::segment::min_buffer_len;
use quasimark_core::{MarkConfig, Mode};

#[derive(Parser)]
#[command(name = "quasimark", about = "LSB audio watermarking tool", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a watermark into a 16-bit PCM WAV file
    Embed {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Watermark text
        #[arg(short, long)]
        watermark: String,

        /// Treat the watermark as a hex byte string (e.g. DE-AD-BE-EF)
        #[arg(long)]
        hex: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Extract a watermark from a 16-bit PCM WAV file
    Extract {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Write the buffer with decoded bits XORed back out to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Embed and extract in memory and report how much survived
    Verify {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Watermark text
        #[arg(short, long)]
        watermark: String,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Segmentation mode
    #[arg(short, long, value_enum, default_value = "direct")]
    mode: ModeArg,

    /// Bytes skipped at the start of the file
    #[arg(long, default_value = "44")]
    header_size: usize,

    /// Sample positions per region / raw segment
    #[arg(long, default_value = "512")]
    chunk_length: usize,

    /// Quasi-stationary split threshold
    #[arg(long, default_value = "3500.0")]
    epsilon: f64,
}

impl EngineArgs {
    fn config(&self) -> MarkConfig {
        MarkConfig {
            header_size: self.header_size,
            chunk_length: self.chunk_length,
            quasi_epsilon: self.epsilon,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Direct,
    Quasi,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Direct => Mode::Direct,
            ModeArg::Quasi => Mode::Quasi,
        }
    }
}

/// Read a WAV file as raw bytes, warning when it is not 16-bit integer PCM
/// or too short to hold a single region in `mode`.
fn read_pcm(
    path: &Path,
    mode: Mode,
    config: &MarkConfig,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let spec = hound::WavReader::open(path)?.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        eprintln!(
            "Warning: {} is {}-bit {:?}, expected 16-bit integer PCM.",
            path.display(),
            spec.bits_per_sample,
            spec.sample_format
        );
    }
    let bytes = std::fs::read(path)?;
    log::debug!(
        "{}: {} bytes, {} channels, {}Hz",
        path.display(),
        bytes.len(),
        spec.channels,
        spec.sample_rate
    );

    let min_len = min_buffer_len(mode, config);
    if bytes.len() < min_len {
        eprintln!(
            "Warning: input is too short to hold a single region ({} bytes, need {}).",
            bytes.len(),
            min_len
        );
    }
    Ok(bytes)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Embed {
            input,
            output,
            watermark,
            hex,
            engine,
        } => {
            let config = engine.config();
            let bits = if hex {
                bytes_to_bits(&parse_hex(&watermark)?)
            } else {
                text_to_bits(&watermark)
            };
            let bytes = read_pcm(&input, engine.mode.into(), &config)?;

            eprintln!(
                "Embedding watermark into {} ({} bytes, {:?} mode)...",
                input.display(),
                bytes.len(),
                engine.mode
            );

            let outcome = quasimark_core::embed_bits(&bytes, engine.mode.into(), &bits, &config)?;
            if outcome.regions.len() < outcome.original_bits.len() {
                eprintln!(
                    "Warning: only {} regions for a {}-bit watermark; it will be truncated.",
                    outcome.regions.len(),
                    outcome.original_bits.len()
                );
            }
            std::fs::write(&output, &outcome.buffer)?;

            eprintln!("Watermarked audio written to {}", output.display());
            println!("Bits:    {}", format_bits(&outcome.original_bits));
            println!("Regions: {}", outcome.regions.len());
        }
        Command::Extract {
            input,
            output,
            engine,
        } => {
            let config = engine.config();
            let bytes = read_pcm(&input, engine.mode.into(), &config)?;

            eprintln!(
                "Extracting watermark from {} ({} bytes, {:?} mode)...",
                input.display(),
                bytes.len(),
                engine.mode
            );

            let outcome = quasimark_core::extract(&bytes, engine.mode.into(), &config)?;
            if outcome.bits.is_empty() {
                eprintln!("No regions found.");
                std::process::exit(1);
            }
            if let Some(output) = output {
                std::fs::write(&output, &outcome.buffer)?;
                eprintln!("Restored audio written to {}", output.display());
            }

            println!("Bits: {}", format_bits(&outcome.bits));
            println!("Text: {}", bits_to_text(&outcome.bits));
        }
        Command::Verify {
            input,
            watermark,
            engine,
        } => {
            let config = engine.config();
            let bytes = read_pcm(&input, engine.mode.into(), &config)?;
            let report =
                quasimark_core::round_trip(&bytes, engine.mode.into(), &watermark, &config)?;
            println!("{report}");
        }
    }

    Ok(())
}
