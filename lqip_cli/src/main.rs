use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lqip::{
    ImageCrateSampler, ParallelPipeline, PlaceholderCode, PlaceholderOptions, PlaceholderPipeline,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "lqip")]
#[command(about = "Low-quality image placeholder codes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a placeholder code for each image
    Encode(EncodeArgs),

    /// Split a placeholder code into its quantized fields
    Inspect(InspectArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Image files to encode
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Sample the full-resolution image instead of a downscaled copy
    #[arg(long)]
    no_fast: bool,

    /// Edge of the box images are shrunk into in fast mode
    #[arg(long = "box", default_value_t = lqip::pipeline::DEFAULT_FAST_BOUNDING_BOX)]
    bounding_box: u32,

    /// Images sampled at the same time (defaults to the number of CPUs)
    #[arg(long)]
    concurrency: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

#[derive(Args)]
struct InspectArgs {
    #[arg(allow_negative_numbers = true)]
    code: PlaceholderCode,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // --- 1. Logging ---
    // stdout carries the codes, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Encode(args) => encode(args).await,
        Commands::Inspect(args) => {
            print!("{}", output::render_fields(&args.code, args.format)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn encode(args: EncodeArgs) -> anyhow::Result<ExitCode> {
    // --- 2. Pipeline Initialization ---
    let options = PlaceholderOptions {
        fast: !args.no_fast,
        fast_bounding_box: args.bounding_box,
    };
    debug!(?options, images = args.paths.len(), "encoding");
    let pipeline = PlaceholderPipeline::new(ImageCrateSampler).with_options(options);
    let mut batch = ParallelPipeline::new(pipeline);
    if let Some(concurrency) = args.concurrency {
        batch = batch.with_concurrency(concurrency);
    }

    // --- 3. Processing ---
    let items = batch.process_all(args.paths).await;

    // --- 4. Reporting ---
    print!("{}", output::render_batch(&items, args.format)?);
    let mut failed = false;
    for item in &items {
        if let Err(error) = &item.result {
            eprintln!("{}: {error}", item.source);
            failed = true;
        }
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
