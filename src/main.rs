use anyhow::{Context, Result};
use bpcs_extract::{extract_to, DirSink};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Recover a file hidden in an image with BPCS steganography", long_about = None)]
struct Cli {
    /// The stego image to extract from
    image: PathBuf,

    /// Directory the recovered file is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Print a JSON report instead of the confirmation line
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let sink = DirSink::new(&cli.output_dir);
    let report = extract_to(&cli.image, &sink)
        .with_context(|| format!("Failed to extract from '{}'", cli.image.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Extracted {} bytes to {}", report.bytes, report.path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    // Argument errors exit here with clap's usage message and status 2.
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
