//! Render a viability report JSON file into printable, branded HTML.

use anyhow::{Context, Result};
use clap::Parser;
use sparkindex::report::render_report_file;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Lay out a business viability report as a multi-page printable document")]
struct Args {
    /// Report JSON produced by the idea evaluator
    input: PathBuf,

    /// Output HTML path (defaults to the input path with an .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("html"));

    let pages = render_report_file(&args.input, &output)
        .with_context(|| format!("Failed to render {}", args.input.display()))?;

    println!("Wrote {} pages to {}", pages, output.display());
    println!("Open it in a browser and print to PDF.");
    Ok(())
}
