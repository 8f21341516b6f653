//! Command-line front end: manifest file in, `.pptx` out.

use clap::Parser;
use slidecraft::deck::{assemble, load_manifest};
use std::error::Error;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "advanced_generated_presentation.pptx";

#[derive(Parser)]
#[command(name = "slidecraft", version, about = "Generate a PowerPoint deck from a manifest")]
struct Cli {
    /// YAML or JSON request manifest
    manifest: PathBuf,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Rewrite content, auto-generate slides and add improvement tips with OpenAI
    #[arg(long)]
    ai: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    #[allow(unused_mut)]
    let mut request = load_manifest(&cli.manifest)?;

    if cli.ai {
        #[cfg(feature = "openai")]
        {
            let generator = slidecraft::augment::OpenAiGenerator::from_env()?;
            for warning in slidecraft::augment::augment(&mut request, &generator)? {
                eprintln!("warning: {}", warning);
            }
        }
        #[cfg(not(feature = "openai"))]
        return Err("--ai requires slidecraft to be built with the `openai` feature".into());
    }

    let bytes = assemble(&request)?;
    std::fs::write(&cli.output, &bytes)?;
    log::info!("Wrote {} ({} bytes)", cli.output.display(), bytes.len());
    println!("Presentation generated successfully: {}", cli.output.display());
    Ok(())
}
