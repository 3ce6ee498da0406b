use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use concol::core::config::{Overrides, Settings};
use concol::core::launcher;
use concol::utils::logger;

#[derive(Parser)]
#[command(author, version, about = "Render images as 16-color shaded console art", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image to the terminal
    Render {
        /// Image file (png, jpeg, bmp, gif)
        input: PathBuf,
        #[arg(short, long, help = "Output width in cells")]
        width: Option<u32>,
        #[arg(short, long, help = "Horizontal-to-vertical cell ratio used when scaling")]
        aspect: Option<f64>,
        #[arg(short, long, overrides_with = "no_dither", help = "Randomly pick between the two closest blends")]
        dither: bool,
        #[arg(long, overrides_with = "dither", help = "Disable dithering even if the settings file enables it")]
        no_dither: bool,
        #[arg(short, long, help = "Base palette: classic or campbell")]
        palette: Option<String>,
        #[arg(short, long, help = "Seed for reproducible dithering")]
        seed: Option<u64>,
        #[arg(long, overrides_with = "no_parallel", help = "Match rows on all cores")]
        parallel: bool,
        #[arg(long, overrides_with = "parallel", help = "Match on one thread even if the settings file enables parallel")]
        no_parallel: bool,
        #[arg(short, long, help = "Settings file (defaults to ./concol.json when present)")]
        config: Option<PathBuf>,
    },
    /// Dump the blend table for a palette as JSON
    Table {
        #[arg(short, long, default_value = "classic")]
        palette: String,
    },
    /// List the built-in palettes as JSON
    Palettes,
}

/// `--flag` / `--no-flag` pair to an override; neither keeps the settings value
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            input,
            width,
            aspect,
            dither,
            no_dither,
            palette,
            seed,
            parallel,
            no_parallel,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?.apply(Overrides {
                width,
                aspect,
                palette,
                seed,
                dither: flag(dither, no_dither),
                parallel: flag(parallel, no_parallel),
            })?;
            launcher::run_render(&input, &settings)
        }
        Commands::Table { palette } => launcher::run_table(&palette),
        Commands::Palettes => launcher::run_palettes(),
    }
}

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    let result = run(cli.command);

    if let Err(e) = &result {
        logger::error(&format!("{:#}", e));
    }
    result
}
