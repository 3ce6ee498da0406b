use anyhow::{Context, Result};
use serde::Serialize;
use std::io::BufWriter;
use std::path::Path;

use super::config::Settings;
use crate::decoder::ImageLoader;
use crate::matcher::ColorMatcher;
use crate::palette::{BlendEntry, BlendTable, Palette, RgbColor, PALETTE_NAMES, SHADE_GLYPHS};
use crate::renderer::{self, AnsiSink, FrameProcessor, RenderSink};
use crate::shared::constants;

pub fn run_render(input: &Path, settings: &Settings) -> Result<()> {
    crate::utils::logger::info(&format!(
        "render: input={} width={} aspect={} dither={} palette={} seed={} parallel={}",
        input.display(),
        settings.width,
        settings.aspect,
        settings.dither,
        settings.palette,
        settings
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "<random>".to_string()),
        settings.parallel
    ));

    let loader = ImageLoader::new(settings.width, settings.aspect)?;
    let grid = loader.load(input)?;

    let stdout = BufWriter::with_capacity(constants::OUTPUT_BUFFER_CAPACITY, std::io::stdout());
    let mut sink = AnsiSink::new(stdout);
    render_with(&grid, settings, &mut sink)?;
    sink.finish()?;
    Ok(())
}

/// Build the table for the configured palette and render `source` into `sink`.
pub fn render_with<P, S>(source: &P, settings: &Settings, sink: &mut S) -> Result<()>
where
    P: crate::decoder::PixelSource + Sync + ?Sized,
    S: RenderSink + ?Sized,
{
    let start = std::time::Instant::now();
    let palette = Palette::by_name(&settings.palette)?;
    let table = BlendTable::build(&palette, &SHADE_GLYPHS)
        .with_context(|| format!("Failed to build blend table for '{}'", palette.name))?;
    crate::utils::logger::debug(&format!(
        "Blend table: {} entries, {} distinct colors",
        table.raw_len(),
        table.len()
    ));

    if settings.parallel {
        FrameProcessor::new(&table, settings.dither, settings.seed).render_parallel(source, sink)?;
    } else {
        let mut matcher = match settings.seed {
            Some(seed) => ColorMatcher::with_seed(&table, settings.dither, seed)?,
            None => ColorMatcher::new(&table, settings.dither)?,
        };
        renderer::render(source, &mut matcher, sink)?;
        crate::utils::logger::debug(&format!(
            "Matched {} distinct pixels with {} distance evaluations",
            matcher.cache_len(),
            matcher.distance_evaluations()
        ));
    }

    crate::utils::logger::debug(&format!(
        "Rendered {}x{} in {}us",
        source.width(),
        source.height(),
        start.elapsed().as_micros()
    ));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TableKey {
    pub rgb: RgbColor,
    pub candidates: Vec<BlendEntry>,
}

#[derive(Debug, Serialize)]
pub struct TableSummary {
    pub palette: String,
    pub raw_entries: usize,
    pub distinct_colors: usize,
    pub keys: Vec<TableKey>,
}

pub fn table_summary(palette_name: &str) -> Result<TableSummary> {
    let palette = Palette::by_name(palette_name)?;
    let table = BlendTable::build(&palette, &SHADE_GLYPHS)?;

    Ok(TableSummary {
        palette: palette.name.clone(),
        raw_entries: table.raw_len(),
        distinct_colors: table.len(),
        keys: table
            .iter()
            .map(|(rgb, candidates)| TableKey { rgb, candidates: candidates.to_vec() })
            .collect(),
    })
}

pub fn run_table(palette_name: &str) -> Result<()> {
    let summary = table_summary(palette_name)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn run_palettes() -> Result<()> {
    let palettes = PALETTE_NAMES
        .iter()
        .map(|name| Palette::by_name(name))
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", serde_json::to_string_pretty(&palettes)?);
    Ok(())
}
