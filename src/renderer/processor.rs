use anyhow::Result;
use rayon::prelude::*;

use super::cell::CellData;
use super::sink::RenderSink;
use crate::decoder::PixelSource;
use crate::error::CoreResult;
use crate::matcher::ColorMatcher;
use crate::palette::BlendTable;

/// Walk the grid row-major, match every pixel and hand the cell to the sink.
pub fn render<P, S>(source: &P, matcher: &mut ColorMatcher<'_>, sink: &mut S) -> Result<()>
where
    P: PixelSource + ?Sized,
    S: RenderSink + ?Sized,
{
    for y in 0..source.height() {
        for x in 0..source.width() {
            let m = matcher.match_pixel(source.get(x, y));
            sink.emit(m.glyph.symbol, m.fg, m.bg)?;
        }
        sink.emit_newline()?;
    }
    Ok(())
}

/// Splits a frame into row bands and matches them on the rayon pool.
///
/// Each band gets its own matcher, so caches are never shared between
/// workers. With a seed, band `i` dithers with `seed + i`.
pub struct FrameProcessor<'a> {
    table: &'a BlendTable,
    dither: bool,
    seed: Option<u64>,
}

impl<'a> FrameProcessor<'a> {
    pub fn new(table: &'a BlendTable, dither: bool, seed: Option<u64>) -> Self {
        Self { table, dither, seed }
    }

    fn matcher(&self, band: usize) -> CoreResult<ColorMatcher<'a>> {
        match self.seed {
            Some(seed) => {
                ColorMatcher::with_seed(self.table, self.dither, seed.wrapping_add(band as u64))
            }
            None => ColorMatcher::new(self.table, self.dither),
        }
    }

    pub fn process_frame<P>(&self, source: &P) -> CoreResult<Vec<CellData>>
    where
        P: PixelSource + Sync + ?Sized,
    {
        let w = source.width();
        let h = source.height();
        let mut cells = vec![CellData::default(); w * h];
        if cells.is_empty() {
            return Ok(cells);
        }

        let band_rows = (h / rayon::current_num_threads().max(1)).max(1);

        cells
            .par_chunks_mut(band_rows * w)
            .enumerate()
            .try_for_each(|(band, chunk)| -> CoreResult<()> {
                let mut matcher = self.matcher(band)?;
                let start_idx = band * band_rows * w;

                for (i, cell) in chunk.iter_mut().enumerate() {
                    let idx = start_idx + i;
                    let m = matcher.match_pixel(source.get(idx % w, idx / w));
                    *cell = CellData {
                        glyph: m.glyph.symbol,
                        fg: m.fg,
                        bg: m.bg,
                    };
                }
                Ok(())
            })?;

        Ok(cells)
    }

    /// Match in parallel, then emit to the sink in pixel order.
    pub fn render_parallel<P, S>(&self, source: &P, sink: &mut S) -> Result<()>
    where
        P: PixelSource + Sync + ?Sized,
        S: RenderSink + ?Sized,
    {
        let w = source.width();
        let cells = self.process_frame(source)?;
        if w == 0 {
            for _ in 0..source.height() {
                sink.emit_newline()?;
            }
            return Ok(());
        }

        for row in cells.chunks(w) {
            for cell in row {
                sink.emit(cell.glyph, cell.fg, cell.bg)?;
            }
            sink.emit_newline()?;
        }
        Ok(())
    }
}
