use std::collections::HashMap;

use serde::Serialize;

use super::{Glyph, Palette, RgbColor};
use crate::error::{ConcolError, CoreResult};

/// Blend channel `a` (background) toward `b` (foreground).
///
/// The result is truncated, not rounded, so every blended color is biased
/// slightly toward zero.
#[inline]
pub fn lerp(a: u8, b: u8, alpha: f64) -> u8 {
    (a as f64 * (1.0 - alpha) + b as f64 * alpha) as u8
}

/// One way of producing a blended color on the console
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct BlendEntry {
    pub fg: u8,
    pub bg: u8,
    pub glyph: Glyph,
    pub rgb: RgbColor,
}

/// Every color reachable by a (fg, bg, glyph) combination.
///
/// Keys iterate in first-insertion order. All tie-breaks downstream depend on
/// it, so the table never exposes the hash map's own ordering.
#[derive(Clone, Debug, Default)]
pub struct BlendTable {
    entries: Vec<(RgbColor, Vec<BlendEntry>)>,
    index: HashMap<RgbColor, usize>,
    raw_len: usize,
}

impl BlendTable {
    /// Enumerate all unordered pairs of distinct palette colors (fg index below
    /// bg index) and every glyph, keyed by the blended RGB they produce.
    pub fn build(palette: &Palette, glyphs: &[Glyph]) -> CoreResult<Self> {
        if palette.len() < 2 {
            return Err(ConcolError::configuration(format!(
                "palette '{}' needs at least two colors to blend, got {}",
                palette.name,
                palette.len()
            )));
        }
        if glyphs.is_empty() {
            return Err(ConcolError::configuration("glyph set is empty"));
        }
        if let Some(bad) = glyphs
            .iter()
            .find(|g| !g.opacity.is_finite() || !(0.0..=1.0).contains(&g.opacity))
        {
            return Err(ConcolError::configuration(format!(
                "glyph {:?} has opacity {} outside 0.0..=1.0",
                bad.symbol, bad.opacity
            )));
        }

        let mut table = Self::default();
        let colors = &palette.colors;

        for (i, fg) in colors.iter().enumerate() {
            for bg in &colors[i + 1..] {
                for glyph in glyphs {
                    let rgb = RgbColor(
                        lerp(bg.rgb.0, fg.rgb.0, glyph.opacity),
                        lerp(bg.rgb.1, fg.rgb.1, glyph.opacity),
                        lerp(bg.rgb.2, fg.rgb.2, glyph.opacity),
                    );
                    table.insert(BlendEntry {
                        fg: fg.index,
                        bg: bg.index,
                        glyph: *glyph,
                        rgb,
                    });
                }
            }
        }

        Ok(table)
    }

    fn insert(&mut self, entry: BlendEntry) {
        match self.index.get(&entry.rgb) {
            Some(&slot) => self.entries[slot].1.push(entry),
            None => {
                self.index.insert(entry.rgb, self.entries.len());
                self.entries.push((entry.rgb, vec![entry]));
            }
        }
        self.raw_len += 1;
    }

    /// Keys with their candidates, in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RgbColor, &[BlendEntry])> + '_ {
        self.entries.iter().map(|(rgb, list)| (*rgb, list.as_slice()))
    }

    pub fn get(&self, rgb: RgbColor) -> Option<&[BlendEntry]> {
        self.index.get(&rgb).map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Number of distinct blended colors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (fg, bg, glyph) combinations before collapsing by color
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }
}
