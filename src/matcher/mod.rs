use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{ConcolError, CoreResult};
use crate::palette::{BlendEntry, BlendTable, Glyph, RgbColor};
use crate::shared::constants::{EXACT_MATCH_THRESHOLD, MAX_DISTANCE};

/// The (fg, bg, glyph) chosen for one pixel
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MatchResult {
    pub fg: u8,
    pub bg: u8,
    pub glyph: Glyph,
}

impl From<&BlendEntry> for MatchResult {
    fn from(entry: &BlendEntry) -> Self {
        Self { fg: entry.fg, bg: entry.bg, glyph: entry.glyph }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// First key under the early-exit threshold, else the global minimum
    Nearest,
    /// Random pick between the two closest keys
    Dithered,
}

/// Maps source pixels onto blend table entries, memoized by exact pixel value.
///
/// In dithered mode a repeated pixel reuses the outcome of its first draw;
/// call [`ColorMatcher::clear_cache`] to sample again.
pub struct ColorMatcher<'a> {
    table: &'a BlendTable,
    fallback: &'a BlendEntry,
    strategy: Strategy,
    cache: HashMap<RgbColor, MatchResult>,
    rng: StdRng,
    distance_evaluations: u64,
}

impl<'a> ColorMatcher<'a> {
    pub fn new(table: &'a BlendTable, dither: bool) -> CoreResult<Self> {
        Self::with_rng(table, dither, rand::rng())
    }

    /// Same as [`ColorMatcher::new`] but with reproducible dithering.
    pub fn with_seed(table: &'a BlendTable, dither: bool, seed: u64) -> CoreResult<Self> {
        Self::with_std_rng(table, dither, StdRng::seed_from_u64(seed))
    }

    /// Dither with randomness drawn from `source`. The matcher keeps its own
    /// generator, seeded once from `source` here.
    pub fn with_rng<R: RngCore>(
        table: &'a BlendTable,
        dither: bool,
        mut source: R,
    ) -> CoreResult<Self> {
        Self::with_std_rng(table, dither, StdRng::from_rng(&mut source))
    }

    fn with_std_rng(table: &'a BlendTable, dither: bool, rng: StdRng) -> CoreResult<Self> {
        let fallback = table
            .iter()
            .next()
            .map(|(_, candidates)| &candidates[0])
            .ok_or_else(|| ConcolError::configuration("blend table is empty"))?;

        let strategy = if dither { Strategy::Dithered } else { Strategy::Nearest };

        Ok(Self {
            table,
            fallback,
            strategy,
            cache: HashMap::new(),
            rng,
            distance_evaluations: 0,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn match_pixel(&mut self, px: RgbColor) -> MatchResult {
        if let Some(hit) = self.cache.get(&px) {
            return *hit;
        }

        let entry = match self.strategy {
            Strategy::Nearest => self.nearest(px),
            Strategy::Dithered => self.dithered(px),
        };
        let result = MatchResult::from(entry);
        self.cache.insert(px, result);
        result
    }

    fn nearest(&mut self, px: RgbColor) -> &'a BlendEntry {
        let table = self.table;
        let mut best_dst = MAX_DISTANCE;
        let mut best: Option<&'a [BlendEntry]> = None;

        for (rgb, candidates) in table.iter() {
            self.distance_evaluations += 1;
            let dst = px.distance_sq(rgb);
            if dst < best_dst {
                best_dst = dst;
                best = Some(candidates);
                if best_dst < EXACT_MATCH_THRESHOLD {
                    break;
                }
            }
        }

        // Every distance is below MAX_DISTANCE, so the first key always sets `best`.
        best.map_or(self.fallback, |candidates| &candidates[0])
    }

    fn dithered(&mut self, px: RgbColor) -> &'a BlendEntry {
        let table = self.table;
        let mut distances: Vec<(u32, &'a [BlendEntry])> = table
            .iter()
            .map(|(rgb, candidates)| (px.distance_sq(rgb), candidates))
            .collect();
        self.distance_evaluations += distances.len() as u64;

        // Stable: equal distances keep table order.
        distances.sort_by_key(|(dst, _)| *dst);

        match *distances.as_slice() {
            [(d0, closest), (d1, runner_up), ..] => {
                if self.pick_closer(d0, d1) {
                    &closest[0]
                } else {
                    &runner_up[0]
                }
            }
            [(_, only)] => &only[0],
            [] => self.fallback,
        }
    }

    /// Uniform draw in [d0, d1] compared against the midpoint.
    fn pick_closer(&mut self, d0: u32, d1: u32) -> bool {
        if d0 == d1 {
            // Degenerate interval: half the mass sits on each side of the midpoint.
            return self.rng.random_bool(0.5);
        }
        let (lo, hi) = (d0 as f64, d1 as f64);
        self.rng.random_range(lo..=hi) <= (lo + hi) / 2.0
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Number of pixel-to-key distance computations so far
    pub fn distance_evaluations(&self) -> u64 {
        self.distance_evaluations
    }
}
