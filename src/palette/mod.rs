pub mod blend;

pub use blend::{BlendEntry, BlendTable};

use serde::Serialize;

use crate::error::{ConcolError, CoreResult};

/// Represents a 24-bit RGB color
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Build a color from wide channel values, rejecting anything outside 0..=255.
    pub fn try_from_channels(r: i64, g: i64, b: i64) -> CoreResult<Self> {
        let check = |channel: &'static str, value: i64| -> CoreResult<u8> {
            u8::try_from(value).map_err(|_| ConcolError::InputRange { channel, value })
        };
        Ok(Self(check("red", r)?, check("green", g)?, check("blue", b)?))
    }

    /// Squared euclidean distance. Only used for ranking, so no square root.
    #[inline(always)]
    pub fn distance_sq(self, other: RgbColor) -> u32 {
        let dr = self.0 as i32 - other.0 as i32;
        let dg = self.1 as i32 - other.1 as i32;
        let db = self.2 as i32 - other.2 as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Unpack a console color stored as 0x00BBGGRR.
pub fn unpack_color(color: u32) -> RgbColor {
    RgbColor(
        (color & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        ((color >> 16) & 0xFF) as u8,
    )
}

/// A base color: console attribute index plus its RGB value
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct ConsoleColor {
    pub index: u8,
    pub rgb: RgbColor,
}

/// A shade character and how much of the foreground it shows
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct Glyph {
    pub symbol: char,
    pub opacity: f64,
}

impl Glyph {
    pub const fn new(symbol: char, opacity: f64) -> Self {
        Self { symbol, opacity }
    }
}

/// Blank, light, medium, dark and full block, by ascending opacity.
pub const SHADE_GLYPHS: [Glyph; 5] = [
    Glyph::new(' ', 0.00),
    Glyph::new('\u{2591}', 0.25),
    Glyph::new('\u{2592}', 0.50),
    Glyph::new('\u{2593}', 0.75),
    Glyph::new('\u{2588}', 1.00),
];

// Console attribute order: bit 0 blue, bit 1 green, bit 2 red, bit 3 intensity.
const CLASSIC_COLORS: [u32; 16] = [
    0x000000, 0x800000, 0x008000, 0x808000, 0x000080, 0x800080, 0x008080, 0xC0C0C0,
    0x808080, 0xFF0000, 0x00FF00, 0xFFFF00, 0x0000FF, 0xFF00FF, 0x00FFFF, 0xFFFFFF,
];

const CAMPBELL_COLORS: [u32; 16] = [
    0x0C0C0C, 0xDA3700, 0x0EA113, 0xDD963A, 0x1F0FC5, 0x981788, 0x009CC1, 0xCCCCCC,
    0x767676, 0xFF783B, 0x0CC616, 0xD6D661, 0x5648E7, 0x9E00B4, 0xA5F1F9, 0xF2F2F2,
];

pub const PALETTE_NAMES: &[&str] = &["classic", "campbell"];

/// The fixed set of base colors a console can draw with
#[derive(Clone, Debug, Serialize)]
pub struct Palette {
    pub name: String,
    pub colors: Vec<ConsoleColor>,
}

impl Palette {
    pub fn new(name: &str, colors: &[RgbColor]) -> CoreResult<Self> {
        if colors.len() > 16 {
            return Err(ConcolError::configuration(format!(
                "palette '{}' has {} colors, consoles only address 16",
                name,
                colors.len()
            )));
        }

        let colors = colors
            .iter()
            .enumerate()
            .map(|(index, &rgb)| ConsoleColor { index: index as u8, rgb })
            .collect();

        Ok(Self { name: name.to_string(), colors })
    }

    fn from_packed(name: &str, packed: &[u32; 16]) -> Self {
        let colors = packed
            .iter()
            .enumerate()
            .map(|(index, &c)| ConsoleColor { index: index as u8, rgb: unpack_color(c) })
            .collect();
        Self { name: name.to_string(), colors }
    }

    /// Legacy console colors (conhost before Windows 10).
    pub fn classic() -> Self {
        Self::from_packed("classic", &CLASSIC_COLORS)
    }

    /// Windows 10 console defaults.
    pub fn campbell() -> Self {
        Self::from_packed("campbell", &CAMPBELL_COLORS)
    }

    pub fn by_name(name: &str) -> CoreResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "campbell" => Ok(Self::campbell()),
            other => Err(ConcolError::configuration(format!(
                "unknown palette '{}' (available: {})",
                other,
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
