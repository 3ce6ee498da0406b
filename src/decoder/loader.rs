use anyhow::{bail, Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

use super::frame_data::PixelGrid;

/// Decodes an image file and scales it to the cell grid.
pub struct ImageLoader {
    width: u32,
    aspect: f64,
}

impl ImageLoader {
    /// `aspect` is how many source rows collapse into one cell row relative to
    /// columns; console cells are taller than wide.
    pub fn new(width: u32, aspect: f64) -> Result<Self> {
        if width == 0 {
            bail!("Output width must be at least 1 cell");
        }
        if !aspect.is_finite() || aspect <= 0.0 {
            bail!("Aspect ratio must be a positive number, got {}", aspect);
        }
        Ok(Self { width, aspect })
    }

    /// Grid height for the configured width, truncated like the width/aspect division
    pub fn target_height(&self) -> u32 {
        ((self.width as f64 / self.aspect) as u32).max(1)
    }

    pub fn load(&self, path: &Path) -> Result<PixelGrid> {
        let start = std::time::Instant::now();
        let img = ImageReader::open(path)
            .with_context(|| format!("Failed to open image: {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to detect image format: {}", path.display()))?
            .decode()
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;

        crate::utils::logger::debug(&format!(
            "Decoded {} ({}x{}) in {}us",
            path.display(),
            img.width(),
            img.height(),
            start.elapsed().as_micros()
        ));

        self.scale(&img)
    }

    /// Resize to the cell grid and drop any alpha channel.
    pub fn scale(&self, img: &DynamicImage) -> Result<PixelGrid> {
        let height = self.target_height();
        let rgb = img
            .resize_exact(self.width, height, FilterType::Lanczos3)
            .to_rgb8();

        PixelGrid::from_rgb8(rgb.into_raw(), self.width as usize, height as usize)
            .context("Resized image has an unexpected buffer size")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::PixelSource;
    use crate::palette::RgbColor;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_target_height_truncates() {
        assert_eq!(ImageLoader::new(75, 1.5).unwrap().target_height(), 50);
        assert_eq!(ImageLoader::new(10, 3.0).unwrap().target_height(), 3);
        assert_eq!(ImageLoader::new(1, 4.0).unwrap().target_height(), 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(ImageLoader::new(0, 1.5).is_err());
        assert!(ImageLoader::new(10, 0.0).is_err());
        assert!(ImageLoader::new(10, f64::NAN).is_err());
    }

    #[test]
    fn test_scale_resizes_to_grid() {
        let src = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 255]));
        let grid = ImageLoader::new(4, 2.0)
            .unwrap()
            .scale(&DynamicImage::ImageRgba8(src))
            .unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 2));
        let RgbColor(r, g, b) = grid.get(3, 1);
        assert!(r.abs_diff(10) <= 1 && g.abs_diff(200) <= 1 && b.abs_diff(30) <= 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = ImageLoader::new(4, 1.5).unwrap();
        assert!(loader.load(Path::new("does/not/exist.png")).is_err());
    }
}
