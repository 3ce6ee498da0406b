use crate::error::{ConcolError, CoreResult};
use crate::palette::RgbColor;

/// Random access to a decoded, already resized image
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn get(&self, x: usize, y: usize) -> RgbColor;
}

/// Packed RGB8 pixel grid, row-major
#[derive(Clone, Debug)]
pub struct PixelGrid {
    buffer: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    pub fn from_rgb8(buffer: Vec<u8>, width: usize, height: usize) -> CoreResult<Self> {
        if buffer.len() != width * height * 3 {
            return Err(ConcolError::configuration(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{}",
                buffer.len(),
                width * height * 3,
                width,
                height
            )));
        }
        Ok(Self { buffer, width, height })
    }

    /// Build a grid from wide channel values (r, g, b per pixel), rejecting
    /// values outside 0..=255 instead of clamping them.
    pub fn from_channels(width: usize, height: usize, channels: &[i64]) -> CoreResult<Self> {
        let mut buffer = Vec::with_capacity(channels.len());
        for px in channels.chunks(3) {
            if let &[r, g, b] = px {
                let rgb = RgbColor::try_from_channels(r, g, b)?;
                buffer.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
            }
        }
        if buffer.len() != channels.len() {
            return Err(ConcolError::configuration(format!(
                "channel count {} is not a multiple of 3",
                channels.len()
            )));
        }
        Self::from_rgb8(buffer, width, height)
    }
}

impl PixelSource for PixelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, x: usize, y: usize) -> RgbColor {
        let offset = (y * self.width + x) * 3;
        RgbColor(self.buffer[offset], self.buffer[offset + 1], self.buffer[offset + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_row_major_lookup() {
        let grid = PixelGrid::from_channels(2, 2, &[
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 0,
        ])
        .unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.get(1, 0), RgbColor(0, 255, 0));
        assert_eq!(grid.get(0, 1), RgbColor(0, 0, 255));
        assert_eq!(grid.get(1, 1), RgbColor(255, 255, 0));
    }

    #[test]
    fn test_out_of_range_channel_rejected() {
        let err = PixelGrid::from_channels(1, 1, &[0, 300, 0]).unwrap_err();
        assert_eq!(err, ConcolError::InputRange { channel: "green", value: 300 });
    }

    #[test]
    fn test_buffer_size_mismatch_rejected() {
        assert!(matches!(
            PixelGrid::from_rgb8(vec![0; 5], 1, 2),
            Err(ConcolError::Configuration(_))
        ));
        assert!(matches!(
            PixelGrid::from_channels(1, 1, &[1, 2]),
            Err(ConcolError::Configuration(_))
        ));
    }
}
