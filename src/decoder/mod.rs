pub mod frame_data;
pub mod loader;

pub use frame_data::{PixelGrid, PixelSource};
pub use loader::ImageLoader;
