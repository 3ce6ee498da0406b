pub mod cell;
pub mod display;
pub mod processor;
pub mod sink;

pub use cell::CellData;
pub use display::AnsiSink;
pub use processor::{render, FrameProcessor};
pub use sink::{CellBuffer, RenderSink};
