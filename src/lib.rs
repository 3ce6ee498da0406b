//! Shaded 16-color console art.
//!
//! A [`palette::BlendTable`] lists every color a console cell can show by
//! drawing one of five shade glyphs in one palette color over another.
//! [`matcher::ColorMatcher`] maps source pixels onto that table and the
//! [`renderer`] module walks an image and feeds the choices to a sink.

pub mod core;
pub mod decoder;
pub mod error;
pub mod matcher;
pub mod palette;
pub mod renderer;
pub mod shared;
pub mod utils;

pub use error::{ConcolError, CoreResult};
