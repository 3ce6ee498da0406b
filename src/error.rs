use thiserror::Error;

/// Errors raised by the palette, blend table and matcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConcolError {
    /// Empty or malformed palette, glyph set or blend table
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A source pixel channel outside 0..=255
    #[error("Pixel channel {channel} out of range: {value} (expected 0..=255)")]
    InputRange { channel: &'static str, value: i64 },
}

impl ConcolError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type CoreResult<T> = std::result::Result<T, ConcolError>;
