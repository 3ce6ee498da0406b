pub const APP_NAME: &str = "concol";

pub const CONFIG_FILE: &str = "concol.json";
pub const ERROR_LOG_FILE: &str = "concol-error.log";
pub const DEBUG_LOG_FILE: &str = "concol-debug.log";

/// Output width in cells when nothing else is configured.
pub const DEFAULT_WIDTH: u32 = 75;
/// Source pixels per cell row; terminal cells are taller than wide.
pub const DEFAULT_ASPECT: f64 = 1.5;
pub const DEFAULT_PALETTE: &str = "classic";

/// Squared distance below which the nearest scan stops early.
pub const EXACT_MATCH_THRESHOLD: u32 = 10;

/// Larger than any squared RGB distance (3 * 255^2).
pub const MAX_DISTANCE: u32 = 16_777_216;

// Output buffer for the ANSI sink
pub const OUTPUT_BUFFER_CAPACITY: usize = 256 * 1024;
