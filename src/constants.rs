pub const TOOL_NAME: &str = "squeezr";

pub const DEFAULT_SRC_DIR: &str = "input";
pub const DEFAULT_TARGET_DIR: &str = "output";

/// Upper bound on simultaneous encodes when none is configured. Image work is CPU and
/// memory heavy, so the effective default is this value capped at the CPU count.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Source extensions picked up by the scanner (compared case-insensitively).
pub const SOURCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub const GITIGNORE_FILE: &str = ".gitignore";
pub const GITIGNORE_CONTENTS: &str = "*\n!.gitignore";

// Encoder tunings
pub const OXIPNG_MAX_PRESET: u8 = 6;
pub const JPEG_QUALITY: u8 = 80;
pub const WEBP_QUALITY: f32 = 75.0;
pub const WEBP_EFFORT: u8 = 6;
pub const AVIF_QUALITY: u8 = 75;
pub const AVIF_EFFORT: u8 = 6;
pub const MAX_EFFORT: u8 = 9;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "squeezr:: minifying... {bar:40.cyan/blue} {percent}% | ETA: {eta} | {pos}/{len}";

pub const FINISH_MESSAGE: &str = "Finish! Go build something awesome 😎";
