/// Utility functions shared by reporting and the CLI.
use crate::constants::PROGRESS_BAR_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};

/// Format a byte count with 1024-based units and two decimals
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "512 B", "1.50 KB", "2.00 MB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Percentage of `original_size` saved by `compressed_size`.
///
/// # Returns
/// * `None` when `original_size` is zero, since no ratio exists
/// * Negative values when the output grew
pub fn calculate_saved_percent(original_size: u64, compressed_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some(((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.2} %", percent)
}

/// Progress bar for a batch of `total` jobs, drawn to stderr.
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    match ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars("█░ ")),
        Err(_) => pb.set_style(ProgressStyle::default_bar()),
    }
    pb
}
