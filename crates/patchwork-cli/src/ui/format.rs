//! Formatting utilities for sizes, durations, and build summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::colors_enabled;

/// Format file size in human-readable format.
///
/// ```
/// use patchwork_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use patchwork_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print written artifacts with their sizes, plus a total line.
///
/// `entries` are (file name, size in bytes) pairs.
pub fn print_build_summary(entries: &[(String, u64)], duration: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let rule = "─".repeat(width);
    let total_size: u64 = entries.iter().map(|(_, size)| size).sum();

    if colors_enabled() {
        eprintln!("\n{}", "Build Summary".bold().underline());
        eprintln!("{}", rule);
        for (name, size) in entries {
            eprintln!(
                "  {} {} {}",
                "▸".blue(),
                name.bright_white().bold(),
                format_size(*size).dimmed()
            );
        }
        eprintln!("{}", rule);
        eprintln!(
            "  {} {} in {}",
            "Total:".bold(),
            format_size(total_size).green(),
            format_duration(duration).green()
        );
    } else {
        eprintln!("\nBuild Summary");
        eprintln!("{}", rule);
        for (name, size) in entries {
            eprintln!("  ▸ {} {}", name, format_size(*size));
        }
        eprintln!("{}", rule);
        eprintln!(
            "  Total: {} in {}",
            format_size(total_size),
            format_duration(duration)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_format_duration_boundaries() {
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
    }

    #[test]
    fn test_print_build_summary() {
        print_build_summary(
            &[
                ("patcher.js".to_string(), 15_234),
                ("renderer.js".to_string(), 234_567),
            ],
            Duration::from_millis(450),
        );
    }
}
