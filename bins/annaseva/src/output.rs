//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use annaseva_poi::{PoiKind, PointOfInterest, Severity};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a distance in kilometers, switching to meters below one kilometer
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{:.2} km", km)
    } else {
        format!("{:.0} km", km)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// One line per record: id, kind, position and the kind-specific summary.
pub fn poi_line(poi: &PointOfInterest) -> String {
    let position = match (poi.lat, poi.lng) {
        (Some(lat), Some(lng)) => format!("({lat:.4}, {lng:.4})"),
        _ => "(unplaced)".to_string(),
    };

    let kind = match poi.kind() {
        PoiKind::Surplus => "surplus ".green().to_string(),
        PoiKind::Shortage => "shortage".red().to_string(),
    };

    let summary = match poi.severity() {
        Some(severity) => format!("{} severity", severity_label(severity)),
        None => poi.name.clone().unwrap_or_default(),
    };

    format!("{:<14} {} {} {}", poi.id, kind, position.dimmed(), summary)
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => severity.as_str().red().bold().to_string(),
        Severity::High => severity.as_str().red().to_string(),
        Severity::Medium => severity.as_str().yellow().to_string(),
        Severity::Low => severity.as_str().to_string(),
    }
}
