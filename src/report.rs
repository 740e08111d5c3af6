//! Console rendering of the collected sample and its statistics.
//!
//! Everything here produces strings; printing stays in `main`. The run
//! configuration is passed in explicitly so headers can name the repository
//! and window without reaching for globals.

use std::fmt::Write;

use chrono::Duration;

use crate::config::Config;
use crate::stats::{DurationSample, StatsReport};

/// One line per pull request, ascending by merge duration.
pub fn render_pulls(sample: &DurationSample) -> String {
    let mut out = String::new();
    for entry in sample.entries() {
        let _ = writeln!(
            out,
            "Pull #{} ({} lines) merged in {}",
            entry.pull.number,
            entry.pull.diff_lines,
            format_duration(entry.duration),
        );
    }
    out
}

/// The aggregate block for one slice of the sample.
pub fn render_report(report: &StatsReport, config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} pull requests in the last {} days for {} ({})",
        report.count, config.days, config.repo, report.filter,
    );
    let _ = writeln!(out, " median: {}", format_duration(report.median));
    let _ = writeln!(out, "    60%: {}", format_duration(report.p60));
    let _ = writeln!(out, "    70%: {}", format_duration(report.p70));
    let _ = writeln!(out, "    80%: {}", format_duration(report.p80));
    let _ = writeln!(out, "    90%: {}", format_duration(report.p90));
    let _ = writeln!(out, "average: {}", format_duration(report.average));
    out
}

/// Notice printed in place of a block when a size bucket matched nothing.
pub fn render_empty(filter: &str, config: &Config) -> String {
    format!(
        "no data for {} ({}) in the last {} days\n",
        config.repo, filter, config.days
    )
}

/// Formats a duration as its nonzero units, largest first (e.g. "2d 3h 14m").
/// Sub-minute durations fall back to seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
