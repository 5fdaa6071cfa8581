use std::borrow::Cow;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime};
use colored::Colorize;

use sessview_sessions::{SubagentDetails, Timestamp};

/// Cut `text` to `max_len` characters and note the original length.
/// A `max_len` of 0 disables truncation.
pub fn truncate(text: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed(text);
    }
    let total = text.chars().count();
    if total <= max_len {
        return Cow::Borrowed(text);
    }
    let head: String = text.chars().take(max_len).collect();
    Cow::Owned(format!("{head}\n... [truncated, {total} chars total]"))
}

/// First `max_chars` characters on a single line.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Wall-clock time of day, or `?` when unknown.
pub fn format_timestamp(ts: Option<&Timestamp>) -> String {
    match ts {
        None => "?".to_string(),
        Some(Timestamp::Millis(ms)) => DateTime::from_timestamp_millis(*ms as i64)
            .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| preview(&ms.to_string(), 8)),
        Some(Timestamp::Text(s)) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                dt.format("%H:%M:%S").to_string()
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                dt.format("%H:%M:%S").to_string()
            } else {
                s.chars().take(8).collect()
            }
        }
    }
}

/// `42s` under a minute, `3m5s` above.
pub fn format_duration(ms: f64) -> String {
    let secs = (ms / 1000.0) as u64;
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m{}s", secs / 60, secs % 60)
    }
}

/// Thousands-separated integer (`12,345`).
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

/// `(deleted)` marker for artifact paths that no longer exist.
pub fn deleted_marker(path: &str) -> &'static str {
    if Path::new(path).exists() {
        ""
    } else {
        " (deleted)"
    }
}

pub fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "?"
    } else {
        value
    }
}

/// Compact multi-line summary of one subagent invocation.
pub fn subagent_summary(details: &SubagentDetails) -> String {
    let header = format!(
        "🔀 SUBAGENT [{}] · {} run(s), {}, {}",
        or_placeholder(&details.mode),
        details.results.len(),
        format_cost(details.total_cost()),
        format_duration(details.total_duration_ms()),
    );

    let mut lines = vec![header.bright_magenta().to_string()];
    for run in &details.results {
        let icon = if run.succeeded() {
            "✓".bright_green()
        } else {
            "❌".bright_red()
        };
        lines.push(format!(
            "  {} {} ({}): {}",
            icon,
            or_placeholder(&run.agent),
            run.model,
            preview(&run.task, 100)
        ));

        let cost = run.usage.cost.total();
        let duration = run.progress_summary.duration_ms;
        if cost != 0.0 || duration != 0.0 {
            lines.push(format!(
                "    {} | {} | {} tools",
                format_cost(cost),
                format_duration(duration),
                run.progress_summary.tool_count
            ));
        }
    }

    lines.join("\n")
}
