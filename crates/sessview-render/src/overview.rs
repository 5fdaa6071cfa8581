use std::io::{self, Write};

use colored::Colorize;

use sessview_sessions::{ParsedSession, Role, SessionEvent, Turn};

use crate::format::{
    format_cost, format_count, format_timestamp, or_placeholder, preview, subagent_summary,
};
use crate::window::numbered;
use crate::RenderOptions;

/// Session-wide totals, computed over every turn regardless of the window.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionTotals {
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub subagent_cost: f64,
    pub subagent_invocations: usize,
    pub user_turns: usize,
    pub assistant_turns: usize,
    pub tool_results: usize,
}

impl SessionTotals {
    pub fn from_turns(turns: &[Turn]) -> Self {
        let mut totals = Self::default();
        for turn in turns {
            if let Some(usage) = turn.usage() {
                totals.cost += usage.cost.total();
                totals.input_tokens += usage.input;
                totals.output_tokens += usage.output;
            }
            if let Some(details) = turn.subagent() {
                totals.subagent_invocations += 1;
                totals.subagent_cost += details.total_cost();
            }
            match turn.role {
                Role::User => totals.user_turns += 1,
                Role::Assistant => totals.assistant_turns += 1,
                Role::ToolResult => totals.tool_results += 1,
                Role::Other(_) => {}
            }
        }
        totals
    }
}

pub fn write_overview<W: Write>(
    out: &mut W,
    session: &ParsedSession,
    turns: &[Turn],
    options: &RenderOptions,
) -> io::Result<()> {
    let meta = &session.metadata;
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "SESSION OVERVIEW".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "  ID:        {}", meta.id.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "  CWD:       {}", meta.cwd.as_deref().unwrap_or("N/A"))?;
    writeln!(
        out,
        "  Started:   {}",
        meta.timestamp.as_deref().unwrap_or("N/A")
    )?;
    writeln!(
        out,
        "  Version:   {}",
        meta.version.as_deref().unwrap_or("N/A")
    )?;

    // Each event prints its own line, so the last one shown is the active state.
    for event in &session.events {
        match event {
            SessionEvent::ModelChange { provider, model_id } => {
                writeln!(out, "  Model:     {}/{}", provider, model_id)?
            }
            SessionEvent::ThinkingLevelChange { thinking_level } => {
                writeln!(out, "  Thinking:  {}", thinking_level)?
            }
        }
    }

    let totals = SessionTotals::from_turns(turns);
    if totals.cost > 0.0 {
        writeln!(out, "  Session cost: {}", format_cost(totals.cost))?;
        writeln!(
            out,
            "  Session tokens: {} (in:{} out:{})",
            format_count(totals.input_tokens + totals.output_tokens),
            format_count(totals.input_tokens),
            format_count(totals.output_tokens)
        )?;
    }
    if totals.subagent_cost > 0.0 {
        writeln!(
            out,
            "  Subagent cost:  {} ({} invocations)",
            format_cost(totals.subagent_cost),
            totals.subagent_invocations
        )?;
        writeln!(
            out,
            "  TOTAL cost:     {}",
            format_cost(totals.cost + totals.subagent_cost)
        )?;
    }
    writeln!(
        out,
        "  Turns:     {} total ({} user, {} assistant, {} tool results)",
        turns.len(),
        totals.user_turns,
        totals.assistant_turns,
        totals.tool_results
    )?;
    if totals.subagent_invocations > 0 {
        writeln!(
            out,
            "  Subagent invocations: {}",
            totals.subagent_invocations
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "-".repeat(70))?;
    writeln!(out, "{}", "TURN SUMMARY".bold())?;
    writeln!(out, "{}", "-".repeat(70))?;

    for (turn_number, turn) in numbered(turns) {
        if !options.window.contains(turn_number) {
            continue;
        }
        let ts = format_timestamp(turn.timestamp.as_ref());

        match turn.role {
            Role::User => {
                let text = preview(&turn.texts.join(" "), 200);
                writeln!(
                    out,
                    "\n[{}] {} {}",
                    ts,
                    format!("👤 USER #{}:", turn_number).bright_cyan().bold(),
                    text
                )?;
            }
            Role::Assistant => {
                let mut parts = Vec::new();
                if let Some(first) = turn.texts.first() {
                    parts.push(format!("\"{}\"", preview(first, 150)));
                }
                if !turn.tool_calls.is_empty() {
                    let names: Vec<&str> =
                        turn.tool_calls.iter().map(|tc| tc.name.as_str()).collect();
                    parts.push(format!("tools: [{}]", names.join(", ")));
                }
                let summary = if parts.is_empty() {
                    "(empty)".to_string()
                } else {
                    parts.join(" | ")
                };
                let cost = turn.cost();
                let cost_str = if cost != 0.0 {
                    format!(" ({})", format_cost(cost)).dimmed().to_string()
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "[{}] {} {}{}",
                    ts,
                    "🤖 ASSISTANT:".bright_blue().bold(),
                    summary,
                    cost_str
                )?;
            }
            Role::ToolResult => {
                if let Some(details) = turn.subagent() {
                    writeln!(out, "[{}]   {}", ts, subagent_summary(details))?;
                } else {
                    let text = turn.texts.join(" ");
                    let shown = if text.is_empty() {
                        "(empty)".to_string()
                    } else {
                        preview(&text, 100)
                    };
                    let err = if turn.is_error { " ❌" } else { "" };
                    writeln!(
                        out,
                        "[{}]   ↳ {}{}: {}",
                        ts,
                        or_placeholder(turn.tool_name().unwrap_or_default()),
                        err,
                        shown.dimmed()
                    )?;
                }
            }
            Role::Other(_) => {}
        }
    }

    Ok(())
}

