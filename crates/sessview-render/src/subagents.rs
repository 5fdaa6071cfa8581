use std::io::{self, Write};

use colored::Colorize;
use serde_json::Value;

use sessview_sessions::{extract_subagent_details, find_subagent_call, RawMessage};

use crate::format::{
    deleted_marker, format_cost, format_count, format_duration, or_placeholder, preview, truncate,
};

/// Detailed report of every subagent invocation in the session.
///
/// Reads the raw messages so the triggering `subagent` call's plan
/// (`chain` or `tasks`) can be shown next to its results.
pub fn write_subagents<W: Write>(out: &mut W, messages: &[RawMessage]) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "SUBAGENT RUNS".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;

    let mut invocation = 0usize;
    let mut run_number = 0usize;

    for (index, entry) in messages.iter().enumerate() {
        let Some(details) = extract_subagent_details(entry.body()) else {
            continue;
        };
        invocation += 1;

        writeln!(out, "\n{}", "━".repeat(60).bright_magenta())?;
        writeln!(
            out,
            "{}",
            format!(
                "INVOCATION #{} · mode: {}",
                invocation,
                or_placeholder(&details.mode)
            )
            .bright_magenta()
            .bold()
        )?;
        writeln!(out, "{}", "━".repeat(60).bright_magenta())?;

        if let Some(args) = find_subagent_call(messages, index) {
            write_plan(out, args)?;
        }

        for run in &details.results {
            run_number += 1;
            let status = if run.succeeded() {
                "✓ completed".bright_green()
            } else {
                "❌ failed".bright_red()
            };
            let usage = &run.usage;
            let progress = &run.progress_summary;

            writeln!(
                out,
                "\n  ── Run #{}: {} ──",
                run_number,
                or_placeholder(&run.agent).bold()
            )?;
            writeln!(out, "  Status:   {}", status)?;
            writeln!(out, "  Model:    {}", run.model)?;
            writeln!(
                out,
                "  Task:     {}",
                truncate(&run.task.replace('\n', " "), 300)
            )?;
            if !run.skills.is_empty() {
                writeln!(out, "  Skills:   {}", run.skills.join(", "))?;
            }
            writeln!(out, "  Cost:     {}", format_cost(usage.cost.total()))?;
            writeln!(
                out,
                "  Duration: {}",
                format_duration(progress.duration_ms)
            )?;
            writeln!(
                out,
                "  Tokens:   {} in / {} out / {} cached",
                format_count(usage.input),
                format_count(usage.output),
                format_count(usage.cache_read)
            )?;
            writeln!(
                out,
                "  Tools:    {} calls in {} turns",
                progress.tool_count, usage.turns
            )?;

            if !run.session_file.is_empty() {
                writeln!(
                    out,
                    "  Session:  {}{}",
                    run.session_file,
                    deleted_marker(&run.session_file).dimmed()
                )?;
            }
            let paths = &run.artifact_paths;
            if !paths.jsonl_path.is_empty() {
                writeln!(
                    out,
                    "  JSONL:    {}{}",
                    paths.jsonl_path,
                    deleted_marker(&paths.jsonl_path).dimmed()
                )?;
            }
            if !paths.output_path.is_empty() {
                writeln!(
                    out,
                    "  Output:   {}{}",
                    paths.output_path,
                    deleted_marker(&paths.output_path).dimmed()
                )?;
            }
        }

        if details.results.len() > 1 {
            writeln!(
                out,
                "\n  Combined: {} | {}",
                format_cost(details.total_cost()),
                format_duration(details.total_duration_ms())
            )?;
        }
    }

    if invocation == 0 {
        writeln!(out, "\n  No subagent invocations found in this session.")?;
    }

    Ok(())
}

/// The chain steps or parallel tasks requested by the triggering call.
fn write_plan<W: Write>(out: &mut W, args: &Value) -> io::Result<()> {
    let (label, steps) = match (non_empty_array(args, "chain"), non_empty_array(args, "tasks")) {
        (Some(chain), _) => ("Chain steps", chain),
        (None, Some(tasks)) => ("Parallel tasks", tasks),
        (None, None) => return Ok(()),
    };

    writeln!(out, "  {}: {}", label, steps.len())?;
    for step in steps {
        let agent = step.get("agent").and_then(Value::as_str).unwrap_or("?");
        let task = match step.get("task") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        writeln!(out, "    → {}: {}", agent, preview(&task, 120))?;
    }
    Ok(())
}

fn non_empty_array<'a>(args: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    args.get(key)
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
}
