use std::io::{self, Write};

use colored::Colorize;

use sessview_sessions::{Role, Turn};

use crate::format::{format_count, format_timestamp, or_placeholder};
use crate::window::numbered;
use crate::RenderOptions;

/// Per-assistant-turn cost table, followed by one row per subagent run.
///
/// Assistant rows honour the window; subagent rows always cover the whole
/// session. The SESSION total is the sum of the rows shown.
pub fn write_costs<W: Write>(out: &mut W, turns: &[Turn], options: &RenderOptions) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "COST BREAKDOWN".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(
        out,
        "{:<4} {:<10} {:<30} {:>8} {:>8} {:>8} {:>10}",
        "#", "Time", "Model", "In", "Out", "Cache", "Cost"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    let mut session_cost = 0.0;
    let mut assistant_number = 0usize;

    for (turn_number, turn) in numbered(turns) {
        if turn.role != Role::Assistant {
            continue;
        }
        let Some(assistant) = turn.assistant.as_ref() else {
            continue;
        };
        assistant_number += 1;
        if !options.window.contains(turn_number) {
            continue;
        }

        let usage = &assistant.usage;
        let total = usage.cost.total();
        session_cost += total;

        writeln!(
            out,
            "{:<4} {:<10} {:<30} {:>8} {:>8} {:>8} ${:>9.4}",
            assistant_number,
            format_timestamp(turn.timestamp.as_ref()),
            or_placeholder(&assistant.model),
            format_count(usage.input),
            format_count(usage.output),
            format_count(usage.cache_read),
            total
        )?;
    }

    let mut subagent_cost = 0.0;
    let mut sub_number = 0usize;
    for details in turns.iter().filter_map(Turn::subagent) {
        for run in &details.results {
            sub_number += 1;
            let cost = run.usage.cost.total();
            subagent_cost += cost;
            let label = format!("{}/{}", or_placeholder(&run.agent), or_placeholder(&run.model));
            writeln!(
                out,
                "{:<4} {:<10} {:<30} {:>8} {:>8} {:>8} ${:>9.4}",
                format!("S{}", sub_number),
                "subagent",
                label,
                format_count(run.usage.input),
                format_count(run.usage.output),
                format_count(run.usage.cache_read),
                cost
            )?;
        }
    }

    writeln!(out, "{}", "-".repeat(80))?;
    if subagent_cost > 0.0 {
        writeln!(out, "{:<54} ${:>9.4}", "SESSION", session_cost)?;
        writeln!(out, "{:<54} ${:>9.4}", "SUBAGENTS", subagent_cost)?;
    }
    writeln!(
        out,
        "{}",
        format!("{:<54} ${:>9.4}", "TOTAL", session_cost + subagent_cost).bold()
    )?;

    Ok(())
}
