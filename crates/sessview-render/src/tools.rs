use std::io::{self, Write};

use colored::Colorize;

use sessview_sessions::{Role, Turn};

use crate::format::{format_timestamp, subagent_summary, truncate};
use crate::window::numbered;
use crate::RenderOptions;

/// Result text in this view never exceeds this many characters.
pub const RESULT_CAP: usize = 500;

/// Tool calls and their results only.
///
/// Calls are numbered across the whole session, so a call keeps its number
/// when an offset hides earlier ones.
pub fn write_tools<W: Write>(out: &mut W, turns: &[Turn], options: &RenderOptions) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "TOOL CALLS".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;

    let result_max = match options.max_content {
        0 => RESULT_CAP,
        max => max.min(RESULT_CAP),
    };
    let mut tool_number = 0usize;

    for (turn_number, turn) in numbered(turns) {
        let visible = options.window.contains(turn_number);

        match turn.role {
            Role::Assistant => {
                let ts = format_timestamp(turn.timestamp.as_ref());
                for call in &turn.tool_calls {
                    tool_number += 1;
                    if !visible {
                        continue;
                    }
                    let args = call.arguments.to_string();
                    writeln!(
                        out,
                        "\n[{}] {} {}",
                        ts,
                        format!("#{}", tool_number).bright_yellow(),
                        call.name.bold()
                    )?;
                    writeln!(out, "  args: {}", truncate(&args, options.max_content))?;
                }
            }
            Role::ToolResult if visible => {
                if let Some(details) = turn.subagent() {
                    writeln!(out, "  {}", subagent_summary(details))?;
                } else {
                    let marker = if turn.is_error {
                        " ❌".bright_red()
                    } else {
                        " ✓".bright_green()
                    };
                    let text = turn.texts.join(" ");
                    writeln!(out, "  result{}: {}", marker, truncate(&text, result_max))?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
