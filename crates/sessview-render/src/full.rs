use std::io::{self, Write};

use colored::Colorize;

use sessview_sessions::{Role, Turn};

use crate::format::{format_timestamp, or_placeholder, subagent_summary, truncate};
use crate::window::numbered;
use crate::RenderOptions;

/// Everything: text, thinking, tool calls with arguments, and tool results.
pub fn write_full<W: Write>(out: &mut W, turns: &[Turn], options: &RenderOptions) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "FULL SESSION".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;

    let max = options.max_content;

    for (turn_number, turn) in numbered(turns) {
        if !options.window.contains(turn_number) {
            continue;
        }
        let ts = format_timestamp(turn.timestamp.as_ref());

        match turn.role {
            Role::User => {
                writeln!(out, "\n{}", "═".repeat(60).dimmed())?;
                writeln!(out, "{}", format!("👤 USER [{}]", ts).bright_cyan().bold())?;
                writeln!(out, "{}", "═".repeat(60).dimmed())?;
                for text in &turn.texts {
                    writeln!(out, "{}", truncate(text, max))?;
                }
            }
            Role::Assistant => {
                let model = match turn.model() {
                    Some(m) if !m.is_empty() => format!(" ({})", m),
                    _ => String::new(),
                };
                writeln!(
                    out,
                    "\n{}{}",
                    format!("🤖 ASSISTANT [{}]", ts).bright_blue().bold(),
                    model.dimmed()
                )?;

                for thought in &turn.thinking {
                    writeln!(
                        out,
                        "  {} {}",
                        "💭 THINKING:".dimmed(),
                        truncate(thought, max)
                    )?;
                }

                for text in &turn.texts {
                    writeln!(out, "{}", truncate(text, max))?;
                }

                for call in &turn.tool_calls {
                    let args = call.arguments.to_string();
                    writeln!(
                        out,
                        "\n  {} {}",
                        "🔧 TOOL CALL:".bright_yellow(),
                        call.name
                    )?;
                    writeln!(out, "     {}", truncate(&args, max))?;
                }
            }
            Role::ToolResult => {
                if let Some(details) = turn.subagent() {
                    writeln!(out, "\n  {}", subagent_summary(details))?;
                    for run in &details.results {
                        if !run.session_file.is_empty() {
                            writeln!(out, "    📁 session: {}", run.session_file)?;
                        }
                        if !run.artifact_paths.jsonl_path.is_empty() {
                            writeln!(
                                out,
                                "    📁 artifact jsonl: {}",
                                run.artifact_paths.jsonl_path
                            )?;
                        }
                        if !run.artifact_paths.output_path.is_empty() {
                            writeln!(out, "    📁 output: {}", run.artifact_paths.output_path)?;
                        }
                    }
                } else {
                    let err = if turn.is_error {
                        " ❌ ERROR".bright_red().to_string()
                    } else {
                        String::new()
                    };
                    writeln!(
                        out,
                        "\n  ↳ RESULT ({}){}:",
                        or_placeholder(turn.tool_name().unwrap_or_default()),
                        err
                    )?;
                    for text in &turn.texts {
                        writeln!(out, "     {}", truncate(text, max))?;
                    }
                }
            }
            Role::Other(_) => {}
        }
    }

    Ok(())
}
