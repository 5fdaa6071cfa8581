use std::io::{self, Write};

use colored::Colorize;

use sessview_sessions::{Role, Turn};

use crate::format::{format_timestamp, subagent_summary, truncate};
use crate::window::numbered;
use crate::RenderOptions;

/// User and assistant text only. Subagent outcomes are kept since they
/// stand in for the delegated part of the conversation.
pub fn write_conversation<W: Write>(
    out: &mut W,
    turns: &[Turn],
    options: &RenderOptions,
) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "{}", "CONVERSATION".bold())?;
    writeln!(out, "{}", "=".repeat(70))?;

    for (turn_number, turn) in numbered(turns) {
        if !options.window.contains(turn_number) {
            continue;
        }

        match turn.role {
            Role::User => {
                let ts = format_timestamp(turn.timestamp.as_ref());
                writeln!(out, "\n{}", "─".repeat(50).dimmed())?;
                writeln!(out, "{}", format!("👤 USER [{}]", ts).bright_cyan().bold())?;
                writeln!(out, "{}", "─".repeat(50).dimmed())?;
                for text in &turn.texts {
                    writeln!(out, "{}", truncate(text, options.max_content))?;
                }
            }
            Role::Assistant if !turn.texts.is_empty() => {
                let ts = format_timestamp(turn.timestamp.as_ref());
                writeln!(
                    out,
                    "\n{}",
                    format!("🤖 ASSISTANT [{}]", ts).bright_blue().bold()
                )?;
                for text in &turn.texts {
                    writeln!(out, "{}", truncate(text, options.max_content))?;
                }
            }
            Role::ToolResult => {
                if let Some(details) = turn.subagent() {
                    writeln!(out, "\n{}", subagent_summary(details))?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
