//! # sessview-render
//!
//! Human-oriented text reports over a parsed session.
//!
//! ## Report Modes
//!
//! - `Overview` - metadata, cost summary and one line per turn
//! - `Conversation` - user and assistant text only
//! - `Full` - everything, including thinking, tool calls and results
//! - `Tools` - tool calls and their results
//! - `Costs` - per-turn and per-subagent cost table
//! - `Subagents` - one block per subagent invocation
//!
//! Every mode except `Subagents` honours the [`Window`] in [`RenderOptions`].

mod conversation;
mod costs;
pub mod format;
mod full;
mod overview;
mod subagents;
mod tools;
mod window;

use std::fmt;
use std::io::{self, Write};

use sessview_sessions::{ParsedSession, Turn};
use tracing::debug;

pub use overview::SessionTotals;
pub use tools::RESULT_CAP;
pub use window::{numbered, Numbered, Window};

/// Default per-block character limit.
pub const DEFAULT_MAX_CONTENT: usize = 2000;

/// Which report to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    #[default]
    Overview,
    Conversation,
    Full,
    Tools,
    Costs,
    Subagents,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Overview => "overview",
            ReportMode::Conversation => "conversation",
            ReportMode::Full => "full",
            ReportMode::Tools => "tools",
            ReportMode::Costs => "costs",
            ReportMode::Subagents => "subagents",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(ReportMode::Overview),
            "conversation" => Ok(ReportMode::Conversation),
            "full" => Ok(ReportMode::Full),
            "tools" => Ok(ReportMode::Tools),
            "costs" => Ok(ReportMode::Costs),
            "subagents" => Ok(ReportMode::Subagents),
            _ => Err(format!("Unknown report mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub window: Window,
    /// Maximum characters per content block; `0` means unlimited.
    pub max_content: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            window: Window::default(),
            max_content: DEFAULT_MAX_CONTENT,
        }
    }
}

/// Write the selected report for `session` to `out`.
///
/// `turns` must be the normalized form of `session.messages`.
pub fn render<W: Write>(
    out: &mut W,
    mode: ReportMode,
    session: &ParsedSession,
    turns: &[Turn],
    options: &RenderOptions,
) -> io::Result<()> {
    debug!(%mode, turns = turns.len(), ?options, "Rendering report");

    match mode {
        ReportMode::Overview => overview::write_overview(out, session, turns, options),
        ReportMode::Conversation => conversation::write_conversation(out, turns, options),
        ReportMode::Full => full::write_full(out, turns, options),
        ReportMode::Tools => tools::write_tools(out, turns, options),
        ReportMode::Costs => costs::write_costs(out, turns, options),
        ReportMode::Subagents => subagents::write_subagents(out, &session.messages),
    }
}
