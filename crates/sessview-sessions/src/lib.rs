//! # sessview-sessions
//!
//! Reads agent session transcripts (one JSON record per line) and normalizes
//! their `message` records into [`Turn`]s.
//!
//! - [`parse_session`] splits a file into metadata, events and raw messages.
//! - [`extract_turns`] builds one turn per raw message, in file order.

pub mod error;
mod lenient;
pub mod parser;
pub mod turns;
pub mod types;

pub use error::{Result, SessionError};
pub use parser::{parse_session, parse_session_str};
pub use turns::{
    extract_subagent_details, extract_turns, find_subagent_call, normalize_message,
    SUBAGENT_LOOKBACK,
};
pub use types::{
    ArtifactPaths, AssistantUsage, Cost, CostBreakdown, ParsedSession, ProgressSummary,
    RawMessage, Role, SessionEvent, SessionMetadata, SubagentDetails, SubagentRun, Timestamp,
    ToolCall, ToolResult, Turn, Usage, SUBAGENT_TOOL,
};
