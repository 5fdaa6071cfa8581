use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::lenient;

/// Tool name the runtime uses for delegated sub-invocations.
pub const SUBAGENT_TOOL: &str = "subagent";

/// Header fields from the `session` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionMetadata {
    pub id: Option<String>,
    pub cwd: Option<String>,
    pub timestamp: Option<String>,
    pub version: Option<String>,
}

impl SessionMetadata {
    pub fn from_record(record: &Value) -> Self {
        Self {
            id: display_field(record, "id"),
            cwd: display_field(record, "cwd"),
            timestamp: display_field(record, "timestamp"),
            version: display_field(record, "version"),
        }
    }
}

/// Strings come back as-is; other scalars keep their JSON text (`3`, `true`).
fn display_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Model and thinking-level changes, replayed in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    ModelChange { provider: String, model_id: String },
    ThinkingLevelChange { thinking_level: String },
}

impl SessionEvent {
    /// Build an event from a `model_change` / `thinking_level_change` record.
    /// Returns `None` for any other record type.
    pub fn from_record(record: &Value) -> Option<Self> {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        match record.get("type").and_then(Value::as_str)? {
            "model_change" => Some(SessionEvent::ModelChange {
                provider: text("provider"),
                model_id: text("modelId"),
            }),
            "thinking_level_change" => Some(SessionEvent::ThinkingLevelChange {
                thinking_level: text("thinkingLevel"),
            }),
            _ => None,
        }
    }
}

/// A `message` record exactly as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawMessage(Value);

impl RawMessage {
    pub fn new(record: Value) -> Self {
        Self(record)
    }

    pub fn record(&self) -> &Value {
        &self.0
    }

    /// The nested `message` object, or `Null` when absent.
    pub fn body(&self) -> &Value {
        self.0.get("message").unwrap_or(&Value::Null)
    }
}

/// Everything read from one session file, before normalization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedSession {
    pub metadata: SessionMetadata,
    pub events: Vec<SessionEvent>,
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    ToolResult,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::ToolResult => "toolResult",
            Role::Other(s) => s,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "toolResult" => Role::ToolResult,
            other => Role::Other(other.to_string()),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Either epoch milliseconds or an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    /// Zero, empty strings and non-scalar values are treated as missing.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().filter(|ms| *ms != 0.0).map(Timestamp::Millis),
            Value::String(s) if !s.is_empty() => Some(Timestamp::Text(s.clone())),
            _ => None,
        }
    }
}

/// Monetary cost: a bare number for subagent runs, a breakdown with a
/// `total` for assistant turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cost {
    Flat(f64),
    Breakdown(CostBreakdown),
}

impl Default for Cost {
    fn default() -> Self {
        Cost::Flat(0.0)
    }
}

impl Cost {
    pub fn total(&self) -> f64 {
        match self {
            Cost::Flat(total) => *total,
            Cost::Breakdown(b) => b.total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostBreakdown {
    #[serde(deserialize_with = "lenient::or_default")]
    pub input: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub output: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cache_read: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cache_write: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub total: f64,
}

/// Token and cost accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Usage {
    #[serde(deserialize_with = "lenient::count")]
    pub input: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub output: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub cache_read: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub cache_write: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub total_tokens: u64,
    /// Only reported for subagent runs.
    #[serde(deserialize_with = "lenient::count")]
    pub turns: u64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cost: Cost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Cost-bearing fields of an assistant turn that reported usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantUsage {
    pub model: String,
    pub provider: String,
    pub usage: Usage,
    pub stop_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subagent: Option<SubagentDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubagentDetails {
    #[serde(deserialize_with = "lenient::text")]
    pub mode: String,
    #[serde(deserialize_with = "lenient::list")]
    pub results: Vec<SubagentRun>,
}

impl SubagentDetails {
    pub fn total_cost(&self) -> f64 {
        self.results.iter().map(|r| r.usage.cost.total()).sum()
    }

    pub fn total_duration_ms(&self) -> f64 {
        self.results.iter().map(|r| r.progress_summary.duration_ms).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubagentRun {
    #[serde(deserialize_with = "lenient::text")]
    pub agent: String,
    #[serde(deserialize_with = "lenient::exit_code")]
    pub exit_code: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub model: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub usage: Usage,
    #[serde(deserialize_with = "lenient::or_default")]
    pub progress_summary: ProgressSummary,
    #[serde(deserialize_with = "lenient::list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub task: String,
    #[serde(deserialize_with = "lenient::text")]
    pub session_file: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub artifact_paths: ArtifactPaths,
}

impl Default for SubagentRun {
    fn default() -> Self {
        Self {
            agent: String::new(),
            // A run with no reported exit code is not a success.
            exit_code: -1,
            model: String::new(),
            usage: Usage::default(),
            progress_summary: ProgressSummary::default(),
            skills: Vec::new(),
            task: String::new(),
            session_file: String::new(),
            artifact_paths: ArtifactPaths::default(),
        }
    }
}

impl SubagentRun {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSummary {
    #[serde(deserialize_with = "lenient::or_default")]
    pub duration_ms: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub tool_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactPaths {
    #[serde(deserialize_with = "lenient::text")]
    pub jsonl_path: String,
    #[serde(deserialize_with = "lenient::text")]
    pub output_path: String,
}

/// One normalized message entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub timestamp: Option<Timestamp>,
    pub texts: Vec<String>,
    pub tool_calls: Vec<ToolCall>,
    pub thinking: Vec<String>,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<AssistantUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

impl Turn {
    pub fn usage(&self) -> Option<&Usage> {
        self.assistant.as_ref().map(|a| &a.usage)
    }

    pub fn cost(&self) -> f64 {
        self.usage().map(|u| u.cost.total()).unwrap_or(0.0)
    }

    pub fn model(&self) -> Option<&str> {
        self.assistant.as_ref().map(|a| a.model.as_str())
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool_result.as_ref().map(|r| r.tool_name.as_str())
    }

    pub fn subagent(&self) -> Option<&SubagentDetails> {
        self.tool_result.as_ref().and_then(|r| r.subagent.as_ref())
    }
}
