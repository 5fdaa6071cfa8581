use serde::Deserialize;
use serde_json::Value;

use crate::lenient::{self, is_truthy};
use crate::types::{
    AssistantUsage, RawMessage, Role, SubagentDetails, Timestamp, ToolCall, ToolResult, Turn,
    Usage, SUBAGENT_TOOL,
};

/// How many messages before a subagent result are searched for the call
/// that produced it.
pub const SUBAGENT_LOOKBACK: usize = 4;

/// The fields of a `message` body that turn construction reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MessageBody {
    #[serde(deserialize_with = "lenient::text")]
    role: String,
    content: Value,
    #[serde(deserialize_with = "lenient::flag")]
    is_error: bool,
    #[serde(deserialize_with = "lenient::text")]
    model: String,
    #[serde(deserialize_with = "lenient::text")]
    provider: String,
    usage: Value,
    #[serde(deserialize_with = "lenient::text")]
    stop_reason: String,
    #[serde(deserialize_with = "lenient::text")]
    tool_call_id: String,
    #[serde(deserialize_with = "lenient::text")]
    tool_name: String,
    details: Value,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        #[serde(default, deserialize_with = "lenient::text")]
        text: String,
    },
    #[serde(rename = "toolCall")]
    ToolCall {
        #[serde(default, deserialize_with = "lenient::text")]
        id: String,
        #[serde(default, deserialize_with = "lenient::text")]
        name: String,
        #[serde(default = "empty_object")]
        arguments: Value,
    },
    #[serde(rename = "thinking")]
    Thinking {
        #[serde(default, deserialize_with = "lenient::text")]
        thinking: String,
    },
    #[serde(other)]
    Other,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Default)]
struct Extracted {
    texts: Vec<String>,
    tool_calls: Vec<ToolCall>,
    thinking: Vec<String>,
}

/// Convert raw message records into turns, one per record, in file order.
pub fn extract_turns(messages: &[RawMessage]) -> Vec<Turn> {
    messages.iter().map(normalize_message).collect()
}

pub fn normalize_message(entry: &RawMessage) -> Turn {
    let raw_body = entry.body();
    let body: MessageBody = lenient::from_value(raw_body, "message body");
    let role = Role::from(body.role.as_str());

    // The envelope timestamp wins whenever the key is present at all.
    let timestamp = match entry.record().get("timestamp") {
        Some(ts) => Timestamp::from_value(ts),
        None => raw_body.get("timestamp").and_then(Timestamp::from_value),
    };

    let Extracted {
        mut texts,
        tool_calls,
        thinking,
    } = extract_content(&body.content);

    let assistant = match role {
        Role::Assistant if is_non_empty_object(&body.usage) => Some(AssistantUsage {
            model: body.model,
            provider: body.provider,
            usage: lenient::from_value::<Usage>(&body.usage, "assistant usage"),
            stop_reason: body.stop_reason,
        }),
        _ => None,
    };

    let tool_result = if role == Role::ToolResult {
        // Result text replaces whatever the generic pass collected.
        texts = extract_content(&body.content).texts;
        let subagent = (body.tool_name == SUBAGENT_TOOL && is_truthy(&body.details))
            .then(|| lenient::from_value::<SubagentDetails>(&body.details, "subagent details"));
        Some(ToolResult {
            tool_call_id: body.tool_call_id,
            tool_name: body.tool_name,
            subagent,
        })
    } else {
        None
    };

    Turn {
        role,
        timestamp,
        texts,
        tool_calls,
        thinking,
        is_error: body.is_error,
        assistant,
        tool_result,
    }
}

/// Subagent details attached to a raw `toolResult` message body, if any.
pub fn extract_subagent_details(body: &Value) -> Option<SubagentDetails> {
    if body.get("role").and_then(Value::as_str) != Some("toolResult")
        || body.get("toolName").and_then(Value::as_str) != Some(SUBAGENT_TOOL)
    {
        return None;
    }
    let details = body.get("details").filter(|d| is_truthy(d))?;
    Some(lenient::from_value(details, "subagent details"))
}

/// Arguments of the `subagent` tool call that triggered the result at
/// `index`, searching at most [`SUBAGENT_LOOKBACK`] earlier messages.
/// The nearest match wins.
pub fn find_subagent_call(messages: &[RawMessage], index: usize) -> Option<&Value> {
    let end = index.min(messages.len());
    let start = end.saturating_sub(SUBAGENT_LOOKBACK);
    messages[start..end]
        .iter()
        .rev()
        .find_map(|entry| {
            entry
                .body()
                .get("content")
                .and_then(Value::as_array)?
                .iter()
                .find(|item| {
                    item.get("type").and_then(Value::as_str) == Some("toolCall")
                        && item.get("name").and_then(Value::as_str) == Some(SUBAGENT_TOOL)
                })
                .and_then(|item| item.get("arguments"))
        })
}

fn extract_content(content: &Value) -> Extracted {
    let mut out = Extracted::default();

    match content {
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.texts.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                // Fields inside a block fall back on their own; only items
                // that are not tagged objects are skipped.
                let Ok(block) = ContentBlock::deserialize(item) else {
                    continue;
                };
                match block {
                    ContentBlock::Text { text } if !text.trim().is_empty() => out.texts.push(text),
                    ContentBlock::ToolCall {
                        id,
                        name,
                        arguments,
                    } => out.tool_calls.push(ToolCall {
                        id,
                        name,
                        arguments,
                    }),
                    ContentBlock::Thinking { thinking } if !thinking.is_empty() => {
                        out.thinking.push(thinking)
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    out
}

fn is_non_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|m| !m.is_empty())
}
