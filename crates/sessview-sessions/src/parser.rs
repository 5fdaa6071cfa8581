use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Result, SessionError};
use crate::types::{ParsedSession, RawMessage, SessionEvent, SessionMetadata};

/// Parse a session JSONL file into metadata, events and raw messages.
///
/// The whole file is read before returning. A single line that is not valid
/// JSON aborts the parse with [`SessionError::MalformedRecord`].
pub fn parse_session(path: &Path) -> Result<ParsedSession> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SessionError::NotFound(path.to_path_buf()),
        _ => SessionError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_records(BufReader::new(file), path)
}

/// Parse session records held in memory.
pub fn parse_session_str(input: &str) -> Result<ParsedSession> {
    parse_records(input.as_bytes(), Path::new("<memory>"))
}

fn parse_records<R: BufRead>(reader: R, origin: &Path) -> Result<ParsedSession> {
    let mut session = ParsedSession::default();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| SessionError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Value =
            serde_json::from_str(line).map_err(|source| SessionError::MalformedRecord {
                line: index + 1,
                source,
            })?;

        match record.get("type").and_then(Value::as_str) {
            Some("session") => session.metadata = SessionMetadata::from_record(&record),
            Some("model_change" | "thinking_level_change") => {
                if let Some(event) = SessionEvent::from_record(&record) {
                    session.events.push(event);
                }
            }
            Some("message") => session.messages.push(RawMessage::new(record)),
            other => {
                trace!(line = index + 1, kind = ?other, "Skipping record");
                skipped += 1;
            }
        }
    }

    debug!(
        origin = %origin.display(),
        events = session.events.len(),
        messages = session.messages.len(),
        skipped,
        "Parsed session records"
    );

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "\n   \n{\"type\":\"message\",\"message\":{\"role\":\"user\",\"content\":\"hi\"}}\n\n";
        let session = parse_session_str(input).unwrap();
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_last_session_record_wins() {
        let input = r#"{"type":"session","id":"first","cwd":"/a"}
{"type":"session","id":"second","version":3}"#;
        let session = parse_session_str(input).unwrap();
        assert_eq!(session.metadata.id.as_deref(), Some("second"));
        assert_eq!(session.metadata.cwd, None);
        assert_eq!(session.metadata.version.as_deref(), Some("3"));
    }

    #[test]
    fn test_unknown_and_untyped_records_are_dropped() {
        let input = r#"{"type":"custom_entry","data":1}
{"no_type":true}
42
{"type":"model_change","provider":"anthropic","modelId":"claude-sonnet"}"#;
        let session = parse_session_str(input).unwrap();
        assert!(session.messages.is_empty());
        assert_eq!(
            session.events,
            vec![SessionEvent::ModelChange {
                provider: "anthropic".to_string(),
                model_id: "claude-sonnet".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "{\"type\":\"session\",\"id\":\"S1\"}\n\n{not json\n";
        let err = parse_session_str(input).unwrap_err();
        match err {
            SessionError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = parse_session(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }
}
