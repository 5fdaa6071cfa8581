use std::fs;

use sessview_render::{render, RenderOptions, ReportMode, Window};
use sessview_sessions::{extract_turns, parse_session_str};
use tempfile::TempDir;

/// Helper: parse `input` and render `mode` into a plain (uncoloured) string.
fn render_str(mode: ReportMode, input: &str, options: RenderOptions) -> String {
    colored::control::set_override(false);
    let session = parse_session_str(input).unwrap();
    let turns = extract_turns(&session.messages);
    let mut out = Vec::new();
    render(&mut out, mode, &session, &turns, &options).unwrap();
    String::from_utf8(out).unwrap()
}

fn windowed(offset: usize, limit: usize) -> RenderOptions {
    RenderOptions {
        window: Window::new(offset, limit),
        ..RenderOptions::default()
    }
}

const BASIC: &str = r#"{"type":"session","id":"S1","cwd":"/work","timestamp":"2026-01-20T10:00:00Z","version":3}
{"type":"message","timestamp":"2026-01-20T10:00:01Z","message":{"role":"user","content":"hello"}}
{"type":"message","timestamp":"2026-01-20T10:00:02Z","message":{"role":"assistant","content":[{"type":"text","text":"hi"}],"model":"claude-sonnet-4","usage":{"input":100,"output":20,"cacheRead":0,"cost":{"total":0.02}}}}
"#;

/// Two user turns, tool use in between, and one two-run subagent invocation.
fn rich_session(session_file: &str) -> String {
    format!(
        r#"{{"type":"session","id":"S2","cwd":"/work"}}
{{"type":"model_change","provider":"anthropic","modelId":"claude-sonnet-4"}}
{{"type":"thinking_level_change","thinkingLevel":"medium"}}
{{"type":"model_change","provider":"openai","modelId":"gpt-5"}}
{{"type":"message","timestamp":"2026-01-20T10:00:01Z","message":{{"role":"user","content":"first question"}}}}
{{"type":"message","timestamp":"2026-01-20T10:00:02Z","message":{{"role":"assistant","content":[{{"type":"thinking","thinking":"hmm"}},{{"type":"toolCall","id":"c1","name":"bash","arguments":{{"command":"ls"}}}}],"model":"gpt-5","usage":{{"input":1000,"output":50,"cacheRead":2000,"cost":{{"total":0.01}}}}}}}}
{{"type":"message","timestamp":"2026-01-20T10:00:03Z","message":{{"role":"toolResult","toolCallId":"c1","toolName":"bash","isError":true,"content":[{{"type":"text","text":"permission denied"}}]}}}}
{{"type":"message","timestamp":"2026-01-20T10:00:04Z","message":{{"role":"user","content":"second question"}}}}
{{"type":"message","timestamp":"2026-01-20T10:00:05Z","message":{{"role":"assistant","content":[{{"type":"text","text":"delegating"}},{{"type":"toolCall","id":"c2","name":"subagent","arguments":{{"chain":[{{"agent":"scout","task":"map the repo"}},{{"agent":"worker","task":"apply the fix"}}]}}}}],"model":"gpt-5","usage":{{"input":500,"output":10,"cacheRead":0,"cost":{{"total":0.03}}}}}}}}
{{"type":"message","timestamp":"2026-01-20T10:01:05Z","message":{{"role":"toolResult","toolCallId":"c2","toolName":"subagent","content":[{{"type":"text","text":"chain finished"}}],"details":{{"mode":"chain","results":[{{"agent":"scout","exitCode":0,"model":"haiku","usage":{{"input":10,"output":5,"cacheRead":1,"cost":0.05,"turns":2}},"progressSummary":{{"durationMs":1500,"toolCount":3}},"skills":["search"],"task":"map the repo","sessionFile":"{session_file}","artifactPaths":{{"jsonlPath":"/nonexistent/run.jsonl"}}}},{{"agent":"worker","exitCode":1,"model":"sonnet","usage":{{"cost":0.25}},"progressSummary":{{"durationMs":65000,"toolCount":9}},"task":"apply the fix"}}]}}}}}}
"#
    )
}

// ============================================================
// Overview
// ============================================================

#[test]
fn test_overview_basic_scenario() {
    let out = render_str(ReportMode::Overview, BASIC, RenderOptions::default());

    assert!(out.contains("SESSION OVERVIEW"));
    assert!(out.contains("ID:        S1"));
    assert!(out.contains("Version:   3"));
    assert!(out.contains("USER #1: hello"));
    let assistant = out
        .lines()
        .find(|l| l.contains("ASSISTANT:"))
        .expect("assistant line");
    assert!(assistant.contains("\"hi\""));
    assert!(assistant.contains("($0.0200)"));
    assert!(out.contains("Turns:     2 total (1 user, 1 assistant, 0 tool results)"));
    assert!(out.contains("Session cost: $0.0200"));
    assert!(out.contains("Session tokens: 120 (in:100 out:20)"));
}

#[test]
fn test_overview_empty_input() {
    let out = render_str(ReportMode::Overview, "", RenderOptions::default());

    assert!(out.contains("ID:        N/A"));
    assert!(out.contains("Turns:     0 total (0 user, 0 assistant, 0 tool results)"));
    assert!(out.contains("TURN SUMMARY"));
    assert!(!out.contains("Session cost"));
    assert!(out.trim_end().ends_with(&"-".repeat(70)));
}

#[test]
fn test_overview_prints_every_event() {
    let out = render_str(ReportMode::Overview, &rich_session(""), RenderOptions::default());

    let models: Vec<&str> = out.lines().filter(|l| l.contains("Model:")).collect();
    assert_eq!(
        models,
        vec![
            "  Model:     anthropic/claude-sonnet-4",
            "  Model:     openai/gpt-5"
        ]
    );
    assert!(out.contains("Thinking:  medium"));
}

#[test]
fn test_overview_subagent_summary() {
    let out = render_str(ReportMode::Overview, &rich_session(""), RenderOptions::default());

    assert!(out.contains("SUBAGENT [chain] · 2 run(s), $0.3000, 1m6s"));
    assert!(out.contains("  ✓ scout (haiku): map the repo"));
    assert!(out.contains("    $0.0500 | 1s | 3 tools"));
    assert!(out.contains("  ❌ worker (sonnet): apply the fix"));
    assert!(out.contains("Subagent cost:  $0.3000 (1 invocations)"));
    assert!(out.contains("TOTAL cost:     $0.3400"));
    assert!(out.contains("↳ bash ❌: permission denied"));
    assert!(out.contains("tools: [bash]"));
}

#[test]
fn test_overview_window_skips_earlier_turns() {
    let out = render_str(ReportMode::Overview, &rich_session(""), windowed(1, 1));

    assert!(!out.contains("USER #1"));
    assert!(out.contains("USER #2: second question"));
    assert!(!out.contains("permission denied"));
    assert!(out.contains("\"delegating\""));
    // Totals ignore the window.
    assert!(out.contains("Turns:     6 total (2 user, 2 assistant, 2 tool results)"));
}

// ============================================================
// Conversation / Full
// ============================================================

#[test]
fn test_conversation_shows_text_and_subagents_only() {
    let out = render_str(
        ReportMode::Conversation,
        &rich_session(""),
        RenderOptions::default(),
    );

    assert!(out.contains("USER [10:00:01]"));
    assert!(out.contains("first question"));
    assert!(out.contains("ASSISTANT [10:00:05]"));
    assert!(out.contains("delegating"));
    // The tool-only assistant turn has no text and is skipped.
    assert!(!out.contains("ASSISTANT [10:00:02]"));
    assert!(!out.contains("permission denied"));
    assert!(out.contains("SUBAGENT [chain]"));
}

#[test]
fn test_conversation_truncates_blocks() {
    let long = "x".repeat(50);
    let input = format!(
        r#"{{"type":"message","message":{{"role":"user","content":"{long}"}}}}"#
    );
    let options = RenderOptions {
        max_content: 10,
        ..RenderOptions::default()
    };

    let out = render_str(ReportMode::Conversation, &input, options);

    assert!(out.contains(&format!("{}\n... [truncated, 50 chars total]", "x".repeat(10))));
    assert!(!out.contains(&"x".repeat(11)));
}

#[test]
fn test_full_shows_tool_calls_thinking_and_paths() {
    let out = render_str(ReportMode::Full, &rich_session("/tmp/sub.jsonl"), RenderOptions::default());

    assert!(out.contains("ASSISTANT [10:00:02] (gpt-5)"));
    assert!(out.contains("💭 THINKING: hmm"));
    assert!(out.contains("🔧 TOOL CALL: bash"));
    assert!(out.contains(r#"{"command":"ls"}"#));
    assert!(out.contains("↳ RESULT (bash) ❌ ERROR:"));
    assert!(out.contains("     permission denied"));
    assert!(out.contains("📁 session: /tmp/sub.jsonl"));
    assert!(out.contains("📁 artifact jsonl: /nonexistent/run.jsonl"));
}

// ============================================================
// Tools
// ============================================================

#[test]
fn test_tools_numbering_and_markers() {
    let out = render_str(ReportMode::Tools, &rich_session(""), RenderOptions::default());

    assert!(out.contains("[10:00:02] #1 bash"));
    assert!(out.contains("  result ❌: permission denied"));
    assert!(out.contains("[10:00:05] #2 subagent"));
    assert!(out.contains("SUBAGENT [chain]"));
}

#[test]
fn test_tools_numbering_survives_offset() {
    let out = render_str(ReportMode::Tools, &rich_session(""), windowed(1, 0));

    assert!(!out.contains("#1 bash"));
    assert!(out.contains("#2 subagent"));
}

#[test]
fn test_tools_result_is_capped() {
    let long = "y".repeat(800);
    let input = format!(
        r#"{{"type":"message","message":{{"role":"toolResult","toolName":"read","content":"{long}"}}}}"#
    );
    let options = RenderOptions {
        max_content: 0,
        ..RenderOptions::default()
    };

    let out = render_str(ReportMode::Tools, &input, options);

    assert!(out.contains("  result ✓: "));
    assert!(out.contains("[truncated, 800 chars total]"));
    assert!(!out.contains(&"y".repeat(501)));
}

// ============================================================
// Costs
// ============================================================

#[test]
fn test_costs_rows_and_totals() {
    let out = render_str(ReportMode::Costs, &rich_session(""), RenderOptions::default());

    let rows: Vec<&str> = out
        .lines()
        .filter(|l| ["1 ", "2 ", "S1 ", "S2 "].iter().any(|p| l.starts_with(p)))
        .collect();
    assert_eq!(rows.len(), 4, "{out}");
    assert!(rows[0].contains("gpt-5"));
    assert!(rows[0].contains("1,000"));
    assert!(rows[0].contains("2,000"));
    assert!(rows[0].trim_end().ends_with("$   0.0100"));
    assert!(out.contains("S1   subagent   scout/haiku"));
    assert!(out.contains("S2   subagent   worker/sonnet"));
    assert!(out.contains(&format!("{:<54} ${:>9.4}", "SESSION", 0.04)));
    assert!(out.contains(&format!("{:<54} ${:>9.4}", "SUBAGENTS", 0.30)));
    assert!(out.contains(&format!("{:<54} ${:>9.4}", "TOTAL", 0.34)));
}

#[test]
fn test_costs_window_keeps_numbering() {
    let out = render_str(ReportMode::Costs, &rich_session(""), windowed(1, 0));

    assert!(!out.lines().any(|l| l.starts_with("1 ")));
    assert!(out.lines().any(|l| l.starts_with("2 ")));
    // Subagent rows are never windowed.
    assert!(out.contains("S1   subagent"));
}

#[test]
fn test_costs_without_subagents_prints_only_total() {
    let out = render_str(ReportMode::Costs, BASIC, RenderOptions::default());

    assert!(!out.contains("SUBAGENTS"));
    assert!(out.contains(&format!("{:<54} ${:>9.4}", "TOTAL", 0.02)));
}

#[test]
fn test_overview_and_costs_agree_on_session_cost() {
    let input = rich_session("");
    let overview = render_str(ReportMode::Overview, &input, RenderOptions::default());
    let costs = render_str(ReportMode::Costs, &input, RenderOptions::default());

    assert!(overview.contains("Session cost: $0.0400"));
    assert!(costs.contains(&format!("{:<54} ${:>9.4}", "SESSION", 0.04)));
}

const NULL_FIELDS: &str = r#"{"type":"session","id":"S3"}
{"type":"message","message":{"role":"user","content":"hello","isError":null}}
{"type":"message","message":{"role":"assistant","content":[{"type":"text","text":"hi"},{"type":"toolCall","id":null,"name":"bash","arguments":{"command":"ls"}}],"model":null,"usage":{"input":100,"output":20,"cacheWrite":null,"cost":{"total":0.02}}}}
"#;

#[test]
fn test_null_fields_do_not_hide_turns() {
    let overview = render_str(ReportMode::Overview, NULL_FIELDS, RenderOptions::default());

    assert!(overview.contains("Turns:     2 total (1 user, 1 assistant, 0 tool results)"));
    assert!(overview.contains("USER #1: hello"));
    assert!(overview.contains("tools: [bash]"));
    assert!(overview.contains("Session cost: $0.0200"));

    let costs = render_str(ReportMode::Costs, NULL_FIELDS, RenderOptions::default());
    assert!(costs.contains(&format!("{:<54} ${:>9.4}", "TOTAL", 0.02)));
}

// ============================================================
// Subagents
// ============================================================

#[test]
fn test_subagents_report() {
    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join("scout.jsonl");
    fs::write(&session_file, "").unwrap();
    let input = rich_session(session_file.to_str().unwrap());

    let out = render_str(ReportMode::Subagents, &input, windowed(5, 1));

    assert!(out.contains("INVOCATION #1 · mode: chain"));
    assert!(out.contains("Chain steps: 2"));
    assert!(out.contains("→ scout: map the repo"));
    assert!(out.contains("── Run #1: scout ──"));
    assert!(out.contains("Status:   ✓ completed"));
    assert!(out.contains("Skills:   search"));
    assert!(out.contains("Tokens:   10 in / 5 out / 1 cached"));
    assert!(out.contains("Tools:    3 calls in 2 turns"));
    assert!(out.contains(&format!("Session:  {}\n", session_file.display())));
    assert!(out.contains("JSONL:    /nonexistent/run.jsonl (deleted)"));
    assert!(out.contains("── Run #2: worker ──"));
    assert!(out.contains("Status:   ❌ failed"));
    assert!(out.contains("Duration: 1m5s"));
    assert!(out.contains("Combined: $0.3000 | 1m6s"));
}

#[test]
fn test_subagents_report_when_none() {
    let out = render_str(ReportMode::Subagents, BASIC, RenderOptions::default());

    assert!(out.contains("No subagent invocations found in this session."));
}
