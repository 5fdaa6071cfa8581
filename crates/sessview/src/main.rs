mod config;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::debug;

use sessview_logging::{init_tracing, LogFormat};
use sessview_render::{render, RenderOptions, ReportMode, Window, DEFAULT_MAX_CONTENT};
use sessview_sessions::{
    extract_turns, parse_session, ParsedSession, SessionEvent, SessionMetadata, Turn,
};

use crate::config::ReaderConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sessview",
    about = "Readable reports from agent session JSONL transcripts",
    version
)]
struct Cli {
    /// Path to the .jsonl session file
    session_path: PathBuf,

    /// Report to print (default: overview)
    #[arg(short, long, value_enum)]
    mode: Option<ModeChoice>,

    /// Skip the first N user turns
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Show at most N user turns (0 = all)
    #[arg(long)]
    limit: Option<usize>,

    /// Max chars per content block (default: 2000, 0 = unlimited)
    #[arg(long)]
    max_content: Option<usize>,

    /// Print the normalized session as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Log filter for diagnostics on stderr (default: warn)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormatChoice>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeChoice {
    Overview,
    Conversation,
    Full,
    Tools,
    Costs,
    Subagents,
}

impl From<ModeChoice> for ReportMode {
    fn from(choice: ModeChoice) -> Self {
        match choice {
            ModeChoice::Overview => ReportMode::Overview,
            ModeChoice::Conversation => ReportMode::Conversation,
            ModeChoice::Full => ReportMode::Full,
            ModeChoice::Tools => ReportMode::Tools,
            ModeChoice::Costs => ReportMode::Costs,
            ModeChoice::Subagents => ReportMode::Subagents,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

/// Shape of `--json` output.
#[derive(Serialize)]
struct SessionDump<'a> {
    metadata: &'a SessionMetadata,
    events: &'a [SessionEvent],
    turns: &'a [Turn],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Runs before config loading: a missing session is reported even when
    // sessview.toml does not parse.
    let path = expand_home(&cli.session_path);
    if !path.exists() {
        eprintln!("Error: Session file not found: {}", path.display());
        std::process::exit(1);
    }

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = ReaderConfig::load(&working_dir)?.unwrap_or_default();

    let log_format = match cli.log_format {
        Some(choice) => choice.into(),
        None => config.log_format()?.unwrap_or_default(),
    };
    let log_level = cli
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or("warn");
    init_tracing(log_level, log_format);

    if cli.no_color || !config.color_enabled() {
        colored::control::set_override(false);
    }

    let session = parse_session(&path)
        .with_context(|| format!("Failed to read session {}", path.display()))?;
    let turns = extract_turns(&session.messages);
    debug!(path = %path.display(), turns = turns.len(), "Loaded session");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = if cli.json {
        write_json(&mut out, &session, &turns)
    } else {
        let mode = match cli.mode {
            Some(choice) => choice.into(),
            None => config.mode()?.unwrap_or_default(),
        };
        let options = RenderOptions {
            window: Window::new(cli.offset, cli.limit.or(config.limit).unwrap_or(0)),
            max_content: cli
                .max_content
                .or(config.max_content)
                .unwrap_or(DEFAULT_MAX_CONTENT),
        };
        render(&mut out, mode, &session, &turns, &options).and_then(|()| out.flush())
    };

    match result {
        // Piping into `head` closes stdout early; that is not a failure.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write report"),
    }
}

fn write_json<W: Write>(out: &mut W, session: &ParsedSession, turns: &[Turn]) -> io::Result<()> {
    let dump = SessionDump {
        metadata: &session.metadata,
        events: &session.events,
        turns,
    };
    serde_json::to_writer_pretty(&mut *out, &dump)?;
    writeln!(out)?;
    out.flush()
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
