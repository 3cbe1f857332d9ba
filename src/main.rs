use std::path::PathBuf;
use std::sync::Arc;

use questline::{Command, ContentRegistry, QuestSession, Settings, TokioClock};
use questline::events::Notifier;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Input
// ============================================================================

/// A line of input from the presentation layer
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Command(Command),
    Status,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// ```text
/// advance
/// open
/// hint
/// add <steps> <title> | <description>
/// status
/// quit
/// ```
fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let input = match word {
        "advance" => Input::Command(Command::AdvanceStep),
        "open" => Input::Command(Command::OpenQuestPanel),
        "hint" => Input::Command(Command::RequestHint),
        "status" => Input::Status,
        "quit" | "exit" => Input::Quit,
        "add" => {
            let (steps, rest) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
            let total_steps = steps
                .parse::<u32>()
                .map_err(|_| format!("Invalid step count '{}'", steps))?;
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            let title = title.trim();
            if title.is_empty() {
                return Err("Usage: add <steps> <title> | <description>".to_string());
            }
            Input::Command(Command::AddQuest {
                title: title.to_string(),
                description: description.trim().to_string(),
                total_steps,
            })
        }
        other => return Err(format!("Unknown command '{}'", other)),
    };
    Ok(Some(input))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the notification stream
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("questline=info")),
        )
        .init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.toml"));

    let settings = match Settings::load(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let content = match ContentRegistry::load_from_directory(&settings.data_dir) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to load quest content: {}", e);
            std::process::exit(1);
        }
    };

    let (clock, mut timers) = TokioClock::new();
    let (notifier, mut notifications) = Notifier::channel();

    // Presentation output: one JSON object per line
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            match serde_json::to_string(&notification) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to encode {} notification: {}", notification.event_type(), e),
            }
        }
    });

    let mut session = match QuestSession::from_content(&content, &settings.hints, Arc::new(clock), notifier) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };

                match parse_input(&line) {
                    Ok(Some(Input::Command(command))) => {
                        if let Err(e) = session.handle(command) {
                            warn!("{}", e);
                        }
                    }
                    Ok(Some(Input::Status)) => {
                        let gate = session.gate();
                        info!(
                            "Quest {}/{}: {:?}; hints {} (display left {:?}, lock left {:?})",
                            session.tracker().current_quest_index(),
                            session.tracker().len(),
                            session.view(),
                            gate.cycle().as_str(),
                            gate.remaining_display(),
                            gate.remaining_lock(),
                        );
                    }
                    Ok(Some(Input::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                }
            }
            Some(timer) = timers.recv() => session.on_timer(timer),
        }
    }

    info!("Shutting down");
    drop(session);
    if let Err(e) = printer.await {
        error!("Notification printer failed: {}", e);
    }
}
