use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use castle_session::{GameSession, OfflineNarrator, OllamaNarrator, SessionConfig};

/// Options for `castle play`.
pub struct PlayOptions {
    pub offline: bool,
    pub model: Option<String>,
    pub host: Option<String>,
    pub timeout: Option<u64>,
    pub json: bool,
    pub journal: Option<PathBuf>,
}

pub fn run(opts: &PlayOptions) -> Result<(), String> {
    let mut session = start_session(opts)?;

    let result = if opts.json {
        json_loop(&mut session)
    } else {
        repl(&mut session)
    };

    if let Some(path) = &opts.journal {
        std::fs::write(path, session.journal().export_markdown())
            .map_err(|e| format!("failed to write journal to {}: {e}", path.display()))?;
        if !opts.json {
            println!("  Journal written to {}", path.display());
        }
    }

    result
}

fn start_session(opts: &PlayOptions) -> Result<GameSession, String> {
    let mut config = SessionConfig::from_env();
    if let Some(host) = &opts.host {
        config = config.with_host(host.as_str());
    }
    if let Some(model) = &opts.model {
        config = config.with_model(model.as_str());
    }
    if let Some(secs) = opts.timeout {
        config = config.with_timeout(secs);
    }

    if opts.offline {
        return Ok(GameSession::new(OfflineNarrator, config));
    }
    let narrator =
        OllamaNarrator::new(&config).map_err(|e| format!("failed to start narrator: {e}"))?;
    tracing::info!(endpoint = narrator.endpoint(), "using ollama narrator");
    Ok(GameSession::new(narrator, config))
}

fn repl(session: &mut GameSession) -> Result<(), String> {
    println!("  {} Escape the Castle", "Starting".bold());
    println!("  Type 'help' for commands, 'quit' to give up.\n");
    println!("{}\n", session.welcome());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    while !session.is_over() {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.process(input) {
            Ok(output) => println!("{}\n", paint(&output)),
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    Ok(())
}

/// Dim the bracketed status lines and embolden endings.
fn paint(output: &str) -> String {
    output
        .lines()
        .map(|line| {
            if line.starts_with('[') && line.ends_with(']') {
                line.dimmed().to_string()
            } else if line.starts_with("***") {
                line.bold().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn json_loop(session: &mut GameSession) -> Result<(), String> {
    let welcome = session.welcome();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json!({ "welcome": welcome })).map_err(|e| e.to_string())?;

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let value = if GameSession::is_local_command(input) {
            match session.process(input) {
                Ok(output) => json!({ "output": output }),
                Err(e) => json!({ "error": e.to_string() }),
            }
        } else {
            match session.take_turn(input) {
                Ok(report) => serde_json::to_value(&report).map_err(|e| e.to_string())?,
                Err(e) => json!({ "error": e.to_string() }),
            }
        };
        writeln!(stdout, "{value}").map_err(|e| e.to_string())?;

        if session.is_over() {
            break;
        }
    }

    Ok(())
}
