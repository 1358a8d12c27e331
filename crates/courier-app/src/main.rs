//! Courier binary: composition root and interactive loop.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Install tracing (stderr)
//! 3. Build the HTTP transport and probe the backend
//! 4. Read operator lines from stdin and drive the session controller,
//!    printing new chat turns and the context panel as they appear

mod cli;
mod present;

use std::future::Future;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use courier_chat::{render_context, HttpTransport, Outcome, SessionController, SessionState};
use courier_core::config::CourierConfig;

use cli::CliArgs;

/// How often in-flight progress messages are flushed to stdout.
const PROGRESS_POLL: Duration = Duration::from_millis(100);

const HELP: &str = "\
Commands:
  /summarize   summarize today's unread emails
  /context     show the current context panel
  /help        show this help
  /quit        exit (Ctrl-D also works)
Anything else is sent to the agent.";

/// One line of operator input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Summarize,
    Context,
    Help,
    Quit,
    Send(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/summarize" => Command::Summarize,
        "/context" => Command::Context,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other if other.starts_with('/') && !other.contains(char::is_whitespace) => Command::Help,
        _ => Command::Send(line.to_string()),
    }
}

/// Terminal settings resolved from config and flags.
struct Output {
    color: bool,
    show_context: bool,
}

impl Output {
    /// Print every message appended since `printed`, advancing the cursor.
    fn flush_messages(&self, state: &SessionState, printed: &mut usize) {
        let fresh = state.messages_since(*printed);
        *printed += fresh.len();
        for message in &fresh {
            for line in present::format_message(message, self.color) {
                println!("{}", line);
            }
        }
    }

    fn print_context(&self, state: &SessionState) {
        let view = render_context(state.context().as_ref());
        let lines = present::format_context(&view);
        if lines.is_empty() {
            return;
        }
        println!("---- context ----");
        for line in lines {
            println!("{}", line);
        }
        println!("-----------------");
    }
}

/// Drive `op` to completion while streaming its messages as they land.
async fn run_streaming<F>(op: F, state: &SessionState, out: &Output, printed: &mut usize) -> Outcome
where
    F: Future<Output = Outcome>,
{
    tokio::pin!(op);
    let mut ticker = tokio::time::interval(PROGRESS_POLL);
    loop {
        tokio::select! {
            outcome = &mut op => {
                out.flush_messages(state, printed);
                return outcome;
            }
            _ = ticker.tick() => out.flush_messages(state, printed),
        }
    }
}

fn env_filter(args: &CliArgs, config_level: &str) -> EnvFilter {
    if let Some(level) = &args.log_level {
        return EnvFilter::new(level);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = CourierConfig::load_or_default(&config_file);

    // Tracing.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(&args, &config.general.log_level))
        .init();

    tracing::info!("Starting Courier v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Transport.
    config.backend.base_url = args.resolve_backend_url(&config.backend.base_url);
    let transport = HttpTransport::from_config(&config.backend)?;
    tracing::info!(url = %transport.base_url(), "Backend configured");

    match transport.health().await {
        Ok(health) if health.is_ok() => tracing::info!(service = %health.service, "Backend is up"),
        Ok(health) => tracing::warn!(status = %health.status, "Backend reported unexpected status"),
        Err(e) => tracing::warn!(error = %e, "Backend health check failed; continuing"),
    }

    // Session.
    let state = Arc::new(SessionState::new());
    let controller = SessionController::new(transport, Arc::clone(&state));
    tracing::info!(session = %state.id(), "Session started");

    let out = Output {
        color: config.display.color && std::io::stdout().is_terminal(),
        show_context: config.display.show_context && !args.no_context,
    };
    let mut printed = 0usize;

    println!("Courier. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Context => {
                out.print_context(&state);
                continue;
            }
            Command::Summarize => {
                run_streaming(controller.handle_summarize(), &state, &out, &mut printed).await
            }
            Command::Send(text) => {
                run_streaming(controller.handle_send(&text), &state, &out, &mut printed).await
            }
        };

        if outcome == Outcome::Completed && out.show_context {
            out.print_context(&state);
        }
    }

    tracing::info!(
        session = %state.id(),
        messages = state.message_count(),
        "Session ended"
    );
    Ok(())
}
