use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use commander::api::{select_chat_model, ModelSelector};
use commander::chat::ChatRequest;
use commander::cli::Args;
use commander::config::Config;
use commander::error::{CommanderError, Result};
use commander::session::{
    create_new_session, record_exchange, FilesystemSessionStore, SessionStore,
};
use commander::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
use commander::tools::ToolRegistry;
use commander::ui::{display_error, display_hello, TerminalSurface};
use commander::CommanderParticipant;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.hello {
        display_hello();
        return;
    }

    // Load configuration
    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            display_error(&format!("{:#}", e));
            process::exit(1);
        }
    };

    init_tracing(config.verbose);

    if args.clear_history {
        match FilesystemSessionStore::default_location().and_then(|s| s.clear_all_sessions()) {
            Ok(_) => {
                println!("{}", "All conversation history cleared.".green());
                return;
            }
            Err(e) => {
                display_error(&e);
                process::exit(1);
            }
        }
    }

    if args.command.is_empty() {
        print_usage();
        process::exit(1);
    }

    if let Err(e) = run(&args, &config).await {
        display_error(&e);
        process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with the streamed answer.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_settings(path: Option<PathBuf>) -> Result<Arc<dyn SettingsStore>> {
    match path.or_else(FileSettingsStore::default_path) {
        Some(path) => {
            let store = FileSettingsStore::open(path)?;
            tracing::debug!(path = %store.path().display(), "Using settings file");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No settings file location available, changes will not be persisted");
            Ok(Arc::new(MemorySettingsStore::new()))
        }
    }
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    let prompt = args.command.join(" ");

    let settings = open_settings(config.settings_path.clone())?;
    let model = select_chat_model(&ModelSelector::family(&config.model_family), config)?;
    tracing::debug!(family = %config.model_family, model = model.model_id(), "Selected chat model");

    let store = FilesystemSessionStore::default_location()?;
    let mut session = if args.new_conversation {
        create_new_session()
    } else if args.force_continue {
        store.find_latest_session()?.unwrap_or_else(create_new_session)
    } else {
        store.find_recent_session()?.unwrap_or_else(create_new_session)
    };

    let participant = CommanderParticipant::new(
        ToolRegistry::with_builtins(),
        settings,
        config.system_prompt.clone(),
        config.max_rounds,
    );

    let request = ChatRequest::new(prompt.clone());
    let mut surface = TerminalSurface::new();

    let outcome = tokio::select! {
        outcome = participant.handle_request(&model, &request, &session.turns, &mut surface) => outcome,
        _ = tokio::signal::ctrl_c() => Err(CommanderError::Cancelled),
    };
    let outcome = outcome?;
    tracing::debug!(rounds = outcome.rounds, tool_calls = outcome.tool_calls, "Request handled");

    record_exchange(&mut session, &prompt, surface.into_parts());
    if let Err(e) = store.save_session(&session) {
        tracing::warn!(error = %e, "Failed to save session");
    }

    Ok(())
}

fn print_usage() {
    eprintln!("{}", "Usage: commander [OPTIONS] <request>".red());
    eprintln!("{}", "  -n, --new                  Start a new conversation".dimmed());
    eprintln!(
        "{}",
        "  -c, --continue             Continue previous conversation even if expired".dimmed()
    );
    eprintln!("{}", "      --clear                Clear all conversation history".dimmed());
    eprintln!("{}", "      --model <FAMILY>       Model family to chat with".dimmed());
    eprintln!("{}", "      --api-endpoint <URL>   Custom API base URL".dimmed());
    eprintln!("{}", "      --settings-file <PATH> Settings file to read and update".dimmed());
    eprintln!("{}", "      --max-rounds <N>       Maximum tool-calling rounds per request".dimmed());
    eprintln!("{}", "  -v, --verbose              Log debug output to stderr".dimmed());
    eprintln!("{}", "      --hello                Show a hello world message".dimmed());
}
