use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "commander")]
#[command(about = "Chat with a settings commander that reads and changes your settings", long_about = None)]
pub struct Args {
    #[arg(short = 'n', long = "new", help = "Start a new conversation")]
    pub new_conversation: bool,

    #[arg(
        short = 'c',
        long = "continue",
        help = "Continue previous conversation even if expired"
    )]
    pub force_continue: bool,

    #[arg(long = "clear", help = "Clear all conversation history")]
    pub clear_history: bool,

    #[arg(long = "hello", help = "Show a hello world message and exit")]
    pub hello: bool,

    #[arg(long = "model", help = "Model family to chat with (e.g. gpt-4o)")]
    pub model_family: Option<String>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:11434/v1)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(long = "settings-file", help = "Settings file to read and update")]
    pub settings_file: Option<PathBuf>,

    #[arg(
        long = "max-rounds",
        help = "Maximum number of tool-calling rounds per request"
    )]
    pub max_rounds: Option<u32>,

    #[arg(short = 'v', long = "verbose", help = "Log debug output to stderr")]
    pub verbose: bool,

    #[arg(help = "Request to send to the commander")]
    pub command: Vec<String>,
}
