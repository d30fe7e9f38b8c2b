use std::io::{self, IsTerminal};

use clap::{Parser, ValueEnum};
use colored::*;
use rustyline::DefaultEditor;
use servicedesk_assistant::{
    assistant::{Assistant, PlainAssistant, ToolAssistant},
    chat::ToolChoice,
    config::AssistantConfig,
    repl::{self, ReplOptions, ScriptedInput},
    servicedesk::ServiceDeskClient,
    tools::ToolRegistry,
};

/// Which assistant to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Plain chat, no tools
    Plain,
    /// Service desk assistant with tool calling
    Tools,
}

/// How the model may use the offered tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ToolChoiceArg {
    /// Call tools when useful
    Auto,
    /// Call at least one tool
    Required,
    /// Describe tools but never call them
    None,
}

impl From<ToolChoiceArg> for ToolChoice {
    fn from(arg: ToolChoiceArg) -> Self {
        match arg {
            ToolChoiceArg::Auto => ToolChoice::Auto,
            ToolChoiceArg::Required => ToolChoice::Any,
            ToolChoiceArg::None => ToolChoice::None,
        }
    }
}

/// Command line arguments for the service desk CLI
#[derive(Parser)]
#[clap(
    name = "servicedesk-cli",
    about = "Interactive service desk assistant backed by an OpenAI-compatible chat API"
)]
struct CliArgs {
    /// Assistant variant
    #[arg(long, value_enum, default_value_t = Mode::Tools)]
    mode: Mode,

    /// Model name to use
    #[arg(long)]
    model: Option<String>,

    /// API key for the model provider (defaults to $OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the chat completions API (defaults to $OPENAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Base URL of the service desk REST backend (defaults to $API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Temperature setting
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum tokens in the response
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Request timeout for model calls
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Tool rounds allowed per user turn
    #[arg(long)]
    max_tool_rounds: Option<usize>,

    /// Tool choice sent with tool-enabled requests
    #[arg(long, value_enum)]
    tool_choice: Option<ToolChoiceArg>,

    /// Do not open the tool session with a greeting
    #[arg(long)]
    no_greeting: bool,
}

impl CliArgs {
    fn apply(&self, config: &mut AssistantConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = Some(timeout);
        }
        if let Some(rounds) = self.max_tool_rounds {
            config.max_tool_rounds = rounds;
        }
        if let Some(choice) = self.tool_choice {
            config.tool_choice = choice.into();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    servicedesk_assistant::init_logging();

    let args = CliArgs::parse();
    let mut config = AssistantConfig::from_env();
    args.apply(&mut config);

    let provider = config
        .llm_builder()
        .build()
        .map_err(|e| format!("Failed to build provider: {e}"))?;

    let (assistant, greeting): (Box<dyn Assistant>, Option<String>) = match args.mode {
        Mode::Plain => (Box::new(PlainAssistant::new(Box::new(provider))), None),
        Mode::Tools => {
            let client = ServiceDeskClient::new(&config.api_base_url)?;
            let registry = ToolRegistry::new(client);
            let assistant = ToolAssistant::new(Box::new(provider), registry)
                .max_tool_rounds(config.max_tool_rounds);
            let greeting = (!args.no_greeting).then(|| "Hello!".to_string());
            (Box::new(assistant), greeting)
        }
    };

    log::info!(
        "Starting {} with model {} (service desk at {})",
        assistant.label(),
        config.model,
        config.api_base_url
    );

    let mut transcript = assistant.new_transcript();
    let mut stdout = io::stdout();
    let interactive = io::stdin().is_terminal();

    if interactive {
        println!("{}", "Service desk assistant".bright_cyan());
        println!("{}", "Type 'quit', 'exit' or 'bye' to leave".bright_black());
        println!("{}", "─".repeat(50).bright_black());

        let options = ReplOptions {
            greeting,
            spinner: stdout.is_terminal(),
        };
        let mut editor = DefaultEditor::new()?;
        repl::run(
            assistant.as_ref(),
            &mut transcript,
            &mut editor,
            &mut stdout,
            &options,
        )
        .await?;
    } else {
        let lines: Vec<String> = io::stdin().lines().collect::<Result<_, _>>()?;
        let options = ReplOptions {
            greeting,
            spinner: false,
        };
        repl::run(
            assistant.as_ref(),
            &mut transcript,
            &mut ScriptedInput::new(lines),
            &mut stdout,
            &options,
        )
        .await?;
    }

    Ok(())
}
