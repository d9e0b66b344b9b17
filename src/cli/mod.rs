//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches into the
//! interactive chat loop or one of the one-shot commands.

pub mod model_list;
pub mod prompt_list;
pub mod say;
pub mod settings;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::prompt_list::list_prompts;
use crate::cli::say::run_say;
use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::core::app::AppInitConfig;
use crate::core::catalog::ModelCatalog;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::ThemeMode;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "parley", version)]
#[command(about = "A full-screen terminal chat client for a model-routing chat proxy")]
#[command(
    long_about = "Parley is a full-screen terminal chat client. Pick a model from the built-in \
catalog, send messages to a chat proxy's /api/chat endpoint, and read replies rendered \
as markdown.\n\n\
Endpoint resolution:\n\
  --endpoint, then PARLEY_ENDPOINT, then 'endpoint' in config.toml, then http://localhost:5000\n\n\
Controls:\n\
  Enter             Send the message\n\
  Shift/Alt+Enter   Insert a new line\n\
  Ctrl+P            Suggest an example prompt\n\
  Ctrl+O            Choose a model\n\
  Ctrl+Y            Copy a message to the clipboard\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+T            Toggle light/dark theme\n\
  PageUp/PageDown   Scroll the conversation\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model id to select at startup (see `parley models`)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the chat proxy
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Color theme for this session
    #[arg(long, global = true, value_name = "MODE", value_parser = parse_theme_mode)]
    pub theme: Option<ThemeMode>,

    /// Show replies as plain text instead of rendered markdown
    #[arg(long, global = true)]
    pub no_markdown: bool,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub debug_log: Option<PathBuf>,

    /// Print the conversation to stdout after leaving the chat
    #[arg(long, global = true)]
    pub print_transcript: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// List the available models
    Models,
    /// List the example prompts
    Prompts,
    /// Set a configuration value, or show all values when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

fn parse_theme_mode(value: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(value).ok_or_else(|| format!("unknown theme '{value}' (use light or dark)"))
}

impl Args {
    fn init_config(&self) -> AppInitConfig {
        AppInitConfig {
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            theme: self.theme,
            disable_markdown: self.no_markdown,
            print_transcript: self.print_transcript,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let init = args.init_config();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            run_chat(init, config).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            run_say(prompt, init, config).await
        }
        Commands::Models => {
            let config = Config::load()?;
            list_models(&ModelCatalog::builtin(), &config);
            Ok(())
        }
        Commands::Prompts => {
            list_prompts();
            Ok(())
        }
        Commands::Set { key, value } => handle_set(key, value),
        Commands::Unset { key } => handle_unset(&key),
    }
}

fn handle_set(key: Option<String>, value: Vec<String>) -> Result<(), Box<dyn Error>> {
    let registry = SettingRegistry::new();
    let mut config = Config::load()?;

    let Some(key) = key else {
        print_all_settings(&registry, &config);
        return Ok(());
    };

    let result = apply_setting(&registry, &mut config, &key, |handler, ctx| {
        handler.set(&value, ctx)
    });
    finish_setting(result, &config)
}

fn handle_unset(key: &str) -> Result<(), Box<dyn Error>> {
    let registry = SettingRegistry::new();
    let mut config = Config::load()?;
    let result = apply_setting(&registry, &mut config, key, |handler, ctx| handler.unset(ctx));
    finish_setting(result, &config)
}

fn apply_setting<F>(
    registry: &SettingRegistry,
    config: &mut Config,
    key: &str,
    op: F,
) -> Result<String, SettingError>
where
    F: FnOnce(&dyn settings::SettingHandler, &mut SetContext<'_>) -> Result<String, SettingError>,
{
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let catalog = ModelCatalog::builtin();
    let mut ctx = SetContext {
        config,
        catalog: &catalog,
    };
    op(handler, &mut ctx)
}

fn finish_setting(result: Result<String, SettingError>, config: &Config) -> Result<(), Box<dyn Error>> {
    let outcome = result.and_then(|message| {
        config
            .save()
            .map(|()| message)
            .map_err(|err| SettingError::ConfigError(err.to_string()))
    });

    match outcome {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(1);
        }
    }
}

fn print_all_settings(registry: &SettingRegistry, config: &Config) {
    println!("parley configuration");
    match Config::config_path() {
        Ok(path) => println!("  (file: {})", path.display()),
        Err(err) => println!("  ({err})"),
    }
    println!();
    for key in registry.keys_display_order() {
        if let Some(handler) = registry.get(key) {
            println!("{}", handler.format(config));
        }
    }
}
