//! Terminal chat client for LedgerChat
//!
//! A small REPL over `ledgerchat-core`: connects to the configured MCP
//! providers, binds their tools to the model and runs the conversation
//! loop until the user quits.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;

use ledgerchat_core::config::Settings;
use ledgerchat_core::logging::{ConsoleLogger, Logger, NoOpLogger};
use ledgerchat_core::model::GenaiModel;
use ledgerchat_core::session::{Session, TurnError};
use ledgerchat_core::tools::{ProviderConfig, ToolRegistry};
use ledgerchat_core::types::TurnRole;

#[derive(Parser, Debug)]
#[command(name = "ledgerchat", about = "Chat with an LLM that can call MCP tools")]
struct Cli {
    /// Model identifier (overrides LEDGERCHAT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Tool provider as name=url, repeatable (overrides LEDGERCHAT_SERVERS)
    #[arg(long = "server")]
    servers: Vec<String>,

    /// Sampling temperature (overrides LEDGERCHAT_TEMPERATURE)
    #[arg(long)]
    temperature: Option<f32>,

    /// Maximum concurrent tool invocations per turn
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log component activity to stderr
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    let logger: Arc<dyn Logger> = if cli.verbose {
        Arc::new(ConsoleLogger::new())
    } else {
        Arc::new(NoOpLogger::new())
    };

    println!("{}", "Connecting to tool providers...".dimmed());
    let registry = Arc::new(
        ToolRegistry::discover(&settings.providers, Arc::clone(&logger))
            .await
            .context("tool discovery failed")?,
    );
    println!(
        "{}",
        format!(
            "Connected. {} tool(s) available. Type /help for commands.",
            registry.len()
        )
        .dimmed()
    );

    let model = Arc::new(GenaiModel::new(settings.model_settings(), Arc::clone(&logger)));
    let session = Session::new(registry, model, settings.system_prompt.clone(), logger)
        .with_tool_concurrency(settings.tool_concurrency);

    repl(&session).await
}

/// Settings from the environment with CLI flags layered on top
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::from_env()?;

    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    if let Some(temperature) = cli.temperature {
        settings.temperature = temperature;
    }
    if let Some(concurrency) = cli.concurrency {
        settings.tool_concurrency = concurrency;
    }
    if !cli.servers.is_empty() {
        settings.providers = cli
            .servers
            .iter()
            .map(|entry| parse_server(entry))
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(settings)
}

fn parse_server(entry: &str) -> Result<ProviderConfig> {
    match entry.split_once('=') {
        Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
            Ok(ProviderConfig::new(name.trim(), url.trim()))
        }
        _ => bail!("invalid --server entry '{}', expected name=url", entry),
    }
}

async fn repl(session: &Session) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{} ", "you>".cyan().bold());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = line.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/tools" => {
                print_tools(session);
                continue;
            }
            "/history" => {
                print_history(session).await;
                continue;
            }
            _ => {}
        }

        match session.send(input).await {
            Ok(reply) => {
                println!("{} {}", "assistant>".green().bold(), reply);
            }
            Err(TurnError::TurnInProgress) => {
                println!("{}", "A turn is still running, try again.".yellow());
            }
            Err(TurnError::Model(e)) => {
                println!("{} {}", "error>".red().bold(), e);
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("  /tools    list the available tools");
    println!("  /history  show the conversation so far");
    println!("  /quit     exit");
}

fn print_tools(session: &Session) {
    let registry = session.registry();
    if registry.is_empty() {
        println!("{}", "No tools registered.".dimmed());
        return;
    }
    for spec in registry.specs() {
        println!("  {}  {}", spec.name.bold(), spec.description.dimmed());
    }
}

async fn print_history(session: &Session) {
    for turn in session.renderable().await {
        let label = match turn.role {
            TurnRole::User => "you>".cyan().bold(),
            TurnRole::Assistant => "assistant>".green().bold(),
        };
        println!("{} {}", label, turn.text);
    }
}
