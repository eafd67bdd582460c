use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use mailbrief::agent::{placement, HostKind, PageAgent, TriggerOutcome};
use mailbrief::background::BackgroundAgent;
use mailbrief::clipboard::SystemClipboard;
use mailbrief::config::{ApiKey, Config, CredentialStore, FileCredentialStore};
use mailbrief::ipc::IpcLayer;
use mailbrief::logging::init_tracing;
use mailbrief::page::Document;

#[derive(Parser)]
#[command(name = "mailbrief")]
#[command(about = "Summarize the email open in a webmail page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the page agent against an HTML snapshot and print the result
    Summarize {
        /// Saved webmail page
        html_file: PathBuf,

        /// Hostname the page was served from
        #[arg(long, default_value = "mail.google.com")]
        host: String,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Validate and store a key
    Set { key: String },
    /// Report whether a key is stored
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let credentials = FileCredentialStore::new(Config::credentials_path());

    match cli.cmd {
        Command::Summarize { html_file, host } => {
            let config = Config::load().context("Failed to load configuration")?;
            summarize(&config, Arc::new(credentials), &html_file, &host).await
        }

        Command::Key { action } => match action {
            KeyAction::Set { key } => {
                let key = ApiKey::parse(&key)?;
                credentials.save(&key)?;
                println!("API key saved to {}", credentials.path().display());
                Ok(())
            }
            KeyAction::Status => {
                match credentials.load()? {
                    Some(key) => println!("API key configured ({key})"),
                    None => println!("No API key configured"),
                }
                Ok(())
            }
        },

        Command::Config { action } => match action {
            ConfigAction::Path => {
                println!("{}", Config::config_path().display());
                Ok(())
            }
        },
    }
}

async fn summarize(
    config: &Config,
    credentials: Arc<dyn CredentialStore>,
    html_file: &Path,
    host: &str,
) -> Result<()> {
    let html = std::fs::read_to_string(html_file)
        .with_context(|| format!("Failed to read {}", html_file.display()))?;
    let document = Document::parse_html(&html);
    let host = HostKind::from_hostname(host);

    let background = BackgroundAgent::from_config(config, credentials)
        .map_err(|e| anyhow!("Failed to create background agent: {e}"))?;
    let (client, server) = IpcLayer::new();
    tokio::spawn(server.run(Arc::new(background)));

    let (mut agent, events) =
        PageAgent::install(document, host, client, Box::new(SystemClipboard), config);
    let mut outcomes = agent.subscribe_outcomes();
    let page = agent.page();
    let running = tokio::spawn(agent.run());

    let affordance = {
        let mut ctx = page.lock();
        placement::ensure_placed(&mut ctx);
        ctx.affordance()
    };
    events.click(affordance)?;

    let outcome = outcomes
        .recv()
        .await
        .ok_or_else(|| anyhow!("Page agent stopped before the summary finished"))?;

    {
        let ctx = page.lock();
        let body = ctx.modal.body_text(&ctx.document);
        match outcome {
            TriggerOutcome::Completed(state) if state.error_message().is_some() => {
                eprintln!("{body}");
            }
            _ => {
                println!("{body}");
                if ctx.modal.state().shows_truncation_notice() {
                    let notice = ctx.document.text_content(ctx.modal.truncation_notice());
                    println!("\n{notice}");
                }
            }
        }
    }

    events.shutdown()?;
    running.await?;
    Ok(())
}
