//! Command-line interface for remixer.
//!
//! Provides commands for remixing text, splitting completions offline,
//! sharing and copying items, and managing saved content.

use std::collections::{HashSet, VecDeque};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::task::JoinSet;
use tracing::debug;

use crate::adapters::desktop;
use crate::config::{self, StoreBackend};
use crate::core::{share_action, split_numbered, update, Effect, Msg, Remixer, Session, SplitInput};
use crate::domain::{CharCount, Notice, Platform, RemixRequest, RemixResult};
use crate::store::SavedStore;

pub mod saved;

/// remixer - rewrite text for social platforms with an LLM
#[derive(Parser, Debug)]
#[command(name = "remixer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remix source text for one or more platforms
    Remix {
        /// Target platforms (twitter, linkedin, instagram)
        #[arg(value_parser = parse_platform)]
        platforms: Vec<Platform>,

        /// Remix for every platform
        #[arg(long)]
        all: bool,

        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Save every resulting item
        #[arg(long)]
        save: bool,

        /// Share item N (1-based) of each result
        #[arg(long, value_name = "N")]
        share: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a completion into numbered items without calling the API
    Split {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Shape the output for this platform instead of always splitting
        #[arg(short, long, value_parser = parse_platform)]
        platform: Option<Platform>,
    },

    /// Manage saved content
    Saved {
        #[command(subcommand)]
        command: saved::SavedCommands,
    },

    /// Open the platform's share flow for a piece of text
    Share {
        #[arg(value_parser = parse_platform)]
        platform: Platform,

        /// Text to share (reads --input or stdin if not provided)
        #[arg(short, long)]
        content: Option<String>,

        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the share link instead of launching it
        #[arg(long)]
        print: bool,
    },

    /// Copy text to the clipboard
    Copy {
        #[arg(short, long)]
        content: Option<String>,

        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Check the completion endpoint and the store
    Health,

    /// Show resolved configuration (debug)
    Config,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse::<Platform>().map_err(|e| e.to_string())
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Remix {
                platforms,
                all,
                input,
                save,
                share,
                json,
            } => remix(platforms, all, input, save, share, json).await,
            Commands::Split { input, platform } => split(input, platform),
            Commands::Saved { command } => saved::execute(command).await,
            Commands::Share {
                platform,
                content,
                input,
                print,
            } => share(platform, content, input, print).await,
            Commands::Copy { content, input } => copy(content, input).await,
            Commands::Health => health().await,
            Commands::Config => show_config(),
        }
    }
}

/// Read text from a file, or from stdin when it is piped
pub(crate) fn read_input(input_file: Option<PathBuf>) -> Result<String> {
    let text = if let Some(path) = input_file {
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    };

    if text.trim().is_empty() {
        anyhow::bail!("Input is empty");
    }
    Ok(text)
}

/// Inline text wins over --input, which wins over stdin
fn content_or_input(content: Option<String>, input: Option<PathBuf>) -> Result<String> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => anyhow::bail!("Content is empty"),
        None => read_input(input),
    }
}

/// Runs session effects and feeds their outcomes back in
struct Driver {
    session: Session,
    store: Option<Arc<dyn SavedStore>>,
    pending: Vec<RemixRequest>,
    errors: usize,
}

impl Driver {
    fn new(store: Option<Arc<dyn SavedStore>>) -> Self {
        Self {
            session: Session::new(),
            store,
            pending: Vec::new(),
            errors: 0,
        }
    }

    async fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);

        while let Some(msg) = queue.pop_front() {
            let (next, effects) = update(std::mem::take(&mut self.session), msg);
            self.session = next;

            for effect in effects {
                match effect {
                    Effect::Remix(request) => self.pending.push(request),
                    Effect::Save(item) => {
                        let platform = item.platform;
                        let outcome = match &self.store {
                            Some(store) => store.insert(item).await.map_err(|e| e.to_string()),
                            None => Err("no store configured".to_string()),
                        };
                        queue.push_back(match outcome {
                            Ok(saved) => {
                                debug!(id = %saved.id, "Saved item");
                                Msg::SaveSucceeded { platform }
                            }
                            Err(error) => Msg::SaveFailed { platform, error },
                        });
                    }
                    Effect::Copy(text) => match desktop::copy_to_clipboard(&text).await {
                        Ok(()) => self.notify(Notice::copied()),
                        Err(e) => self.notify(Notice::error(format!("Copy failed: {}", e))),
                    },
                    Effect::Share(action) => match desktop::perform(&action).await {
                        Ok(()) => self.notify(Notice::info(format!("Opened {}", action.url()))),
                        Err(e) => {
                            self.notify(Notice::error(format!("Share failed: {}", e)));
                            println!("{}", action.url());
                        }
                    },
                    Effect::Notify(notice) => self.notify(notice),
                }
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        if notice.is_error() {
            self.errors += 1;
        }
        eprintln!("{}", notice);
    }
}

/// Remix input for the requested platforms
async fn remix(
    platforms: Vec<Platform>,
    all: bool,
    input: Option<PathBuf>,
    save: bool,
    share: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut targets = if all { Platform::ALL.to_vec() } else { platforms };
    let mut seen = HashSet::new();
    targets.retain(|p| seen.insert(*p));
    if targets.is_empty() {
        anyhow::bail!("No platform given. Name one or more platforms, or pass --all");
    }
    if share == Some(0) {
        anyhow::bail!("--share counts from 1");
    }

    let text = read_input(input)?;
    let cfg = config::config()?;
    let remixer = Arc::new(
        Remixer::new(cfg.completion_adapter()?).with_timeout(cfg.completion.timeout),
    );
    let store = if save { Some(cfg.saved_store()?) } else { None };

    let mut driver = Driver::new(store);
    driver.dispatch(Msg::InputChanged(text)).await;
    for platform in &targets {
        driver.dispatch(Msg::RemixClicked(*platform)).await;
    }

    // One task per platform; the remixer refuses duplicates anyway
    let mut tasks = JoinSet::new();
    for request in std::mem::take(&mut driver.pending) {
        let remixer = Arc::clone(&remixer);
        tasks.spawn(async move {
            let outcome = remixer.remix(&request).await;
            (request.platform(), outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (platform, outcome) = joined.context("Remix task panicked")?;
        let msg = match outcome {
            Ok(result) => Msg::RemixSucceeded { platform, result },
            Err(e) => Msg::RemixFailed {
                platform,
                error: e.to_string(),
            },
        };
        driver.dispatch(msg).await;
    }
    let remix_errors = driver.errors;

    if json {
        let results: serde_json::Map<String, serde_json::Value> = targets
            .iter()
            .filter_map(|p| {
                let result = driver.session.output(*p)?;
                Some((p.tag().to_string(), serde_json::to_value(result).ok()?))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for platform in &targets {
            if let Some(result) = driver.session.output(*platform) {
                render(*platform, result);
            }
        }
    }

    for platform in &targets {
        let count = driver.session.output(*platform).map_or(0, RemixResult::len);
        if save {
            for index in 0..count {
                driver
                    .dispatch(Msg::SaveClicked {
                        platform: *platform,
                        index,
                    })
                    .await;
            }
        }
        if let Some(n) = share {
            if n <= count {
                driver
                    .dispatch(Msg::ShareClicked {
                        platform: *platform,
                        index: n - 1,
                    })
                    .await;
            }
        }
    }

    if remix_errors > 0 {
        anyhow::bail!("{} of {} remixes failed", remix_errors, targets.len());
    }
    Ok(())
}

/// Print one platform's result
fn render(platform: Platform, result: &RemixResult) {
    println!("══ {} ══", platform.label());
    match result {
        RemixResult::Single(text) => {
            println!("{}", text);
        }
        RemixResult::Sequence(items) if items.is_empty() => {
            println!("(no items)");
        }
        RemixResult::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let item = item.trim();
                println!("{}. {}", i + 1, item);
                println!("   [{}]", CharCount::of(item, platform));
            }
        }
    }
    println!();
}

/// Offline splitter
fn split(input: Option<PathBuf>, platform: Option<Platform>) -> Result<()> {
    let text = read_input(input)?;
    let result = match platform {
        Some(p) => crate::core::split_for_platform(p, &text),
        None => RemixResult::Sequence(split_numbered(SplitInput::Text(&text))),
    };
    for item in result.items() {
        println!("{}", item);
    }
    Ok(())
}

async fn share(
    platform: Platform,
    content: Option<String>,
    input: Option<PathBuf>,
    print: bool,
) -> Result<()> {
    let text = content_or_input(content, input)?;
    let action = share_action(platform, &text);

    if print {
        println!("{}", action.url());
        return Ok(());
    }

    desktop::perform(&action)
        .await
        .with_context(|| format!("Failed to share to {}", platform.label()))?;
    eprintln!("{}", Notice::info(format!("Opened {}", action.url())));
    Ok(())
}

async fn copy(content: Option<String>, input: Option<PathBuf>) -> Result<()> {
    let text = content_or_input(content, input)?;
    desktop::copy_to_clipboard(text.trim()).await?;
    eprintln!("{}", Notice::copied());
    Ok(())
}

/// Check both external collaborators
async fn health() -> Result<()> {
    let cfg = config::config()?;
    let mut failures = 0;

    match cfg.completion_adapter() {
        Ok(adapter) => match adapter.health_check().await {
            Ok(()) => println!("completion ({}): ok", adapter.name()),
            Err(e) => {
                failures += 1;
                println!("completion ({}): {}", adapter.name(), e);
            }
        },
        Err(e) => {
            failures += 1;
            println!("completion: {}", e);
        }
    }

    match cfg.saved_store() {
        Ok(store) => match store.health_check().await {
            Ok(()) => println!("store ({}): ok", store.name()),
            Err(e) => {
                failures += 1;
                println!("store ({}): {}", store.name(), e);
            }
        },
        Err(e) => {
            failures += 1;
            println!("store: {}", e);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} health check(s) failed", failures);
    }
    Ok(())
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "(set)",
        None => "(not set)",
    }
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;
    let c = &cfg.completion;
    let s = &cfg.store;

    println!("Remixer Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Home: {}", cfg.home.display());
    println!();
    println!("Completion:");
    println!("  Provider:   {:?}", c.provider);
    println!("  Model:      {}", c.model);
    println!("  Max tokens: {}", c.max_tokens);
    println!("  Base URL:   {}", c.base_url);
    println!("  Relay URL:  {}", c.api_url);
    println!("  Timeout:    {}s", c.timeout.as_secs());
    println!("  API key:    {}", redact(c.api_key.as_deref()));
    println!();
    println!("Store:");
    println!("  Backend:    {:?}", s.backend);
    match s.backend {
        StoreBackend::Supabase => {
            println!("  URL:        {}", s.url.as_deref().unwrap_or("(not set)"));
            println!("  Table:      {}", s.table);
            println!("  Anon key:   {}", redact(s.anon_key.as_deref()));
        }
        StoreBackend::Sqlite => {
            println!("  Database:   {}", s.sqlite_path.display());
        }
    }

    Ok(())
}
