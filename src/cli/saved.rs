//! Saved content commands.
//!
//! Provides:
//! - `remixer saved list` - list saved items, newest first
//! - `remixer saved edit <id>` - replace an item's content
//! - `remixer saved delete <id>` - remove an item

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config;
use crate::core::SavedPanel;
use crate::domain::{Notice, SavedId, SavedItem};

use super::read_input;

#[derive(Subcommand, Debug)]
pub enum SavedCommands {
    /// List saved items, newest first
    List {
        /// Maximum number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print full content instead of a table
        #[arg(long)]
        full: bool,
    },

    /// Replace a saved item's content
    Edit {
        /// Item id (from `saved list`)
        id: String,

        /// New content
        #[arg(short, long, conflicts_with = "input")]
        content: Option<String>,

        /// Read new content from a file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Delete a saved item
    Delete {
        /// Item id (from `saved list`)
        id: String,
    },
}

/// Execute a saved content command
pub async fn execute(cmd: SavedCommands) -> Result<()> {
    let store = config::config()?.saved_store()?;
    let mut panel = SavedPanel::new();

    match cmd {
        SavedCommands::List { limit, full } => {
            if let Some(notice) = panel.refresh(store.as_ref()).await {
                anyhow::bail!("{}", notice.message);
            }
            print_items(panel.items(), limit, full);
            Ok(())
        }
        SavedCommands::Edit { id, content, input } => {
            let content = match content {
                Some(text) => text,
                None => read_input(input)?,
            };
            let content = content.trim();
            if content.is_empty() {
                anyhow::bail!("Content is empty");
            }
            let notice = panel
                .edit(store.as_ref(), &SavedId::from(id.as_str()), content)
                .await;
            report(notice)
        }
        SavedCommands::Delete { id } => {
            let notice = panel.delete(store.as_ref(), &SavedId::from(id.as_str())).await;
            report(notice)
        }
    }
}

fn report(notice: Notice) -> Result<()> {
    eprintln!("{}", notice);
    if notice.is_error() {
        anyhow::bail!("{}", notice.message);
    }
    Ok(())
}

fn print_items(items: &[SavedItem], limit: usize, full: bool) {
    if items.is_empty() {
        println!("No saved content yet.");
        return;
    }

    if full {
        for item in items.iter().take(limit) {
            println!(
                "── {} · {} · {}",
                item.id,
                item.platform.label(),
                item.created_at.format("%Y-%m-%d %H:%M")
            );
            println!("{}", item.content);
            println!();
        }
    } else {
        println!(
            "{:<38} {:<10} {:<17} {}",
            "ID", "PLATFORM", "CREATED", "CONTENT"
        );
        println!("{}", "-".repeat(110));

        for item in items.iter().take(limit) {
            println!(
                "{:<38} {:<10} {:<17} {}",
                item.id.as_str(),
                item.platform.tag(),
                item.created_at.format("%Y-%m-%d %H:%M").to_string(),
                preview(&item.content, 40)
            );
        }
    }

    if items.len() > limit {
        println!();
        println!("... and {} more (use --limit to show more)", items.len() - limit);
    }
}

/// First line of the content, cut to `max` characters
fn preview(content: &str, max: usize) -> String {
    let line = content.trim().lines().next().unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else if content.trim().lines().count() > 1 {
        format!("{} ...", line)
    } else {
        line.to_string()
    }
}
