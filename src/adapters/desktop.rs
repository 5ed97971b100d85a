//! Desktop hooks: system clipboard and default browser.
//!
//! Shells out to whatever the platform provides. Nothing here is fatal;
//! callers turn errors into notices.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::core::share::ShareAction;

/// Clipboard writers, tried in order
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("clip", &[]),
];

/// Copy text to the system clipboard
pub async fn copy_to_clipboard(text: &str) -> Result<()> {
    for (program, args) in CLIPBOARD_COMMANDS {
        let child = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(_) => continue,
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .with_context(|| format!("Failed to write to {} stdin", program))?;
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", program))?;
        if status.success() {
            debug!(program, "Copied to clipboard");
            return Ok(());
        }
    }

    anyhow::bail!("No clipboard tool found (tried pbcopy, wl-copy, xclip, clip)")
}

/// Browser launcher for an OS, as program and arguments.
///
/// The URL always travels as one argument. `cmd /C start` is avoided on
/// Windows because `cmd` splits on the `&` in query strings.
fn browser_launcher(os: &str, url: &str) -> (&'static str, Vec<String>) {
    match os {
        "macos" => ("open", vec![url.to_string()]),
        "windows" => (
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()],
        ),
        _ => ("xdg-open", vec![url.to_string()]),
    }
}

/// Open a URL in the default browser
pub async fn open_url(url: &str) -> Result<()> {
    let (program, args) = browser_launcher(std::env::consts::OS, url);

    let status = Command::new(program)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("Failed to launch browser via {}", program))?;

    if !status.success() {
        anyhow::bail!("Browser launcher exited with {}", status);
    }
    debug!(program, "Opened URL");
    Ok(())
}

/// Carry out a share action
pub async fn perform(action: &ShareAction) -> Result<()> {
    match action {
        ShareAction::Open { url } => open_url(url).await,
        ShareAction::CopyThenOpen { text, url } => {
            copy_to_clipboard(text).await?;
            open_url(url).await
        }
    }
}
