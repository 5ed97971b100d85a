//! Remix invoker.
//!
//! Sends source text with a platform instruction to the completion adapter
//! and shapes the answer. At most one request per platform is outstanding
//! at any time; a second call for a busy platform is refused without
//! touching the network.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::adapters::{AdapterError, CompletionAdapter};
use crate::domain::{PerPlatform, Platform, RemixRequest, RemixResult};

use super::splitter::split_for_platform;

/// Default time allowed for one completion
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors from a remix
#[derive(Debug, Error)]
pub enum RemixError {
    #[error("Source text is empty")]
    EmptyInput,

    #[error("A remix for {0} is already in flight")]
    AlreadyInFlight(Platform),

    #[error("Completion failed: {0}")]
    Adapter(#[from] AdapterError),
}

/// Prompt sent for a platform: instruction, then the quoted source text
pub fn build_prompt(platform: Platform, text: &str) -> String {
    format!("{} \"{}\"", platform.instruction(), text)
}

/// Remix invoker with per-platform in-flight tracking
pub struct Remixer {
    adapter: Arc<dyn CompletionAdapter>,
    in_flight: Arc<Mutex<PerPlatform<bool>>>,
    timeout: Duration,
}

impl Remixer {
    pub fn new(adapter: Arc<dyn CompletionAdapter>) -> Self {
        Self {
            adapter,
            in_flight: Arc::new(Mutex::new(PerPlatform::default())),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the platform's control should be disabled
    pub fn is_in_flight(&self, platform: Platform) -> bool {
        *lock(&self.in_flight).get(platform)
    }

    /// Remix source text for one platform
    #[instrument(skip(self, request), fields(platform = %request.platform(), adapter = self.adapter.name()))]
    pub async fn remix(&self, request: &RemixRequest) -> Result<RemixResult, RemixError> {
        let platform = request.platform();
        if request.source_text().trim().is_empty() {
            return Err(RemixError::EmptyInput);
        }

        let _slot = InFlightSlot::claim(&self.in_flight, platform)
            .ok_or(RemixError::AlreadyInFlight(platform))?;

        let prompt = build_prompt(platform, request.source_text());
        let started = Instant::now();

        match self.adapter.complete(&prompt, self.timeout).await {
            Ok(output) => {
                let result = split_for_platform(platform, &output.content);
                info!(
                    items = result.len(),
                    tokens = output.tokens_used,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Remix completed"
                );
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, "Remix failed");
                Err(e.into())
            }
        }
    }
}

/// Marks a platform busy until dropped
struct InFlightSlot {
    flags: Arc<Mutex<PerPlatform<bool>>>,
    platform: Platform,
}

impl InFlightSlot {
    fn claim(flags: &Arc<Mutex<PerPlatform<bool>>>, platform: Platform) -> Option<Self> {
        let mut guard = lock(flags);
        let busy = guard.get_mut(platform);
        if *busy {
            return None;
        }
        *busy = true;
        Some(Self {
            flags: Arc::clone(flags),
            platform,
        })
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        *lock(&self.flags).get_mut(self.platform) = false;
    }
}

/// The flags are plain bools, so a poisoned lock still holds usable data
fn lock(flags: &Mutex<PerPlatform<bool>>) -> MutexGuard<'_, PerPlatform<bool>> {
    flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AdapterOutput;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionAdapter for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _prompt: &str, _timeout: Duration) -> Result<AdapterOutput, AdapterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AdapterOutput::new(self.reply.to_string()))
        }

        async fn health_check(&self) -> Result<(), AdapterError> {
            Ok(())
        }
    }

    #[test]
    fn test_build_prompt_quotes_source() {
        let prompt = build_prompt(Platform::LinkedIn, "We shipped");
        assert!(prompt.starts_with("Rewrite this as a professional LinkedIn post."));
        assert!(prompt.ends_with(": \"We shipped\""));
    }

    #[tokio::test]
    async fn test_remix_splits_for_twitter() {
        let adapter = Arc::new(Canned {
            reply: "Here are some tweets:\n\n1. First\n\n2. Second",
            calls: AtomicUsize::new(0),
        });
        let remixer = Remixer::new(adapter.clone());
        let request = RemixRequest::new("source", Platform::Twitter).unwrap();

        let result = remixer.remix(&request).await.unwrap();

        assert_eq!(result, RemixResult::Sequence(vec!["First".into(), "Second".into()]));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
        assert!(!remixer.is_in_flight(Platform::Twitter));
    }

    #[test]
    fn test_slot_is_exclusive_and_released() {
        let flags = Arc::new(Mutex::new(PerPlatform::default()));

        let slot = InFlightSlot::claim(&flags, Platform::Twitter).unwrap();
        assert!(InFlightSlot::claim(&flags, Platform::Twitter).is_none());
        assert!(InFlightSlot::claim(&flags, Platform::Instagram).is_some());

        drop(slot);
        assert!(InFlightSlot::claim(&flags, Platform::Twitter).is_some());
    }
}
