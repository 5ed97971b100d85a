//! Remix session: pure state machine for the remix screen.
//!
//! The front end feeds user actions and completion outcomes in as [`Msg`]s
//! and carries out the returned [`Effect`]s. Nothing in here does I/O.

use crate::domain::{NewSavedItem, Notice, PerPlatform, Platform, RemixRequest, RemixResult};

use super::share::{share_action, ShareAction};

/// Messages into the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the source text box
    InputChanged(String),
    /// User asked for a remix
    RemixClicked(Platform),
    /// The completion for a platform came back
    RemixSucceeded {
        platform: Platform,
        result: RemixResult,
    },
    /// The completion for a platform failed
    RemixFailed { platform: Platform, error: String },
    /// User edited one output item in place
    ItemEdited {
        platform: Platform,
        index: usize,
        text: String,
    },
    /// User asked to persist one output item
    SaveClicked { platform: Platform, index: usize },
    SaveSucceeded { platform: Platform },
    SaveFailed { platform: Platform, error: String },
    CopyClicked { platform: Platform, index: usize },
    ShareClicked { platform: Platform, index: usize },
}

/// Work for the front end to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Remix(RemixRequest),
    Save(NewSavedItem),
    Copy(String),
    Share(ShareAction),
    Notify(Notice),
}

/// State of the remix screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    input: String,
    loading: PerPlatform<bool>,
    outputs: PerPlatform<Option<RemixResult>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self, platform: Platform) -> bool {
        *self.loading.get(platform)
    }

    pub fn output(&self, platform: Platform) -> Option<&RemixResult> {
        self.outputs.get(platform).as_ref()
    }

    /// Whether the remix control for a platform is enabled
    pub fn can_remix(&self, platform: Platform) -> bool {
        !self.is_loading(platform) && !self.input.trim().is_empty()
    }

    fn item(&self, platform: Platform, index: usize) -> Option<String> {
        self.output(platform)
            .and_then(|r| r.item(index))
            .map(|s| s.trim().to_string())
    }
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.input = text;
            Vec::new()
        }
        Msg::RemixClicked(platform) => {
            if !state.can_remix(platform) {
                return (state, Vec::new());
            }
            match RemixRequest::new(state.input.clone(), platform) {
                Ok(request) => {
                    *state.loading.get_mut(platform) = true;
                    vec![Effect::Remix(request)]
                }
                Err(_) => Vec::new(),
            }
        }
        Msg::RemixSucceeded { platform, result } => {
            // Stale or orphaned responses are dropped
            if !state.is_loading(platform) {
                return (state, Vec::new());
            }
            *state.loading.get_mut(platform) = false;
            *state.outputs.get_mut(platform) = Some(result);
            Vec::new()
        }
        Msg::RemixFailed { platform, error } => {
            if !state.is_loading(platform) {
                return (state, Vec::new());
            }
            tracing::warn!(%platform, %error, "Remix failed");
            *state.loading.get_mut(platform) = false;
            vec![Effect::Notify(Notice::remix_failed(platform))]
        }
        Msg::ItemEdited {
            platform,
            index,
            text,
        } => {
            if let Some(output) = state.outputs.get_mut(platform) {
                output.edit(index, text);
            }
            Vec::new()
        }
        Msg::SaveClicked { platform, index } => match state.item(platform, index) {
            Some(content) => vec![Effect::Save(NewSavedItem::new(content, platform))],
            None => Vec::new(),
        },
        Msg::SaveSucceeded { platform } => vec![Effect::Notify(Notice::saved(platform))],
        Msg::SaveFailed { platform, error } => {
            tracing::warn!(%platform, %error, "Save failed");
            vec![Effect::Notify(Notice::save_failed(platform))]
        }
        Msg::CopyClicked { platform, index } => match state.item(platform, index) {
            Some(content) => vec![Effect::Copy(content)],
            None => Vec::new(),
        },
        Msg::ShareClicked { platform, index } => match state.item(platform, index) {
            Some(content) => vec![Effect::Share(share_action(platform, &content))],
            None => Vec::new(),
        },
    };

    (state, effects)
}
