//! Share links for each platform.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::domain::Platform;

/// Everything `encodeURIComponent` escapes
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const TWITTER_INTENT: &str = "https://twitter.com/intent/tweet?text=";
const LINKEDIN_SHARE: &str = "https://www.linkedin.com/feed/?shareActive=true&text=";
const INSTAGRAM_HOME: &str = "https://www.instagram.com/";

/// What sharing an item means on a platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// Open a compose link that already carries the text
    Open { url: String },

    /// No deep link exists: put the text on the clipboard, then open the site
    CopyThenOpen { text: String, url: String },
}

impl ShareAction {
    pub fn url(&self) -> &str {
        match self {
            ShareAction::Open { url } | ShareAction::CopyThenOpen { url, .. } => url,
        }
    }
}

/// Percent-encode a query component
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Build the share action for one item
pub fn share_action(platform: Platform, text: &str) -> ShareAction {
    let text = text.trim();
    match platform {
        Platform::Twitter => ShareAction::Open {
            url: format!("{}{}", TWITTER_INTENT, encode_component(text)),
        },
        Platform::LinkedIn => ShareAction::Open {
            url: format!("{}{}", LINKEDIN_SHARE, encode_component(text)),
        },
        Platform::Instagram => ShareAction::CopyThenOpen {
            text: text.to_string(),
            url: INSTAGRAM_HOME.to_string(),
        },
    }
}
