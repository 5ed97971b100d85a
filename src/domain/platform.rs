//! Target platforms for remixed content.
//!
//! The platform set is closed: short-form posts (Twitter), professional
//! posts (LinkedIn) and captions (Instagram). Anything keyed by platform
//! uses [`PerPlatform`] rather than a map.

use serde::{Deserialize, Serialize};

/// A platform content can be remixed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Short-form post
    Twitter,

    /// Professional post
    LinkedIn,

    /// Caption
    Instagram,
}

impl Platform {
    /// All platforms, in display order
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::LinkedIn, Platform::Instagram];

    /// Storage/wire tag
    pub fn tag(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
            Platform::Instagram => "instagram",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
        }
    }

    /// Instruction prefix sent ahead of the source text
    pub fn instruction(self) -> &'static str {
        match self {
            Platform::Twitter => {
                "Rewrite this as a short series of engaging tweets, each under 280 characters. \
                 Make them punchy and attention-grabbing while maintaining the key message. \
                 Number each tweet on its own line starting with \"1.\":"
            }
            Platform::LinkedIn => {
                "Rewrite this as a professional LinkedIn post. Add relevant business context \
                 and maintain a professional tone while being engaging:"
            }
            Platform::Instagram => {
                "Rewrite this as an Instagram caption. Make it casual, engaging, and add \
                 relevant emoji suggestions. Include hashtag suggestions at the end:"
            }
        }
    }

    /// Advisory per-item character limit (never enforced)
    pub fn char_limit(self) -> Option<usize> {
        match self {
            Platform::Twitter => Some(280),
            Platform::LinkedIn | Platform::Instagram => None,
        }
    }

    /// Whether a response is split into numbered items
    pub fn is_sequence(self) -> bool {
        matches!(self, Platform::Twitter)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "tweet" | "x" | "short-form" | "shortform" => Ok(Platform::Twitter),
            "linkedin" | "professional" => Ok(Platform::LinkedIn),
            "instagram" | "ig" | "caption" => Ok(Platform::Instagram),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// Label that does not name a known platform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

/// One value per platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerPlatform<T> {
    pub twitter: T,
    pub linkedin: T,
    pub instagram: T,
}

impl<T> PerPlatform<T> {
    /// Build from a function of the platform
    pub fn from_fn(mut f: impl FnMut(Platform) -> T) -> Self {
        Self {
            twitter: f(Platform::Twitter),
            linkedin: f(Platform::LinkedIn),
            instagram: f(Platform::Instagram),
        }
    }

    pub fn get(&self, platform: Platform) -> &T {
        match platform {
            Platform::Twitter => &self.twitter,
            Platform::LinkedIn => &self.linkedin,
            Platform::Instagram => &self.instagram,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut T {
        match platform {
            Platform::Twitter => &mut self.twitter,
            Platform::LinkedIn => &mut self.linkedin,
            Platform::Instagram => &mut self.instagram,
        }
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &T)> {
        Platform::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}
