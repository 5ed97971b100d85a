//! Transient user notices.

use std::time::Duration;

use super::platform::Platform;

/// How long a notice stays up unless the front end says otherwise
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// A short message shown to the user and then dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn saved(platform: Platform) -> Self {
        match platform {
            Platform::Twitter => Self::success("Tweet saved successfully!"),
            other => Self::success(format!("{} content saved successfully!", other.label())),
        }
    }

    pub fn save_failed(platform: Platform) -> Self {
        match platform {
            Platform::Twitter => Self::error("Failed to save tweet"),
            other => Self::error(format!("Failed to save {} content", other.tag())),
        }
    }

    pub fn remix_failed(platform: Platform) -> Self {
        Self::error(format!("Failed to remix content for {}", platform.label()))
    }

    pub fn updated() -> Self {
        Self::success("Saved content updated")
    }

    pub fn update_failed() -> Self {
        Self::error("Failed to update saved content")
    }

    pub fn deleted() -> Self {
        Self::success("Saved content deleted")
    }

    pub fn delete_failed() -> Self {
        Self::error("Failed to delete saved content")
    }

    pub fn load_failed() -> Self {
        Self::error("Failed to load saved content")
    }

    pub fn copied() -> Self {
        Self::info("Copied to clipboard")
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
            NoticeKind::Info => "•",
        };
        write!(f, "{} {}", marker, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_wording_per_platform() {
        assert_eq!(Notice::saved(Platform::Twitter).message, "Tweet saved successfully!");
        assert_eq!(
            Notice::saved(Platform::LinkedIn).message,
            "LinkedIn content saved successfully!"
        );
        assert_eq!(
            Notice::save_failed(Platform::Instagram).message,
            "Failed to save instagram content"
        );
        assert!(Notice::save_failed(Platform::Twitter).is_error());
    }

    #[test]
    fn test_default_duration() {
        assert_eq!(Notice::copied().duration, Duration::from_secs(3));
    }
}
