//! User-visible toast notices.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Visual variant of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// "Success" notice for a completed moderation action.
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description)
    }

    /// "Error" notice carrying the store's message, or `fallback` when it has none.
    #[must_use]
    pub fn store_failure(err: &StoreError, fallback: &str) -> Self {
        let message = err.to_string();
        let description = if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        };
        Self::destructive("Error", description)
    }

    /// CSS classes for the toast container.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self.variant {
            NoticeVariant::Default => "border-white/10 bg-mediarch-dark text-white",
            NoticeVariant::Destructive => "border-red-500/40 bg-red-500/20 text-red-100",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_uses_message() {
        let err = StoreError::Api {
            status: 500,
            code: None,
            message: "connection reset".to_string(),
        };
        let notice = Notice::store_failure(&err, "Failed to delete contact");
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.description, "connection reset");
        assert_eq!(notice.variant, NoticeVariant::Destructive);
    }

    #[test]
    fn test_store_failure_falls_back_when_blank() {
        let err = StoreError::Api {
            status: 500,
            code: None,
            message: String::new(),
        };
        let notice = Notice::store_failure(&err, "Failed to delete contact");
        assert_eq!(notice.description, "Failed to delete contact");
    }
}
