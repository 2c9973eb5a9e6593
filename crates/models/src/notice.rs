use serde::{Deserialize, Serialize};

/// Category of a user-facing notice. The UI renders these as transient
/// toasts, auto-dismissed after a fixed interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeCategory {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub category: NoticeCategory,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: NoticeCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: NoticeCategory::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            category: NoticeCategory::Info,
            message: message.into(),
        }
    }
}
