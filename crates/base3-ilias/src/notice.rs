//! Inline notice boxes shown in place of failed screen content.

use std::fmt::Write as _;

use base3_core::error::{AppError, ErrorKind};

/// Visual severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Failure,
    Info,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            Self::Failure => "alert-danger",
            Self::Info => "alert-info",
        }
    }
}

/// A headline plus message rendered as a message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub headline: String,
    pub message: String,
}

impl Notice {
    /// Creates a failure notice.
    pub fn failure(headline: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            headline: headline.into(),
            message: message.into(),
        }
    }

    /// Creates an info notice.
    pub fn info(headline: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            headline: headline.into(),
            message: message.into(),
        }
    }

    /// Notice for an error. A missing capability is informational; anything
    /// else is a failure.
    pub fn from_error(error: &AppError) -> Self {
        let level = match error.kind {
            ErrorKind::MissingCapability => NoticeLevel::Info,
            _ => NoticeLevel::Failure,
        };
        Self {
            level,
            headline: error.headline().to_string(),
            message: error.message.clone(),
        }
    }

    /// Renders the notice as escaped markup.
    pub fn render(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<div class=\"alert {}\" role=\"alert\"><h4>{}</h4><p>{}</p></div>",
            self.level.css_class(),
            escape_html(&self.headline),
            escape_html(&self.message),
        );
        html
    }
}

/// Escapes text for use inside markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
