//! Request context and user-facing outcomes of provider faults.

use serde::{Deserialize, Serialize};

use crate::id::generate_request_id;

/// Flash message queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Info,
    /// Warning banner.
    Warning,
    /// Error banner.
    Error,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message text.
    pub message: String,
    /// Queue the message is flashed to.
    pub severity: Severity,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// What the request layer should do about a provider fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ErrorOutcome {
    /// Reply to an in-page script with a JSON message and status.
    UserNotice {
        /// HTTP status of the JSON reply.
        status: u16,
        /// Message and severity.
        notice: Notice,
    },
    /// Flash a notice and redirect the browser.
    Redirect {
        /// Redirect target (a local path).
        location: String,
        /// Notice flashed before redirecting.
        notice: Notice,
        /// The caller should empty its cache regions.
        clear_caches: bool,
    },
}

impl ErrorOutcome {
    /// Returns the notice carried by either outcome.
    #[must_use]
    pub const fn notice(&self) -> &Notice {
        match self {
            Self::UserNotice { notice, .. } | Self::Redirect { notice, .. } => notice,
        }
    }

    /// Returns the redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect { location, .. } => Some(location),
            Self::UserNotice { .. } => None,
        }
    }
}

/// Per-request facts the core needs from the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation id.
    pub request_id: String,
    /// Client address (first `X-Forwarded-For` hop when proxied).
    pub remote_addr: String,
    /// Request was issued by an in-page script.
    pub is_xhr: bool,
    /// URL of the page being served.
    pub current_url: String,
    /// Path of the login page.
    pub login_url: String,
}

impl RequestContext {
    /// Creates a page-navigation context with a fresh request id.
    #[must_use]
    pub fn new(remote_addr: impl Into<String>, current_url: impl Into<String>) -> Self {
        Self {
            request_id: generate_request_id(),
            remote_addr: remote_addr.into(),
            is_xhr: false,
            current_url: current_url.into(),
            login_url: "/login".to_string(),
        }
    }

    /// Marks the request as an in-page script call.
    #[must_use]
    pub const fn xhr(mut self) -> Self {
        self.is_xhr = true;
        self
    }

    /// Overrides the login path.
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_defaults() {
        let ctx = RequestContext::new("10.0.0.9", "/instances");
        assert!(!ctx.is_xhr);
        assert_eq!(ctx.login_url, "/login");
        assert_eq!(ctx.request_id.len(), 16);
        assert!(ctx.xhr().is_xhr);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = ErrorOutcome::Redirect {
            location: "/login".to_string(),
            notice: Notice::new("Your session has timed out", Severity::Warning),
            clear_caches: true,
        };
        assert_eq!(outcome.location(), Some("/login"));
        assert_eq!(outcome.notice().severity, Severity::Warning);
    }
}
