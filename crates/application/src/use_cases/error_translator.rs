//! Error translator use case
//!
//! Maps a [`ProviderError`] to what the request layer should show: a JSON
//! notice for in-page script calls, or a flash message plus redirect for page
//! navigations. Every fault is logged with the acting user's prefix first.

use cirrus_domain::{ErrorOutcome, Notice, RequestContext, Severity, sanitize_url};
use tracing::error;

use super::credential_context::CredentialContext;
use crate::ports::ProviderError;

/// Fixed notice for permission faults.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "You do not have permission to perform this action. Contact your cloud administrator.";

/// Notice shown when the session can no longer sign requests.
pub const SESSION_TIMEOUT_MESSAGE: &str = "Your session has timed out";

const STRIP_PREFIXES: [&str; 2] = ["because of:", "RelatesTo Error:"];
const EXPIRED_TOKEN_MARKER: &str = "token has expired";
const CREDENTIAL_DETAIL_MARKERS: [&str; 2] = ["Invalid access key", "Invalid security token"];
const FORBIDDEN: u16 = 403;

/// Per-call translation inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Redirect target used instead of the current page.
    pub location: Option<String>,
    /// Message template with a `{0}` placeholder for the provider reason.
    pub template: Option<String>,
}

impl TranslateOptions {
    /// Sets the fallback redirect target.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the reason template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Translates provider faults into user-facing outcomes.
pub struct ErrorTranslator {
    context: CredentialContext,
}

impl ErrorTranslator {
    /// Creates a translator for the session in `context`.
    #[must_use]
    pub const fn new(context: CredentialContext) -> Self {
        Self { context }
    }

    /// Translates with default options.
    #[must_use]
    pub fn translate(&self, err: &ProviderError, request: &RequestContext) -> ErrorOutcome {
        self.translate_with(err, request, &TranslateOptions::default())
    }

    /// Translates a fault.
    #[must_use]
    pub fn translate_with(
        &self,
        err: &ProviderError,
        request: &RequestContext,
        options: &TranslateOptions,
    ) -> ErrorOutcome {
        let message = user_message(err, options.template.as_deref());
        error!(
            target: "cirrus::errors",
            actor = %self.context.actor_label(&request.remote_addr),
            request_id = %request.request_id,
            status = ?err.status,
            code = ?err.code,
            "{message}"
        );

        let denied = err.is_permission_denied();
        if request.is_xhr {
            return if denied {
                ErrorOutcome::UserNotice {
                    status: FORBIDDEN,
                    notice: Notice::new(PERMISSION_DENIED_MESSAGE, Severity::Error),
                }
            } else {
                ErrorOutcome::UserNotice {
                    status: err.status.unwrap_or(FORBIDDEN),
                    notice: Notice::new(message, Severity::Error),
                }
            };
        }

        let forbidden = err.status == Some(FORBIDDEN);
        if let (true, true, Some(location)) = (forbidden, denied, options.location.as_deref()) {
            return ErrorOutcome::Redirect {
                location: sanitize_url(location),
                notice: Notice::new(PERMISSION_DENIED_MESSAGE, Severity::Warning),
                clear_caches: false,
            };
        }

        if forbidden || message.contains(EXPIRED_TOKEN_MARKER) {
            let notice = if CREDENTIAL_DETAIL_MARKERS.iter().any(|m| message.contains(m)) {
                message
            } else {
                SESSION_TIMEOUT_MESSAGE.to_string()
            };
            return ErrorOutcome::Redirect {
                location: request.login_url.clone(),
                notice: Notice::new(notice, Severity::Warning),
                clear_caches: true,
            };
        }

        // The current page is the request's own URL; only caller fallbacks
        // are reduced to a local path.
        let location = options
            .location
            .as_deref()
            .map_or_else(|| request.current_url.clone(), sanitize_url);
        ErrorOutcome::Redirect {
            location,
            notice: Notice::new(message, Severity::Error),
            clear_caches: false,
        }
    }
}

/// Cleaned message: the body with vendor prefixes stripped, or the templated
/// reason when there is no body.
#[must_use]
pub fn user_message(err: &ProviderError, template: Option<&str>) -> String {
    match err.message.as_deref() {
        Some(body) => strip_vendor_prefixes(body),
        None => template.map_or_else(|| err.reason.clone(), |t| t.replace("{0}", &err.reason)),
    }
}

fn strip_vendor_prefixes(body: &str) -> String {
    let mut message = body;
    for prefix in STRIP_PREFIXES {
        if let Some(index) = message.find(prefix) {
            message = message[index + prefix.len()..].trim_start();
        }
    }
    message.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use cirrus_domain::{CloudFlavor, Session};
    use pretty_assertions::assert_eq;

    fn translator() -> ErrorTranslator {
        ErrorTranslator::new(CredentialContext::new(
            Session::new(CloudFlavor::Euca, "euca")
                .with_credentials("AKID", "secret", None)
                .with_identity("acme", "alice"),
        ))
    }

    fn page() -> RequestContext {
        RequestContext::new("10.0.0.1", "https://console.example.com/volumes?page=2")
    }

    #[test]
    fn test_xhr_permission_denied_uses_fixed_message() {
        let err = ProviderError::access_denied("User arn:aws:iam::1:user/x is not authorized");
        let outcome = translator().translate(&err, &page().xhr());
        assert_eq!(
            outcome,
            ErrorOutcome::UserNotice {
                status: 403,
                notice: Notice::new(PERMISSION_DENIED_MESSAGE, Severity::Error),
            }
        );
    }

    #[test]
    fn test_xhr_other_error_keeps_status_and_cleaned_message() {
        let err = ProviderError::new(Some(400), "Bad Request")
            .with_code("InvalidParameterValue")
            .with_message("Failed because of: volume is in use");
        let outcome = translator().translate(&err, &page().xhr());
        assert_eq!(
            outcome,
            ErrorOutcome::UserNotice {
                status: 400,
                notice: Notice::new("volume is in use", Severity::Error),
            }
        );

        let err = ProviderError::transport("connection reset");
        let ErrorOutcome::UserNotice { status, .. } = translator().translate(&err, &page().xhr())
        else {
            panic!("expected a user notice");
        };
        assert_eq!(status, 403);
    }

    #[test]
    fn test_page_permission_denied_with_location() {
        let err = ProviderError::access_denied("denied");
        let options = TranslateOptions::default().with_location("https://evil.example/instances");
        let outcome = translator().translate_with(&err, &page(), &options);
        assert_eq!(
            outcome,
            ErrorOutcome::Redirect {
                location: "/instances".to_string(),
                notice: Notice::new(PERMISSION_DENIED_MESSAGE, Severity::Warning),
                clear_caches: false,
            }
        );
    }

    #[test]
    fn test_page_forbidden_redirects_to_login() {
        let err = ProviderError::access_denied("denied");
        let outcome = translator().translate(&err, &page());
        assert_eq!(
            outcome,
            ErrorOutcome::Redirect {
                location: "/login".to_string(),
                notice: Notice::new(SESSION_TIMEOUT_MESSAGE, Severity::Warning),
                clear_caches: true,
            }
        );
    }

    #[test]
    fn test_invalid_key_detail_is_shown() {
        let err = ProviderError::new(Some(403), "Forbidden")
            .with_code("InvalidClientTokenId")
            .with_message("Invalid access key id");
        let outcome = translator().translate(&err, &page());
        assert_eq!(outcome.notice().message, "Invalid access key id");
        assert_eq!(outcome.location(), Some("/login"));
    }

    #[test]
    fn test_expired_token_redirects_to_login() {
        let outcome = translator().translate(&ProviderError::expired_token(), &page());
        assert_eq!(outcome.location(), Some("/login"));
        assert_eq!(outcome.notice().message, SESSION_TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_other_error_returns_to_current_page() {
        let err = ProviderError::new(Some(500), "Internal Error")
            .with_message("RelatesTo Error: snapshot quota exceeded");
        let outcome = translator().translate(&err, &page());
        assert_eq!(
            outcome,
            ErrorOutcome::Redirect {
                location: "https://console.example.com/volumes?page=2".to_string(),
                notice: Notice::new("snapshot quota exceeded", Severity::Error),
                clear_caches: false,
            }
        );
    }

    #[test]
    fn test_template_applies_to_reason() {
        let err = ProviderError::new(Some(409), "Conflict");
        let options = TranslateOptions::default()
            .with_template("Unable to delete volume: {0}")
            .with_location("/volumes/vol-1");
        let outcome = translator().translate_with(&err, &page(), &options);
        assert_eq!(outcome.notice().message, "Unable to delete volume: Conflict");
        assert_eq!(outcome.location(), Some("/volumes/vol-1"));
    }

    #[test]
    fn test_current_page_keeps_query_and_fallback_is_sanitized() {
        let err = ProviderError::new(Some(400), "Bad Request");
        let request = RequestContext::new("10.0.0.1", "/volumes?page=2&sort=-size");
        let outcome = translator().translate(&err, &request);
        assert_eq!(outcome.location(), Some("/volumes?page=2&sort=-size"));

        let options = TranslateOptions::default().with_location("https://evil.example.com/steal");
        let outcome = translator().translate_with(&err, &request, &options);
        assert_eq!(outcome.location(), Some("/steal"));
    }
}
