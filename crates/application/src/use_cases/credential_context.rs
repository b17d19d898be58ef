//! Read-only view of the authenticated session

use cirrus_domain::{CloudFlavor, Credentials, DomainResult, RequestContext, Session};
use tracing::info;

/// Fallback label for public-cloud sessions without an account label.
const PUBLIC_ACCOUNT_LABEL: &str = "aws";

/// Wraps a [`Session`] for the broker and the error translator.
#[derive(Debug, Clone)]
pub struct CredentialContext {
    session: Session,
}

impl CredentialContext {
    /// Creates a context over a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The wrapped session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Provider backend of the session.
    #[must_use]
    pub const fn cloud_flavor(&self) -> CloudFlavor {
        self.session.cloud_flavor
    }

    /// Region of the session.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.session.region
    }

    /// Signing credentials.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when region or keys are missing.
    pub fn credentials(&self) -> DomainResult<Credentials> {
        self.session.credentials()
    }

    /// True when the account advertises the VPC platform.
    #[must_use]
    pub fn is_vpc_supported(&self) -> bool {
        self.session.is_vpc_supported()
    }

    /// Log prefix naming the acting user.
    ///
    /// Private cloud: `{account}/{username}@{remote_addr}`.
    /// Public cloud: `{account_label}/{region}@{remote_addr}`.
    #[must_use]
    pub fn actor_label(&self, remote_addr: &str) -> String {
        let account = self.session.account.as_deref().unwrap_or_default();
        if self.cloud_flavor().is_public() {
            let label = if account.is_empty() { PUBLIC_ACCOUNT_LABEL } else { account };
            format!("{label}/{}@{remote_addr}", self.session.region)
        } else {
            let username = self.session.username.as_deref().unwrap_or_default();
            format!("{account}/{username}@{remote_addr}")
        }
    }

    /// Formats a user-action log line, or `None` for public-cloud sessions.
    #[must_use]
    pub fn request_log_line(&self, request: &RequestContext, message: &str) -> Option<String> {
        if self.cloud_flavor().is_public() {
            return None;
        }
        let account = self.session.account.as_deref().unwrap_or_default();
        let username = self.session.username.as_deref().unwrap_or_default();
        Some(format!(
            "{account}/{username}[{}]: {message}",
            request.request_id
        ))
    }

    /// Logs a user action at info level.
    pub fn log_request(&self, request: &RequestContext, message: &str) {
        if let Some(line) = self.request_log_line(request, message) {
            info!(target: "cirrus::useractions", "{line}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn euca_session() -> Session {
        Session::new(CloudFlavor::Euca, "euca")
            .with_credentials("AKID", "secret", None)
            .with_identity("acme", "alice")
    }

    #[test]
    fn test_private_actor_label() {
        let ctx = CredentialContext::new(euca_session());
        assert_eq!(ctx.actor_label("10.1.1.1"), "acme/alice@10.1.1.1");
    }

    #[test]
    fn test_public_actor_label() {
        let ctx = CredentialContext::new(
            Session::new(CloudFlavor::Aws, "us-west-2").with_credentials("AKID", "secret", None),
        );
        assert_eq!(ctx.actor_label("10.1.1.1"), "aws/us-west-2@10.1.1.1");
    }

    #[test]
    fn test_request_log_line() {
        let ctx = CredentialContext::new(euca_session());
        let request = RequestContext::new("10.1.1.1", "/volumes");
        let line = ctx.request_log_line(&request, "deleted volume").unwrap();
        assert_eq!(
            line,
            format!("acme/alice[{}]: deleted volume", request.request_id)
        );

        let public = CredentialContext::new(Session::new(CloudFlavor::Aws, "us-east-1"));
        assert!(public.request_log_line(&request, "x").is_none());
    }

    #[test]
    fn test_credentials_require_login() {
        let ctx = CredentialContext::new(Session::new(CloudFlavor::Euca, "euca"));
        assert!(ctx.credentials().is_err());
        assert!(CredentialContext::new(euca_session()).credentials().is_ok());
    }
}
