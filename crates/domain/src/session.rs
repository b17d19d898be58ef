//! Session and credential domain types.
//!
//! A [`Session`] is created by the login flow and is read-only to the
//! console core. [`Credentials`] are the subset needed to sign provider calls.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Platform capability tag advertised by accounts that support VPC.
pub const VPC_PLATFORM: &str = "VPC";

/// Which provider backend a session is authenticated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CloudFlavor {
    /// Private, Eucalyptus-compatible cloud.
    #[default]
    Euca,
    /// Public AWS cloud.
    Aws,
}

impl CloudFlavor {
    /// Returns the session tag for this flavor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Euca => "euca",
            Self::Aws => "aws",
        }
    }

    /// Returns true for the public cloud flavor.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Aws)
    }
}

impl fmt::Display for CloudFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudFlavor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euca" => Ok(Self::Euca),
            "aws" => Ok(Self::Aws),
            other => Err(DomainError::InvalidCloudFlavor(other.to_string())),
        }
    }
}

/// Access key, secret key and optional session token used to sign calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key id.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Temporary session token, when the credentials were issued by STS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<String>,
}

impl Credentials {
    /// Creates a credential set.
    #[must_use]
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        security_token: Option<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            security_token,
        }
    }
}

// Secrets never reach log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// Per-browser-session authentication and region state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Current region name.
    #[serde(default)]
    pub region: String,

    /// Access key id.
    #[serde(default)]
    pub access_key: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,

    /// Session token issued at login.
    #[serde(default)]
    pub security_token: Option<String>,

    /// Provider backend.
    #[serde(default)]
    pub cloud_flavor: CloudFlavor,

    /// Account name (private cloud) or account label (public cloud).
    #[serde(default)]
    pub account: Option<String>,

    /// User name within the account.
    #[serde(default)]
    pub username: Option<String>,

    /// Platform capability tags, e.g. `VPC`.
    #[serde(default)]
    pub supported_platforms: BTreeSet<String>,

    /// Default VPC id, when the account has one.
    #[serde(default)]
    pub default_vpc: Option<String>,

    /// Whether services are addressed by DNS names rather than IP and path.
    #[serde(default)]
    pub dns_enabled: bool,
}

impl Session {
    /// Creates a session for the given flavor and region with no credentials.
    #[must_use]
    pub fn new(cloud_flavor: CloudFlavor, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            access_key: String::new(),
            secret_key: String::new(),
            security_token: None,
            cloud_flavor,
            account: None,
            username: None,
            supported_platforms: BTreeSet::new(),
            default_vpc: None,
            dns_enabled: false,
        }
    }

    /// Sets the signing credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        security_token: Option<String>,
    ) -> Self {
        self.access_key = access_key.into();
        self.secret_key = secret_key.into();
        self.security_token = security_token;
        self
    }

    /// Sets the account and user names.
    #[must_use]
    pub fn with_identity(
        mut self,
        account: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        self.account = Some(account.into());
        self.username = Some(username.into());
        self
    }

    /// Adds a platform capability tag.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.supported_platforms.insert(platform.into());
        self
    }

    /// Returns true once login has populated a region and an access key.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.region.trim().is_empty() && !self.access_key.is_empty()
    }

    /// Returns true when the account advertises the VPC platform.
    #[must_use]
    pub fn is_vpc_supported(&self) -> bool {
        self.supported_platforms.contains(VPC_PLATFORM)
    }

    /// Returns the signing credentials carried by this session.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotAuthenticated`] when region or keys are missing.
    pub fn credentials(&self) -> DomainResult<Credentials> {
        if self.region.trim().is_empty() {
            return Err(DomainError::NotAuthenticated("no region".to_string()));
        }
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(DomainError::NotAuthenticated("no credentials".to_string()));
        }
        Ok(Credentials::new(
            self.access_key.clone(),
            self.secret_key.clone(),
            self.security_token.clone(),
        ))
    }
}
