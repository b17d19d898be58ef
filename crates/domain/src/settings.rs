//! Console Settings Domain Model
//!
//! Deployment settings read by the connection broker and the cache layer.
//! Every field has a default so a partial file (or none at all) is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resource_type::ResourceType;

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Optional host/port override for one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverride {
    /// Service host.
    #[serde(default)]
    pub host: Option<String>,
    /// Service port.
    #[serde(default)]
    pub port: Option<u16>,
}

/// TLS settings for provider connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslSettings {
    /// Validate server certificates (and use https).
    #[serde(default)]
    pub validation: bool,
    /// Custom CA bundle.
    #[serde(default)]
    pub certfile: Option<PathBuf>,
}

/// Provider connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// TLS settings.
    #[serde(default)]
    pub ssl: SslSettings,
    /// Retry count carried into every handle.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Verbose provider logging.
    #[serde(default)]
    pub debug: bool,
}

/// Lifetime of one cache region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRegionSettings {
    /// Time to live in seconds.
    pub expire: u64,
}

/// Cache region settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Short-lived region.
    #[serde(default = "default_short_term")]
    pub short_term: CacheRegionSettings,
    /// Default region.
    #[serde(default = "default_default_term")]
    pub default_term: CacheRegionSettings,
    /// Long-lived region.
    #[serde(default = "default_long_term")]
    pub long_term: CacheRegionSettings,
    /// Region used for slow-changing catalogs (zones, instance types).
    #[serde(default = "default_extra_long_term")]
    pub extra_long_term: CacheRegionSettings,
    /// Entry cap per region.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

/// Logging switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log user actions via `log_request`.
    #[serde(default)]
    pub useractions: bool,
}

/// Console deployment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Legacy cluster-controller host.
    #[serde(default = "default_clchost")]
    pub clchost: String,

    /// Legacy cluster-controller port.
    #[serde(default = "default_port")]
    pub clcport: u16,

    /// User-facing services host.
    #[serde(default)]
    pub ufshost: Option<String>,

    /// User-facing services port.
    #[serde(default = "default_port")]
    pub ufsport: u16,

    /// Compute override.
    #[serde(default)]
    pub ec2: ServiceOverride,
    /// Identity override.
    #[serde(default)]
    pub iam: ServiceOverride,
    /// Load balancing override.
    #[serde(default)]
    pub elb: ServiceOverride,
    /// Object storage override.
    #[serde(default)]
    pub s3: ServiceOverride,
    /// VPC override.
    #[serde(default)]
    pub vpc: ServiceOverride,
    /// Auto scaling override.
    #[serde(default)]
    pub autoscale: ServiceOverride,
    /// Monitoring override.
    #[serde(default)]
    pub cloudwatch: ServiceOverride,
    /// Token service override.
    #[serde(default)]
    pub sts: ServiceOverride,
    /// Stack service override.
    #[serde(default)]
    pub cloudformation: ServiceOverride,

    /// Provider connection settings.
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Cache regions.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Logging switches.
    #[serde(default)]
    pub log: LogSettings,
}

fn default_clchost() -> String {
    "localhost".to_string()
}

const fn default_port() -> u16 {
    8773
}

const fn default_retries() -> u32 {
    2
}

const fn default_short_term() -> CacheRegionSettings {
    CacheRegionSettings { expire: 60 }
}

const fn default_default_term() -> CacheRegionSettings {
    CacheRegionSettings { expire: 300 }
}

const fn default_long_term() -> CacheRegionSettings {
    CacheRegionSettings { expire: 3600 }
}

const fn default_extra_long_term() -> CacheRegionSettings {
    CacheRegionSettings { expire: 43200 }
}

const fn default_max_capacity() -> u64 {
    10_000
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ssl: SslSettings::default(),
            retries: default_retries(),
            debug: false,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            short_term: default_short_term(),
            default_term: default_default_term(),
            long_term: default_long_term(),
            extra_long_term: default_extra_long_term(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            clchost: default_clchost(),
            clcport: default_port(),
            ufshost: None,
            ufsport: default_port(),
            ec2: ServiceOverride::default(),
            iam: ServiceOverride::default(),
            elb: ServiceOverride::default(),
            s3: ServiceOverride::default(),
            vpc: ServiceOverride::default(),
            autoscale: ServiceOverride::default(),
            cloudwatch: ServiceOverride::default(),
            sts: ServiceOverride::default(),
            cloudformation: ServiceOverride::default(),
            connection: ConnectionSettings::default(),
            cache: CacheSettings::default(),
            log: LogSettings::default(),
        }
    }
}

impl ConsoleSettings {
    /// Returns the override block for a resource type, if it has one.
    #[must_use]
    pub const fn service_override(&self, resource_type: &ResourceType) -> Option<&ServiceOverride> {
        match resource_type {
            ResourceType::Ec2 => Some(&self.ec2),
            ResourceType::Iam => Some(&self.iam),
            ResourceType::Elb => Some(&self.elb),
            ResourceType::S3 => Some(&self.s3),
            ResourceType::Vpc => Some(&self.vpc),
            ResourceType::Autoscale => Some(&self.autoscale),
            ResourceType::CloudWatch => Some(&self.cloudwatch),
            ResourceType::Sts => Some(&self.sts),
            ResourceType::CloudFormation => Some(&self.cloudformation),
            ResourceType::Other(_) => None,
        }
    }

    /// Base host and port: the user-facing services pair when `ufshost` is
    /// set, otherwise the cluster-controller pair.
    #[must_use]
    pub fn base_host_port(&self) -> (&str, u16) {
        match self.ufshost.as_deref() {
            Some(host) if !host.is_empty() => (host, self.ufsport),
            _ => (self.clchost.as_str(), self.clcport),
        }
    }

    /// Host and port for a resource type, honouring per-service overrides.
    #[must_use]
    pub fn host_port_for(&self, resource_type: &ResourceType) -> (String, u16) {
        let (base_host, base_port) = self.base_host_port();
        let service = self.service_override(resource_type);
        let host = service
            .and_then(|s| s.host.as_deref())
            .filter(|h| !h.is_empty())
            .unwrap_or(base_host);
        let port = service.and_then(|s| s.port).unwrap_or(base_port);
        (host.to_string(), port)
    }

    /// Human-readable configuration warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ufshost = self.ufshost.as_deref().filter(|h| !h.is_empty());
        if ufshost.is_none() {
            warnings.push(
                "'clchost' and 'clcport' are deprecated; use 'ufshost' and 'ufsport' instead"
                    .to_string(),
            );
        }
        let local = |h: &str| LOCAL_HOSTS.contains(&h);
        if ufshost.is_some_and(local) || local(&self.clchost) {
            warnings.push(
                "'ufshost' needs to be set to something externally resolvable; \
                 stack creation and object download will not work properly"
                    .to_string(),
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.clchost, "localhost");
        assert_eq!(settings.clcport, 8773);
        assert_eq!(settings.connection.retries, 2);
        assert!(!settings.connection.ssl.validation);
        assert_eq!(settings.cache.extra_long_term.expire, 43200);
        assert_eq!(settings.cache.short_term.expire, 60);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r#"{"ufshost": "ufs.example.com", "s3": {"port": 443}}"#;
        let settings: ConsoleSettings = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(settings.ufshost.as_deref(), Some("ufs.example.com"));
        assert_eq!(settings.s3.port, Some(443));
        assert_eq!(settings.cache.max_capacity, 10_000);
    }

    #[test]
    fn test_host_port_priority() {
        let mut settings = ConsoleSettings {
            clchost: "clc.internal".to_string(),
            clcport: 8000,
            ..ConsoleSettings::default()
        };
        assert_eq!(
            settings.host_port_for(&ResourceType::Ec2),
            ("clc.internal".to_string(), 8000)
        );

        settings.ufshost = Some("ufs.example.com".to_string());
        assert_eq!(
            settings.host_port_for(&ResourceType::Ec2),
            ("ufs.example.com".to_string(), 8773)
        );

        settings.s3 = ServiceOverride {
            host: Some("s3.example.com".to_string()),
            port: Some(443),
        };
        assert_eq!(
            settings.host_port_for(&ResourceType::S3),
            ("s3.example.com".to_string(), 443)
        );
        assert_eq!(
            settings.host_port_for(&ResourceType::Other("swf".to_string())),
            ("ufs.example.com".to_string(), 8773)
        );
    }

    #[test]
    fn test_warnings() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.warnings().len(), 2);

        let settings = ConsoleSettings {
            ufshost: Some("ufs.example.com".to_string()),
            clchost: "clc.example.com".to_string(),
            ..ConsoleSettings::default()
        };
        assert!(settings.warnings().is_empty());
    }
}
