//! Service endpoint configuration and connection handles.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resource_type::ResourceType;
use crate::session::{CloudFlavor, Credentials};

/// Host, port and transport options for one private cloud service.
///
/// Resolved per connection request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpointConfig {
    /// Service host name or address.
    pub host: String,
    /// Service port.
    pub port: u16,
    /// Address services by virtual-hosted DNS names instead of IP and path.
    pub dns_enabled: bool,
    /// Validate the service TLS certificate.
    pub validate_certs: bool,
    /// Custom CA bundle used for validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certs: Option<PathBuf>,
}

impl ServiceEndpointConfig {
    /// Creates an endpoint with TLS validation off and path-style addressing.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            dns_enabled: false,
            validate_certs: false,
            ca_certs: None,
        }
    }

    /// Returns the base URL for a service at this endpoint.
    ///
    /// DNS-style addressing prefixes the host with the service label; path-style
    /// addressing appends the service path.
    #[must_use]
    pub fn url_for(&self, resource_type: &ResourceType) -> String {
        let scheme = if self.validate_certs { "https" } else { "http" };
        match (self.dns_enabled, resource_type.private_dns_label()) {
            (true, Some(label)) => format!("{scheme}://{label}.{}:{}/", self.host, self.port),
            _ => format!(
                "{scheme}://{}:{}{}",
                self.host,
                self.port,
                resource_type.private_service_path()
            ),
        }
    }
}

/// A region known to the provider and its advertised compute endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Region name.
    pub name: String,
    /// Advertised compute endpoint, either a bare host or a URL.
    pub ec2_endpoint: String,
}

impl RegionInfo {
    /// Creates a region entry.
    #[must_use]
    pub fn new(name: impl Into<String>, ec2_endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ec2_endpoint: ec2_endpoint.into(),
        }
    }

    /// Returns the host part of the advertised endpoint.
    #[must_use]
    pub fn endpoint_host(&self) -> Option<String> {
        let raw = self.ec2_endpoint.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains("://") {
            return url::Url::parse(raw)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string));
        }
        raw.split(['/', ':']).next().map(str::to_string)
    }
}

/// A configured, request-scoped provider client description.
///
/// Conceptually keyed by flavor, resource type, region and credential
/// identity. Handles are never pooled; each broker call yields a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    /// Provider backend.
    pub cloud_flavor: CloudFlavor,
    /// API family.
    pub resource_type: ResourceType,
    /// Region label.
    pub region: String,
    /// Private cloud endpoint; `None` for the public cloud.
    pub endpoint: Option<ServiceEndpointConfig>,
    /// Signing credentials.
    pub credentials: Credentials,
    /// Validate TLS certificates.
    pub validate_certs: bool,
    /// Transport retry count.
    pub retries: u32,
}

/// Identity of a handle, usable as a map key.
pub type HandleIdentity = (CloudFlavor, ResourceType, String, String);

impl ConnectionHandle {
    /// Returns the conceptual key of this handle.
    #[must_use]
    pub fn identity(&self) -> HandleIdentity {
        (
            self.cloud_flavor,
            self.resource_type.clone(),
            self.region.clone(),
            self.credentials.access_key.clone(),
        )
    }

    /// Returns the service base URL the handle addresses.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.url_for(&self.resource_type),
            None => public_endpoint_url(&self.resource_type, &self.region),
        }
    }
}

/// Public cloud endpoint for a service in a region.
#[must_use]
pub fn public_endpoint_url(resource_type: &ResourceType, region: &str) -> String {
    let service = resource_type.public_service_name();
    match resource_type {
        ResourceType::Iam => "https://iam.amazonaws.com/".to_string(),
        ResourceType::S3 if region == "us-east-1" => "https://s3.amazonaws.com/".to_string(),
        ResourceType::Sts if region == "us-east-1" => "https://sts.amazonaws.com/".to_string(),
        _ if region.starts_with("cn-") => {
            format!("https://{service}.{region}.amazonaws.com.cn/")
        }
        _ => format!("https://{service}.{region}.amazonaws.com/"),
    }
}
