//! Connection broker use case
//!
//! Turns the session plus deployment settings into a request-scoped
//! [`ConnectionHandle`]. Handles are never pooled.

use cirrus_domain::catalog::aws_region;
use cirrus_domain::{
    CloudFlavor, ConnectionHandle, ConsoleSettings, Credentials, DomainError, ResourceType,
    ServiceEndpointConfig,
};
use tracing::debug;

use super::credential_context::CredentialContext;
use crate::{ApplicationError, ApplicationResult};
use crate::ports::RegionDirectory;

/// What to connect to; unset fields default to the session's values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// API family.
    pub resource_type: ResourceType,
    /// Provider backend override.
    pub cloud_flavor: Option<CloudFlavor>,
    /// Region override.
    pub region: Option<String>,
    /// Access key override.
    pub access_key: Option<String>,
    /// Secret key override.
    pub secret_key: Option<String>,
    /// Session token override.
    pub security_token: Option<String>,
}

impl ConnectionRequest {
    /// Requests a connection for a resource type using session defaults.
    #[must_use]
    pub fn new(resource_type: impl Into<ResourceType>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    /// Overrides the provider backend.
    #[must_use]
    pub const fn with_cloud_flavor(mut self, cloud_flavor: CloudFlavor) -> Self {
        self.cloud_flavor = Some(cloud_flavor);
        self
    }

    /// Overrides the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Overrides the credentials (cross-account lookups).
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        security_token: Option<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self.security_token = security_token;
        self
    }
}

/// Resolves connection handles.
pub struct ConnectionBroker<D> {
    settings: ConsoleSettings,
    directory: D,
}

impl<D: RegionDirectory> ConnectionBroker<D> {
    /// Creates a broker over deployment settings and a region directory.
    pub const fn new(settings: ConsoleSettings, directory: D) -> Self {
        Self {
            settings,
            directory,
        }
    }

    /// Deployment settings used for resolution.
    pub const fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// Resolves a handle for `request` on behalf of `context`.
    ///
    /// Unrecognized resource types resolve against the base host and port.
    ///
    /// # Errors
    ///
    /// Returns a domain error when no region or credentials are available, or
    /// when a public-cloud region is not recognized.
    pub async fn resolve(
        &self,
        context: &CredentialContext,
        request: ConnectionRequest,
    ) -> ApplicationResult<ConnectionHandle> {
        let session = context.session();
        let cloud_flavor = request.cloud_flavor.unwrap_or(session.cloud_flavor);
        let region = request.region.unwrap_or_else(|| session.region.clone());
        if region.trim().is_empty() {
            return Err(DomainError::NotAuthenticated("no region".to_string()).into());
        }
        // Overridden keys never inherit the session's token.
        let credentials = match (request.access_key, request.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                Credentials::new(access_key, secret_key, request.security_token)
            }
            (access_key, secret_key) => Credentials::new(
                access_key.unwrap_or_else(|| session.access_key.clone()),
                secret_key.unwrap_or_else(|| session.secret_key.clone()),
                request
                    .security_token
                    .or_else(|| session.security_token.clone()),
            ),
        };
        if credentials.access_key.is_empty() || credentials.secret_key.is_empty() {
            return Err(DomainError::NotAuthenticated("no credentials".to_string()).into());
        }

        let resource_type = request.resource_type;
        let validate_certs = self.settings.connection.ssl.validation;
        let retries = self.settings.connection.retries;

        let handle = match cloud_flavor {
            CloudFlavor::Aws => {
                aws_region(&region)?;
                ConnectionHandle {
                    cloud_flavor,
                    resource_type,
                    region,
                    endpoint: None,
                    credentials,
                    validate_certs,
                    retries,
                }
            }
            CloudFlavor::Euca => {
                if resource_type.is_other() {
                    debug!(
                        resource_type = %resource_type,
                        "unrecognized resource type, using base endpoint"
                    );
                }
                let (host, port) = self.settings.host_port_for(&resource_type);
                if host.trim().is_empty() {
                    return Err(ApplicationError::Config(format!(
                        "no host configured for {resource_type}"
                    )));
                }
                let endpoint = ServiceEndpointConfig {
                    host,
                    port,
                    dns_enabled: session.dns_enabled,
                    validate_certs,
                    ca_certs: self.settings.connection.ssl.certfile.clone(),
                };
                let region = self.discover_region(region).await;
                ConnectionHandle {
                    cloud_flavor,
                    resource_type,
                    region,
                    endpoint: Some(endpoint),
                    credentials,
                    validate_certs,
                    retries,
                }
            }
        };
        debug!(
            cloud_flavor = %handle.cloud_flavor,
            resource_type = %handle.resource_type,
            region = %handle.region,
            url = %handle.endpoint_url(),
            "resolved connection"
        );
        Ok(handle)
    }

    /// Relabels `region` with the directory entry whose compute endpoint
    /// matches the configured compute host. Best effort.
    async fn discover_region(&self, region: String) -> String {
        let (ec2_host, _) = self.settings.host_port_for(&ResourceType::Ec2);
        match self.directory.regions().await {
            Ok(regions) => regions
                .into_iter()
                .find(|r| r.endpoint_host().as_deref() == Some(ec2_host.as_str()))
                .map_or(region, |r| r.name),
            Err(err) => {
                debug!(error = %err, "region discovery failed");
                region
            }
        }
    }
}
