//! Cloud provider port
//!
//! Defines the describe/list calls the console core makes against a provider.
//! Adapters return plain DTOs with no live-connection back-references.

use async_trait::async_trait;

use cirrus_domain::{
    Account, Address, AvailabilityZone, Bucket, ConnectionHandle, Instance, InstanceType, KeyPair,
    LaunchConfig, LoadBalancer, MachineImage, Role, ScalingGroup, SecurityGroup, Snapshot, Subnet,
    Volume, Vpc,
};

/// Error codes that mean the caller lacks permission.
pub const PERMISSION_DENIED_CODES: [&str; 2] = ["AccessDenied", "UnauthorizedOperation"];

const SERVICE_UNAVAILABLE: &str = "ServiceUnavailable";

/// A fault reported by the provider or its transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct ProviderError {
    /// HTTP-like status declared by the provider.
    pub status: Option<u16>,
    /// Machine error code, e.g. `AccessDenied`.
    pub code: Option<String>,
    /// Short reason phrase.
    pub reason: String,
    /// Free-text message body.
    pub message: Option<String>,
}

impl ProviderError {
    /// Creates an error with only a reason.
    #[must_use]
    pub fn new(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            reason: reason.into(),
            message: None,
        }
    }

    /// Sets the error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the message body.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// A 403 `AccessDenied` fault.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(Some(403), "Forbidden")
            .with_code("AccessDenied")
            .with_message(message)
    }

    /// An expired session token fault.
    #[must_use]
    pub fn expired_token() -> Self {
        Self::new(Some(400), "Bad Request")
            .with_code("ExpiredToken")
            .with_message("The security token included in the request is expired: token has expired")
    }

    /// A 503 fault from a service that is not running.
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(Some(503), SERVICE_UNAVAILABLE).with_code(SERVICE_UNAVAILABLE)
    }

    /// A transport failure with no provider status.
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(None, "TransportError").with_message(detail)
    }

    /// A response body that could not be understood.
    #[must_use]
    pub fn malformed_response(detail: impl Into<String>) -> Self {
        Self::new(None, "MalformedResponse").with_message(detail)
    }

    /// True for `AccessDenied` and `UnauthorizedOperation`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|c| PERMISSION_DENIED_CODES.contains(&c))
    }

    /// True when the service reported itself unavailable.
    #[must_use]
    pub fn is_service_unavailable(&self) -> bool {
        self.reason == SERVICE_UNAVAILABLE || self.code.as_deref() == Some(SERVICE_UNAVAILABLE)
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Describe/list operations against one provider connection.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Lists availability zones.
    async fn describe_availability_zones(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<AvailabilityZone>>;

    /// Lists instance types (private cloud only).
    async fn describe_instance_types(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<InstanceType>>;

    /// Lists instances.
    async fn describe_instances(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Instance>>;

    /// Lists security groups.
    async fn describe_security_groups(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<SecurityGroup>>;

    /// Lists key pairs.
    async fn describe_key_pairs(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<KeyPair>>;

    /// Lists volumes.
    async fn describe_volumes(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Volume>>;

    /// Lists snapshots.
    async fn describe_snapshots(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Snapshot>>;

    /// Lists VPCs.
    async fn describe_vpcs(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Vpc>>;

    /// Lists subnets, optionally restricted to one VPC.
    async fn describe_subnets(
        &self,
        handle: &ConnectionHandle,
        vpc_id: Option<&str>,
    ) -> ProviderResult<Vec<Subnet>>;

    /// Lists elastic addresses.
    async fn describe_addresses(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Address>>;

    /// Lists kernel images.
    async fn describe_kernels(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<MachineImage>>;

    /// Lists ramdisk images.
    async fn describe_ramdisks(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<MachineImage>>;

    /// Lists IAM roles.
    async fn list_roles(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Role>>;

    /// Lists accounts (private cloud administrators only).
    async fn list_accounts(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Account>>;

    /// Lists buckets.
    async fn list_buckets(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Bucket>>;

    /// Lists auto scaling groups.
    async fn describe_scaling_groups(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<ScalingGroup>>;

    /// Lists launch configurations.
    async fn describe_launch_configs(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<LaunchConfig>>;

    /// Lists load balancers.
    async fn describe_load_balancers(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<LoadBalancer>>;

    /// Issues an API action with no typed equivalent and returns the raw body.
    async fn raw_request(&self, handle: &ConnectionHandle, action: &str) -> ProviderResult<String>;
}
