//! Cloud provider backed by a JSON document.
//!
//! Serves a recorded or hand-written view of a cloud so the console core can
//! run without a live endpoint. Faults can be injected per operation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cirrus_application::ports::{CloudProvider, ProviderError, ProviderResult};
use cirrus_domain::{
    Account, Address, AvailabilityZone, Bucket, ConnectionHandle, Instance, InstanceType, KeyPair,
    LaunchConfig, LoadBalancer, MachineImage, RegionInfo, Role, ScalingGroup, SecurityGroup,
    Snapshot, Subnet, Volume, Vpc,
};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::PROVIDER_TARGET;
use super::regions::StaticRegionDirectory;

/// Errors raised while loading a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file does not exist.
    #[error("fixture not found: {0}")]
    NotFound(PathBuf),

    /// The fixture file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The fixture is not valid JSON for [`CloudFixture`].
    #[error("invalid fixture: {0}")]
    Json(#[from] serde_json::Error),
}

/// A fault returned instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultFixture {
    /// Status code.
    #[serde(default)]
    pub status: Option<u16>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Reason phrase.
    pub reason: String,
    /// Message body.
    #[serde(default)]
    pub message: Option<String>,
}

impl From<&FaultFixture> for ProviderError {
    fn from(fault: &FaultFixture) -> Self {
        Self {
            status: fault.status,
            code: fault.code.clone(),
            reason: fault.reason.clone(),
            message: fault.message.clone(),
        }
    }
}

/// Everything a [`JsonFixtureProvider`] serves. Missing sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudFixture {
    /// Regions and their compute endpoints.
    pub regions: Vec<RegionInfo>,
    /// Zones; those with a region name are only served in that region.
    pub availability_zones: Vec<AvailabilityZone>,
    /// VM types.
    pub instance_types: Vec<InstanceType>,
    /// Instances.
    pub instances: Vec<Instance>,
    /// Security groups.
    pub security_groups: Vec<SecurityGroup>,
    /// Key pairs.
    pub key_pairs: Vec<KeyPair>,
    /// Volumes.
    pub volumes: Vec<Volume>,
    /// Snapshots.
    pub snapshots: Vec<Snapshot>,
    /// VPCs.
    pub vpcs: Vec<Vpc>,
    /// Subnets.
    pub subnets: Vec<Subnet>,
    /// Elastic IPs.
    pub addresses: Vec<Address>,
    /// Kernel images.
    pub kernels: Vec<MachineImage>,
    /// Ramdisk images.
    pub ramdisks: Vec<MachineImage>,
    /// IAM roles.
    pub roles: Vec<Role>,
    /// Accounts.
    pub accounts: Vec<Account>,
    /// Buckets.
    pub buckets: Vec<Bucket>,
    /// Scaling groups.
    pub scaling_groups: Vec<ScalingGroup>,
    /// Launch configurations.
    pub launch_configs: Vec<LaunchConfig>,
    /// Load balancers.
    pub load_balancers: Vec<LoadBalancer>,
    /// Raw response bodies keyed by API action.
    pub raw_responses: BTreeMap<String, String>,
    /// Faults keyed by operation name, e.g. `describe_load_balancers`.
    pub faults: BTreeMap<String, FaultFixture>,
}

/// [`CloudProvider`] serving a [`CloudFixture`].
#[derive(Debug, Clone, Default)]
pub struct JsonFixtureProvider {
    fixture: Arc<CloudFixture>,
}

impl JsonFixtureProvider {
    /// Serves `fixture`.
    #[must_use]
    pub fn new(fixture: CloudFixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
        }
    }

    /// Parses a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Json`] when the document does not match.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the file is missing, unreadable or
    /// malformed.
    pub async fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let content = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FixtureError::NotFound(path.to_path_buf())
            } else {
                FixtureError::Io(e)
            }
        })?;
        let fixture: CloudFixture = serde_json::from_slice(&content)?;
        debug!(target: PROVIDER_TARGET, path = %path.display(), "loaded fixture");
        Ok(Self::new(fixture))
    }

    /// The served fixture.
    #[must_use]
    pub fn fixture(&self) -> &CloudFixture {
        &self.fixture
    }

    /// A region directory listing the fixture's regions.
    #[must_use]
    pub fn region_directory(&self) -> StaticRegionDirectory {
        StaticRegionDirectory::new(self.fixture.regions.clone())
    }

    fn respond<T: Clone>(
        &self,
        operation: &str,
        handle: &ConnectionHandle,
        items: &[T],
    ) -> ProviderResult<Vec<T>> {
        self.check_fault(operation, handle)?;
        debug!(
            target: PROVIDER_TARGET,
            operation,
            region = %handle.region,
            count = items.len(),
            "served fixture data"
        );
        Ok(items.to_vec())
    }

    fn check_fault(&self, operation: &str, handle: &ConnectionHandle) -> ProviderResult<()> {
        match self.fixture.faults.get(operation) {
            Some(fault) => {
                debug!(
                    target: PROVIDER_TARGET,
                    operation,
                    url = %handle.endpoint_url(),
                    reason = %fault.reason,
                    "injected fault"
                );
                Err(fault.into())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CloudProvider for JsonFixtureProvider {
    async fn describe_availability_zones(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<AvailabilityZone>> {
        let zones: Vec<AvailabilityZone> = self
            .fixture
            .availability_zones
            .iter()
            .filter(|z| z.region_name.as_deref().is_none_or(|r| r == handle.region))
            .cloned()
            .collect();
        self.respond("describe_availability_zones", handle, &zones)
    }

    async fn describe_instance_types(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<InstanceType>> {
        self.respond("describe_instance_types", handle, &self.fixture.instance_types)
    }

    async fn describe_instances(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Instance>> {
        self.respond("describe_instances", handle, &self.fixture.instances)
    }

    async fn describe_security_groups(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<SecurityGroup>> {
        self.respond("describe_security_groups", handle, &self.fixture.security_groups)
    }

    async fn describe_key_pairs(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<KeyPair>> {
        self.respond("describe_key_pairs", handle, &self.fixture.key_pairs)
    }

    async fn describe_volumes(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Volume>> {
        self.respond("describe_volumes", handle, &self.fixture.volumes)
    }

    async fn describe_snapshots(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Snapshot>> {
        self.respond("describe_snapshots", handle, &self.fixture.snapshots)
    }

    async fn describe_vpcs(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Vpc>> {
        self.respond("describe_vpcs", handle, &self.fixture.vpcs)
    }

    async fn describe_subnets(
        &self,
        handle: &ConnectionHandle,
        vpc_id: Option<&str>,
    ) -> ProviderResult<Vec<Subnet>> {
        let subnets: Vec<Subnet> = self
            .fixture
            .subnets
            .iter()
            .filter(|s| vpc_id.is_none_or(|v| s.vpc_id == v))
            .cloned()
            .collect();
        self.respond("describe_subnets", handle, &subnets)
    }

    async fn describe_addresses(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Address>> {
        self.respond("describe_addresses", handle, &self.fixture.addresses)
    }

    async fn describe_kernels(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<MachineImage>> {
        self.respond("describe_kernels", handle, &self.fixture.kernels)
    }

    async fn describe_ramdisks(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<MachineImage>> {
        self.respond("describe_ramdisks", handle, &self.fixture.ramdisks)
    }

    async fn list_roles(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Role>> {
        self.respond("list_roles", handle, &self.fixture.roles)
    }

    async fn list_accounts(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Account>> {
        self.respond("list_accounts", handle, &self.fixture.accounts)
    }

    async fn list_buckets(&self, handle: &ConnectionHandle) -> ProviderResult<Vec<Bucket>> {
        self.respond("list_buckets", handle, &self.fixture.buckets)
    }

    async fn describe_scaling_groups(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<ScalingGroup>> {
        self.respond("describe_scaling_groups", handle, &self.fixture.scaling_groups)
    }

    async fn describe_launch_configs(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<LaunchConfig>> {
        self.respond("describe_launch_configs", handle, &self.fixture.launch_configs)
    }

    async fn describe_load_balancers(
        &self,
        handle: &ConnectionHandle,
    ) -> ProviderResult<Vec<LoadBalancer>> {
        self.respond("describe_load_balancers", handle, &self.fixture.load_balancers)
    }

    async fn raw_request(&self, handle: &ConnectionHandle, action: &str) -> ProviderResult<String> {
        self.check_fault(action, handle)?;
        self.fixture.raw_responses.get(action).cloned().ok_or_else(|| {
            ProviderError::new(Some(400), "Bad Request")
                .with_code("InvalidAction")
                .with_message(format!("The action {action} is not valid for this endpoint."))
        })
    }
}
