//! Choices manager use case
//!
//! Builds the option lists behind the console's select inputs. Each family
//! accepts an optional pre-fetched collection and only calls the provider
//! when none (or an empty one) is supplied. Zones and instance types are
//! memoized in the shared results cache; a failing cache never fails the
//! request.

mod policies;

pub use policies::{DESCRIBE_POLICIES_ACTION, parse_predefined_policies};

use std::future::Future;

use cirrus_domain::catalog::aws_instance_type_choices;
use cirrus_domain::{
    Address, AvailabilityZone, Bucket, Choice, ChoiceList, CloudFlavor, ConnectionHandle, Instance,
    InstanceType, KeyPair, LaunchConfig, LoadBalancer, MachineImage, Role, ScalingGroup,
    SecurityGroup, Snapshot, Subnet, Volume, Vpc, display_name, escape_braces,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::ApplicationResult;
use crate::ports::{CacheStore, CloudProvider, ProviderResult};

/// Cache namespace of memoized availability zones.
pub const AVAILABILITY_ZONES_NAMESPACE: &str = "availability_zones";

/// Cache namespace of memoized instance types.
pub const INSTANCE_TYPES_NAMESPACE: &str = "instance_types";

/// Flags shared by most families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOptions {
    /// Prepend the blank `("", "Select...")` choice.
    pub add_blank: bool,
    /// Escape template braces in labels.
    pub escape: bool,
}

impl Default for ChoiceOptions {
    fn default() -> Self {
        Self {
            add_blank: true,
            escape: true,
        }
    }
}

impl ChoiceOptions {
    /// Options without the blank choice.
    #[must_use]
    pub const fn without_blank() -> Self {
        Self {
            add_blank: false,
            escape: true,
        }
    }
}

/// Options for [`ChoicesManager::keypairs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeypairOptions {
    /// Blank and escape flags.
    pub base: ChoiceOptions,
    /// Append `("none", "None (advanced option)")`.
    pub no_keypair_option: bool,
    /// Append `("none", "None")` for filter menus.
    pub no_keypair_filter_option: bool,
}

/// Options for [`ChoicesManager::vpc_subnets`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetOptions {
    /// Only subnets of this VPC.
    pub vpc_id: Option<String>,
    /// Label as `cidr (id) | zone`.
    pub show_zone: bool,
    /// Prepend `("None", "No subnets found")`.
    pub add_blank: bool,
}

/// Builds choice lists from provider data.
pub struct ChoicesManager<P, C> {
    provider: P,
    cache: C,
    handle: Option<ConnectionHandle>,
}

impl<P: CloudProvider, C: CacheStore> ChoicesManager<P, C> {
    /// Creates a manager. With no handle, families only use pre-fetched data.
    pub const fn new(provider: P, cache: C, handle: Option<ConnectionHandle>) -> Self {
        Self {
            provider,
            cache,
            handle,
        }
    }

    /// Uses `prefetched` when it is non-empty, otherwise fetches live.
    async fn fetch_or<'a, T, F, Fut>(
        &'a self,
        prefetched: Option<Vec<T>>,
        fetch: F,
    ) -> ApplicationResult<Vec<T>>
    where
        F: FnOnce(&'a P, &'a ConnectionHandle) -> Fut,
        Fut: Future<Output = ProviderResult<Vec<T>>>,
    {
        if let Some(items) = prefetched.filter(|items| !items.is_empty()) {
            return Ok(items);
        }
        match &self.handle {
            Some(handle) => Ok(fetch(&self.provider, handle).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Fetches through `handle`, cached under the handle's region, falling
    /// back to an uncached fetch when the cache backend fails.
    async fn memoized<'a, T, F, Fut>(
        &'a self,
        handle: &'a ConnectionHandle,
        namespace: &str,
        fetch: F,
    ) -> ApplicationResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&'a P, &'a ConnectionHandle) -> Fut,
        Fut: Future<Output = ProviderResult<Vec<T>>>,
    {
        let key = handle.region.as_str();
        match self.cache.get(namespace, key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(items) => {
                    debug!(namespace = %namespace, key = %key, "cache hit");
                    return Ok(items);
                }
                Err(err) => {
                    warn!(
                        namespace = %namespace,
                        error = %err,
                        "discarding undecodable cache entry"
                    );
                }
            },
            Ok(None) => {}
            Err(err) => {
                warn!(namespace = %namespace, error = %err, "cache unavailable, fetching live");
                return Ok(fetch(&self.provider, handle).await?);
            }
        }

        let items = fetch(&self.provider, handle).await?;
        match serde_json::to_vec(&items) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(namespace, key, bytes).await {
                    warn!(namespace = %namespace, error = %err, "cache write failed");
                }
            }
            Err(err) => warn!(namespace = %namespace, error = %err, "cache encode failed"),
        }
        Ok(items)
    }

    // EC2

    /// Availability zone choices, sorted.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn availability_zones(
        &self,
        region: &str,
        zones: Option<Vec<AvailabilityZone>>,
        add_blank: bool,
    ) -> ApplicationResult<ChoiceList> {
        let zones = match zones.filter(|z| !z.is_empty()) {
            Some(zones) => zones,
            None => self.get_availability_zones(region).await?,
        };
        let mut choices = ChoiceList::with_blank(add_blank);
        for zone in zones {
            choices.push(Choice::same(zone.name));
        }
        Ok(choices.sorted())
    }

    /// Zones of `region`, memoized under [`AVAILABILITY_ZONES_NAMESPACE`].
    ///
    /// A region other than the handle's is fetched through a copy of the
    /// handle relabelled for that region.
    ///
    /// # Errors
    ///
    /// Propagates provider faults; cache faults are recovered.
    pub async fn get_availability_zones(
        &self,
        region: &str,
    ) -> ApplicationResult<Vec<AvailabilityZone>> {
        let Some(handle) = &self.handle else {
            return Ok(Vec::new());
        };
        let regional;
        let handle = if handle.region == region {
            handle
        } else {
            regional = ConnectionHandle {
                region: region.to_string(),
                ..handle.clone()
            };
            &regional
        };
        self.memoized(handle, AVAILABILITY_ZONES_NAMESPACE, |p, h| {
            p.describe_availability_zones(h)
        })
        .await
    }

    /// Instance type choices.
    ///
    /// The private cloud is queried (through the cache); the public cloud uses
    /// the built-in catalog.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn instance_types(
        &self,
        cloud_flavor: CloudFlavor,
        add_blank: bool,
        add_description: bool,
    ) -> ApplicationResult<ChoiceList> {
        let mut choices = ChoiceList::with_blank(add_blank);
        match cloud_flavor {
            CloudFlavor::Euca => {
                let types: Vec<InstanceType> = match &self.handle {
                    Some(handle) => {
                        self.memoized(handle, INSTANCE_TYPES_NAMESPACE, |p, h| {
                            p.describe_instance_types(h)
                        })
                        .await?
                    }
                    None => Vec::new(),
                };
                for vmtype in types {
                    let label = if add_description {
                        instance_type_label(&vmtype)
                    } else {
                        vmtype.name.clone()
                    };
                    choices.push(Choice::new(vmtype.name, label));
                }
            }
            CloudFlavor::Aws => choices.extend(aws_instance_type_choices(add_description)),
        }
        Ok(choices)
    }

    /// Drops the memoized instance types.
    pub async fn invalidate_instance_types(&self) {
        if let Err(err) = self.cache.invalidate(INSTANCE_TYPES_NAMESPACE).await {
            warn!(namespace = INSTANCE_TYPES_NAMESPACE, error = %err, "cache invalidation failed");
        }
    }

    /// Instance choices in provider order, optionally restricted to `states`.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn instances(
        &self,
        instances: Option<Vec<Instance>>,
        states: Option<&[&str]>,
        escape: bool,
    ) -> ApplicationResult<ChoiceList> {
        let instances = self.fetch_or(instances, |p, h| p.describe_instances(h)).await?;
        let mut choices = ChoiceList::new();
        choices.push_pair("", "Select instance...");
        for instance in instances
            .iter()
            .filter(|i| states.is_none_or(|s| s.contains(&i.state.as_str())))
        {
            choices.push_pair(&instance.id, display_name(&instance.id, &instance.tags, escape));
        }
        Ok(choices)
    }

    /// Volume choices in provider order.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn volumes(
        &self,
        volumes: Option<Vec<Volume>>,
        escape: bool,
    ) -> ApplicationResult<ChoiceList> {
        let volumes = self.fetch_or(volumes, |p, h| p.describe_volumes(h)).await?;
        let mut choices = ChoiceList::new();
        choices.push_pair("", "Select volume...");
        for volume in &volumes {
            choices.push_pair(&volume.id, display_name(&volume.id, &volume.tags, escape));
        }
        Ok(choices)
    }

    /// Snapshot choices in provider order.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn snapshots(
        &self,
        snapshots: Option<Vec<Snapshot>>,
        escape: bool,
    ) -> ApplicationResult<ChoiceList> {
        let snapshots = self.fetch_or(snapshots, |p, h| p.describe_snapshots(h)).await?;
        let mut choices = ChoiceList::new();
        choices.push_pair("", "None");
        for snapshot in &snapshots {
            choices.push_pair(&snapshot.id, display_name(&snapshot.id, &snapshot.tags, escape));
        }
        Ok(choices)
    }

    /// Security group choices valued by name (or id with `use_id`).
    ///
    /// Offers `default` when the account has no groups.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn security_groups(
        &self,
        groups: Option<Vec<SecurityGroup>>,
        use_id: bool,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let groups = self.fetch_or(groups, |p, h| p.describe_security_groups(h)).await?;
        let mut choices = ChoiceList::with_blank(options.add_blank);
        for group in &groups {
            let name = label(&group.name, options.escape);
            let value = if use_id { group.id.clone() } else { name.clone() };
            choices.push_pair(value, name);
        }
        if groups.is_empty() {
            choices.push(Choice::same("default"));
        }
        Ok(choices.dedup_sorted())
    }

    /// Key pair choices; the `none` entries are appended after sorting.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn keypairs(
        &self,
        keypairs: Option<Vec<KeyPair>>,
        options: KeypairOptions,
    ) -> ApplicationResult<ChoiceList> {
        let keypairs = self.fetch_or(keypairs, |p, h| p.describe_key_pairs(h)).await?;
        // Sorted before the blank and the trailing `none` entries are added.
        let names =
            named(keypairs.iter().map(|k| k.name.as_str()), options.base.escape).dedup_sorted();
        let mut choices = ChoiceList::with_blank(options.base.add_blank);
        choices.extend(names);
        if options.no_keypair_option {
            choices.push_pair("none", "None (advanced option)");
        } else if options.no_keypair_filter_option {
            choices.push_pair("none", "None");
        }
        Ok(choices)
    }

    /// Elastic IP choices for associating with `instance`.
    ///
    /// Only unattached addresses of a compatible domain are offered: `vpc`
    /// addresses for VPC instances, `standard` (or unset) ones otherwise.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn elastic_ips(
        &self,
        instance: Option<&Instance>,
        addresses: Option<Vec<Address>>,
    ) -> ApplicationResult<ChoiceList> {
        let addresses = self.fetch_or(addresses, |p, h| p.describe_addresses(h)).await?;
        let vpc_instance = instance.is_some_and(Instance::is_vpc);
        let mut choices = ChoiceList::new();
        if instance.is_some_and(|i| i.state == "running") {
            choices.push_pair("", "Unassign Address");
        }
        for address in addresses
            .iter()
            .filter(|a| a.is_unattached() && a.is_vpc() == vpc_instance)
        {
            choices.push(Choice::same(&address.public_ip));
        }
        if let Some(instance) = instance {
            match instance.ip_address.as_deref() {
                Some(ip) if !ip.is_empty() => choices.push(Choice::same(ip)),
                _ if instance.state == "stopped" => {
                    choices.push_pair("none", "no address in stopped state");
                }
                _ => {}
            }
        }
        Ok(choices.dedup_sorted())
    }

    /// Kernel image choices, including the image's own kernel.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn kernels(
        &self,
        kernel_images: Option<Vec<MachineImage>>,
        image: Option<&MachineImage>,
    ) -> ApplicationResult<ChoiceList> {
        let images = self.fetch_or(kernel_images, |p, h| p.describe_kernels(h)).await?;
        Ok(image_choices(&images, image.and_then(|i| i.kernel_id.as_deref())))
    }

    /// Ramdisk image choices, including the image's own ramdisk.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn ramdisks(
        &self,
        ramdisk_images: Option<Vec<MachineImage>>,
        image: Option<&MachineImage>,
    ) -> ApplicationResult<ChoiceList> {
        let images = self.fetch_or(ramdisk_images, |p, h| p.describe_ramdisks(h)).await?;
        Ok(image_choices(&images, image.and_then(|i| i.ramdisk_id.as_deref())))
    }

    // Auto scaling

    /// Scaling group choices.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn scaling_groups(
        &self,
        groups: Option<Vec<ScalingGroup>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let groups = self.fetch_or(groups, |p, h| p.describe_scaling_groups(h)).await?;
        let names = named(groups.iter().map(|g| g.name.as_str()), options.escape);
        Ok(with_blank(names, options).sorted())
    }

    /// Launch configuration choices.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn launch_configs(
        &self,
        configs: Option<Vec<LaunchConfig>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let configs = self.fetch_or(configs, |p, h| p.describe_launch_configs(h)).await?;
        let names = named(configs.iter().map(|c| c.name.as_str()), options.escape);
        Ok(with_blank(names, options).sorted())
    }

    // Load balancing

    /// Load balancer choices; an unavailable service yields no balancers.
    ///
    /// # Errors
    ///
    /// Propagates provider faults other than `ServiceUnavailable`.
    pub async fn load_balancers(
        &self,
        load_balancers: Option<Vec<LoadBalancer>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let load_balancers = match self
            .fetch_or(load_balancers, |p, h| p.describe_load_balancers(h))
            .await
        {
            Ok(items) => items,
            Err(err) if err.as_provider().is_some_and(|e| e.is_service_unavailable()) => {
                info!("ELB service not available, disabling polling");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        Ok(with_blank(
            named(load_balancers.iter().map(|lb| lb.name.as_str()), options.escape),
            options,
        )
        .sorted())
    }

    /// Predefined TLS negotiation policies, newest name first.
    ///
    /// # Errors
    ///
    /// Propagates provider faults and unparseable responses.
    pub async fn predefined_policy_choices(
        &self,
        add_blank: bool,
    ) -> ApplicationResult<ChoiceList> {
        let mut policies = ChoiceList::new();
        if let Some(handle) = &self.handle {
            let body = self.provider.raw_request(handle, DESCRIBE_POLICIES_ACTION).await?;
            for name in parse_predefined_policies(&body)? {
                policies.push(Choice::same(name));
            }
        }
        let mut choices = ChoiceList::with_blank(add_blank);
        choices.extend(policies.dedup_sorted_desc());
        Ok(choices)
    }

    // IAM

    /// Role choices.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn roles(
        &self,
        roles: Option<Vec<Role>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let roles = self.fetch_or(roles, |p, h| p.list_roles(h)).await?;
        let names = named(roles.iter().map(|r| r.role_name.as_str()), options.escape);
        Ok(with_blank(names, options).dedup_sorted())
    }

    /// Account choices; always fetched live.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn accounts(&self, options: ChoiceOptions) -> ApplicationResult<ChoiceList> {
        let accounts = self.fetch_or(None, |p, h| p.list_accounts(h)).await?;
        Ok(with_blank(
            named(accounts.iter().map(|a| a.account_name.as_str()), options.escape),
            options,
        )
        .dedup_sorted())
    }

    // S3

    /// Bucket choices.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn buckets(
        &self,
        buckets: Option<Vec<Bucket>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let buckets = self.fetch_or(buckets, |p, h| p.list_buckets(h)).await?;
        let names = named(buckets.iter().map(|b| b.name.as_str()), options.escape);
        Ok(with_blank(names, options).dedup_sorted())
    }

    // VPC

    /// VPC choices, with a `("None", "No VPC")` sentinel when `add_blank`.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn vpc_networks(
        &self,
        vpcs: Option<Vec<Vpc>>,
        options: ChoiceOptions,
    ) -> ApplicationResult<ChoiceList> {
        let vpcs = self.fetch_or(vpcs, |p, h| p.describe_vpcs(h)).await?;
        let mut choices = ChoiceList::new();
        if options.add_blank {
            choices.push_pair("None", "No VPC");
        }
        for vpc in &vpcs {
            choices.push_pair(&vpc.id, display_name(&vpc.id, &vpc.tags, options.escape));
        }
        Ok(choices.dedup_sorted())
    }

    /// Subnet choices, optionally restricted to one VPC.
    ///
    /// # Errors
    ///
    /// Propagates provider faults.
    pub async fn vpc_subnets(
        &self,
        subnets: Option<Vec<Subnet>>,
        options: &SubnetOptions,
    ) -> ApplicationResult<ChoiceList> {
        let vpc_id = options.vpc_id.as_deref().filter(|v| !v.is_empty());
        let subnets = self
            .fetch_or(subnets, |p, h| p.describe_subnets(h, vpc_id))
            .await?;
        let mut choices = ChoiceList::new();
        if options.add_blank {
            choices.push_pair("None", "No subnets found");
        }
        for subnet in subnets
            .iter()
            .filter(|s| vpc_id.is_none_or(|v| s.vpc_id == v))
        {
            let label = if options.show_zone {
                format!("{} ({}) | {}", subnet.cidr_block, subnet.id, subnet.availability_zone)
            } else {
                subnet.cidr_block.clone()
            };
            choices.push_pair(&subnet.id, label);
        }
        Ok(choices.dedup_sorted())
    }
}

/// `"{name}: {cores} CPUs, {memory} memory (MB), {disk} disk (GB,root device)"`.
#[must_use]
pub fn instance_type_label(vmtype: &InstanceType) -> String {
    format!(
        "{}: {} CPUs, {} memory (MB), {} disk (GB,root device)",
        escape_braces(&vmtype.name),
        vmtype.cores,
        vmtype.memory,
        vmtype.disk
    )
}

fn label(name: &str, escape: bool) -> String {
    if escape { escape_braces(name) } else { name.to_string() }
}

fn named<'a>(names: impl Iterator<Item = &'a str>, escape: bool) -> ChoiceList {
    names.map(|name| Choice::same(label(name, escape))).collect()
}

fn with_blank(names: ChoiceList, options: ChoiceOptions) -> ChoiceList {
    let mut choices = ChoiceList::with_blank(options.add_blank);
    choices.extend(names);
    choices
}

fn image_choices(images: &[MachineImage], own: Option<&str>) -> ChoiceList {
    let mut choices = ChoiceList::new();
    choices.push_pair("", "Use default from image");
    for image in images.iter().filter(|i| !i.id.is_empty()) {
        choices.push(Choice::same(&image.id));
    }
    if let Some(own) = own {
        choices.push(Choice::same(own));
    }
    choices.dedup_sorted()
}
