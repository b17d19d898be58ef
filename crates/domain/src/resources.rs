//! Typed resource descriptions produced by the provider boundary.
//!
//! These are plain values: no connection or region back-references, so they
//! can be cached and serialized as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, Record, Tag};

/// Address domain for VPC-resident addresses.
pub const ADDRESS_DOMAIN_VPC: &str = "vpc";

/// Address domain for classic (non-VPC) addresses.
pub const ADDRESS_DOMAIN_STANDARD: &str = "standard";

/// An availability zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    /// Zone name.
    pub name: String,
    /// Zone state, e.g. `available`.
    #[serde(default)]
    pub state: Option<String>,
    /// Owning region.
    #[serde(default)]
    pub region_name: Option<String>,
}

/// A private cloud VM type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceType {
    /// Type name, e.g. `m1.small`.
    pub name: String,
    /// Virtual CPU count.
    pub cores: u32,
    /// Memory in MB.
    pub memory: u32,
    /// Root disk in GB.
    pub disk: u32,
}

/// A compute instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance id.
    pub id: String,
    /// Lifecycle state, e.g. `running`.
    #[serde(default)]
    pub state: String,
    /// Public address.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// VPC the instance lives in.
    #[serde(default)]
    pub vpc_id: Option<String>,
    /// Availability zone.
    #[serde(default)]
    pub placement: Option<String>,
    /// Instance type name.
    #[serde(default)]
    pub instance_type: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Instance {
    /// Returns true when the instance is VPC-resident.
    #[must_use]
    pub fn is_vpc(&self) -> bool {
        self.vpc_id.as_deref().is_some_and(|v| !v.is_empty())
    }
}

impl Record for Instance {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::scalar(&self.id),
            "state" => FieldValue::scalar(&self.state),
            "ip_address" => FieldValue::optional(self.ip_address.as_deref()),
            "vpc_id" => FieldValue::optional(self.vpc_id.as_deref()),
            "placement" => FieldValue::optional(self.placement.as_deref()),
            "instance_type" => FieldValue::optional(self.instance_type.as_deref()),
            _ => FieldValue::Absent,
        }
    }

    fn tag_map(&self) -> Option<&BTreeMap<String, String>> {
        Some(&self.tags)
    }
}

/// A security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    /// Group id.
    pub id: String,
    /// Group name.
    pub name: String,
    /// VPC the group belongs to.
    #[serde(default)]
    pub vpc_id: Option<String>,
}

/// A key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    /// Key pair name.
    pub name: String,
}

/// A block storage volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume id.
    pub id: String,
    /// Size in GB.
    #[serde(default)]
    pub size: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: String,
    /// Availability zone.
    #[serde(default)]
    pub zone: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Record for Volume {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::scalar(&self.id),
            "size" => FieldValue::Scalar(self.size.to_string()),
            "status" => FieldValue::scalar(&self.status),
            "zone" => FieldValue::optional(self.zone.as_deref()),
            _ => FieldValue::Absent,
        }
    }

    fn tag_map(&self) -> Option<&BTreeMap<String, String>> {
        Some(&self.tags)
    }
}

/// A volume snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot id.
    pub id: String,
    /// Size of the source volume in GB.
    #[serde(default)]
    pub volume_size: u32,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A VPC network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    /// VPC id.
    pub id: String,
    /// CIDR block.
    #[serde(default)]
    pub cidr_block: String,
    /// Tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A VPC subnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet id.
    pub id: String,
    /// CIDR block.
    pub cidr_block: String,
    /// Availability zone.
    #[serde(default)]
    pub availability_zone: String,
    /// Owning VPC.
    #[serde(default)]
    pub vpc_id: String,
}

/// An elastic IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// The public address.
    pub public_ip: String,
    /// Instance the address is associated with, if any.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Address domain: `vpc` or `standard`; absent means `standard`.
    #[serde(default)]
    pub domain: Option<String>,
}

impl Address {
    /// Returns true when no instance holds the address.
    #[must_use]
    pub fn is_unattached(&self) -> bool {
        self.instance_id.as_deref().is_none_or(str::is_empty)
    }

    /// Returns true for VPC-domain addresses.
    #[must_use]
    pub fn is_vpc(&self) -> bool {
        self.domain.as_deref() == Some(ADDRESS_DOMAIN_VPC)
    }
}

impl Record for Address {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "public_ip" => FieldValue::scalar(&self.public_ip),
            "instance_id" => FieldValue::optional(self.instance_id.as_deref()),
            "domain" => {
                FieldValue::scalar(self.domain.as_deref().unwrap_or(ADDRESS_DOMAIN_STANDARD))
            }
            _ => FieldValue::Absent,
        }
    }
}

/// An IAM role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name.
    pub role_name: String,
}

/// A private cloud account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account name.
    pub account_name: String,
}

/// An object storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
}

/// An auto scaling group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingGroup {
    /// Group name.
    pub name: String,
    /// Launch configuration used by the group.
    #[serde(default)]
    pub launch_config_name: Option<String>,
    /// Zones the group spans.
    #[serde(default)]
    pub availability_zones: Vec<String>,
    /// Auto scaling tag objects.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Record for ScalingGroup {
    fn field(&self, name: &str) -> FieldValue {
        match name {
            "name" => FieldValue::scalar(&self.name),
            "launch_config_name" => FieldValue::optional(self.launch_config_name.as_deref()),
            "availability_zones" => FieldValue::List(self.availability_zones.clone()),
            _ => FieldValue::Absent,
        }
    }

    fn tag_objects(&self) -> &[Tag] {
        &self.tags
    }
}

/// An auto scaling launch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Launch configuration name.
    pub name: String,
}

/// A load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// Load balancer name.
    pub name: String,
}

/// A machine image, kernel or ramdisk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineImage {
    /// Image id.
    pub id: String,
    /// Kernel the image boots with.
    #[serde(default)]
    pub kernel_id: Option<String>,
    /// Ramdisk the image boots with.
    #[serde(default)]
    pub ramdisk_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_domain_defaults_to_standard() {
        let address = Address {
            public_ip: "1.2.3.4".to_string(),
            instance_id: Some(String::new()),
            domain: None,
        };
        assert!(address.is_unattached());
        assert!(!address.is_vpc());
        assert_eq!(address.field("domain"), FieldValue::scalar("standard"));
    }

    #[test]
    fn test_instance_record_fields() {
        let instance = Instance {
            id: "i-1".to_string(),
            state: "running".to_string(),
            vpc_id: Some("vpc-1".to_string()),
            ..Instance::default()
        };
        assert!(instance.is_vpc());
        assert_eq!(instance.field("state"), FieldValue::scalar("running"));
        assert_eq!(instance.field("ip_address"), FieldValue::Absent);
    }

    #[test]
    fn test_scaling_group_tag_objects() {
        let group = ScalingGroup {
            name: "asg".to_string(),
            tags: vec![Tag::new("env", "prod")],
            ..ScalingGroup::default()
        };
        assert!(group.tag_map().is_none());
        assert_eq!(group.tag_objects().len(), 1);
    }
}
