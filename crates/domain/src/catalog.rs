//! Built-in public-cloud catalogs.

use crate::choice::{Choice, ChoiceList};
use crate::error::{DomainError, DomainResult};

/// Prefix of the provider's predefined TLS negotiation policies.
pub const ELB_PREDEFINED_SECURITY_POLICY_NAME_PREFIX: &str = "ELBSecurityPolicy-";

/// Policy type tag of TLS negotiation policies.
pub const SSL_NEGOTIATION_POLICY_TYPE: &str = "SSLNegotiationPolicyType";

/// XML namespace of load-balancing API responses.
pub const ELB_XML_NAMESPACE: &str = "http://elasticloadbalancing.amazonaws.com/doc/2012-12-01/";

/// A public-cloud region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicRegion {
    /// Region identifier.
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// Public-cloud regions offered at login.
pub const AWS_REGIONS: &[PublicRegion] = &[
    PublicRegion { name: "us-east-1", label: "US East (N. Virginia)" },
    PublicRegion { name: "us-west-1", label: "US West (N. California)" },
    PublicRegion { name: "us-west-2", label: "US West (Oregon)" },
    PublicRegion { name: "eu-west-1", label: "EU (Ireland)" },
    PublicRegion { name: "eu-central-1", label: "EU (Frankfurt)" },
    PublicRegion { name: "ap-northeast-1", label: "Asia Pacific (Tokyo)" },
    PublicRegion { name: "ap-southeast-1", label: "Asia Pacific (Singapore)" },
    PublicRegion { name: "ap-southeast-2", label: "Asia Pacific (Sydney)" },
    PublicRegion { name: "sa-east-1", label: "South America (Sao Paulo)" },
    PublicRegion { name: "cn-north-1", label: "China (Beijing)" },
];

/// Looks up a public-cloud region.
///
/// # Errors
///
/// Returns [`DomainError::InvalidRegion`] for unknown identifiers.
pub fn aws_region(name: &str) -> DomainResult<&'static PublicRegion> {
    AWS_REGIONS
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| DomainError::InvalidRegion(name.to_string()))
}

/// Public-cloud instance types and their descriptions.
pub const AWS_INSTANCE_TYPE_CHOICES: &[(&str, &str)] = &[
    ("t2.micro", "T2 Micro: 1 vCPU, 1 GiB memory"),
    ("t2.small", "T2 Small: 1 vCPU, 2 GiB memory"),
    ("t2.medium", "T2 Medium: 2 vCPUs, 4 GiB memory"),
    ("m3.medium", "M3 Medium: 1 vCPU, 3.75 GiB memory, 4 GB SSD"),
    ("m3.large", "M3 Large: 2 vCPUs, 7.5 GiB memory, 32 GB SSD"),
    ("m3.xlarge", "M3 Extra Large: 4 vCPUs, 15 GiB memory, 80 GB SSD"),
    ("m3.2xlarge", "M3 Double Extra Large: 8 vCPUs, 30 GiB memory, 160 GB SSD"),
    ("c3.large", "C3 Large: 2 vCPUs, 3.75 GiB memory, 32 GB SSD"),
    ("c3.xlarge", "C3 Extra Large: 4 vCPUs, 7.5 GiB memory, 80 GB SSD"),
    ("c3.2xlarge", "C3 Double Extra Large: 8 vCPUs, 15 GiB memory, 160 GB SSD"),
    ("r3.large", "R3 Large: 2 vCPUs, 15.25 GiB memory, 32 GB SSD"),
    ("r3.xlarge", "R3 Extra Large: 4 vCPUs, 30.5 GiB memory, 80 GB SSD"),
    ("m1.small", "M1 Small: 1 vCPU, 1.7 GiB memory, 160 GB disk"),
    ("m1.medium", "M1 Medium: 1 vCPU, 3.75 GiB memory, 410 GB disk"),
    ("m1.large", "M1 Large: 2 vCPUs, 7.5 GiB memory, 840 GB disk"),
    ("m1.xlarge", "M1 Extra Large: 4 vCPUs, 15 GiB memory, 1680 GB disk"),
];

/// The instance type catalog as choices, in catalog order.
#[must_use]
pub fn aws_instance_type_choices(add_description: bool) -> ChoiceList {
    AWS_INSTANCE_TYPE_CHOICES
        .iter()
        .map(|(name, description)| {
            if add_description {
                Choice::new(*name, *description)
            } else {
                Choice::same(*name)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_lookup() {
        assert!(aws_region("us-west-2").is_ok());
        assert!(matches!(aws_region("mars-1"), Err(DomainError::InvalidRegion(_))));
    }

    #[test]
    fn test_instance_types_without_description() {
        let list = aws_instance_type_choices(false);
        assert_eq!(list.len(), AWS_INSTANCE_TYPE_CHOICES.len());
        assert!(list.as_slice().iter().all(|c| c.value == c.label));
    }
}
