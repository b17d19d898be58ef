//! Provider API family tags.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A provider API family used to select connection configuration.
///
/// Parsing never fails: unrecognized tags become [`ResourceType::Other`] so a
/// caller still gets a generic handle at the base endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    /// Compute.
    #[default]
    Ec2,
    /// Identity and access management.
    Iam,
    /// Elastic load balancing.
    Elb,
    /// Object storage.
    S3,
    /// Virtual private cloud (served by the compute endpoint).
    Vpc,
    /// Auto scaling.
    Autoscale,
    /// Monitoring.
    CloudWatch,
    /// Security token service.
    Sts,
    /// Stack orchestration.
    CloudFormation,
    /// Any tag not listed above.
    Other(String),
}

impl ResourceType {
    /// Every recognized resource type.
    pub const KNOWN: [Self; 9] = [
        Self::Ec2,
        Self::Iam,
        Self::Elb,
        Self::S3,
        Self::Vpc,
        Self::Autoscale,
        Self::CloudWatch,
        Self::Sts,
        Self::CloudFormation,
    ];

    /// Parses a tag, mapping unknown values to [`ResourceType::Other`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ec2" => Self::Ec2,
            "iam" => Self::Iam,
            "elb" => Self::Elb,
            "s3" => Self::S3,
            "vpc" => Self::Vpc,
            "autoscale" => Self::Autoscale,
            "cloudwatch" => Self::CloudWatch,
            "sts" => Self::Sts,
            "cloudformation" => Self::CloudFormation,
            _ => Self::Other(tag.to_string()),
        }
    }

    /// Returns the tag, which is also the settings key prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ec2 => "ec2",
            Self::Iam => "iam",
            Self::Elb => "elb",
            Self::S3 => "s3",
            Self::Vpc => "vpc",
            Self::Autoscale => "autoscale",
            Self::CloudWatch => "cloudwatch",
            Self::Sts => "sts",
            Self::CloudFormation => "cloudformation",
            Self::Other(tag) => tag,
        }
    }

    /// Returns true for tags that are not one of the known families.
    #[must_use]
    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }

    /// Service name in public cloud endpoint host names.
    #[must_use]
    pub fn public_service_name(&self) -> &str {
        match self {
            Self::Vpc => "ec2",
            Self::Elb => "elasticloadbalancing",
            Self::Autoscale => "autoscaling",
            Self::CloudWatch => "monitoring",
            other => other.as_str(),
        }
    }

    /// Service label used for DNS-style private cloud addressing.
    #[must_use]
    pub const fn private_dns_label(&self) -> Option<&'static str> {
        match self {
            Self::Ec2 | Self::Vpc => Some("compute"),
            Self::Iam => Some("euare"),
            Self::Elb => Some("loadbalancing"),
            Self::S3 => Some("objectstorage"),
            Self::Autoscale => Some("autoscaling"),
            Self::CloudWatch => Some("cloudwatch"),
            Self::Sts => Some("tokens"),
            Self::CloudFormation => Some("cloudformation"),
            Self::Other(_) => None,
        }
    }

    /// Request path used for IP-and-path private cloud addressing.
    #[must_use]
    pub const fn private_service_path(&self) -> &'static str {
        match self {
            Self::Ec2 | Self::Vpc => "/services/compute",
            Self::Iam => "/services/Euare",
            Self::Elb => "/services/LoadBalancing",
            Self::S3 => "/services/objectstorage",
            Self::Autoscale => "/services/AutoScaling",
            Self::CloudWatch => "/services/CloudWatch",
            Self::Sts => "/services/Tokens",
            Self::CloudFormation => "/services/CloudFormation",
            Self::Other(_) => "/",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        for kind in ResourceType::KNOWN {
            assert_eq!(ResourceType::parse(kind.as_str()), kind);
        }
        assert_eq!(ResourceType::parse("EC2"), ResourceType::Ec2);
    }

    #[test]
    fn test_parse_unknown() {
        let kind = ResourceType::parse("dynamodb");
        assert!(kind.is_other());
        assert_eq!(kind.as_str(), "dynamodb");
        assert_eq!(kind.private_dns_label(), None);
        assert_eq!(kind.private_service_path(), "/");
    }

    #[test]
    fn test_vpc_shares_compute() {
        assert_eq!(ResourceType::Vpc.public_service_name(), "ec2");
        assert_eq!(
            ResourceType::Vpc.private_service_path(),
            ResourceType::Ec2.private_service_path()
        );
    }
}
