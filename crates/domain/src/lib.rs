//! Cirrus Domain - Core console types
//!
//! This crate defines the domain model for the Cirrus cloud console core:
//! sessions and credentials, endpoint configuration, resource records with
//! their filter and sort rules, choice lists and user-facing notices.
//! All types here are pure Rust with no I/O dependencies.

pub mod catalog;
pub mod choice;
pub mod endpoint;
pub mod error;
pub mod id;
pub mod notice;
pub mod query;
pub mod record;
pub mod resource_type;
pub mod resources;
pub mod session;
pub mod settings;
pub mod text;

pub use catalog::{
    AWS_INSTANCE_TYPE_CHOICES, AWS_REGIONS, ELB_PREDEFINED_SECURITY_POLICY_NAME_PREFIX,
    ELB_XML_NAMESPACE, PublicRegion, SSL_NEGOTIATION_POLICY_TYPE,
};
pub use choice::{BLANK_LABEL, Choice, ChoiceList, ChoiceOption};
pub use endpoint::{ConnectionHandle, HandleIdentity, RegionInfo, ServiceEndpointConfig};
pub use error::{DomainError, DomainResult};
pub use id::generate_request_id;
pub use notice::{ErrorOutcome, Notice, RequestContext, Severity};
pub use query::{
    FilterOptions, FilterSpec, QueryParam, QueryParams, SortKey, TAGS_FIELD, filter_records,
    sort_records,
};
pub use record::{FieldValue, Record, ResourceRecord, Tag, TagStyle};
pub use resource_type::ResourceType;
pub use resources::{
    Account, Address, AvailabilityZone, Bucket, Instance, InstanceType, KeyPair, LaunchConfig,
    LoadBalancer, MachineImage, Role, ScalingGroup, SecurityGroup, Snapshot, Subnet, Volume, Vpc,
};
pub use session::{CloudFlavor, Credentials, Session, VPC_PLATFORM};
pub use settings::ConsoleSettings;
pub use text::{display_name, escape_braces, sanitize_url, tags_display, unescape_braces};
