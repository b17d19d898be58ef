//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cirrus_domain::{CloudFlavor, ResourceType, Session};

/// Cirrus - cloud console core.
#[derive(Debug, Parser)]
#[command(name = "cirrus")]
#[command(about = "Resolve endpoints, build choice lists and query resource listings")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML, YAML, JSON or INI)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cloud fixture served in place of a live provider
    #[arg(long, global = true, env = "CIRRUS_FIXTURE")]
    pub fixture: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Report provider faults as in-page notices instead of redirects
    #[arg(long, global = true)]
    pub xhr: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// The session the command runs as.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Provider backend
    #[arg(long, global = true, default_value = "euca")]
    pub cloud: CloudFlavor,

    /// Region
    #[arg(long, global = true, default_value = "euca")]
    pub region: String,

    /// Access key id
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", default_value = "")]
    pub access_key: String,

    /// Secret access key
    #[arg(
        long,
        global = true,
        env = "AWS_SECRET_ACCESS_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub secret_key: String,

    /// Session token
    #[arg(long, global = true, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub security_token: Option<String>,

    /// Account name
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// User name
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Platforms the account supports, e.g. VPC
    #[arg(long = "platform", global = true)]
    pub platforms: Vec<String>,
}

impl SessionArgs {
    /// Builds the session.
    pub fn to_session(&self) -> Session {
        let mut session = Session::new(self.cloud, &self.region).with_credentials(
            &self.access_key,
            &self.secret_key,
            self.security_token.clone().filter(|t| !t.is_empty()),
        );
        if let (Some(account), Some(user)) = (&self.account, &self.user) {
            session = session.with_identity(account, user);
        }
        for platform in &self.platforms {
            session = session.with_platform(platform);
        }
        session
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the connection for a resource type
    Endpoint {
        /// Resource type, e.g. ec2, s3, elb
        resource_type: String,
    },

    /// Filter and sort a JSON array of records with a landing page query
    Filter {
        /// JSON file holding an array of records
        records: PathBuf,

        /// Query string, e.g. "status=available&sort=-size"
        #[arg(long, default_value = "")]
        query: String,

        /// Query keys that never filter
        #[arg(long = "ignore")]
        ignore: Vec<String>,

        /// Sort key used when the query has none
        #[arg(long)]
        sort: Option<String>,

        /// Records carry auto scaling style tag objects
        #[arg(long)]
        tag_objects: bool,
    },

    /// Print a choice list
    Choices {
        /// Choice family
        family: ChoiceFamily,

        /// Omit the blank entry
        #[arg(long)]
        no_blank: bool,

        /// Leave template braces in labels unescaped
        #[arg(long)]
        raw_labels: bool,

        /// Describe instance types
        #[arg(long)]
        describe: bool,

        /// Restrict subnets to one VPC
        #[arg(long)]
        vpc_id: Option<String>,
    },
}

/// Choice list families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChoiceFamily {
    /// Availability zones
    Zones,
    /// Instance types
    InstanceTypes,
    /// Instances
    Instances,
    /// Volumes
    Volumes,
    /// Snapshots
    Snapshots,
    /// Security groups
    SecurityGroups,
    /// Key pairs
    Keypairs,
    /// Unattached elastic IPs
    ElasticIps,
    /// Kernel images
    Kernels,
    /// Ramdisk images
    Ramdisks,
    /// Auto scaling groups
    ScalingGroups,
    /// Launch configurations
    LaunchConfigs,
    /// Load balancers
    LoadBalancers,
    /// Predefined TLS negotiation policies
    Policies,
    /// IAM roles
    Roles,
    /// Accounts
    Accounts,
    /// Buckets
    Buckets,
    /// VPCs
    Vpcs,
    /// VPC subnets
    Subnets,
}

impl ChoiceFamily {
    /// API family serving this list.
    pub const fn resource_type(self) -> ResourceType {
        match self {
            Self::ScalingGroups | Self::LaunchConfigs => ResourceType::Autoscale,
            Self::LoadBalancers | Self::Policies => ResourceType::Elb,
            Self::Roles | Self::Accounts => ResourceType::Iam,
            Self::Buckets => ResourceType::S3,
            Self::Vpcs | Self::Subnets => ResourceType::Vpc,
            _ => ResourceType::Ec2,
        }
    }
}
