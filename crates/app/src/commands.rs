//! Subcommand execution.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cirrus_application::{
    ApplicationError, ChoiceOptions, ChoicesManager, ConnectionBroker, ConnectionRequest,
    CredentialContext, ErrorTranslator, KeypairOptions, LandingOptions, LandingPage,
    RegionDirectory, SubnetOptions,
};
use cirrus_domain::{
    ChoiceList, ConnectionHandle, ConsoleSettings, DomainError, ErrorOutcome, RequestContext,
    ResourceRecord, ResourceType, SortKey, TagStyle,
};
use cirrus_infrastructure::{CacheRegion, CacheRegions, FixtureError, JsonFixtureProvider};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::cli::{ChoiceFamily, Cli, Command};

/// Address recorded for requests issued from the command line.
const CLI_REMOTE_ADDR: &str = "cli";

/// Errors that end a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The cloud fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// An input file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The file.
        path: PathBuf,
        /// The cause.
        source: std::io::Error,
    },

    /// Input or output JSON was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        Self::Application(err.into())
    }
}

/// Runs the parsed command, printing its JSON result on stdout.
///
/// Provider faults are translated into a notice printed on stderr and a
/// failing exit code.
///
/// # Errors
///
/// Returns [`CommandError`] for faults that are not the provider's.
pub async fn run(cli: Cli, settings: ConsoleSettings) -> Result<ExitCode, CommandError> {
    let context = CredentialContext::new(cli.session.to_session());
    let mut request = RequestContext::new(CLI_REMOTE_ADDR, command_path(&cli.command));
    if cli.xhr {
        request = request.xhr();
    }
    if settings.log.useractions {
        context.log_request(&request, &format!("running {}", command_path(&cli.command)));
    }

    let regions = CacheRegions::from_settings(&settings.cache);
    let provider = load_provider(cli.fixture.as_deref()).await?;
    let broker = ConnectionBroker::new(settings, provider.region_directory());

    let result = match cli.command {
        Command::Endpoint { resource_type } => {
            endpoint(&broker, &context, ResourceType::parse(&resource_type)).await
        }
        Command::Filter {
            records,
            query,
            ignore,
            sort,
            tag_objects,
        } => filter(&records, &query, ignore, sort.as_deref(), tag_objects).await,
        Command::Choices {
            family,
            no_blank,
            raw_labels,
            describe,
            vpc_id,
        } => {
            let options = ChoiceOptions {
                add_blank: !no_blank,
                escape: !raw_labels,
            };
            let choices_request = ChoicesRequest {
                family,
                options,
                describe,
                vpc_id,
            };
            let handle = broker
                .resolve(&context, ConnectionRequest::new(family.resource_type()))
                .await;
            match handle {
                Ok(handle) => {
                    let store = regions.choices_store();
                    choices(provider, store, handle, &context, choices_request).await
                }
                Err(err) => Err(err.into()),
            }
        }
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(CommandError::Application(ApplicationError::Provider(err))) => {
            let outcome = ErrorTranslator::new(context).translate(&err, &request);
            if matches!(outcome, ErrorOutcome::Redirect { clear_caches: true, .. }) {
                regions.invalidate_all();
            }
            eprintln!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn command_path(command: &Command) -> String {
    match command {
        Command::Endpoint { resource_type } => format!("/endpoint/{resource_type}"),
        Command::Filter { .. } => "/filter".to_string(),
        Command::Choices { family, .. } => format!("/choices/{family:?}").to_lowercase(),
    }
}

async fn load_provider(fixture: Option<&Path>) -> Result<JsonFixtureProvider, FixtureError> {
    match fixture {
        Some(path) => JsonFixtureProvider::from_path(path).await,
        None => {
            warn!("no cloud fixture given, provider calls return no data");
            Ok(JsonFixtureProvider::default())
        }
    }
}

async fn endpoint(
    broker: &ConnectionBroker<impl RegionDirectory>,
    context: &CredentialContext,
    resource_type: ResourceType,
) -> Result<Value, CommandError> {
    let handle = broker
        .resolve(context, ConnectionRequest::new(resource_type))
        .await?;
    Ok(handle_json(&handle))
}

fn handle_json(handle: &ConnectionHandle) -> Value {
    json!({
        "cloud_flavor": handle.cloud_flavor.as_str(),
        "resource_type": handle.resource_type.as_str(),
        "region": handle.region,
        "url": handle.endpoint_url(),
        "validate_certs": handle.validate_certs,
        "ca_certs": handle.endpoint.as_ref().and_then(|e| e.ca_certs.as_ref()),
        "retries": handle.retries,
    })
}

async fn filter(
    path: &Path,
    query: &str,
    ignore: Vec<String>,
    sort: Option<&str>,
    tag_objects: bool,
) -> Result<Value, CommandError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let records: Vec<ResourceRecord> = serde_json::from_str(&content)?;

    let mut options = LandingOptions::default().ignoring(ignore);
    if let Some(sort) = sort {
        options = options.with_default_sort(SortKey::parse(sort)?);
    }
    if tag_objects {
        options = options.with_tag_style(TagStyle::ObjectList);
    }
    let records = LandingPage::apply(records, query, &options)?;
    debug!(count = records.len(), "filtered records");
    Ok(serde_json::to_value(records)?)
}

struct ChoicesRequest {
    family: ChoiceFamily,
    options: ChoiceOptions,
    describe: bool,
    vpc_id: Option<String>,
}

async fn choices(
    provider: JsonFixtureProvider,
    store: CacheRegion,
    handle: ConnectionHandle,
    context: &CredentialContext,
    request: ChoicesRequest,
) -> Result<Value, CommandError> {
    let region = handle.region.clone();
    let manager = ChoicesManager::new(provider, store, Some(handle));
    let ChoicesRequest {
        family,
        options,
        describe,
        vpc_id,
    } = request;

    let list: ChoiceList = match family {
        ChoiceFamily::Zones => {
            manager
                .availability_zones(&region, None, options.add_blank)
                .await?
        }
        ChoiceFamily::InstanceTypes => {
            manager
                .instance_types(context.cloud_flavor(), options.add_blank, describe)
                .await?
        }
        ChoiceFamily::Instances => manager.instances(None, None, options.escape).await?,
        ChoiceFamily::Volumes => manager.volumes(None, options.escape).await?,
        ChoiceFamily::Snapshots => manager.snapshots(None, options.escape).await?,
        ChoiceFamily::SecurityGroups => manager.security_groups(None, false, options).await?,
        ChoiceFamily::Keypairs => {
            let keypair_options = KeypairOptions {
                base: options,
                ..KeypairOptions::default()
            };
            manager.keypairs(None, keypair_options).await?
        }
        ChoiceFamily::ElasticIps => manager.elastic_ips(None, None).await?,
        ChoiceFamily::Kernels => manager.kernels(None, None).await?,
        ChoiceFamily::Ramdisks => manager.ramdisks(None, None).await?,
        ChoiceFamily::ScalingGroups => manager.scaling_groups(None, options).await?,
        ChoiceFamily::LaunchConfigs => manager.launch_configs(None, options).await?,
        ChoiceFamily::LoadBalancers => manager.load_balancers(None, options).await?,
        ChoiceFamily::Policies => manager.predefined_policy_choices(options.add_blank).await?,
        ChoiceFamily::Roles => manager.roles(None, options).await?,
        ChoiceFamily::Accounts => manager.accounts(options).await?,
        ChoiceFamily::Buckets => manager.buckets(None, options).await?,
        ChoiceFamily::Vpcs => manager.vpc_networks(None, options).await?,
        ChoiceFamily::Subnets => {
            let subnet_options = SubnetOptions {
                vpc_id,
                show_zone: true,
                add_blank: options.add_blank,
            };
            manager.vpc_subnets(None, &subnet_options).await?
        }
    };
    Ok(serde_json::to_value(list.to_options())?)
}
