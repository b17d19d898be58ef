//! Integration tests for the console core
//!
//! These tests wire settings, the connection broker, the fixture provider,
//! the cache regions and the use cases together the way the binary does.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::io::Write;

use cirrus_application::{
    CacheStore, ChoiceOptions, ChoicesManager, ConnectionBroker, ConnectionRequest,
    CredentialContext, ErrorTranslator, INSTANCE_TYPES_NAMESPACE, LandingOptions, LandingPage,
    SESSION_TIMEOUT_MESSAGE,
};
use cirrus_domain::{
    CloudFlavor, ConsoleSettings, ErrorOutcome, RequestContext, ResourceRecord, ResourceType,
    Session, SortKey,
};
use cirrus_infrastructure::{
    CacheRegionName, CacheRegions, CloudFixture, JsonFixtureProvider, SettingsLoader,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const FIXTURE: &str = r#"{
    "regions": [{"name": "east", "ec2_endpoint": "http://ufs.example.com:8773/services/compute"}],
    "availability_zones": [{"name": "east-1b"}, {"name": "east-1a"}],
    "instance_types": [
        {"name": "m1.small", "cores": 1, "memory": 256, "disk": 5},
        {"name": "m1.large", "cores": 2, "memory": 512, "disk": 10}
    ],
    "addresses": [
        {"public_ip": "192.0.2.10", "domain": "standard"},
        {"public_ip": "192.0.2.11", "instance_id": "i-1", "domain": "standard"},
        {"public_ip": "192.0.2.12", "domain": "vpc"}
    ],
    "faults": {
        "list_roles": {"status": 403, "code": "AccessDenied", "reason": "Forbidden", "message": "not authorized"}
    }
}"#;

fn settings_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(
        br#"
ufshost = "ufs.example.com"

[elb]
host = "elb.example.com"
port = 443

[connection]
retries = 3
"#,
    )
    .unwrap();
    file
}

fn load_settings() -> (NamedTempFile, ConsoleSettings) {
    let file = settings_file();
    let settings = SettingsLoader::new()
        .with_file(file.path())
        .with_env(HashMap::new())
        .load()
        .expect("Failed to load settings");
    (file, settings)
}

fn context() -> CredentialContext {
    CredentialContext::new(
        Session::new(CloudFlavor::Euca, "euca")
            .with_credentials("AKID", "secret", None)
            .with_identity("acme", "alice"),
    )
}

#[tokio::test]
async fn test_broker_resolves_from_settings_and_directory() {
    let (_file, settings) = load_settings();
    let provider = JsonFixtureProvider::from_json(FIXTURE).unwrap();
    let broker = ConnectionBroker::new(settings, provider.region_directory());

    let ec2 = broker
        .resolve(&context(), ConnectionRequest::new(ResourceType::Ec2))
        .await
        .unwrap();
    assert_eq!(ec2.region, "east");
    assert_eq!(ec2.retries, 3);
    assert_eq!(ec2.endpoint_url(), "http://ufs.example.com:8773/services/compute");

    let elb = broker
        .resolve(&context(), ConnectionRequest::new(ResourceType::Elb))
        .await
        .unwrap();
    let endpoint = elb.endpoint.unwrap();
    assert_eq!((endpoint.host.as_str(), endpoint.port), ("elb.example.com", 443));
}

#[tokio::test]
async fn test_choices_memoized_in_shared_region() {
    let (_file, settings) = load_settings();
    let regions = CacheRegions::from_settings(&settings.cache);
    let provider = JsonFixtureProvider::from_json(FIXTURE).unwrap();
    let broker = ConnectionBroker::new(settings, provider.region_directory());
    let handle = broker
        .resolve(&context(), ConnectionRequest::new(ResourceType::Ec2))
        .await
        .unwrap();

    let manager = ChoicesManager::new(provider, regions.choices_store(), Some(handle.clone()));
    let first = manager.instance_types(CloudFlavor::Euca, false, false).await.unwrap();
    assert_eq!(first.values(), vec!["m1.small", "m1.large"]);

    // A later request with an emptied provider is still served from the cache.
    let empty = JsonFixtureProvider::new(CloudFixture::default());
    let manager = ChoicesManager::new(empty, regions.choices_store(), Some(handle));
    let cached = manager.instance_types(CloudFlavor::Euca, false, false).await.unwrap();
    assert_eq!(cached, first);

    manager.invalidate_instance_types().await;
    let refreshed = manager.instance_types(CloudFlavor::Euca, false, false).await.unwrap();
    assert!(refreshed.is_empty());
}

#[tokio::test]
async fn test_zone_and_address_choices() {
    let (_file, settings) = load_settings();
    let regions = CacheRegions::from_settings(&settings.cache);
    let provider = JsonFixtureProvider::from_json(FIXTURE).unwrap();
    let broker = ConnectionBroker::new(settings, provider.region_directory());
    let handle = broker
        .resolve(&context(), ConnectionRequest::new(ResourceType::Ec2))
        .await
        .unwrap();
    let manager = ChoicesManager::new(provider, regions.choices_store(), Some(handle));

    let zones = manager.availability_zones("east", None, true).await.unwrap();
    assert_eq!(zones.values(), vec!["", "east-1a", "east-1b"]);

    let addresses = manager.elastic_ips(None, None).await.unwrap();
    assert_eq!(addresses.values(), vec!["192.0.2.10"]);
}

#[tokio::test]
async fn test_access_denied_translates_and_clears_caches() {
    let (_file, settings) = load_settings();
    let regions = CacheRegions::from_settings(&settings.cache);
    let store = regions.region(CacheRegionName::ExtraLongTerm);
    store
        .set(INSTANCE_TYPES_NAMESPACE, "east", b"[]".to_vec())
        .await
        .unwrap();

    let provider = JsonFixtureProvider::from_json(FIXTURE).unwrap();
    let broker = ConnectionBroker::new(settings, provider.region_directory());
    let handle = broker
        .resolve(&context(), ConnectionRequest::new(ResourceType::Iam))
        .await
        .unwrap();
    let manager = ChoicesManager::new(provider, regions.choices_store(), Some(handle));

    let err = manager
        .roles(None, ChoiceOptions::default())
        .await
        .unwrap_err();
    let fault = err.as_provider().expect("expected a provider fault");

    let request = RequestContext::new("203.0.113.5", "/roles");
    let outcome = ErrorTranslator::new(context()).translate(fault, &request);
    let ErrorOutcome::Redirect {
        location,
        notice,
        clear_caches,
    } = outcome
    else {
        panic!("expected a redirect");
    };
    assert_eq!(location, "/login");
    assert_eq!(notice.message, SESSION_TIMEOUT_MESSAGE);
    assert!(clear_caches);

    regions.invalidate_all();
    assert_eq!(store.get(INSTANCE_TYPES_NAMESPACE, "east").await.unwrap(), None);
}

#[test]
fn test_landing_page_query() {
    let records: Vec<ResourceRecord> = serde_json::from_str(
        r#"[
            {"id": "i-1", "state": "running", "launch_time": "2024-01-02", "tags": {"Name": "web"}},
            {"id": "i-2", "state": "stopped", "launch_time": "2024-01-01"},
            {"id": "i-3", "state": "running", "launch_time": "2024-01-03", "tags": {"team": "db"}}
        ]"#,
    )
    .unwrap();

    let options = LandingOptions::default()
        .ignoring(["page"])
        .with_default_sort(SortKey::descending("launch_time"));
    let result = LandingPage::apply(records, "?state=running&page=4", &options).unwrap();
    let ids: Vec<&str> = result
        .iter()
        .map(|r| r.attributes["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["i-3", "i-1"]);
}
