//! Cirrus Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and
//! tracing setup for the binary.

pub mod cache;
pub mod provider;
pub mod settings;
pub mod telemetry;

pub use cache::{CacheRegion, CacheRegionName, CacheRegions};
pub use provider::{
    CloudFixture, FaultFixture, FixtureError, JsonFixtureProvider, PROVIDER_TARGET,
    StaticRegionDirectory,
};
pub use settings::{SettingsError, SettingsLoader, load_settings};
pub use telemetry::{FilterHandle, env_filter, init_tracing, set_provider_debug};
