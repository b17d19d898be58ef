//! Cloud provider adapters.

mod fixture;
mod regions;

pub use fixture::{CloudFixture, FaultFixture, FixtureError, JsonFixtureProvider};
pub use regions::StaticRegionDirectory;

/// Tracing target of provider calls, raised to `debug` by `connection.debug`.
pub const PROVIDER_TARGET: &str = "cirrus::provider";
