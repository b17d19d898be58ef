//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod cache_store;
mod cloud_provider;
mod region_directory;

pub use cache_store::{CacheError, CacheStore};
pub use cloud_provider::{CloudProvider, PERMISSION_DENIED_CODES, ProviderError, ProviderResult};
pub use region_directory::RegionDirectory;
