//! Region discovery port

use async_trait::async_trait;

use cirrus_domain::RegionInfo;

use super::ProviderResult;

/// Source of the regions a private cloud advertises.
#[async_trait]
pub trait RegionDirectory: Send + Sync {
    /// Returns every known region with its compute endpoint.
    async fn regions(&self) -> ProviderResult<Vec<RegionInfo>>;
}
