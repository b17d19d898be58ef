//! Fixed region list.

use async_trait::async_trait;
use cirrus_application::ports::{ProviderResult, RegionDirectory};
use cirrus_domain::RegionInfo;

/// [`RegionDirectory`] over a list known up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRegionDirectory {
    regions: Vec<RegionInfo>,
}

impl StaticRegionDirectory {
    /// Creates a directory listing `regions`.
    #[must_use]
    pub const fn new(regions: Vec<RegionInfo>) -> Self {
        Self { regions }
    }
}

#[async_trait]
impl RegionDirectory for StaticRegionDirectory {
    async fn regions(&self) -> ProviderResult<Vec<RegionInfo>> {
        Ok(self.regions.clone())
    }
}
