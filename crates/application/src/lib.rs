//! Cirrus Application - Use cases and ports
//!
//! This crate holds the console's request-scoped logic: resolving provider
//! connections from the session, translating provider faults into notices,
//! building choice lists and applying landing page queries. External systems
//! are reached only through the traits in [`ports`].

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CacheError, CacheStore, CloudProvider, ProviderError, ProviderResult, RegionDirectory,
};
pub use use_cases::*;
