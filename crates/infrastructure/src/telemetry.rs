//! Tracing subscriber setup.
//!
//! The filter sits behind a reload layer so provider debug logging can be
//! switched on once settings have been read, without losing the settings
//! loader's own warnings.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Registry, reload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::provider::PROVIDER_TARGET;

/// Handle used to swap the active filter.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter from `RUST_LOG` (default `info`), with provider calls raised to
/// `debug` when `debug_provider` is set.
#[must_use]
pub fn env_filter(debug_provider: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !debug_provider {
        return filter;
    }
    match format!("{PROVIDER_TARGET}=debug").parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Installs the global fmt subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already set.
pub fn init_tracing(debug_provider: bool) -> Result<FilterHandle, TryInitError> {
    let (filter, handle) = reload::Layer::new(env_filter(debug_provider));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(handle)
}

/// Switches provider debug logging on or off.
///
/// # Errors
///
/// Returns [`reload::Error`] when the subscriber has been dropped.
pub fn set_provider_debug(
    handle: &FilterHandle,
    debug_provider: bool,
) -> Result<(), reload::Error> {
    handle.reload(env_filter(debug_provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_directive() {
        let filter = env_filter(true).to_string();
        assert!(filter.contains("cirrus::provider=debug"));
        assert!(!env_filter(false).to_string().contains("cirrus::provider"));
    }
}
