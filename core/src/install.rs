//! One-time, process-wide registration of the scope integration.
//!
//! Until [`install`] runs, [`ScopeGuard`](crate::ScopeGuard) only drives the wrapped
//! resource and leaves the scope stacks alone, so nothing is ever deferred.

use std::sync::OnceLock;

use tracing::{debug, info};

use crate::config::ScopeConfig;

static INSTALLED: OnceLock<ScopeConfig> = OnceLock::new();

/// Install the integration with the default configuration for context stacks
/// created from now on. Returns true only for the call that performed it;
/// every later call is a no-op and its `config` is ignored.
pub fn install(config: ScopeConfig) -> bool {
    match INSTALLED.set(config) {
        Ok(()) => {
            info!(?config, "deferred scope actions installed");
            true
        }
        Err(_) => {
            debug!("deferred scope actions already installed");
            false
        }
    }
}

pub fn is_installed() -> bool { INSTALLED.get().is_some() }

pub fn installed_config() -> Option<ScopeConfig> { INSTALLED.get().copied() }
