use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use oncommit_core::Action;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// Records the names of executed actions, in execution order.
#[derive(Clone, Default)]
pub struct ActionLog(Arc<Mutex<Vec<String>>>);

#[allow(unused)]
impl ActionLog {
    pub fn new() -> Self { Self::default() }

    pub fn action(&self, name: &str) -> Action {
        let log = self.clone();
        let entry = name.to_string();
        Action::infallible(name, move || log.0.lock().unwrap().push(entry))
    }

    pub fn failing(&self, name: &str) -> Action {
        let log = self.clone();
        let entry = name.to_string();
        Action::new(name, move || {
            log.0.lock().unwrap().push(format!("{entry}!"));
            anyhow::bail!("{entry} failed")
        })
    }

    /// A closure suitable for `queue_when_in_scope`.
    pub fn recorder(&self, name: &str) -> impl FnOnce() -> anyhow::Result<()> + Send + 'static {
        let log = self.clone();
        let entry = name.to_string();
        move || {
            log.0.lock().unwrap().push(entry);
            Ok(())
        }
    }

    pub fn take(&self) -> Vec<String> { self.0.lock().unwrap().drain(..).collect() }
}
