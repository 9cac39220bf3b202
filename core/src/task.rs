//! Task-local scope stacks for cooperative tasks.
//!
//! Tasks multiplexed onto one worker thread would otherwise share that thread's
//! stack. A future run through [`scope`] gets a stack of its own, which follows
//! it across threads and polls.

use std::{cell::RefCell, future::Future};

use crate::{config::ScopeConfig, context::TASK_SCOPE_STACK, stack::ScopeStack};

/// Run `future` with its own empty scope stack.
pub async fn scope<F: Future>(config: ScopeConfig, future: F) -> F::Output {
    TASK_SCOPE_STACK.scope(RefCell::new(ScopeStack::new(config)), future).await
}

/// Like [`scope`], using the installed default configuration.
pub async fn scope_default<F: Future>(future: F) -> F::Output {
    scope(crate::install::installed_config().unwrap_or_default(), future).await
}
