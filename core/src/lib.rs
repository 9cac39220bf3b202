/*!
Deferred on-commit actions for nested transactional scopes.

Side effects that must only become visible once a transaction really commits
(cache invalidation, notifications) are queued on a per-context stack of open
scopes instead of running immediately:

- committing a savepoint promotes its queue onto the parent scope
- committing the outermost transaction runs everything, in queued order
- rolling back any scope discards exactly that scope's queue

# Basic usage

```rust
use oncommit_core::*;
use std::sync::{Arc, Mutex};

let log = Arc::new(Mutex::new(Vec::new()));
let push = |name: &'static str| {
    let log = log.clone();
    Action::infallible(name, move || log.lock().unwrap().push(name))
};

CurrentScope::begin(); // transaction
CurrentScope::append(push("a")).unwrap();
CurrentScope::begin(); // savepoint
CurrentScope::append(push("b")).unwrap();
CurrentScope::commit().unwrap(); // promoted, nothing runs yet
CurrentScope::begin(); // savepoint
CurrentScope::append(push("c")).unwrap();
CurrentScope::rollback().unwrap(); // "c" is discarded
CurrentScope::commit().unwrap();

assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
```

Transactional resources are wrapped with [`ScopeGuard`] or [`atomic`] so that
the stack follows the resource's own begin/commit/rollback decisions. The
integration is enabled once per process with [`install`].
*/

mod action;
mod config;
mod context;
pub mod error;
mod guard;
mod install;
mod queue;
mod stack;

#[cfg(feature = "tokio")]
pub mod task;

pub use action::{Action, PendingActions};
pub use config::{DirtyMode, FailurePolicy, ScopeConfig};
pub use context::CurrentScope;
pub use error::{ActionFailure, GuardError, ScopeError};
pub use guard::{atomic, ScopeGuard, Transactional};
pub use install::{install, installed_config, is_installed};
pub use queue::{deferred, queue_when_in_scope};
pub use stack::ScopeStack;
