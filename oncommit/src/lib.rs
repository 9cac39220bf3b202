/*!
Run side effects only after the enclosing transaction commits.

Re-exports [`oncommit_core`] and, with the `sqlite` feature, the SQLite adapter.

```rust
use oncommit::{deferred, install, CurrentScope, ScopeConfig};

install(ScopeConfig::default());
let invalidate = deferred("invalidate", |key: &'static str| {
    println!("invalidate {key}");
    Ok(())
});

CurrentScope::begin();
invalidate("users").unwrap(); // queued until the commit below
CurrentScope::commit().unwrap();
```
*/

pub use oncommit_core as core;
pub use oncommit_core::{
    atomic, deferred, error, install, installed_config, is_installed, queue_when_in_scope, Action, ActionFailure, CurrentScope, DirtyMode,
    FailurePolicy, GuardError, PendingActions, ScopeConfig, ScopeError, ScopeGuard, ScopeStack, Transactional,
};

#[cfg(feature = "tokio")]
pub use oncommit_core::task;

#[cfg(feature = "sqlite")]
pub use oncommit_sqlite as sqlite;
