#![cfg(feature = "tokio")]

mod common;
use anyhow::Result;
use common::ActionLog;
use oncommit_core::{task, CurrentScope, DirtyMode, ScopeConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn each_task_commits_its_own_queue() -> Result<()> {
    let log = ActionLog::new();
    let mut handles = Vec::new();

    for i in 0..8 {
        let log = log.clone();
        handles.push(tokio::spawn(task::scope_default(async move {
            CurrentScope::begin();
            CurrentScope::append(log.action(&format!("task-{i}")))?;
            tokio::task::yield_now().await;
            CurrentScope::begin();
            CurrentScope::append(log.action(&format!("task-{i}-savepoint")))?;
            tokio::task::yield_now().await;
            if i % 2 == 0 {
                CurrentScope::commit()?;
            } else {
                CurrentScope::rollback()?;
            }
            assert_eq!(CurrentScope::depth(), 1);
            CurrentScope::commit()?;
            anyhow::Ok(())
        })));
    }
    for handle in handles {
        handle.await??;
    }

    let mut ran = log.take();
    ran.sort();
    let mut expected: Vec<String> = (0..8).map(|i| format!("task-{i}")).collect();
    expected.extend((0..8).step_by(2).map(|i| format!("task-{i}-savepoint")));
    expected.sort();
    assert_eq!(ran, expected);
    Ok(())
}

#[tokio::test]
async fn task_scope_uses_its_own_config() {
    let strict = task::scope(ScopeConfig::strict(), async { CurrentScope::config().dirty_mode }).await;
    assert_eq!(strict, DirtyMode::Strict);
    assert_eq!(CurrentScope::config().dirty_mode, DirtyMode::Permissive);
}
