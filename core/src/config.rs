use serde::{Deserialize, Serialize};

/// What counts as a "dirty" transactional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyMode {
    /// Dirty only when some open scope actually has something queued.
    Strict,
    /// Dirty whenever any scope is open.
    #[default]
    Permissive,
}

/// How an outermost commit reacts to a failing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure; later actions in the batch never run.
    #[default]
    Abort,
    /// Attempt every action and report all failures together.
    RunAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub dirty_mode: DirtyMode,
    pub on_action_error: FailurePolicy,
}

impl ScopeConfig {
    pub fn strict() -> Self { Self::default().with_dirty_mode(DirtyMode::Strict) }

    pub fn with_dirty_mode(mut self, dirty_mode: DirtyMode) -> Self {
        self.dirty_mode = dirty_mode;
        self
    }

    pub fn with_failure_policy(mut self, on_action_error: FailurePolicy) -> Self {
        self.on_action_error = on_action_error;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = ScopeConfig::default();
        assert_eq!(config.dirty_mode, DirtyMode::Permissive);
        assert_eq!(config.on_action_error, FailurePolicy::Abort);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: ScopeConfig = serde_json::from_str(r#"{"dirty_mode": "strict"}"#).unwrap();
        assert_eq!(config, ScopeConfig::strict());

        let config: ScopeConfig = serde_json::from_str(r#"{"on_action_error": "run_all"}"#).unwrap();
        assert_eq!(config.dirty_mode, DirtyMode::Permissive);
        assert_eq!(config.on_action_error, FailurePolicy::RunAll);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(serde_json::from_str::<ScopeConfig>(r#"{"dirty_mode": "smart"}"#).is_err());
    }
}
