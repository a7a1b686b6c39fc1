//! Engine configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid
//! configuration.
//!
//! # Example
//!
//! ```
//! use u_template::config::{EngineConfig, FinishDependencyPolicy};
//!
//! let config = EngineConfig::from_json(r#"{"finish_dependencies": "reject"}"#).unwrap();
//! assert_eq!(config.finish_dependencies, FinishDependencyPolicy::Reject);
//! assert_eq!(config.saved_ref_prefix, "saved-");
//! ```

use serde::{Deserialize, Serialize};

use crate::models::TaskStatus;

/// Handling of Finish-to-Finish and Start-to-Finish dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishDependencyPolicy {
    /// Schedule the successor so its finish meets the predecessor.
    #[default]
    Schedule,
    /// Refuse templates that use FF or SF.
    Reject,
}

/// Options shared by planning, materialization and extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Status given to every materialized task.
    pub initial_task_status: TaskStatus,
    /// FF/SF handling.
    pub finish_dependencies: FinishDependencyPolicy,
    /// Prefix of synthetic reference ids assigned during extraction.
    pub saved_ref_prefix: String,
    /// Appended to the project name to name the materialized schedule.
    pub schedule_name_suffix: String,
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            initial_task_status: TaskStatus::NotStarted,
            finish_dependencies: FinishDependencyPolicy::Schedule,
            saved_ref_prefix: "saved-".to_string(),
            schedule_name_suffix: " Schedule".to_string(),
        }
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the initial task status.
    pub fn with_initial_status(mut self, status: TaskStatus) -> Self {
        self.initial_task_status = status;
        self
    }

    /// Sets the FF/SF policy.
    pub fn with_finish_dependencies(mut self, policy: FinishDependencyPolicy) -> Self {
        self.finish_dependencies = policy;
        self
    }

    /// Sets the extraction reference id prefix.
    pub fn with_saved_ref_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.saved_ref_prefix = prefix.into();
        self
    }

    /// Sets the schedule name suffix.
    pub fn with_schedule_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.schedule_name_suffix = suffix.into();
        self
    }

    /// Synthetic reference id for the `index`-th extracted task.
    pub fn saved_ref(&self, index: usize) -> String {
        format!("{}{index}", self.saved_ref_prefix)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_task_status, TaskStatus::NotStarted);
        assert_eq!(config.finish_dependencies, FinishDependencyPolicy::Schedule);
        assert_eq!(config.saved_ref(3), "saved-3");
    }

    #[test]
    fn test_from_empty_json() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_from_json_overrides() {
        let config = EngineConfig::from_json(
            r#"{"initial_task_status": "blocked", "saved_ref_prefix": "copy-", "schedule_name_suffix": ""}"#,
        )
        .unwrap();
        assert_eq!(config.initial_task_status, TaskStatus::Blocked);
        assert_eq!(config.saved_ref(0), "copy-0");
        assert_eq!(config.schedule_name_suffix, "");
        assert_eq!(config.finish_dependencies, FinishDependencyPolicy::Schedule);
    }

    #[test]
    fn test_from_json_rejects_unknown_policy() {
        assert!(EngineConfig::from_json(r#"{"finish_dependencies": "ignore"}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_initial_status(TaskStatus::InProgress)
            .with_finish_dependencies(FinishDependencyPolicy::Reject)
            .with_saved_ref_prefix("x")
            .with_schedule_name_suffix(" plan");
        assert_eq!(config.initial_task_status, TaskStatus::InProgress);
        assert_eq!(config.finish_dependencies, FinishDependencyPolicy::Reject);
        assert_eq!(config.saved_ref(1), "x1");
        assert_eq!(config.schedule_name_suffix, " plan");
    }
}
