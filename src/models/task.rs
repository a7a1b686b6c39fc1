//! Template task model.
//!
//! A template task is one node of a template's task graph. It is addressed
//! by a template-local reference id and links to at most one parent (the
//! summary hierarchy) and at most one dependency predecessor.
//!
//! # Precedence Relations
//!
//! | Type | Meaning |
//! |------|---------|
//! | FS | successor starts the day after the predecessor finishes |
//! | SS | successor starts when the predecessor starts |
//! | FF | successor finishes when the predecessor finishes |
//! | SF | successor finishes when the predecessor starts |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precedence relation between a task and its dependency predecessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-Start.
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    /// Start-to-Start.
    #[serde(rename = "SS")]
    StartToStart,
    /// Finish-to-Finish.
    #[serde(rename = "FF")]
    FinishToFinish,
    /// Start-to-Finish.
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyType {
    /// Whether the relation constrains the successor's finish rather than its start.
    pub fn constrains_finish(self) -> bool {
        matches!(self, Self::FinishToFinish | Self::StartToFinish)
    }

    /// Two-letter abbreviation.
    pub fn code(self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// A task definition inside a template.
///
/// # Invariants
/// - `ref_id` is unique within the owning template.
/// - `parent_ref` and `dependency_ref` name another task of the same template.
/// - `estimated_days >= 1`.
/// - `is_summary` is derived: true iff another task names this one as parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateTask {
    /// Template-local reference id.
    pub ref_id: String,
    /// Human-readable name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Estimated duration in days.
    pub estimated_days: u32,
    /// Priority carried into the materialized task.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Reference id of the summary parent.
    #[serde(default)]
    pub parent_ref: Option<String>,
    /// Reference id of the dependency predecessor.
    #[serde(default)]
    pub dependency_ref: Option<String>,
    /// Relation to the dependency predecessor.
    #[serde(default)]
    pub dependency_type: DependencyType,
    /// Lag in days relative to the project start.
    #[serde(default)]
    pub offset_days: u32,
    /// Skill tags needed to perform the task.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Derived summary flag.
    #[serde(default)]
    pub is_summary: bool,
    /// Whether a partial application may exclude this task.
    #[serde(default)]
    pub mandatory: bool,
}

impl TemplateTask {
    /// Creates a one-day task with the given reference id and name.
    pub fn new(ref_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            name: name.into(),
            description: String::new(),
            estimated_days: 1,
            priority: TaskPriority::default(),
            parent_ref: None,
            dependency_ref: None,
            dependency_type: DependencyType::default(),
            offset_days: 0,
            required_skills: Vec::new(),
            is_summary: false,
            mandatory: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the estimated duration in days.
    pub fn with_days(mut self, days: u32) -> Self {
        self.estimated_days = days;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Places the task under a summary parent.
    pub fn with_parent(mut self, parent_ref: impl Into<String>) -> Self {
        self.parent_ref = Some(parent_ref.into());
        self
    }

    /// Adds a dependency predecessor with the given relation.
    pub fn with_dependency(mut self, dependency_ref: impl Into<String>, kind: DependencyType) -> Self {
        self.dependency_ref = Some(dependency_ref.into());
        self.dependency_type = kind;
        self
    }

    /// Sets the offset from the project start.
    pub fn with_offset(mut self, offset_days: u32) -> Self {
        self.offset_days = offset_days;
        self
    }

    /// Adds a required skill tag.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Marks the task as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Dependency predecessor and relation, if any.
    pub fn dependency(&self) -> Option<(&str, DependencyType)> {
        self.dependency_ref
            .as_deref()
            .map(|dep| (dep, self.dependency_type))
    }
}
