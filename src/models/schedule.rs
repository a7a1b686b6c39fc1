//! Project, schedule and materialized task models.
//!
//! These are the records owned by the external Project and Schedule
//! collaborators. Their identities are opaque strings assigned at
//! creation; parent and dependency links point at other materialized
//! identities, never at template reference ids.
//!
//! The `New*` types are the creation requests the engine submits. They
//! carry exactly the fields the planner computes, so the boundary to the
//! collaborators is statically checked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DependencyType, TaskPriority};

/// Lifecycle status of a materialized task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Blocked,
    Completed,
    Cancelled,
}

/// A persisted project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_type: String,
    pub owner_id: Option<String>,
    pub start_date: NaiveDate,
}

/// Project creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub owner_id: Option<String>,
    pub start_date: NaiveDate,
}

/// A persisted schedule belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Schedule creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub project_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A persisted task inside a schedule.
///
/// Dates and the estimate are optional because tasks edited outside the
/// engine may lack them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub schedule_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub estimated_days: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub parent_id: Option<String>,
    pub dependency_id: Option<String>,
    pub dependency_type: Option<DependencyType>,
}

impl ScheduledTask {
    /// Creates an undated task with no links.
    pub fn new(
        id: impl Into<String>,
        schedule_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            schedule_id: schedule_id.into(),
            name: name.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            estimated_days: None,
            start_date: None,
            end_date: None,
            parent_id: None,
            dependency_id: None,
            dependency_type: None,
        }
    }

    /// Sets the start and end dates.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Sets the stored estimate.
    pub fn with_estimate(mut self, days: u32) -> Self {
        self.estimated_days = Some(days);
        self
    }

    /// Sets the parent identity.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the dependency identity and relation.
    pub fn with_dependency(mut self, dependency_id: impl Into<String>, kind: DependencyType) -> Self {
        self.dependency_id = Some(dependency_id.into());
        self.dependency_type = Some(kind);
        self
    }
}

/// Task creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub schedule_id: String,
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub estimated_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub parent_id: Option<String>,
    pub dependency_id: Option<String>,
    pub dependency_type: Option<DependencyType>,
}

impl NewTask {
    /// Materializes the request under the given identity.
    pub fn into_task(self, id: impl Into<String>) -> ScheduledTask {
        ScheduledTask {
            id: id.into(),
            schedule_id: self.schedule_id,
            name: self.name,
            description: self.description,
            status: self.status,
            priority: self.priority,
            estimated_days: Some(self.estimated_days),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            parent_id: self.parent_id,
            dependency_id: self.dependency_id,
            dependency_type: self.dependency_type,
        }
    }
}
