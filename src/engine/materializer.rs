//! Schedule materialization.
//!
//! Submits a [`SchedulePlan`] to the collaborators: one project, one
//! schedule, then every task strictly in plan order. Template reference ids
//! are resolved to the identities assigned earlier in the same pass; plan
//! order guarantees those identities exist.
//!
//! Submission is sequential and never concurrent. A failure stops the pass
//! and reports what was already created. Nothing is rolled back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::SchedulePlan;
use crate::config::EngineConfig;
use crate::error::{StoreError, TemplateError};
use crate::models::{NewProject, NewSchedule, NewTask, Project, Schedule, ScheduledTask};
use crate::store::{ProjectStore, ScheduleStore};

/// Project attributes supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub owner_id: Option<String>,
}

/// Records created by a successful materialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedTemplate {
    pub project: Project,
    pub schedule: Schedule,
    /// Tasks in creation (topological) order.
    pub tasks: Vec<ScheduledTask>,
}

/// Identities created before a materialization failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializationProgress {
    pub project_id: Option<String>,
    pub schedule_id: Option<String>,
    pub task_ids: Vec<String>,
}

impl MaterializationProgress {
    /// Number of records left behind.
    pub fn created_count(&self) -> usize {
        usize::from(self.project_id.is_some())
            + usize::from(self.schedule_id.is_some())
            + self.task_ids.len()
    }
}

/// Sequential plan submitter.
pub struct Materializer<'a, P: ?Sized, S: ?Sized> {
    projects: &'a P,
    schedules: &'a S,
    config: &'a EngineConfig,
}

impl<'a, P, S> Materializer<'a, P, S>
where
    P: ProjectStore + ?Sized,
    S: ScheduleStore + ?Sized,
{
    /// Creates a materializer over the given collaborators.
    pub fn new(projects: &'a P, schedules: &'a S, config: &'a EngineConfig) -> Self {
        Self {
            projects,
            schedules,
            config,
        }
    }

    /// Creates the project, schedule and tasks of `plan`.
    ///
    /// # Errors
    /// [`TemplateError::PartialMaterialization`] on the first collaborator
    /// failure, carrying every identity created so far.
    pub fn materialize(
        &self,
        plan: &SchedulePlan,
        details: ProjectDetails,
    ) -> Result<AppliedTemplate, TemplateError> {
        let mut progress = MaterializationProgress::default();

        let schedule_name = format!("{}{}", details.name, self.config.schedule_name_suffix);
        let project = self
            .projects
            .create(NewProject {
                name: details.name,
                description: details.description,
                project_type: details.project_type,
                owner_id: details.owner_id,
                start_date: plan.start_date,
            })
            .map_err(|e| failed(&progress, e))?;
        progress.project_id = Some(project.id.clone());

        let schedule = self
            .schedules
            .create(NewSchedule {
                project_id: project.id.clone(),
                name: schedule_name,
                start_date: plan.start_date,
                end_date: plan.end_date,
            })
            .map_err(|e| failed(&progress, e))?;
        progress.schedule_id = Some(schedule.id.clone());

        let mut identities: HashMap<&str, String> = HashMap::with_capacity(plan.tasks.len());
        let mut tasks = Vec::with_capacity(plan.tasks.len());

        for planned in &plan.tasks {
            let resolve = |ref_id: &Option<String>| {
                ref_id
                    .as_deref()
                    .and_then(|r| identities.get(r))
                    .cloned()
            };
            let dependency_id = resolve(&planned.dependency_ref);

            let request = NewTask {
                schedule_id: schedule.id.clone(),
                name: planned.name.clone(),
                description: planned.description.clone(),
                status: self.config.initial_task_status,
                priority: planned.priority,
                estimated_days: planned.estimated_days,
                start_date: planned.start_date,
                end_date: planned.end_date,
                parent_id: resolve(&planned.parent_ref),
                dependency_type: dependency_id.as_ref().and(planned.dependency_type),
                dependency_id,
            };

            let task = self
                .schedules
                .create_task(request)
                .map_err(|e| failed(&progress, e))?;
            debug!(ref_id = %planned.ref_id, task_id = %task.id, "Materialized task");

            progress.task_ids.push(task.id.clone());
            identities.insert(planned.ref_id.as_str(), task.id.clone());
            tasks.push(task);
        }

        Ok(AppliedTemplate {
            project,
            schedule,
            tasks,
        })
    }
}

fn failed(progress: &MaterializationProgress, source: StoreError) -> TemplateError {
    warn!(
        error = %source,
        created = progress.created_count(),
        "Materialization aborted; created records are left in place"
    );
    TemplateError::PartialMaterialization {
        progress: progress.clone(),
        source,
    }
}
