//! Template service: the caller-facing operations.
//!
//! | Operation | Side effects |
//! |-----------|--------------|
//! | `find_all`, `find_by_id` | none |
//! | `create`, `update`, `delete` | catalog only |
//! | `apply_template` | project, schedule, tasks; usage counter +1 |
//! | `save_from_project` | catalog only |
//!
//! Validation and lookups happen before the first collaborator call, so a
//! rejected request leaves no trace.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{TemplateFilter, TemplateRepository};
use crate::config::EngineConfig;
use crate::engine::{self, AppliedTemplate, Materializer, ProjectDetails, ScheduleSnapshot};
use crate::error::TemplateError;
use crate::models::{Template, TemplateTask};
use crate::store::{ProjectStore, ScheduleStore};
use crate::validation::validate_template;

/// Attributes of a user template to create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub category: String,
    pub project_type: String,
    /// Derived from the task graph when `None`.
    pub estimated_duration_days: Option<u32>,
    pub tasks: Vec<TemplateTask>,
    pub tags: BTreeSet<String>,
    pub author_id: Option<String>,
}

/// Partial update of a user template. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub project_type: Option<String>,
    pub estimated_duration_days: Option<u32>,
    pub tasks: Option<Vec<TemplateTask>>,
    pub tags: Option<BTreeSet<String>>,
}

/// Request to materialize a template into a new project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyTemplateInput {
    pub template_id: String,
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub start_date: NaiveDate,
    /// Reference ids to include. `None` applies the whole template.
    #[serde(default)]
    pub selected_task_ids: Option<Vec<String>>,
}

/// Request to derive a template from an existing project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveTemplateInput {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Defaults to the source project's type.
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// Template operations over an injected catalog and collaborators.
pub struct TemplateService<R, P, S> {
    repository: R,
    projects: P,
    schedules: S,
    config: EngineConfig,
}

impl<R, P, S> TemplateService<R, P, S>
where
    R: TemplateRepository,
    P: ProjectStore,
    S: ScheduleStore,
{
    /// Creates a service with the default configuration.
    pub fn new(repository: R, projects: P, schedules: S) -> Self {
        Self::with_config(repository, projects, schedules, EngineConfig::default())
    }

    /// Creates a service with an explicit configuration.
    pub fn with_config(repository: R, projects: P, schedules: S, config: EngineConfig) -> Self {
        Self {
            repository,
            projects,
            schedules,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn projects(&self) -> &P {
        &self.projects
    }

    pub fn schedules(&self) -> &S {
        &self.schedules
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Templates matching the optional project type and category.
    pub fn find_all(&self, project_type: Option<&str>, category: Option<&str>) -> Vec<Template> {
        let filter = TemplateFilter {
            project_type: project_type.map(str::to_string),
            category: category.map(str::to_string),
        };
        self.repository.find_all(&filter)
    }

    /// Looks up a template.
    pub fn find_by_id(&self, id: &str) -> Result<Template, TemplateError> {
        self.repository
            .find_by_id(id)
            .ok_or_else(|| TemplateError::template_not_found(id))
    }

    /// Validates and stores a new user template under a generated id.
    pub fn create(&self, input: NewTemplate) -> Result<Template, TemplateError> {
        let mut template = Template::new(Uuid::new_v4().to_string(), input.name);
        template.description = input.description;
        template.category = input.category;
        template.project_type = input.project_type;
        template.tasks = input.tasks;
        template.tags = input.tags;
        template.author_id = input.author_id;

        let template = self.prepare(template, input.estimated_duration_days)?;
        let template = self.repository.insert(template.clone()).ok_or_else(|| {
            TemplateError::Conflict(format!("Template id {} already exists", template.id))
        })?;

        info!(template_id = %template.id, tasks = template.task_count(), "Created template");
        Ok(template)
    }

    /// Applies a patch to a user template.
    ///
    /// Returns `Ok(None)` for unknown ids and built-ins; the catalog is left
    /// unchanged.
    pub fn update(&self, id: &str, patch: TemplatePatch) -> Result<Option<Template>, TemplateError> {
        let Some(mut template) = self.repository.find_by_id(id) else {
            debug!(template_id = %id, "Update of unknown template ignored");
            return Ok(None);
        };
        if template.is_builtin {
            warn!(template_id = %id, "Refused to update built-in template");
            return Ok(None);
        }

        let tasks_changed = patch.tasks.is_some();
        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(description) = patch.description {
            template.description = description;
        }
        if let Some(category) = patch.category {
            template.category = category;
        }
        if let Some(project_type) = patch.project_type {
            template.project_type = project_type;
        }
        if let Some(tasks) = patch.tasks {
            template.tasks = tasks;
        }
        if let Some(tags) = patch.tags {
            template.tags = tags;
        }

        let duration = patch
            .estimated_duration_days
            .or((!tasks_changed).then_some(template.estimated_duration_days));
        let template = self.prepare(template, duration)?;

        let updated = self.repository.update(template);
        if let Some(updated) = &updated {
            info!(template_id = %updated.id, "Updated template");
        }
        Ok(updated)
    }

    /// Deletes a user template. `false` for unknown ids and built-ins.
    pub fn delete(&self, id: &str) -> bool {
        let deleted = self.repository.delete(id);
        if deleted {
            info!(template_id = %id, "Deleted template");
        }
        deleted
    }

    /// Materializes a template into a new project and schedule.
    ///
    /// The plan is computed in full before the first collaborator call.
    ///
    /// # Errors
    /// - [`TemplateError::NotFound`] for an unknown template id.
    /// - Selection and validation errors from [`engine::plan`]; nothing is
    ///   created.
    /// - [`TemplateError::PartialMaterialization`] if a collaborator fails
    ///   midway; created records are left in place.
    pub fn apply_template(&self, input: ApplyTemplateInput) -> Result<AppliedTemplate, TemplateError> {
        let template = self.find_by_id(&input.template_id)?;
        let plan = engine::plan(
            &template,
            input.selected_task_ids.as_deref(),
            input.start_date,
            &self.config,
        )?;

        let applied = Materializer::new(&self.projects, &self.schedules, &self.config).materialize(
            &plan,
            ProjectDetails {
                name: input.project_name,
                description: input.project_description,
                project_type: template.project_type.clone(),
                owner_id: input.owner_id,
            },
        )?;

        let usage = self.repository.increment_usage(&template.id);
        info!(
            template_id = %template.id,
            project_id = %applied.project.id,
            tasks = applied.tasks.len(),
            usage = ?usage,
            "Applied template"
        );
        Ok(applied)
    }

    /// Derives a new user template from an existing project's schedules.
    ///
    /// # Errors
    /// - [`TemplateError::NotFound`] if the project does not exist.
    /// - [`TemplateError::Store`] if a lookup fails.
    /// - [`TemplateError::Invalid`] if the extracted graph does not validate.
    pub fn save_from_project(&self, input: SaveTemplateInput) -> Result<Template, TemplateError> {
        let project = self
            .projects
            .find_by_id(&input.project_id)?
            .ok_or_else(|| TemplateError::project_not_found(&input.project_id))?;

        let snapshots = self
            .schedules
            .find_by_project_id(&project.id)?
            .into_iter()
            .map(|schedule| {
                let tasks = self.schedules.find_tasks_by_schedule_id(&schedule.id)?;
                Ok(ScheduleSnapshot { schedule, tasks })
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        let extraction = engine::extract(&snapshots, &self.config);
        debug!(
            project_id = %project.id,
            schedules = snapshots.len(),
            tasks = extraction.tasks.len(),
            "Extracted template tasks"
        );

        self.create(NewTemplate {
            name: input.name,
            description: input.description,
            category: input.category,
            project_type: input.project_type.unwrap_or(project.project_type),
            estimated_duration_days: Some(extraction.estimated_duration_days),
            tasks: extraction.tasks,
            tags: input.tags,
            author_id: input.author_id,
        })
    }

    fn prepare(&self, mut template: Template, duration: Option<u32>) -> Result<Template, TemplateError> {
        validate_template(&template, &self.config).map_err(TemplateError::Invalid)?;
        template.refresh_summary_flags();
        template.estimated_duration_days = match duration {
            Some(days) => days,
            None => engine::span_days(&template.tasks)?,
        };
        template.updated_at = Utc::now();
        Ok(template)
    }
}
