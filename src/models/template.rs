//! Template model.
//!
//! A template is a reusable, named blueprint of tasks. Built-in templates
//! ship with the catalog and are immutable; user templates are created,
//! updated and deleted through the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::TemplateTask;

/// A reusable project blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Catalog key. Built-ins use `tpl-<project_type>-<slug>`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Grouping category (e.g. "engineering", "marketing").
    pub category: String,
    /// Project type the template bootstraps (e.g. "software").
    pub project_type: String,
    /// Total estimated duration in days.
    pub estimated_duration_days: u32,
    /// Task definitions in authoring order.
    pub tasks: Vec<TemplateTask>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Number of successful applications.
    #[serde(default)]
    pub usage_count: u64,
    /// Whether the template is a catalog built-in.
    #[serde(default)]
    pub is_builtin: bool,
    /// Author of a user template. `None` for built-ins.
    #[serde(default)]
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Creates an empty user template.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            project_type: String::new(),
            estimated_duration_days: 0,
            tasks: Vec::new(),
            tags: BTreeSet::new(),
            usage_count: 0,
            is_builtin: false,
            author_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the canonical id of a built-in template.
    pub fn builtin_id(project_type: &str, slug: &str) -> String {
        format!("tpl-{project_type}-{slug}")
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the project type.
    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = project_type.into();
        self
    }

    /// Sets the total estimated duration.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.estimated_duration_days = days;
        self
    }

    /// Appends a task definition.
    pub fn with_task(mut self, task: TemplateTask) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Marks the template as a catalog built-in (no author).
    pub fn builtin(mut self) -> Self {
        self.is_builtin = true;
        self.author_id = None;
        self
    }

    /// Looks up a task by reference id.
    pub fn task(&self, ref_id: &str) -> Option<&TemplateTask> {
        self.tasks.iter().find(|t| t.ref_id == ref_id)
    }

    /// Number of task definitions.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Tasks flagged mandatory.
    pub fn mandatory_tasks(&self) -> impl Iterator<Item = &TemplateTask> {
        self.tasks.iter().filter(|t| t.mandatory)
    }

    /// Recomputes every task's `is_summary` flag from the parent links.
    pub fn refresh_summary_flags(&mut self) {
        let parents: HashSet<String> = self
            .tasks
            .iter()
            .filter_map(|t| t.parent_ref.clone())
            .collect();
        for task in &mut self.tasks {
            task.is_summary = parents.contains(&task.ref_id);
        }
    }

    /// Whether the template matches the given project type and category.
    pub fn matches(&self, project_type: Option<&str>, category: Option<&str>) -> bool {
        project_type.map_or(true, |pt| self.project_type == pt)
            && category.map_or(true, |c| self.category == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyType;

    fn sample() -> Template {
        Template::new("t1", "Website launch")
            .with_category("marketing")
            .with_project_type("campaign")
            .with_task(TemplateTask::new("root", "Launch").with_days(10))
            .with_task(
                TemplateTask::new("copy", "Write copy")
                    .with_parent("root")
                    .mandatory(),
            )
            .with_task(
                TemplateTask::new("review", "Review copy")
                    .with_parent("root")
                    .with_dependency("copy", DependencyType::FinishToStart),
            )
    }

    #[test]
    fn test_builtin_id_scheme() {
        assert_eq!(
            Template::builtin_id("software", "agile-sprint"),
            "tpl-software-agile-sprint"
        );
    }

    #[test]
    fn test_refresh_summary_flags() {
        let mut tpl = sample();
        tpl.tasks[1].is_summary = true;
        tpl.refresh_summary_flags();

        assert!(tpl.task("root").unwrap().is_summary);
        assert!(!tpl.task("copy").unwrap().is_summary);
        assert!(!tpl.task("review").unwrap().is_summary);
    }

    #[test]
    fn test_mandatory_tasks() {
        let tpl = sample();
        let names: Vec<&str> = tpl.mandatory_tasks().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Write copy"]);
    }

    #[test]
    fn test_matches_filter() {
        let tpl = sample();
        assert!(tpl.matches(None, None));
        assert!(tpl.matches(Some("campaign"), None));
        assert!(tpl.matches(Some("campaign"), Some("marketing")));
        assert!(!tpl.matches(Some("software"), None));
        assert!(!tpl.matches(None, Some("engineering")));
    }

    #[test]
    fn test_builtin_clears_author() {
        let tpl = Template::new("x", "X").with_author("u1").builtin();
        assert!(tpl.is_builtin);
        assert_eq!(tpl.author_id, None);
    }
}
