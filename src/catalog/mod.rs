//! Template catalog.
//!
//! The catalog is an injected repository. Built-in templates are seeded
//! once and the repository itself refuses to mutate them, so no caller has
//! to repeat the check.

mod builtin;
mod memory;

pub use builtin::builtin_templates;
pub use memory::InMemoryTemplateRepository;

use serde::{Deserialize, Serialize};

use crate::models::Template;

/// Catalog query. Unset fields match everything; set fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFilter {
    pub project_type: Option<String>,
    pub category: Option<String>,
}

impl TemplateFilter {
    /// Matches every template.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one project type.
    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    /// Restricts to one category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Whether `template` passes the filter.
    pub fn matches(&self, template: &Template) -> bool {
        template.matches(self.project_type.as_deref(), self.category.as_deref())
    }
}

/// Template storage.
///
/// Implementations must refuse to update or delete built-in templates and
/// must increment usage counters atomically.
pub trait TemplateRepository: Send + Sync {
    /// Templates passing `filter`, in insertion order.
    fn find_all(&self, filter: &TemplateFilter) -> Vec<Template>;

    /// Looks up a template by id.
    fn find_by_id(&self, id: &str) -> Option<Template>;

    /// Stores a new template. `None` if the id is already taken.
    fn insert(&self, template: Template) -> Option<Template>;

    /// Replaces a stored user template. `None` if the id is unknown or
    /// names a built-in.
    fn update(&self, template: Template) -> Option<Template>;

    /// Removes a user template. `false` if the id is unknown or names a
    /// built-in.
    fn delete(&self, id: &str) -> bool;

    /// Increments the usage counter and returns the new value. `None` if
    /// the id is unknown.
    fn increment_usage(&self, id: &str) -> Option<u64>;
}
