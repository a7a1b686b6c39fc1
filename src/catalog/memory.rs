//! In-memory template repository.

use chrono::Utc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use super::{builtin_templates, TemplateFilter, TemplateRepository};
use crate::models::Template;

/// [`TemplateRepository`] over a locked vector.
///
/// Insertion order is preserved. Usage increments happen under the write
/// lock, so concurrent applies never lose a count.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<Vec<Template>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the built-in catalog.
    pub fn with_builtins() -> Self {
        let templates = builtin_templates();
        info!(count = templates.len(), "Seeded built-in templates");
        Self {
            templates: RwLock::new(templates),
        }
    }

    /// Number of stored templates.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Template>> {
        self.templates.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Template>> {
        self.templates.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn find_all(&self, filter: &TemplateFilter) -> Vec<Template> {
        self.read()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Option<Template> {
        self.read().iter().find(|t| t.id == id).cloned()
    }

    fn insert(&self, template: Template) -> Option<Template> {
        let mut templates = self.write();
        if templates.iter().any(|t| t.id == template.id) {
            return None;
        }
        templates.push(template.clone());
        Some(template)
    }

    fn update(&self, mut template: Template) -> Option<Template> {
        let mut templates = self.write();
        let slot = templates.iter_mut().find(|t| t.id == template.id)?;
        if slot.is_builtin {
            warn!(template_id = %template.id, "Refused to update built-in template");
            return None;
        }

        template.is_builtin = false;
        template.created_at = slot.created_at;
        template.usage_count = slot.usage_count;
        template.updated_at = Utc::now();
        *slot = template.clone();
        Some(template)
    }

    fn delete(&self, id: &str) -> bool {
        let mut templates = self.write();
        let Some(pos) = templates.iter().position(|t| t.id == id) else {
            return false;
        };
        if templates[pos].is_builtin {
            warn!(template_id = %id, "Refused to delete built-in template");
            return false;
        }
        templates.remove(pos);
        true
    }

    fn increment_usage(&self, id: &str) -> Option<u64> {
        let mut templates = self.write();
        let template = templates.iter_mut().find(|t| t.id == id)?;
        template.usage_count += 1;
        Some(template.usage_count)
    }
}
