//! Closure selection for full and partial template application.
//!
//! # Algorithm
//!
//! 1. No selection: the closure is every task of the template.
//! 2. Selection: every selected task plus its whole parent chain, so
//!    summary rollups stay structurally valid.
//! 3. Every mandatory task of the template must be in the closure.
//!
//! Dependency predecessors are not pulled in; a dependency on a task
//! outside the closure is dropped during planning.

use std::collections::HashSet;

use crate::error::TemplateError;
use crate::models::{Template, TemplateTask};

/// Computes the materialization closure.
///
/// The closure is returned in template authoring order.
///
/// # Errors
/// - [`TemplateError::UnknownSelection`] if a selected id is not a task of
///   the template.
/// - [`TemplateError::MandatoryExcluded`] naming every mandatory task left
///   out of the closure.
pub fn select_closure<'a>(
    template: &'a Template,
    selection: Option<&[String]>,
) -> Result<Vec<&'a TemplateTask>, TemplateError> {
    let Some(selection) = selection else {
        return Ok(template.tasks.iter().collect());
    };

    let unknown: Vec<String> = selection
        .iter()
        .filter(|id| template.task(id).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(TemplateError::UnknownSelection { ref_ids: unknown });
    }

    let mut included: HashSet<&str> = HashSet::new();
    for ref_id in selection {
        let mut current = template.task(ref_id);
        while let Some(task) = current {
            if !included.insert(task.ref_id.as_str()) {
                break; // chain above is already in
            }
            current = task.parent_ref.as_deref().and_then(|p| template.task(p));
        }
    }

    let excluded: Vec<String> = template
        .mandatory_tasks()
        .filter(|t| !included.contains(t.ref_id.as_str()))
        .map(|t| t.name.clone())
        .collect();
    if !excluded.is_empty() {
        return Err(TemplateError::MandatoryExcluded { names: excluded });
    }

    Ok(template
        .tasks
        .iter()
        .filter(|t| included.contains(t.ref_id.as_str()))
        .collect())
}
