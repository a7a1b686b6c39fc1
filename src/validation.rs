//! Template integrity checks.
//!
//! Run whenever a template is created or updated. Detects:
//! - Blank template names
//! - Duplicate reference ids
//! - Dangling or self-referencing parent/dependency links
//! - Zero-day estimates, and offsets or estimates beyond [`MAX_TASK_DAYS`]
//! - Cycles in the combined parent + dependency graph
//! - FF/SF dependencies when the configured policy rejects them
//!
//! Every problem is reported, not only the first one.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (DFS edge
//! classification: a gray-to-gray edge is a back edge)

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::{EngineConfig, FinishDependencyPolicy};
use crate::models::Template;

/// Upper bound on a task's offset and estimate, in days (100 years).
pub const MAX_TASK_DAYS: u32 = 36_525;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The template name is blank.
    EmptyName,
    /// Two tasks share the same reference id.
    DuplicateRefId,
    /// A parent link names a task that doesn't exist.
    InvalidParent,
    /// A dependency link names a task that doesn't exist.
    InvalidDependency,
    /// A task is its own parent or dependency.
    SelfReference,
    /// A task is estimated at zero days.
    InvalidDuration,
    /// An offset or estimate exceeds [`MAX_TASK_DAYS`].
    OutOfRange,
    /// The parent + dependency graph contains a cycle.
    CyclicDependency,
    /// FF/SF used while the policy rejects them.
    UnsupportedDependencyType,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a template definition.
///
/// Checks:
/// 1. The name is not blank
/// 2. Reference ids are unique
/// 3. Every task is estimated at one day or more, and offsets and
///    estimates stay within [`MAX_TASK_DAYS`]
/// 4. Parent and dependency links point at another task of the template
/// 5. FF/SF dependencies are allowed by `config.finish_dependencies`
/// 6. The combined parent + dependency graph is acyclic
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_template(template: &Template, config: &EngineConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if template.name.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyName,
            "Template name is empty",
        ));
    }

    let mut ref_ids = HashSet::new();
    for task in &template.tasks {
        if !ref_ids.insert(task.ref_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRefId,
                format!("Duplicate reference id: {}", task.ref_id),
            ));
        }
        if task.estimated_days == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Task '{}' must be estimated at one day or more", task.ref_id),
            ));
        }
        if task.estimated_days > MAX_TASK_DAYS || task.offset_days > MAX_TASK_DAYS {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "Task '{}' offset or estimate exceeds {} days",
                    task.ref_id, MAX_TASK_DAYS
                ),
            ));
        }
    }

    for task in &template.tasks {
        if let Some(parent) = task.parent_ref.as_deref() {
            if parent == task.ref_id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfReference,
                    format!("Task '{}' is its own parent", task.ref_id),
                ));
            } else if !ref_ids.contains(parent) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    format!("Task '{}' references unknown parent '{}'", task.ref_id, parent),
                ));
            }
        }

        if let Some((dep, kind)) = task.dependency() {
            if dep == task.ref_id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfReference,
                    format!("Task '{}' depends on itself", task.ref_id),
                ));
            } else if !ref_ids.contains(dep) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!(
                        "Task '{}' references unknown dependency '{}'",
                        task.ref_id, dep
                    ),
                ));
            }

            if kind.constrains_finish() && config.finish_dependencies == FinishDependencyPolicy::Reject
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnsupportedDependencyType,
                    format!(
                        "Task '{}' uses unsupported dependency type {}",
                        task.ref_id, kind
                    ),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(template) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Detects cycles in the combined parent + dependency graph.
///
/// # Algorithm
/// Colored DFS. Edges run from a parent to its children and from a
/// predecessor to its dependents. Reaching a gray node means a back edge.
/// Self and dangling links are reported elsewhere and left out of the graph.
fn detect_cycles(template: &Template) -> Option<ValidationError> {
    let known: HashSet<&str> = template.tasks.iter().map(|t| t.ref_id.as_str()).collect();

    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in &template.tasks {
        let sources = task
            .parent_ref
            .as_deref()
            .into_iter()
            .chain(task.dependency_ref.as_deref());
        for source in sources {
            if source != task.ref_id && known.contains(source) {
                adj.entry(source).or_default().push(task.ref_id.as_str());
            }
        }
    }

    let mut colors: HashMap<&str, Color> = known.iter().map(|&id| (id, Color::White)).collect();

    for task in &template.tasks {
        let node = task.ref_id.as_str();
        if colors.get(node) == Some(&Color::White) && has_cycle_dfs(node, &adj, &mut colors) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    colors: &mut HashMap<&'a str, Color>,
) -> bool {
    colors.insert(node, Color::Gray);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            let color = colors.get(next).copied().unwrap_or(Color::White);
            match color {
                Color::Gray => return true, // Back edge → cycle
                Color::White if has_cycle_dfs(next, adj, colors) => return true,
                _ => {}
            }
        }
    }

    colors.insert(node, Color::Black);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DependencyType, TemplateTask};

    fn sample_template() -> Template {
        Template::new("t", "Sample")
            .with_task(TemplateTask::new("init", "Initiation").with_days(5))
            .with_task(TemplateTask::new("init-kickoff", "Kickoff").with_parent("init"))
            .with_task(TemplateTask::new("plan", "Planning").with_days(10))
            .with_task(
                TemplateTask::new("plan-scope", "Scope")
                    .with_parent("plan")
                    .with_dependency("init", DependencyType::FinishToStart),
            )
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[test]
    fn test_valid_template() {
        assert!(validate_template(&sample_template(), &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_name() {
        let mut tpl = sample_template();
        tpl.name = "  ".into();
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::EmptyName]);
    }

    #[test]
    fn test_day_bounds() {
        let at_limit = sample_template().with_task(
            TemplateTask::new("long", "Long")
                .with_days(MAX_TASK_DAYS)
                .with_offset(MAX_TASK_DAYS),
        );
        assert!(validate_template(&at_limit, &EngineConfig::default()).is_ok());

        let tpl = sample_template()
            .with_task(TemplateTask::new("far", "Far").with_offset(200_000_000))
            .with_task(TemplateTask::new("huge", "Huge").with_days(MAX_TASK_DAYS + 1));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![ValidationErrorKind::OutOfRange, ValidationErrorKind::OutOfRange]
        );
    }

    #[test]
    fn test_duplicate_ref_id() {
        let tpl = sample_template().with_task(TemplateTask::new("plan", "Again"));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRefId && e.message.contains("plan")));
    }

    #[test]
    fn test_zero_duration() {
        let tpl = sample_template().with_task(TemplateTask::new("z", "Zero").with_days(0));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidDuration]);
    }

    #[test]
    fn test_dangling_references() {
        let tpl = sample_template()
            .with_task(TemplateTask::new("a", "A").with_parent("missing"))
            .with_task(TemplateTask::new("b", "B").with_dependency("gone", DependencyType::StartToStart));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ValidationErrorKind::InvalidParent,
                ValidationErrorKind::InvalidDependency
            ]
        );
    }

    #[test]
    fn test_self_references() {
        let tpl = Template::new("t", "Self")
            .with_task(TemplateTask::new("a", "A").with_parent("a"))
            .with_task(TemplateTask::new("b", "B").with_dependency("b", DependencyType::FinishToStart));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![
                ValidationErrorKind::SelfReference,
                ValidationErrorKind::SelfReference
            ]
        );
    }

    #[test]
    fn test_dependency_cycle() {
        // a → b → c → a
        let tpl = Template::new("t", "Cycle")
            .with_task(TemplateTask::new("a", "A").with_dependency("c", DependencyType::FinishToStart))
            .with_task(TemplateTask::new("b", "B").with_dependency("a", DependencyType::FinishToStart))
            .with_task(TemplateTask::new("c", "C").with_dependency("b", DependencyType::FinishToStart));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::CyclicDependency]);
    }

    #[test]
    fn test_mixed_parent_dependency_cycle() {
        // parent depends on its own child
        let tpl = Template::new("t", "Cycle")
            .with_task(
                TemplateTask::new("parent", "Parent")
                    .with_dependency("child", DependencyType::StartToStart),
            )
            .with_task(TemplateTask::new("child", "Child").with_parent("parent"));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::CyclicDependency]);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let tpl = Template::new("t", "Diamond")
            .with_task(TemplateTask::new("root", "Root"))
            .with_task(TemplateTask::new("a", "A").with_parent("root"))
            .with_task(TemplateTask::new("b", "B").with_parent("root"))
            .with_task(
                TemplateTask::new("c", "C")
                    .with_parent("a")
                    .with_dependency("b", DependencyType::FinishToStart),
            );
        assert!(validate_template(&tpl, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_finish_dependency_policy() {
        let tpl = sample_template().with_task(
            TemplateTask::new("ff", "FF").with_dependency("plan", DependencyType::FinishToFinish),
        );

        assert!(validate_template(&tpl, &EngineConfig::default()).is_ok());

        let strict = EngineConfig::default().with_finish_dependencies(FinishDependencyPolicy::Reject);
        let errors = validate_template(&tpl, &strict).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![ValidationErrorKind::UnsupportedDependencyType]
        );
    }

    #[test]
    fn test_multiple_errors() {
        let tpl = Template::new("t", "")
            .with_task(TemplateTask::new("a", "A").with_days(0))
            .with_task(TemplateTask::new("a", "A again").with_parent("nowhere"));
        let errors = validate_template(&tpl, &EngineConfig::default()).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
