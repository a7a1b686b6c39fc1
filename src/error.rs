//! Error types.
//!
//! Structural and validation failures are detected before any collaborator
//! call. Collaborator failures during materialization are reported with the
//! progress made so far; nothing is retried or rolled back here.
//!
//! Built-in immutability is not an error: `update` yields `None` and
//! `delete` yields `false`.

use crate::engine::MaterializationProgress;
use crate::validation::ValidationError;

/// Failure reported by a Project or Schedule collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected request: {0}")]
    Rejected(String),
}

/// Errors raised by the template engine.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Selection excludes mandatory tasks: {}", .names.join(", "))]
    MandatoryExcluded { names: Vec<String> },

    #[error("Selection references unknown tasks: {}", .ref_ids.join(", "))]
    UnknownSelection { ref_ids: Vec<String> },

    #[error("Invalid template: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Computed date out of range for {id}")]
    DateOutOfRange { id: String },

    #[error("Materialization failed after creating {} record(s): {source}", .progress.created_count())]
    PartialMaterialization {
        progress: MaterializationProgress,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TemplateError {
    pub(crate) fn template_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "template",
            id: id.to_string(),
        }
    }

    pub(crate) fn project_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "project",
            id: id.to_string(),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
