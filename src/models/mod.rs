//! Template engine domain models.
//!
//! Provides the template side (blueprints addressed by template-local
//! reference ids) and the materialized side (records owned by the
//! Project and Schedule collaborators, addressed by opaque identities).
//!
//! # Domain Mappings
//!
//! | u-template | Materialized as | Identity |
//! |------------|-----------------|----------|
//! | Template | Project + Schedule | catalog id |
//! | TemplateTask | ScheduledTask | reference id → opaque id |

mod schedule;
mod task;
mod template;

pub use schedule::{NewProject, NewSchedule, NewTask, Project, Schedule, ScheduledTask, TaskStatus};
pub use task::{DependencyType, TaskPriority, TemplateTask};
pub use template::Template;
