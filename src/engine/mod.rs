//! Template application and extraction engine.
//!
//! # Pipeline
//!
//! Apply: `select_closure` → `sequence` → `propagate` → [`Materializer`].
//! Save-as-template: collaborator snapshots → [`extract`].
//!
//! Everything up to and including propagation is pure: [`plan`] produces a
//! complete [`SchedulePlan`] in memory before any collaborator is called.
//! Callers owning a transactional store can submit that plan atomically;
//! [`Materializer`] submits it call by call in topological order.

mod extractor;
mod materializer;
mod propagator;
mod selector;
mod sequencer;

pub use extractor::{extract, Extraction, ScheduleSnapshot};
pub use materializer::{AppliedTemplate, MaterializationProgress, Materializer, ProjectDetails};
pub use propagator::{propagate, span_days, DatedTask};
pub use selector::select_closure;
pub use sequencer::sequence;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::TemplateError;
use crate::models::{DependencyType, TaskPriority, Template};
use crate::validation::validate_template;

/// One dated task of a plan, still addressed by reference ids.
///
/// Links leaving the closure are already dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub ref_id: String,
    pub name: String,
    pub description: String,
    pub priority: TaskPriority,
    pub estimated_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub parent_ref: Option<String>,
    pub dependency_ref: Option<String>,
    pub dependency_type: Option<DependencyType>,
}

/// A fully computed application of a template.
///
/// `tasks` is in topological order: every parent and dependency precedes
/// the tasks that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub template_id: String,
    pub start_date: NaiveDate,
    /// `start_date + template.estimated_duration_days`.
    pub end_date: NaiveDate,
    pub tasks: Vec<PlannedTask>,
}

impl SchedulePlan {
    /// Looks up a planned task by reference id.
    pub fn task(&self, ref_id: &str) -> Option<&PlannedTask> {
        self.tasks.iter().find(|t| t.ref_id == ref_id)
    }

    /// Number of tasks to materialize.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Computes the plan for applying `template` from `start_date`.
///
/// # Errors
/// - [`TemplateError::Invalid`] if the template fails validation under
///   `config` (cycles, dangling links, rejected FF/SF).
/// - [`TemplateError::UnknownSelection`] / [`TemplateError::MandatoryExcluded`]
///   from closure selection.
/// - [`TemplateError::DateOutOfRange`] if a date overflows the calendar.
pub fn plan(
    template: &Template,
    selection: Option<&[String]>,
    start_date: NaiveDate,
    config: &EngineConfig,
) -> Result<SchedulePlan, TemplateError> {
    validate_template(template, config).map_err(TemplateError::Invalid)?;

    let closure = select_closure(template, selection)?;
    let ordered = sequence(&closure);
    let dated = propagate(&ordered, start_date)?;

    let in_closure: HashSet<&str> = closure.iter().map(|t| t.ref_id.as_str()).collect();
    let tasks: Vec<PlannedTask> = dated
        .iter()
        .map(|d| {
            let task = d.task;
            let dependency = task
                .dependency()
                .filter(|(dep, _)| in_closure.contains(dep));
            PlannedTask {
                ref_id: task.ref_id.clone(),
                name: task.name.clone(),
                description: task.description.clone(),
                priority: task.priority,
                estimated_days: task.estimated_days,
                start_date: d.start,
                end_date: d.end,
                parent_ref: task
                    .parent_ref
                    .clone()
                    .filter(|p| in_closure.contains(p.as_str())),
                dependency_ref: dependency.map(|(dep, _)| dep.to_string()),
                dependency_type: dependency.map(|(_, kind)| kind),
            }
        })
        .collect();

    debug!(
        template_id = %template.id,
        tasks = tasks.len(),
        selected = selection.is_some(),
        "Computed schedule plan"
    );

    let end_date = start_date
        .checked_add_signed(Duration::days(i64::from(template.estimated_duration_days)))
        .ok_or_else(|| TemplateError::DateOutOfRange {
            id: template.id.clone(),
        })?;

    Ok(SchedulePlan {
        template_id: template.id.clone(),
        start_date,
        end_date,
        tasks,
    })
}
