//! Date propagation over a topologically ordered closure.
//!
//! Dates are computed strictly in sequence order: a task may read the dates
//! of tasks placed before it, never after. All days are working days.
//!
//! # Rules (per task)
//!
//! 1. Baseline: `start = project_start + offset_days`.
//! 2. Dependency already dated (overrides the baseline):
//!    - FS: `start = dep.end + 1`
//!    - SS: `start = dep.start`
//!    - FF: `start = dep.end - estimated_days` (finishes with the predecessor)
//!    - SF: `start = dep.start - estimated_days` (finishes when it starts)
//! 3. Parent already dated and `start < parent.start`: clamp to `parent.start`.
//! 4. `end = start + estimated_days`.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_template::engine::propagate;
//! use u_template::models::{DependencyType, TemplateTask};
//!
//! let init = TemplateTask::new("init", "Initiation").with_days(5);
//! let scope = TemplateTask::new("scope", "Scope")
//!     .with_dependency("init", DependencyType::FinishToStart);
//! let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
//!
//! let dated = propagate(&[&init, &scope], start).unwrap();
//! assert_eq!(dated[0].end, NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
//! assert_eq!(dated[1].start, NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());
//! ```

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::error::TemplateError;
use crate::models::{DependencyType, TemplateTask};

/// A task with its computed dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedTask<'a> {
    pub task: &'a TemplateTask,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Assigns start/end dates to every task of an ordered closure.
///
/// Output order matches input order. Deterministic for identical input.
///
/// # Errors
/// [`TemplateError::DateOutOfRange`] if a computed date falls outside the
/// calendar `NaiveDate` can represent.
pub fn propagate<'a>(
    ordered: &[&'a TemplateTask],
    project_start: NaiveDate,
) -> Result<Vec<DatedTask<'a>>, TemplateError> {
    let mut dated: Vec<DatedTask<'a>> = Vec::with_capacity(ordered.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(ordered.len());

    for &task in ordered {
        let duration = days(task.estimated_days);
        let mut start = project_start
            .checked_add_signed(days(task.offset_days))
            .ok_or_else(|| out_of_range(task))?;

        if let Some((dep_ref, kind)) = task.dependency() {
            if let Some(dep) = index.get(dep_ref).map(|&i| dated[i]) {
                start = match kind {
                    DependencyType::FinishToStart => dep.end.checked_add_signed(Duration::days(1)),
                    DependencyType::StartToStart => Some(dep.start),
                    DependencyType::FinishToFinish => dep.end.checked_sub_signed(duration),
                    DependencyType::StartToFinish => dep.start.checked_sub_signed(duration),
                }
                .ok_or_else(|| out_of_range(task))?;
            }
        }

        if let Some(parent) = task
            .parent_ref
            .as_deref()
            .and_then(|p| index.get(p))
            .map(|&i| dated[i])
        {
            if start < parent.start {
                start = parent.start;
            }
        }

        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| out_of_range(task))?;
        index.insert(task.ref_id.as_str(), dated.len());
        dated.push(DatedTask { task, start, end });
    }

    Ok(dated)
}

/// Number of days from the project start to the latest task end when the
/// whole template is propagated. `0` for an empty template.
///
/// The template must be acyclic.
pub fn span_days(tasks: &[TemplateTask]) -> Result<u32, TemplateError> {
    let closure: Vec<&TemplateTask> = tasks.iter().collect();
    let ordered = super::sequence(&closure);
    let origin = NaiveDate::default();

    Ok(propagate(&ordered, origin)?
        .iter()
        .map(|d| (d.end - origin).num_days())
        .max()
        .map_or(0, |span| u32::try_from(span.max(0)).unwrap_or(u32::MAX)))
}

fn out_of_range(task: &TemplateTask) -> TemplateError {
    TemplateError::DateOutOfRange {
        id: task.ref_id.clone(),
    }
}

fn days(n: u32) -> Duration {
    Duration::days(i64::from(n))
}
