//! Reverse extraction: scheduled tasks back into template tasks.
//!
//! # Algorithm
//!
//! 1. Walk every snapshot's tasks in enumeration order (no re-sorting) and
//!    assign synthetic reference ids `saved-0`, `saved-1`, …
//! 2. Map parent and dependency identities back through the
//!    identity → reference table of this pass. Identities outside the pass
//!    become `None`.
//! 3. `offset_days = max(0, task.start - schedule.start)`.
//! 4. `estimated_days` = stored estimate, else `end - start`, at least 1.
//! 5. `is_summary` iff another extracted task names it as parent.
//! 6. Template duration = max over tasks of `offset_days + estimated_days`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::models::{Schedule, ScheduledTask, TemplateTask};

/// A schedule with its tasks, as enumerated by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub schedule: Schedule,
    pub tasks: Vec<ScheduledTask>,
}

/// Result of an extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub tasks: Vec<TemplateTask>,
    pub estimated_duration_days: u32,
}

/// Rebuilds template tasks from materialized schedules.
pub fn extract(snapshots: &[ScheduleSnapshot], config: &EngineConfig) -> Extraction {
    let refs: HashMap<&str, String> = snapshots
        .iter()
        .flat_map(|s| s.tasks.iter())
        .enumerate()
        .map(|(i, task)| (task.id.as_str(), config.saved_ref(i)))
        .collect();
    let lookup = |id: &Option<String>| id.as_deref().and_then(|i| refs.get(i)).cloned();

    let mut tasks = Vec::with_capacity(refs.len());
    let mut index = 0;
    for snapshot in snapshots {
        for source in &snapshot.tasks {
            let dependency_ref = lookup(&source.dependency_id);
            tasks.push(TemplateTask {
                ref_id: config.saved_ref(index),
                name: source.name.clone(),
                description: source.description.clone(),
                estimated_days: estimate_days(source),
                priority: source.priority,
                parent_ref: lookup(&source.parent_id),
                dependency_type: source.dependency_type.unwrap_or_default(),
                dependency_ref,
                offset_days: offset_days(source, &snapshot.schedule),
                required_skills: Vec::new(),
                is_summary: false,
                mandatory: false,
            });
            index += 1;
        }
    }

    let parents: Vec<String> = tasks.iter().filter_map(|t| t.parent_ref.clone()).collect();
    for task in &mut tasks {
        task.is_summary = parents.contains(&task.ref_id);
    }

    let estimated_duration_days = tasks
        .iter()
        .map(|t| t.offset_days.saturating_add(t.estimated_days))
        .max()
        .unwrap_or(0);

    Extraction {
        tasks,
        estimated_duration_days,
    }
}

fn offset_days(task: &ScheduledTask, schedule: &Schedule) -> u32 {
    task.start_date
        .map(|start| (start - schedule.start_date).num_days())
        .map_or(0, clamp_days)
}

fn estimate_days(task: &ScheduledTask) -> u32 {
    let days = match (task.estimated_days, task.start_date, task.end_date) {
        (Some(days), _, _) => days,
        (None, Some(start), Some(end)) => clamp_days((end - start).num_days()),
        _ => 1,
    };
    days.max(1)
}

fn clamp_days(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
