//! Project and Schedule collaborators.
//!
//! The engine persists nothing itself. It talks to two external
//! collaborators through these traits; the in-memory implementations back
//! tests and embedding applications without a database.

use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewProject, NewSchedule, NewTask, Project, Schedule, ScheduledTask};

/// Project persistence.
pub trait ProjectStore: Send + Sync {
    /// Persists a new project and assigns its identity.
    fn create(&self, project: NewProject) -> Result<Project, StoreError>;

    /// Looks up a project. `Ok(None)` if it does not exist.
    fn find_by_id(&self, id: &str) -> Result<Option<Project>, StoreError>;
}

/// Schedule and task persistence.
pub trait ScheduleStore: Send + Sync {
    /// Persists a new schedule and assigns its identity.
    fn create(&self, schedule: NewSchedule) -> Result<Schedule, StoreError>;

    /// Persists a new task and assigns its identity.
    fn create_task(&self, task: NewTask) -> Result<ScheduledTask, StoreError>;

    /// Schedules of a project, in creation order.
    fn find_by_project_id(&self, project_id: &str) -> Result<Vec<Schedule>, StoreError>;

    /// Tasks of a schedule, in creation order.
    fn find_tasks_by_schedule_id(&self, schedule_id: &str) -> Result<Vec<ScheduledTask>, StoreError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory [`ProjectStore`].
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: Mutex<Vec<Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a project as-is, keeping its identity.
    pub fn insert(&self, project: Project) {
        lock(&self.projects).push(project);
    }

    /// Number of stored projects.
    pub fn len(&self) -> usize {
        lock(&self.projects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn create(&self, project: NewProject) -> Result<Project, StoreError> {
        let created = Project {
            id: new_id(),
            name: project.name,
            description: project.description,
            project_type: project.project_type,
            owner_id: project.owner_id,
            start_date: project.start_date,
        };
        lock(&self.projects).push(created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(lock(&self.projects).iter().find(|p| p.id == id).cloned())
    }
}

/// In-memory [`ScheduleStore`].
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    schedules: Mutex<Vec<Schedule>>,
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a schedule as-is, keeping its identity.
    pub fn insert_schedule(&self, schedule: Schedule) {
        lock(&self.schedules).push(schedule);
    }

    /// Stores a task as-is, keeping its identity.
    pub fn insert_task(&self, task: ScheduledTask) {
        lock(&self.tasks).push(task);
    }

    /// Number of stored schedules.
    pub fn schedule_count(&self) -> usize {
        lock(&self.schedules).len()
    }

    /// Number of stored tasks across all schedules.
    pub fn task_count(&self) -> usize {
        lock(&self.tasks).len()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn create(&self, schedule: NewSchedule) -> Result<Schedule, StoreError> {
        let created = Schedule {
            id: new_id(),
            project_id: schedule.project_id,
            name: schedule.name,
            start_date: schedule.start_date,
            end_date: schedule.end_date,
        };
        lock(&self.schedules).push(created.clone());
        Ok(created)
    }

    fn create_task(&self, task: NewTask) -> Result<ScheduledTask, StoreError> {
        let created = task.into_task(new_id());
        lock(&self.tasks).push(created.clone());
        Ok(created)
    }

    fn find_by_project_id(&self, project_id: &str) -> Result<Vec<Schedule>, StoreError> {
        Ok(lock(&self.schedules)
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect())
    }

    fn find_tasks_by_schedule_id(&self, schedule_id: &str) -> Result<Vec<ScheduledTask>, StoreError> {
        Ok(lock(&self.tasks)
            .iter()
            .filter(|t| t.schedule_id == schedule_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_project_create_and_find() {
        let store = InMemoryProjectStore::new();
        let project = store
            .create(NewProject {
                name: "Apollo".into(),
                description: String::new(),
                project_type: "software".into(),
                owner_id: Some("u1".into()),
                start_date: date(2026, 3, 1),
            })
            .unwrap();

        assert!(!project.id.is_empty());
        assert_eq!(store.find_by_id(&project.id).unwrap(), Some(project));
        assert_eq!(store.find_by_id("missing").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_schedule_tasks_by_schedule() {
        let store = InMemoryScheduleStore::new();
        let schedule = store
            .create(NewSchedule {
                project_id: "p1".into(),
                name: "Main".into(),
                start_date: date(2026, 3, 1),
                end_date: date(2026, 3, 31),
            })
            .unwrap();
        let other = store
            .create(NewSchedule {
                project_id: "p2".into(),
                name: "Other".into(),
                start_date: date(2026, 3, 1),
                end_date: date(2026, 3, 31),
            })
            .unwrap();

        for (schedule_id, name) in [(&schedule.id, "a"), (&other.id, "b"), (&schedule.id, "c")] {
            store
                .create_task(NewTask {
                    schedule_id: schedule_id.clone(),
                    name: name.into(),
                    description: String::new(),
                    status: TaskStatus::NotStarted,
                    priority: TaskPriority::Medium,
                    estimated_days: 1,
                    start_date: date(2026, 3, 1),
                    end_date: date(2026, 3, 2),
                    parent_id: None,
                    dependency_id: None,
                    dependency_type: None,
                })
                .unwrap();
        }

        let names: Vec<String> = store
            .find_tasks_by_schedule_id(&schedule.id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(store.find_by_project_id("p1").unwrap(), vec![schedule]);
        assert_eq!(store.task_count(), 3);
        assert_eq!(store.schedule_count(), 2);
    }

    #[test]
    fn test_identities_are_unique() {
        let store = InMemoryProjectStore::new();
        let new = || NewProject {
            name: "X".into(),
            description: String::new(),
            project_type: "software".into(),
            owner_id: None,
            start_date: date(2026, 1, 1),
        };
        let a = store.create(new()).unwrap();
        let b = store.create(new()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
