//! Template-driven project schedule generation.
//!
//! Turns reusable project blueprints into concrete, dated schedules and
//! derives new blueprints back from existing projects.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Template`, `TemplateTask`, `DependencyType`,
//!   `Project`, `Schedule`, `ScheduledTask`
//! - **`validation`**: Template integrity checks (duplicate ref ids, dangling
//!   links, dependency cycles)
//! - **`engine`**: Pure planning (closure selection, topological sequencing,
//!   date propagation), materialization and reverse extraction
//! - **`catalog`**: Template repository and the built-in catalog
//! - **`store`**: Project and Schedule collaborator traits
//! - **`service`**: The caller-facing operations
//! - **`config`**: Engine configuration
//!
//! # Architecture
//!
//! Planning is a pure function of a template, a selection and a start date.
//! Only the materializer talks to collaborators, and only after a complete
//! plan exists. Persistence of projects, schedules and tasks is external;
//! the engine owns nothing but the template catalog.
//!
//! ```
//! use chrono::NaiveDate;
//! use u_template::catalog::InMemoryTemplateRepository;
//! use u_template::service::{ApplyTemplateInput, TemplateService};
//! use u_template::store::{InMemoryProjectStore, InMemoryScheduleStore};
//!
//! let service = TemplateService::new(
//!     InMemoryTemplateRepository::with_builtins(),
//!     InMemoryProjectStore::new(),
//!     InMemoryScheduleStore::new(),
//! );
//!
//! let applied = service
//!     .apply_template(ApplyTemplateInput {
//!         template_id: "tpl-software-maintenance-release".into(),
//!         project_name: "Patch 1.4.2".into(),
//!         project_description: String::new(),
//!         owner_id: None,
//!         start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
//!         selected_task_ids: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(applied.tasks.len(), 4);
//! assert_eq!(applied.schedule.name, "Patch 1.4.2 Schedule");
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{StoreError, TemplateError};
