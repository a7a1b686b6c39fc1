//! Built-in template catalog.
//!
//! Seeded once per repository. Ids follow `tpl-<project_type>-<slug>`.
//! Durations are derived from a full propagation of each template.

use crate::engine::span_days;
use crate::models::{TaskPriority, Template, TemplateTask};

use crate::models::DependencyType::{FinishToFinish as FF, FinishToStart as FS, StartToStart as SS};

/// All built-in templates.
pub fn builtin_templates() -> Vec<Template> {
    vec![
        web_application(),
        maintenance_release(),
        product_launch(),
        conference(),
    ]
}

fn seal(mut template: Template) -> Template {
    template.refresh_summary_flags();
    // Built-in offsets and estimates are small constants.
    template.estimated_duration_days = span_days(&template.tasks).unwrap_or_default();
    template.builtin()
}

fn web_application() -> Template {
    seal(
        Template::new(Template::builtin_id("software", "web-application"), "Web Application")
            .with_description("End-to-end delivery of a web application, from charter to deployment.")
            .with_category("engineering")
            .with_project_type("software")
            .with_tag("agile")
            .with_tag("web")
            .with_task(TemplateTask::new("init", "Project Initiation").with_days(5).mandatory())
            .with_task(
                TemplateTask::new("init-charter", "Project Charter")
                    .with_days(2)
                    .with_parent("init")
                    .with_priority(TaskPriority::High)
                    .mandatory(),
            )
            .with_task(
                TemplateTask::new("init-stakeholders", "Stakeholder Analysis")
                    .with_days(3)
                    .with_parent("init")
                    .with_dependency("init-charter", SS),
            )
            .with_task(TemplateTask::new("plan", "Planning").with_days(10).with_offset(5))
            .with_task(
                TemplateTask::new("plan-scope", "Scope Definition")
                    .with_days(3)
                    .with_parent("plan")
                    .with_dependency("init", FS)
                    .with_priority(TaskPriority::High)
                    .mandatory(),
            )
            .with_task(
                TemplateTask::new("plan-risk", "Risk Assessment")
                    .with_days(2)
                    .with_offset(2)
                    .with_parent("plan")
                    .with_dependency("plan-scope", SS),
            )
            .with_task(
                TemplateTask::new("plan-schedule", "Schedule Baseline")
                    .with_days(2)
                    .with_parent("plan")
                    .with_dependency("plan-scope", FS),
            )
            .with_task(TemplateTask::new("build", "Development").with_days(30).with_offset(13))
            .with_task(
                TemplateTask::new("build-backend", "Backend Implementation")
                    .with_days(20)
                    .with_parent("build")
                    .with_dependency("plan-schedule", FS)
                    .with_skill("backend"),
            )
            .with_task(
                TemplateTask::new("build-frontend", "Frontend Implementation")
                    .with_days(18)
                    .with_parent("build")
                    .with_dependency("build-backend", SS)
                    .with_skill("frontend"),
            )
            .with_task(TemplateTask::new("test", "Testing").with_days(10).with_offset(34))
            .with_task(
                TemplateTask::new("test-integration", "Integration Testing")
                    .with_days(7)
                    .with_parent("test")
                    .with_dependency("build-backend", FS)
                    .with_skill("qa"),
            )
            .with_task(
                TemplateTask::new("test-uat", "User Acceptance Testing")
                    .with_days(5)
                    .with_parent("test")
                    .with_dependency("test-integration", FF),
            )
            .with_task(
                TemplateTask::new("launch", "Deployment")
                    .with_days(3)
                    .with_dependency("test", FS)
                    .with_priority(TaskPriority::Critical)
                    .with_skill("devops")
                    .mandatory(),
            ),
    )
}

fn maintenance_release() -> Template {
    seal(
        Template::new(Template::builtin_id("software", "maintenance-release"), "Maintenance Release")
            .with_description("Patch release cycle: triage, fix, regression, ship.")
            .with_category("engineering")
            .with_project_type("software")
            .with_tag("maintenance")
            .with_task(TemplateTask::new("triage", "Issue Triage").with_days(2).mandatory())
            .with_task(
                TemplateTask::new("fix", "Fix Implementation")
                    .with_days(5)
                    .with_dependency("triage", FS),
            )
            .with_task(
                TemplateTask::new("regression", "Regression Testing")
                    .with_days(3)
                    .with_dependency("fix", FS)
                    .with_skill("qa"),
            )
            .with_task(
                TemplateTask::new("release", "Release")
                    .with_days(1)
                    .with_dependency("regression", FS)
                    .with_priority(TaskPriority::High)
                    .mandatory(),
            ),
    )
}

fn product_launch() -> Template {
    seal(
        Template::new(Template::builtin_id("marketing", "product-launch"), "Product Launch")
            .with_description("Go-to-market campaign for a new product.")
            .with_category("marketing")
            .with_project_type("marketing")
            .with_tag("campaign")
            .with_task(TemplateTask::new("research", "Market Research").with_days(10))
            .with_task(
                TemplateTask::new("research-market", "Market Sizing")
                    .with_days(5)
                    .with_parent("research"),
            )
            .with_task(
                TemplateTask::new("research-competitors", "Competitor Analysis")
                    .with_days(5)
                    .with_parent("research")
                    .with_dependency("research-market", SS),
            )
            .with_task(
                TemplateTask::new("messaging", "Positioning & Messaging")
                    .with_days(5)
                    .with_dependency("research", FS)
                    .mandatory(),
            )
            .with_task(TemplateTask::new("campaign", "Campaign").with_days(20).with_offset(15))
            .with_task(
                TemplateTask::new("campaign-content", "Content Production")
                    .with_days(10)
                    .with_parent("campaign")
                    .with_dependency("messaging", FS)
                    .with_skill("copywriting"),
            )
            .with_task(
                TemplateTask::new("campaign-ads", "Paid Advertising")
                    .with_days(7)
                    .with_offset(3)
                    .with_parent("campaign")
                    .with_skill("media-buying"),
            )
            .with_task(
                TemplateTask::new("launch-event", "Launch Event")
                    .with_days(1)
                    .with_dependency("campaign-content", FS)
                    .with_priority(TaskPriority::Critical)
                    .mandatory(),
            ),
    )
}

fn conference() -> Template {
    seal(
        Template::new(Template::builtin_id("event", "conference"), "Conference")
            .with_description("Plan and run a one-track conference.")
            .with_category("operations")
            .with_project_type("event")
            .with_tag("event")
            .with_task(TemplateTask::new("venue", "Venue Booking").with_days(5).mandatory())
            .with_task(
                TemplateTask::new("speakers", "Speaker Outreach")
                    .with_days(15)
                    .with_dependency("venue", SS),
            )
            .with_task(TemplateTask::new("logistics", "Logistics").with_days(20).with_offset(10))
            .with_task(
                TemplateTask::new("logistics-catering", "Catering")
                    .with_days(3)
                    .with_parent("logistics"),
            )
            .with_task(
                TemplateTask::new("logistics-av", "Audio/Visual Setup")
                    .with_days(2)
                    .with_parent("logistics")
                    .with_dependency("logistics-catering", FS),
            )
            .with_task(
                TemplateTask::new("event-day", "Event Day")
                    .with_days(2)
                    .with_offset(40)
                    .with_priority(TaskPriority::Critical)
                    .mandatory(),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::validation::validate_template;
    use std::collections::HashSet;

    #[test]
    fn test_builtins_are_valid() {
        for tpl in builtin_templates() {
            assert!(
                validate_template(&tpl, &EngineConfig::default()).is_ok(),
                "{} is invalid",
                tpl.id
            );
        }
    }

    #[test]
    fn test_builtin_ids_follow_scheme() {
        let templates = builtin_templates();
        let ids: HashSet<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), templates.len());
        for tpl in &templates {
            assert_eq!(tpl.id, Template::builtin_id(&tpl.project_type, tpl.id.splitn(3, '-').nth(2).unwrap()));
            assert!(tpl.is_builtin);
            assert_eq!(tpl.author_id, None);
            assert_eq!(tpl.usage_count, 0);
        }
    }

    #[test]
    fn test_builtin_summary_flags_and_duration() {
        let templates = builtin_templates();
        let web = templates
            .iter()
            .find(|t| t.id == "tpl-software-web-application")
            .unwrap();
        assert!(web.task("init").unwrap().is_summary);
        assert!(web.task("plan").unwrap().is_summary);
        assert!(!web.task("plan-scope").unwrap().is_summary);
        assert!(web.estimated_duration_days > 0);

        let maintenance = templates
            .iter()
            .find(|t| t.id == "tpl-software-maintenance-release")
            .unwrap();
        // 2 + 1 + 5 + 1 + 3 + 1 + 1, FS adds a day between tasks
        assert_eq!(maintenance.estimated_duration_days, 14);
    }
}
