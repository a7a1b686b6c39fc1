//! Topological sequencing of a closure.
//!
//! # Algorithm
//! Depth-first visitation with a visited-set guard. For each unvisited task
//! (in closure order): visit its parent, then its dependency predecessor,
//! then append the task. Links leaving the closure are ignored.
//!
//! The result is a valid topological order whenever the parent +
//! dependency graph is acyclic. Cyclic input terminates but its order is
//! meaningless; templates are validated against cycles before planning.
//!
//! # Complexity
//! O(n) visits with O(1) lookups.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

use std::collections::{HashMap, HashSet};

use crate::models::TemplateTask;

/// Orders a closure so parents and dependency predecessors come first.
///
/// Stable: the same closure in the same order always yields the same
/// sequence.
pub fn sequence<'a>(closure: &[&'a TemplateTask]) -> Vec<&'a TemplateTask> {
    let by_ref: HashMap<&str, &'a TemplateTask> =
        closure.iter().map(|t| (t.ref_id.as_str(), *t)).collect();

    let mut visited = HashSet::with_capacity(closure.len());
    let mut order = Vec::with_capacity(closure.len());

    for &task in closure {
        visit(task, &by_ref, &mut visited, &mut order);
    }

    order
}

fn visit<'a>(
    task: &'a TemplateTask,
    by_ref: &HashMap<&str, &'a TemplateTask>,
    visited: &mut HashSet<&'a str>,
    order: &mut Vec<&'a TemplateTask>,
) {
    if !visited.insert(task.ref_id.as_str()) {
        return;
    }

    let predecessors = task
        .parent_ref
        .as_deref()
        .into_iter()
        .chain(task.dependency_ref.as_deref());
    for pred in predecessors {
        if let Some(&pred_task) = by_ref.get(pred) {
            visit(pred_task, by_ref, visited, order);
        }
    }

    order.push(task);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DependencyType;

    fn position(order: &[&TemplateTask], ref_id: &str) -> usize {
        order.iter().position(|t| t.ref_id == ref_id).unwrap()
    }

    #[test]
    fn test_children_and_dependents_follow() {
        // Authored in reverse so every link points forward.
        let tasks = vec![
            TemplateTask::new("c", "C")
                .with_parent("b")
                .with_dependency("d", DependencyType::FinishToStart),
            TemplateTask::new("b", "B").with_parent("a"),
            TemplateTask::new("a", "A"),
            TemplateTask::new("d", "D"),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        let order = sequence(&closure);

        assert_eq!(order.len(), 4);
        assert!(position(&order, "a") < position(&order, "b"));
        assert!(position(&order, "b") < position(&order, "c"));
        assert!(position(&order, "d") < position(&order, "c"));
    }

    #[test]
    fn test_parent_visited_before_dependency() {
        let tasks = vec![
            TemplateTask::new("x", "X")
                .with_parent("p")
                .with_dependency("d", DependencyType::StartToStart),
            TemplateTask::new("d", "D"),
            TemplateTask::new("p", "P"),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        let refs: Vec<&str> = sequence(&closure).iter().map(|t| t.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["p", "d", "x"]);
    }

    #[test]
    fn test_already_ordered_is_unchanged() {
        let tasks = vec![
            TemplateTask::new("a", "A"),
            TemplateTask::new("b", "B").with_parent("a"),
            TemplateTask::new("c", "C").with_dependency("b", DependencyType::FinishToStart),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        let refs: Vec<&str> = sequence(&closure).iter().map(|t| t.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_links_outside_closure_are_ignored() {
        let tasks = vec![
            TemplateTask::new("b", "B").with_dependency("outside", DependencyType::FinishToStart),
            TemplateTask::new("a", "A").with_parent("missing"),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        let refs: Vec<&str> = sequence(&closure).iter().map(|t| t.ref_id.as_str()).collect();
        assert_eq!(refs, vec!["b", "a"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let tasks = vec![
            TemplateTask::new("a", "A").with_dependency("b", DependencyType::FinishToStart),
            TemplateTask::new("b", "B").with_dependency("a", DependencyType::FinishToStart),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        assert_eq!(sequence(&closure).len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let tasks = vec![
            TemplateTask::new("c", "C").with_dependency("a", DependencyType::FinishToStart),
            TemplateTask::new("b", "B"),
            TemplateTask::new("a", "A"),
        ];
        let closure: Vec<&TemplateTask> = tasks.iter().collect();
        let first: Vec<&str> = sequence(&closure).iter().map(|t| t.ref_id.as_str()).collect();
        let second: Vec<&str> = sequence(&closure).iter().map(|t| t.ref_id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "c", "b"]);
    }
}
