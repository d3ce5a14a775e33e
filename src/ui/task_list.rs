use crate::task::{Task, TaskState};

const SKELETON_ROWS: usize = 3;

/// The three mutually exclusive ways the list can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
    Skeleton,
    Empty,
    Populated(&'a [Task]),
}

impl<'a> ListView<'a> {
    /// Skeleton only while the first load is pending; a refresh over an
    /// existing list keeps showing it.
    pub fn from_state(state: &'a TaskState) -> Self {
        if state.loading && state.tasks.is_empty() {
            ListView::Skeleton
        } else if state.tasks.is_empty() {
            ListView::Empty
        } else {
            ListView::Populated(&state.tasks)
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            "Recent Tasks".to_string(),
            "Showing your 5 most recent incomplete tasks".to_string(),
        ];
        match self {
            ListView::Skeleton => {
                lines.extend((0..SKELETON_ROWS).map(|_| "  ░░░░░░░░░░░░░░░░░░░░".to_string()));
            }
            ListView::Empty => {
                lines.push("  All caught up!".to_string());
                lines.push("  No tasks to show. Create one above to get started.".to_string());
            }
            ListView::Populated(tasks) => {
                for (i, task) in tasks.iter().enumerate() {
                    lines.push(format!("  {}. {}", i + 1, task.title));
                    if !task.description.is_empty() {
                        lines.push(format!("     {}", task.description));
                    }
                    lines.push(format!("     [Done] {}", done_label(task)));
                }
            }
        }
        lines
    }
}

/// Accessible label of a row's completion action.
pub fn done_label(task: &Task) -> String {
    format!("Mark \"{}\" as done", task.title)
}
