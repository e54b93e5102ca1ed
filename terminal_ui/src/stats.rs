use indexmap::IndexMap;
use serde::Serialize;
use taskdesk_shared::{Task, TaskStatus};

/// Dashboard numbers, always computed over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_percent: u32,
    pub total_hours: f64,
    pub in_progress_count: usize,
    /// Sorted by hours, largest first.
    pub hours_by_client: Vec<(String, f64)>,
}

impl Summary {
    pub fn from_tasks(tasks: &[Task]) -> Summary {
        let total_tasks = tasks.len();
        let completed_tasks = count_status(tasks, TaskStatus::Done);
        let completion_percent = if total_tasks == 0 {
            0
        } else {
            (completed_tasks as f64 / total_tasks as f64 * 100.0).round() as u32
        };

        let mut by_client: IndexMap<&str, f64> = IndexMap::new();
        for task in tasks {
            *by_client.entry(task.client_name.as_str()).or_insert(0.0) += task.estimated_hours;
        }
        let mut hours_by_client: Vec<(String, f64)> = by_client
            .into_iter()
            .map(|(client, hours)| (client.to_string(), hours))
            .collect();
        hours_by_client.sort_by(|a, b| b.1.total_cmp(&a.1));

        Summary {
            total_tasks,
            completed_tasks,
            completion_percent,
            total_hours: tasks.iter().map(|t| t.estimated_hours).sum(),
            in_progress_count: count_status(tasks, TaskStatus::InProgress),
            hours_by_client,
        }
    }

    pub fn client_count(&self) -> usize {
        self.hours_by_client.len()
    }

    pub fn hours_for(&self, client: &str) -> Option<f64> {
        self.hours_by_client
            .iter()
            .find(|(name, _)| name == client)
            .map(|(_, hours)| *hours)
    }
}

fn count_status(tasks: &[Task], status: TaskStatus) -> usize {
    tasks.iter().filter(|t| t.status == status).count()
}
