use chrono::Local;
use taskdesk_shared::Task;

/// Due date as the Italian locale prints it: `5/3/2024`, in local time.
pub fn due_date(task: &Task) -> String {
    match task.due_at() {
        Some(due) => due.with_timezone(&Local).format("%-d/%-m/%Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// `3` for whole hours, `2.5` otherwise.
pub fn hours(value: f64) -> String {
    format!("{value}")
}
