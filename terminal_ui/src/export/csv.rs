use std::path::{Path, PathBuf};

use taskdesk_shared::Task;

use super::write_file;
use crate::error::ExportError;
use crate::format;

pub const CSV_FILE_NAME: &str = "task-manager.csv";

pub const CSV_HEADER: [&str; 8] = [
    "ID",
    "Cliente",
    "Progetto",
    "Titolo",
    "Stato",
    "Importanza",
    "Scadenza",
    "Ore",
];

fn row(task: &Task) -> [String; 8] {
    [
        task.id.to_string(),
        task.client_name.clone(),
        task.project_name.clone(),
        task.title.clone(),
        task.status.as_str().to_string(),
        task.priority.as_str().to_string(),
        format::due_date(task),
        format::hours(task.estimated_hours),
    ]
}

/// Header plus one row per task. Every value is wrapped in double quotes;
/// quotes inside a value are written as-is.
pub fn to_csv(tasks: &[Task]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(CSV_HEADER.join(","));
    for task in tasks {
        let fields: Vec<String> = row(task).iter().map(|v| format!("\"{v}\"")).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Writes the whole store to `dir/task-manager.csv`.
pub fn write_csv(dir: &Path, tasks: &[Task]) -> Result<PathBuf, ExportError> {
    let path = dir.join(CSV_FILE_NAME);
    write_file(&path, to_csv(tasks).as_bytes())?;
    log::info!("exported {} tasks to {}", tasks.len(), path.display());
    Ok(path)
}
