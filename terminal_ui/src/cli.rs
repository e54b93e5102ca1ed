use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taskdesk_shared::{Priority, TaskId};

use crate::export::ExportFormat;
use crate::filter::StatusFilter;

#[derive(Parser, Debug)]
#[command(name = "taskdesk", about = "Task dashboard for a remote task API", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the task service; tasks live under /api/tasks
    #[arg(long, global = true, env = "TASKDESK_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Directory receiving task-manager.csv and task-manager.pdf
    #[arg(long, global = true, env = "TASKDESK_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Append log output to this file
    #[arg(long, global = true, env = "TASKDESK_LOG")]
    pub log_file: Option<PathBuf>,

    /// Start with the light theme
    #[arg(long, global = true)]
    pub light: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks, filtered and sorted by due date
    List(ListArgs),
    /// Show dashboard statistics
    Stats(StatsArgs),
    /// Create a task
    Add(AddArgs),
    /// Mark a task done
    Done(DoneArgs),
    /// Delete a task
    Delete(DeleteArgs),
    /// Write task-manager.csv or task-manager.pdf
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// all, todo, in_progress or done
    #[arg(long, default_value = "all", value_parser = parse_status_filter)]
    pub status: StatusFilter,
    /// Client name, or all
    #[arg(long, default_value = "all")]
    pub client: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub client: String,
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// low, medium or high
    #[arg(long, default_value = "medium", value_parser = parse_priority)]
    pub priority: Priority,
    #[arg(long, default_value = "1")]
    pub hours: String,
    /// YYYY-MM-DD; defaults to now
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args, Debug)]
pub struct DoneArgs {
    pub id: TaskId,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: TaskId,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,
}

fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(s).ok_or_else(|| format!("unknown status {s:?}"))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| format!("unknown priority {s:?}"))
}
