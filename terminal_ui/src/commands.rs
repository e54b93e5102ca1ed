//! One-shot subcommands. Each one talks to the API once or twice and
//! prints a plain-text (or JSON) answer.

use std::io::{BufRead, Write};

use chrono::Utc;
use taskdesk_shared::Task;

use crate::api::{HttpTaskApi, TaskApi};
use crate::cli::{AddArgs, Commands, DeleteArgs, ListArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::filter::{visible_tasks, ClientFilter};
use crate::form::Draft;
use crate::format;
use crate::stats::Summary;
use crate::store::{Outcome, TaskStore};
use crate::tui::app::App;
use crate::tui::render;

/// Column count of the PDF capture when no dashboard is on screen.
pub const PDF_WIDTH: u16 = 100;

pub fn dispatch(command: Commands, config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let api = HttpTaskApi::new(config.tasks_url.clone());
    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    runtime.block_on(run_command(
        command,
        &api,
        config,
        &mut stdout.lock(),
        &mut stdin.lock(),
    ))
}

pub async fn run_command(
    command: Commands,
    api: &dyn TaskApi,
    config: &Config,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()> {
    match command {
        Commands::List(args) => list(api, args, out).await,
        Commands::Stats(args) => {
            let summary = Summary::from_tasks(&api.list().await?);
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
                Ok(())
            } else {
                write_summary(&summary, out)
            }
        }
        Commands::Add(args) => add(api, args, out).await,
        Commands::Done(args) => {
            let mut store = TaskStore::with_tasks(api.list().await?);
            match store.get(args.id) {
                None => return Err(Error::TaskNotFound(args.id)),
                Some(task) if task.is_done() => {
                    writeln!(out, "Task {} già completato", args.id)?;
                    return Ok(());
                }
                Some(_) => {}
            }
            if !store.mark_done(api, args.id).await {
                return Err(Error::RequestFailed("update"));
            }
            writeln!(out, "Task {} completato", args.id)?;
            Ok(())
        }
        Commands::Delete(args) => delete(api, args, out, input).await,
        Commands::Export(args) => {
            let tasks = api.list().await?;
            let path = match args.format {
                ExportFormat::Csv => export::write_csv(&config.export_dir, &tasks)?,
                ExportFormat::Pdf => {
                    let mut app = App::new(config.theme, config.export_dir.clone());
                    app.apply(Outcome::Loaded(tasks));
                    let snapshot = render::task_list_snapshot(&app, PDF_WIDTH);
                    export::write_pdf(&config.export_dir, &snapshot, &app.palette().pdf_style())?
                }
            };
            writeln!(out, "Salvato {}", path.display())?;
            Ok(())
        }
    }
}

async fn list(api: &dyn TaskApi, args: ListArgs, out: &mut impl Write) -> Result<()> {
    let tasks = api.list().await?;
    let client = ClientFilter::parse(&args.client);
    let visible = visible_tasks(&tasks, &args.status, &client);
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &visible)?;
        writeln!(out)?;
        return Ok(());
    }
    if visible.is_empty() {
        writeln!(out, "Nessun task trovato")?;
    }
    for task in visible {
        write_task(task, out)?;
    }
    Ok(())
}

fn write_task(task: &Task, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "#{:<4} {:<12} {:<6} {} / {}: {} (scadenza {}, {}h)",
        task.id,
        task.status.label(),
        task.priority.label(),
        task.client_name,
        task.project_name,
        task.title,
        format::due_date(task),
        format::hours(task.estimated_hours),
    )?;
    Ok(())
}

fn write_summary(summary: &Summary, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Task Totali:   {}", summary.total_tasks)?;
    writeln!(out, "Completamento: {}%", summary.completion_percent)?;
    writeln!(out, "Completati:    {}", summary.completed_tasks)?;
    writeln!(out, "In Corso:      {}", summary.in_progress_count)?;
    writeln!(out, "Ore Stimate:   {}h", format::hours(summary.total_hours))?;
    writeln!(out, "Clienti:       {}", summary.client_count())?;
    if !summary.hours_by_client.is_empty() {
        writeln!(out, "Ore per Cliente:")?;
        for (client, hours) in &summary.hours_by_client {
            writeln!(out, "  {client}: {}h", format::hours(*hours))?;
        }
    }
    Ok(())
}

async fn add(api: &dyn TaskApi, args: AddArgs, out: &mut impl Write) -> Result<()> {
    let draft = Draft {
        client_name: args.client,
        project_name: args.project,
        title: args.title,
        description: args.description,
        priority: args.priority,
        estimated_hours: args.hours,
        due_date: args.due.unwrap_or_default(),
    };
    let new_task = draft.to_new_task(Utc::now())?;
    let mut store = TaskStore::new();
    let id = store
        .create(api, new_task)
        .await
        .ok_or(Error::RequestFailed("create"))?;
    writeln!(out, "Creato task {id}")?;
    Ok(())
}

async fn delete(
    api: &dyn TaskApi,
    args: DeleteArgs,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()> {
    let mut store = TaskStore::with_tasks(api.list().await?);
    let request = store
        .request_delete(args.id)
        .ok_or(Error::TaskNotFound(args.id))?;

    if !args.yes {
        write!(out, "{} ({}) [s/N] ", request.prompt(), request.title())?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sì" | "y" | "yes") {
            writeln!(out, "Annullato")?;
            return Ok(());
        }
    }

    if !store.delete(api, request.confirm()).await {
        return Err(Error::RequestFailed("delete"));
    }
    writeln!(out, "Eliminato task {}", args.id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DoneArgs, ExportArgs, StatsArgs};
    use crate::filter::StatusFilter;
    use crate::store::fake::{task, FakeApi};
    use crate::tui::theme::ThemeMode;
    use taskdesk_shared::{Priority, TaskStatus};
    use url::Url;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            tasks_url: Url::parse("http://localhost:3000/api/tasks").unwrap(),
            export_dir: dir.to_path_buf(),
            log_file: None,
            theme: ThemeMode::Dark,
        }
    }

    fn api() -> FakeApi {
        FakeApi::with_tasks(vec![
            task(1, "Acme", TaskStatus::Todo, "2024-03-01T00:00:00Z", 2.0),
            task(2, "Globex", TaskStatus::Done, "2024-01-01T00:00:00Z", 4.0),
            task(3, "Acme", TaskStatus::InProgress, "2024-02-01T00:00:00Z", 1.5),
        ])
    }

    async fn run(api: &FakeApi, command: Commands, answer: &str) -> (Result<()>, String) {
        let dir = std::env::temp_dir();
        let mut out = Vec::new();
        let mut input = answer.as_bytes();
        let result = run_command(command, api, &config(&dir), &mut out, &mut input).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn list_filters_and_sorts_by_due_date() {
        let api = api();
        let args = ListArgs {
            status: StatusFilter::All,
            client: "Acme".into(),
            json: false,
        };
        let (result, out) = run(&api, Commands::List(args), "").await;
        result.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#3"));
        assert!(lines[1].starts_with("#1"));
    }

    #[tokio::test]
    async fn list_reports_an_empty_result() {
        let api = api();
        let args = ListArgs {
            status: StatusFilter::Only(TaskStatus::Done),
            client: "Acme".into(),
            json: false,
        };
        let (_, out) = run(&api, Commands::List(args), "").await;
        assert_eq!(out.trim(), "Nessun task trovato");
    }

    #[tokio::test]
    async fn stats_as_json() {
        let api = api();
        let (result, out) = run(&api, Commands::Stats(StatsArgs { json: true }), "").await;
        result.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_tasks"], 3);
        assert_eq!(value["completion_percent"], 33);
        assert_eq!(value["hours_by_client"][0][0], "Globex");
    }

    #[tokio::test]
    async fn add_validates_before_calling_the_api() {
        let api = api();
        let args = AddArgs {
            client: "Acme".into(),
            project: "Site".into(),
            title: String::new(),
            description: String::new(),
            priority: Priority::High,
            hours: "3".into(),
            due: None,
        };
        let (result, _) = run(&api, Commands::Add(args), "").await;
        assert!(matches!(result, Err(Error::Form(_))));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn add_creates_the_task() {
        let api = api();
        let args = AddArgs {
            client: "Initech".into(),
            project: "Site".into(),
            title: "Launch".into(),
            description: String::new(),
            priority: Priority::High,
            hours: "3".into(),
            due: Some("2024-05-01".into()),
        };
        let (result, out) = run(&api, Commands::Add(args), "").await;
        result.unwrap();
        assert_eq!(out.trim(), "Creato task 4");
        let tasks = api.tasks.lock().unwrap();
        assert_eq!(tasks[3].due_date, "2024-05-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn done_updates_once() {
        let api = api();
        let (result, _) = run(&api, Commands::Done(DoneArgs { id: 1 }), "").await;
        result.unwrap();
        assert_eq!(api.tasks.lock().unwrap()[0].status, TaskStatus::Done);

        let (result, out) = run(&api, Commands::Done(DoneArgs { id: 1 }), "").await;
        result.unwrap();
        assert!(out.contains("già completato"));
    }

    #[tokio::test]
    async fn done_on_a_missing_task() {
        let api = api();
        let (result, _) = run(&api, Commands::Done(DoneArgs { id: 9 }), "").await;
        assert!(matches!(result, Err(Error::TaskNotFound(9))));
    }

    #[tokio::test]
    async fn delete_asks_first() {
        let api = api();
        let args = DeleteArgs { id: 2, yes: false };
        let (result, out) = run(&api, Commands::Delete(args), "n\n").await;
        result.unwrap();
        assert!(out.contains("Sei sicuro di voler eliminare questo task?"));
        assert!(out.contains("Annullato"));
        assert_eq!(api.tasks.lock().unwrap().len(), 3);

        let args = DeleteArgs { id: 2, yes: false };
        let (result, _) = run(&api, Commands::Delete(args), "s\n").await;
        result.unwrap();
        assert_eq!(api.tasks.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_with_yes_skips_the_prompt() {
        let api = api();
        let (result, out) = run(&api, Commands::Delete(DeleteArgs { id: 3, yes: true }), "").await;
        result.unwrap();
        assert!(!out.contains("[s/N]"));
        assert!(api.tasks.lock().unwrap().iter().all(|t| t.id != 3));
    }

    #[tokio::test]
    async fn failed_list_surfaces_as_an_error() {
        let api = FakeApi::failing();
        let (result, _) = run(&api, Commands::Stats(StatsArgs { json: false }), "").await;
        assert!(matches!(result, Err(Error::Api(_))));
    }

    #[tokio::test]
    async fn exports_land_in_the_export_dir() {
        let api = api();
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        for format in [ExportFormat::Csv, ExportFormat::Pdf] {
            run_command(
                Commands::Export(ExportArgs { format }),
                &api,
                &config(dir.path()),
                &mut out,
                &mut "".as_bytes(),
            )
            .await
            .unwrap();
        }
        let csv = std::fs::read_to_string(dir.path().join(export::CSV_FILE_NAME)).unwrap();
        assert!(csv.starts_with(&export::CSV_HEADER.join(",")));
        let pdf = std::fs::read(dir.path().join(export::PDF_FILE_NAME)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
