pub mod app;
pub mod render;
pub mod theme;

use std::io::{self, Stdout};
use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::api::{HttpTaskApi, TaskApi};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, Command, Outcome};

use self::app::{App, Effect};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the dashboard until the user quits.
pub fn run(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let api: Arc<dyn TaskApi> = Arc::new(HttpTaskApi::new(config.tasks_url.clone()));
    let app = App::new(config.theme, config.export_dir.clone());

    let mut terminal = setup_terminal()?;
    let result = runtime.block_on(event_loop(&mut terminal, api, app));
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Requests run on their own tasks so the screen keeps redrawing; their
/// outcomes come back through `tx`.
fn spawn_command(api: &Arc<dyn TaskApi>, tx: &UnboundedSender<Outcome>, command: Command) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = store::execute(api.as_ref(), command).await;
        // The receiver only goes away when the dashboard is closing.
        let _ = tx.send(outcome);
    });
}

async fn event_loop(terminal: &mut Term, api: Arc<dyn TaskApi>, mut app: App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut events = EventStream::new();
    spawn_command(&api, &tx, Command::Load);

    loop {
        terminal.draw(|frame| render::draw(frame, &mut app))?;

        tokio::select! {
            Some(outcome) = rx.recv() => app.apply(outcome),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.handle_key(key, Utc::now()) {
                        Some(Effect::Quit) => return Ok(()),
                        Some(Effect::Run(command)) => spawn_command(&api, &tx, command),
                        Some(Effect::Export(format)) => {
                            if let Err(err) = app.export(format) {
                                log::error!("{format:?} export failed: {err}");
                            }
                        }
                        None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
        }
    }
}
