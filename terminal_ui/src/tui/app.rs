use std::path::PathBuf;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use taskdesk_shared::{Task, TaskId};

use crate::board::BoardState;
use crate::error::{ExportError, FormError};
use crate::export::{self, ExportFormat};
use crate::filter::{visible_tasks, ClientFilter, StatusFilter};
use crate::form::TaskForm;
use crate::stats::Summary;
use crate::store::{Command, DeleteRequest, Outcome, TaskStore};
use crate::tui::render;
use crate::tui::theme::{Theme, ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Board,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Form,
    ConfirmDelete(DeleteRequest),
}

/// What the event loop has to do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Run(Command),
    Export(ExportFormat),
    Quit,
}

/// Everything the dashboard shows. Key presses and API outcomes are the only
/// ways it changes.
#[derive(Debug)]
pub struct App {
    pub store: TaskStore,
    pub status_filter: StatusFilter,
    pub client_filter: ClientFilter,
    pub theme: ThemeMode,
    pub form: TaskForm,
    pub form_error: Option<FormError>,
    pub view: View,
    pub mode: Mode,
    pub loading: bool,
    pub selected: usize,
    pub board: BoardState,
    /// Where the task list was drawn last frame; `None` while it is hidden.
    pub list_area: Option<Rect>,
    pub notice: Option<String>,
    pub export_dir: PathBuf,
}

impl App {
    pub fn new(theme: ThemeMode, export_dir: PathBuf) -> App {
        App {
            store: TaskStore::new(),
            status_filter: StatusFilter::All,
            client_filter: ClientFilter::All,
            theme,
            form: TaskForm::new(),
            form_error: None,
            view: View::List,
            mode: Mode::Browse,
            loading: true,
            selected: 0,
            board: BoardState::new(),
            list_area: None,
            notice: None,
            export_dir,
        }
    }

    pub fn palette(&self) -> Theme {
        self.theme.theme()
    }

    pub fn visible(&self) -> Vec<&Task> {
        visible_tasks(self.store.tasks(), &self.status_filter, &self.client_filter)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_tasks(self.store.tasks())
    }

    /// Task under the cursor in whichever view is showing.
    pub fn selected_task(&self) -> Option<TaskId> {
        match self.view {
            View::List => self.visible().get(self.selected).map(|t| t.id),
            View::Board => self.board.selected(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Effect::Quit);
        }
        match self.mode {
            Mode::Browse => self.handle_browse(key),
            Mode::Form => self.handle_form(key, now),
            Mode::ConfirmDelete(_) => self.handle_confirm(key),
        }
    }

    fn handle_browse(&mut self, key: KeyEvent) -> Option<Effect> {
        self.notice = None;
        match key.code {
            KeyCode::Char('q') => return Some(Effect::Quit),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') if self.view == View::Board => {
                self.board.move_column(-1)
            }
            KeyCode::Right | KeyCode::Char('l') if self.view == View::Board => {
                self.board.move_column(1)
            }
            KeyCode::Char('s') => {
                self.status_filter = self.status_filter.next();
                self.selected = 0;
            }
            KeyCode::Char('c') => {
                self.client_filter = self.client_filter.next(&self.store.client_names());
                self.selected = 0;
            }
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            KeyCode::Char('b') => {
                self.view = match self.view {
                    View::List => View::Board,
                    View::Board => View::List,
                };
                self.board.reconcile(self.store.tasks());
            }
            KeyCode::Char('n') => {
                self.mode = Mode::Form;
                self.form_error = None;
            }
            KeyCode::Char(' ') if self.view == View::Board => self.board.toggle_drag(),
            KeyCode::Esc if self.view == View::Board => self.board.cancel_drag(),
            KeyCode::Enter if self.view == View::Board && self.board.dragging() => {
                self.board.toggle_drag()
            }
            KeyCode::Enter => {
                let id = self.selected_task()?;
                return self.store.plan_mark_done(id).map(Effect::Run);
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                let id = self.selected_task()?;
                if let Some(request) = self.store.request_delete(id) {
                    self.mode = Mode::ConfirmDelete(request);
                }
            }
            KeyCode::Char('p') => return Some(Effect::Export(ExportFormat::Pdf)),
            KeyCode::Char('e') => return Some(Effect::Export(ExportFormat::Csv)),
            _ => {}
        }
        None
    }

    fn move_selection(&mut self, delta: isize) {
        match self.view {
            View::List => {
                let last = self.visible().len().saturating_sub(1) as isize;
                self.selected = (self.selected as isize + delta).clamp(0, last) as usize;
            }
            View::Board => self.board.move_row(delta),
        }
    }

    fn handle_form(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Effect> {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Left => self.form.cycle_priority(false),
            KeyCode::Right => self.form.cycle_priority(true),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.input(c),
            KeyCode::Enter => match self.form.submit(now) {
                Ok(task) => {
                    self.form_error = None;
                    self.mode = Mode::Browse;
                    return Some(Effect::Run(Command::Create(task)));
                }
                Err(err) => {
                    log::debug!("form not submitted: {err}");
                    self.form_error = Some(err);
                }
            },
            _ => {}
        }
        None
    }

    fn handle_confirm(&mut self, key: KeyEvent) -> Option<Effect> {
        let Mode::ConfirmDelete(request) = std::mem::replace(&mut self.mode, Mode::Browse) else {
            return None;
        };
        match key.code {
            KeyCode::Char('y' | 'Y' | 's' | 'S') => {
                self.store.plan_delete(request.confirm()).map(Effect::Run)
            }
            _ => {
                log::debug!("delete of task {} cancelled", request.id());
                None
            }
        }
    }

    /// Folds an API outcome into the state.
    pub fn apply(&mut self, outcome: Outcome) {
        match &outcome {
            Outcome::Loaded(_) | Outcome::LoadFailed => self.loading = false,
            Outcome::Created(_) => self.form.reset(),
            _ => {}
        }
        if self.store.apply(outcome) {
            self.client_filter.retain_known(&self.store.client_names());
            self.board.reconcile(self.store.tasks());
            self.clamp_selection();
        }
    }

    /// Writes the requested export into the export directory. The PDF needs
    /// the task list to be on screen.
    pub fn export(&mut self, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let path = match format {
            ExportFormat::Csv => export::write_csv(&self.export_dir, self.store.tasks())?,
            ExportFormat::Pdf => {
                let area = match (self.view, self.list_area) {
                    (View::List, Some(area)) => area,
                    _ => return Err(ExportError::MissingRenderTarget),
                };
                let snapshot = render::task_list_snapshot(self, area.width);
                export::write_pdf(&self.export_dir, &snapshot, &self.palette().pdf_style())?
            }
        };
        self.notice = Some(format!("Salvato {}", path.display()));
        Ok(path)
    }
}
