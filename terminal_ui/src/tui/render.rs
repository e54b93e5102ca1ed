use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
};
use ratatui::Frame;
use taskdesk_shared::{Task, TaskStatus};

use crate::export::Snapshot;
use crate::form::Field;
use crate::format;
use crate::store::DeleteRequest;
use crate::tui::app::{App, Mode, View};
use crate::tui::theme::Theme;

/// Rows taken by one task in the list.
const TASK_ROWS: u16 = 3;

fn base_style(theme: &Theme) -> Style {
    Style::default()
        .bg(Theme::color(theme.background))
        .fg(Theme::color(theme.text))
}

fn dim(theme: &Theme) -> Style {
    Style::default().fg(Theme::color(theme.dim))
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(Theme::color(theme.border)))
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = app.palette();
    let area = frame.area();
    frame.render_widget(Block::default().style(base_style(&theme)), area);

    let summary = app.summary();
    let hours_height = if summary.client_count() > 0 { 3 } else { 0 };
    let [header, dashboard, hours, filters, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(hours_height),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, app, &theme, header);
    render_dashboard(frame, &summary, &theme, dashboard);
    if hours_height > 0 {
        render_hours_by_client(frame, &summary.hours_by_client, &theme, hours);
    }
    render_filters(frame, app, &theme, filters);

    match app.view {
        View::List => {
            render_task_list(app, &theme, body, frame.buffer_mut(), Some(app.selected));
            app.list_area = Some(body);
        }
        View::Board => {
            render_board(frame, app, &theme, body);
            app.list_area = None;
        }
    }
    render_footer(frame, app, &theme, footer);

    match &app.mode {
        Mode::Browse => {}
        Mode::Form => render_form(frame, app, &theme, area),
        Mode::ConfirmDelete(request) => render_confirm(frame, request, &theme, area),
    }
}

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let accent = Style::default()
        .fg(Theme::color(theme.accent))
        .add_modifier(Modifier::BOLD);
    let [title, actions] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(36)]).areas(area);
    frame.render_widget(Paragraph::new(Span::styled("Gestione Attività", accent)), title);
    let hints = Line::from(vec![
        Span::styled("t ", dim(theme)),
        Span::raw(app.theme.toggle_label()),
        Span::styled("  p ", dim(theme)),
        Span::raw("PDF"),
        Span::styled("  e ", dim(theme)),
        Span::raw("CSV"),
    ]);
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), actions);
}

fn render_dashboard(frame: &mut Frame, summary: &crate::stats::Summary, theme: &Theme, area: Rect) {
    let cards = [
        (summary.total_tasks.to_string(), "Task Totali"),
        (format!("{}%", summary.completion_percent), "Completamento"),
        (summary.completed_tasks.to_string(), "Completati"),
        (summary.in_progress_count.to_string(), "In Corso"),
        (format!("{}h", format::hours(summary.total_hours)), "Ore Stimate"),
        (summary.client_count().to_string(), "Clienti"),
    ];
    let areas = Layout::horizontal([Constraint::Ratio(1, 6); 6]).split(area);
    let value_style = Style::default()
        .fg(Theme::color(theme.accent))
        .add_modifier(Modifier::BOLD);
    for ((value, label), card) in cards.into_iter().zip(areas.iter()) {
        let text = vec![
            Line::from(Span::styled(value, value_style)),
            Line::from(Span::styled(label, dim(theme))),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(panel("", theme)),
            *card,
        );
    }
}

fn render_hours_by_client(frame: &mut Frame, hours: &[(String, f64)], theme: &Theme, area: Rect) {
    let mut spans = Vec::with_capacity(hours.len() * 3);
    for (i, (client, h)) in hours.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ·  ", dim(theme)));
        }
        spans.push(Span::raw(client.clone()));
        spans.push(Span::styled(
            format!(" {}h", format::hours(*h)),
            Style::default().fg(Theme::color(theme.accent)),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel("Ore per Cliente", theme)),
        area,
    );
}

fn render_filters(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let view = match app.view {
        View::List => "Lista",
        View::Board => "Board",
    };
    let line = Line::from(vec![
        Span::styled("s ", dim(theme)),
        Span::raw(format!("[{}]", app.status_filter)),
        Span::styled("   c ", dim(theme)),
        Span::raw(format!("[{}]", app.client_filter)),
        Span::styled("   b ", dim(theme)),
        Span::raw(format!("[{view}]")),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn task_item(task: &Task, theme: &Theme) -> ListItem<'static> {
    let status = Span::styled(
        format!(" {} ", task.status.label()),
        Style::default()
            .fg(theme.status_color(task.status))
            .add_modifier(Modifier::BOLD),
    );
    let action = if task.is_done() { "✓ Completato" } else { "Completa" };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{} - {}: {}", task.client_name, task.project_name, task.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            status,
            Span::styled(format!("[{action}]"), dim(theme)),
        ]),
        Line::from(Span::styled(
            format!(
                "Scadenza: {} • Importanza: {} • {} h",
                format::due_date(task),
                task.priority.as_str(),
                format::hours(task.estimated_hours)
            ),
            dim(theme),
        )),
        Line::from(Span::styled(task.description.clone(), dim(theme))),
    ])
}

/// Draws the task list region. `selected` is `None` for off-screen captures.
fn render_task_list(app: &App, theme: &Theme, area: Rect, buf: &mut Buffer, selected: Option<usize>) {
    let block = panel("Task", theme);
    let visible = app.visible();
    if app.loading || visible.is_empty() {
        let message = if app.loading { "Caricamento..." } else { "Nessun task trovato" };
        Paragraph::new(Span::styled(message, dim(theme)))
            .block(block)
            .render(area, buf);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|t| task_item(t, theme)).collect();
    let list = List::new(items).block(block);
    match selected {
        Some(index) => {
            let list = list.highlight_style(
                Style::default().bg(Theme::color(theme.selection_bg)),
            );
            let mut state = ListState::default().with_selected(Some(index));
            StatefulWidget::render(list, area, buf, &mut state);
        }
        None => Widget::render(list, area, buf),
    }
}

/// Buffer height for `tasks` list entries plus the border. A buffer is at
/// most `u16::MAX` rows tall, so longer lists are cut at that height.
fn snapshot_height(tasks: usize) -> u16 {
    let fits = usize::from((u16::MAX - 2) / TASK_ROWS);
    if tasks > fits {
        log::warn!("task list capture holds {fits} of {tasks} tasks");
    }
    let rows = u16::try_from(tasks.clamp(1, fits)).unwrap_or(u16::MAX);
    rows * TASK_ROWS + 2
}

/// Renders the whole visible list, unscrolled, at `width` columns.
pub fn task_list_snapshot(app: &App, width: u16) -> Snapshot {
    let theme = app.palette();
    let tasks = if app.loading { 0 } else { app.visible().len() };
    let height = snapshot_height(tasks);
    Snapshot::render(width, height, |area, buf| {
        render_task_list(app, &theme, area, buf, None);
    })
}

fn board_card(task: &Task, theme: &Theme, dragging: bool) -> ListItem<'static> {
    let mut footer = vec![Span::styled(
        format!("{}h", format::hours(task.estimated_hours)),
        Style::default().fg(Theme::color(theme.accent)),
    )];
    if !task.is_done() {
        footer.push(Span::styled("  [enter ✓]", dim(theme)));
    }
    footer.push(Span::styled(
        "  [x ✕]",
        Style::default().fg(Theme::color(theme.danger)),
    ));

    let item = ListItem::new(vec![
        Line::from(vec![
            Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                task.priority.as_str(),
                Style::default().fg(theme.priority_color(task.priority)),
            ),
        ]),
        Line::from(Span::styled(task.client_name.clone(), dim(theme))),
        Line::from(Span::styled(task.description.clone(), dim(theme))),
        Line::from(footer),
        Line::from(""),
    ]);
    if dragging {
        item.style(Style::default().add_modifier(Modifier::DIM))
    } else {
        item
    }
}

fn render_board(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    for (status, column_area) in TaskStatus::ALL.into_iter().zip(columns.iter()) {
        let ids = app.board.column(status);
        let items: Vec<ListItem> = ids
            .iter()
            .filter_map(|id| app.store.get(*id))
            .map(|t| board_card(t, theme, app.board.is_dragging(t.id)))
            .collect();
        let title = format!("{} ({})", status.label(), ids.len());
        let mut block = panel(&title, theme);
        let mut state = ListState::default();
        if app.board.selected_status() == status {
            block = block.border_style(Style::default().fg(theme.status_color(status)));
            state.select(Some(app.board.selected_row()));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Theme::color(theme.selection_bg)));
        frame.render_stateful_widget(list, *column_area, &mut state);
    }
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let text = match (&app.notice, app.view) {
        (Some(notice), _) => notice.clone(),
        (None, View::List) => "↑↓ sposta · enter completa · x elimina · n nuovo · q esci".to_string(),
        (None, View::Board) => {
            "←→↑↓ sposta · spazio trascina · enter completa · x elimina · q esci".to_string()
        }
    };
    frame.render_widget(Paragraph::new(Span::styled(text, dim(theme))), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_form(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let popup = centered(area, 64, 13);
    let focus_style = Style::default()
        .fg(Theme::color(theme.accent))
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let focused = *field == app.form.focus;
            let marker = if field.is_required() { "*" } else { "" };
            let mut value = app.form.value(*field).to_string();
            if focused {
                value.push('▏');
            }
            let label_style = if focused { focus_style } else { dim(theme) };
            Line::from(vec![
                Span::styled(format!("{:>24}{marker}: ", field.label()), label_style),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    if let Some(err) = &app.form_error {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Theme::color(theme.danger)),
        )));
    }
    lines.push(Line::from(Span::styled(
        "tab campo · ←→ importanza · enter aggiungi · esc chiudi",
        dim(theme),
    )));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .style(base_style(theme))
            .block(panel("Nuovo task", theme)),
        popup,
    );
}

fn render_confirm(frame: &mut Frame, request: &DeleteRequest, theme: &Theme, area: Rect) {
    let popup = centered(area, 50, 6);
    let lines = vec![
        Line::from(request.prompt()),
        Line::from(Span::styled(request.title().to_string(), dim(theme))),
        Line::from(""),
        Line::from(Span::styled("s/y conferma · altro tasto annulla", dim(theme))),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .style(base_style(theme))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title("Elimina")
                    .border_style(Style::default().fg(Theme::color(theme.danger))),
            ),
        popup,
    );
}
