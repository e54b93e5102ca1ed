//! Card order for the status board.
//!
//! The board keeps its own per-column order of task ids. Reordering only
//! touches that order; the store and the API never hear about it.

use taskdesk_shared::{Task, TaskId, TaskStatus};

fn column_of(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Done => 2,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Drag {
    id: TaskId,
    original: Vec<TaskId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    columns: [Vec<TaskId>; 3],
    selected_column: usize,
    selected_row: usize,
    drag: Option<Drag>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the card order in line with the store: vanished tasks leave,
    /// new or re-statused tasks join the bottom of their column.
    pub fn reconcile(&mut self, tasks: &[Task]) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.retain(|id| {
                tasks
                    .iter()
                    .any(|t| t.id == *id && column_of(t.status) == index)
            });
        }
        for task in tasks {
            let column = &mut self.columns[column_of(task.status)];
            if !column.contains(&task.id) {
                column.push(task.id);
            }
        }
        let held = &self.columns[self.selected_column];
        if self.drag.as_ref().is_some_and(|d| !held.contains(&d.id)) {
            self.drag = None;
        }
        self.clamp_row();
    }

    pub fn column(&self, status: TaskStatus) -> &[TaskId] {
        &self.columns[column_of(status)]
    }

    pub fn selected_status(&self) -> TaskStatus {
        TaskStatus::ALL[self.selected_column]
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn selected(&self) -> Option<TaskId> {
        self.columns[self.selected_column]
            .get(self.selected_row)
            .copied()
    }

    pub fn is_dragging(&self, id: TaskId) -> bool {
        self.drag.as_ref().is_some_and(|d| d.id == id)
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn clamp_row(&mut self) {
        let len = self.columns[self.selected_column].len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }

    /// Left/right; ignored while a card is held.
    pub fn move_column(&mut self, delta: isize) {
        if self.drag.is_some() {
            return;
        }
        let last = self.columns.len() as isize - 1;
        self.selected_column = (self.selected_column as isize + delta).clamp(0, last) as usize;
        self.clamp_row();
    }

    /// Up/down. While a card is held it moves with the cursor.
    pub fn move_row(&mut self, delta: isize) {
        let column = &mut self.columns[self.selected_column];
        if column.is_empty() {
            return;
        }
        let last = column.len() as isize - 1;
        let target = (self.selected_row as isize + delta).clamp(0, last) as usize;
        if self.drag.is_some() {
            let card = column.remove(self.selected_row);
            column.insert(target, card);
        }
        self.selected_row = target;
    }

    /// Picks up the selected card, or drops the held one.
    pub fn toggle_drag(&mut self) {
        if self.drag.take().is_some() {
            return;
        }
        if let Some(id) = self.selected() {
            self.drag = Some(Drag {
                id,
                original: self.columns[self.selected_column].clone(),
            });
        }
    }

    /// Puts the held card back where it was picked up. Cards that left the
    /// column since then stay gone; cards that joined stay at the bottom.
    pub fn cancel_drag(&mut self) {
        if let Some(Drag { id, original }) = self.drag.take() {
            let column = &mut self.columns[self.selected_column];
            let joined: Vec<TaskId> = column
                .iter()
                .copied()
                .filter(|card| !original.contains(card))
                .collect();
            let mut restored: Vec<TaskId> = original
                .into_iter()
                .filter(|card| column.contains(card))
                .collect();
            restored.extend(joined);
            *column = restored;
            self.selected_row = column.iter().position(|card| *card == id).unwrap_or(0);
        }
    }
}
