use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use taskdesk_shared::{NewTask, Priority, TaskStatus};

use crate::error::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Client,
    Project,
    Title,
    Description,
    Priority,
    Hours,
    DueDate,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Client,
        Field::Project,
        Field::Title,
        Field::Description,
        Field::Priority,
        Field::Hours,
        Field::DueDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Client => "Cliente",
            Field::Project => "Progetto",
            Field::Title => "Titolo attività",
            Field::Description => "Descrizione",
            Field::Priority => "Importanza",
            Field::Hours => "Ore stimate",
            Field::DueDate => "Scadenza (AAAA-MM-GG)",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Client | Field::Project | Field::Title)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Field {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Field {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The values typed into the creation form, kept as text until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub client_name: String,
    pub project_name: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_hours: String,
    pub due_date: String,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            client_name: String::new(),
            project_name: String::new(),
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            estimated_hours: "1".to_string(),
            due_date: String::new(),
        }
    }
}

impl Draft {
    /// Builds the POST body. An empty due date means "now"; otherwise the
    /// date is taken as midnight UTC.
    pub fn to_new_task(&self, now: DateTime<Utc>) -> Result<NewTask, FormError> {
        for (field, value) in [
            (Field::Client, &self.client_name),
            (Field::Project, &self.project_name),
            (Field::Title, &self.title),
        ] {
            if value.is_empty() {
                return Err(FormError::Missing(field.label()));
            }
        }

        let estimated_hours = self
            .estimated_hours
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h > 0.0)
            .ok_or_else(|| FormError::InvalidHours(self.estimated_hours.clone()))?;

        let due = match self.due_date.trim() {
            "" => now,
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or_else(|| FormError::InvalidDueDate(raw.to_string()))?,
        };

        Ok(NewTask {
            client_name: self.client_name.clone(),
            project_name: self.project_name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            estimated_hours,
            status: TaskStatus::Todo,
            due_date: due.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

/// Form state: the draft plus which field has the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub draft: Draft,
    pub focus: Field,
}

impl Default for TaskForm {
    fn default() -> Self {
        TaskForm {
            draft: Draft::default(),
            focus: Field::Client,
        }
    }
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Text shown for `field`.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Client => &self.draft.client_name,
            Field::Project => &self.draft.project_name,
            Field::Title => &self.draft.title,
            Field::Description => &self.draft.description,
            Field::Priority => self.draft.priority.label(),
            Field::Hours => &self.draft.estimated_hours,
            Field::DueDate => &self.draft.due_date,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Client => Some(&mut self.draft.client_name),
            Field::Project => Some(&mut self.draft.project_name),
            Field::Title => Some(&mut self.draft.title),
            Field::Description => Some(&mut self.draft.description),
            Field::Priority => None,
            Field::Hours => Some(&mut self.draft.estimated_hours),
            Field::DueDate => Some(&mut self.draft.due_date),
        }
    }

    pub fn input(&mut self, c: char) {
        let accepted = match self.focus {
            Field::Hours => c.is_ascii_digit() || c == '.',
            Field::DueDate => c.is_ascii_digit() || c == '-',
            _ => !c.is_control(),
        };
        if !accepted {
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        if self.focus == Field::Priority {
            self.draft.priority = if forward {
                self.draft.priority.next()
            } else {
                self.draft.priority.prev()
            };
        }
    }

    pub fn submit(&self, now: DateTime<Utc>) -> Result<NewTask, FormError> {
        self.draft.to_new_task(now)
    }
}
