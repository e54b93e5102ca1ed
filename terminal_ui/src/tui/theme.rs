use ratatui::style::Color;
use taskdesk_shared::{Priority, TaskStatus};

use crate::export::{PdfStyle, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> ThemeMode {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Label of the toggle button, which names the *other* theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀ Light",
            ThemeMode::Light => "☾ Dark",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            ThemeMode::Dark => Theme::dark(),
            ThemeMode::Light => Theme::light(),
        }
    }
}

/// Colors for the dashboard, kept as RGB so exports can reuse them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub text: Rgb,
    pub dim: Rgb,
    pub accent: Rgb,
    pub border: Rgb,
    pub todo: Rgb,
    pub in_progress: Rgb,
    pub done: Rgb,
    pub danger: Rgb,
    pub selection_bg: Rgb,
}

impl Theme {
    pub fn dark() -> Theme {
        Theme {
            background: Rgb(0x0f, 0x17, 0x2a),
            text: Rgb(0xe2, 0xe8, 0xf0),
            dim: Rgb(0x94, 0xa3, 0xb8),
            accent: Rgb(0x38, 0xbd, 0xf8),
            border: Rgb(0x33, 0x41, 0x55),
            todo: Rgb(0xfb, 0xbf, 0x24),
            in_progress: Rgb(0x60, 0xa5, 0xfa),
            done: Rgb(0x34, 0xd3, 0x99),
            danger: Rgb(0xf8, 0x71, 0x71),
            selection_bg: Rgb(0x1e, 0x29, 0x3b),
        }
    }

    pub fn light() -> Theme {
        Theme {
            background: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x0f, 0x17, 0x2a),
            dim: Rgb(0x64, 0x74, 0x8b),
            accent: Rgb(0x02, 0x84, 0xc7),
            border: Rgb(0xcb, 0xd5, 0xe1),
            todo: Rgb(0xb4, 0x53, 0x09),
            in_progress: Rgb(0x1d, 0x4e, 0xd8),
            done: Rgb(0x04, 0x78, 0x57),
            danger: Rgb(0xdc, 0x26, 0x26),
            selection_bg: Rgb(0xe2, 0xe8, 0xf0),
        }
    }

    pub fn color(rgb: Rgb) -> Color {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        Self::color(match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        })
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        Self::color(match priority {
            Priority::Low => self.dim,
            Priority::Medium => self.accent,
            Priority::High => self.danger,
        })
    }

    pub fn pdf_style(&self) -> PdfStyle {
        PdfStyle {
            background: self.background,
            foreground: self.text,
        }
    }
}
