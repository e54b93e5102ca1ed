use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

/// A rendered region reduced to its character cells, one string per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    width: u16,
    rows: Vec<String>,
}

impl Snapshot {
    /// Renders off-screen into a `width` × `height` buffer and keeps the text.
    pub fn render<F>(width: u16, height: u16, draw: F) -> Snapshot
    where
        F: FnOnce(Rect, &mut Buffer),
    {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        draw(area, &mut buffer);
        Snapshot::from_buffer(&buffer)
    }

    pub fn from_buffer(buffer: &Buffer) -> Snapshot {
        let width = buffer.area.width;
        let rows = if width == 0 {
            Vec::new()
        } else {
            buffer
                .content
                .chunks(width as usize)
                .map(|row| {
                    let line: String = row.iter().map(|cell| cell.symbol()).collect();
                    line.trim_end().to_string()
                })
                .collect()
        };
        Snapshot { width, rows }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows.is_empty()
    }
}
