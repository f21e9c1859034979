//! Table - Plain-Text Data Table
//!
//! Columns carry a label, a width and a cell renderer; the table lays rows
//! out in fixed-width text.

use crate::utils::format::fit;

/// How wide a column renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exactly this many characters
    Fixed(usize),
    /// Widest cell (or the label), kept within the bounds
    Flex { min: usize, max: usize },
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex { min: 4, max: 40 }
    }
}

/// Column definition
pub struct Column<R> {
    /// Column header label
    pub label: String,
    pub width: ColumnWidth,
    /// Cell renderer function
    pub render: Box<dyn Fn(&R) -> String + Send + Sync>,
}

impl<R> Column<R> {
    pub fn new(
        label: impl Into<String>,
        render: impl Fn(&R) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            width: ColumnWidth::default(),
            render: Box::new(render),
        }
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: usize) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set flexible width with constraints
    pub fn flex_width(mut self, min: usize, max: usize) -> Self {
        self.width = ColumnWidth::Flex { min, max: max.max(min) };
        self
    }

    /// Render a cell
    pub fn render_cell(&self, row: &R) -> String {
        (self.render)(row)
    }

    fn resolve_width(&self, cells: &[String]) -> usize {
        match self.width {
            ColumnWidth::Fixed(width) => width,
            ColumnWidth::Flex { min, max } => cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(self.label.chars().count()))
                .max()
                .unwrap_or(0)
                .clamp(min, max),
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("width", &self.width)
            .finish()
    }
}

/// A set of columns rendered over rows of `R`
pub struct Table<R> {
    columns: Vec<Column<R>>,
    empty_text: String,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            empty_text: "No data".to_string(),
        }
    }

    /// Text shown in place of rows when there are none
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Header, separator and one line per row
    pub fn render(&self, rows: &[&R]) -> String {
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| rows.iter().map(|row| col.render_cell(row)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(col, cells)| col.resolve_width(cells))
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| fit(&col.label, *w))
            .collect();
        push_line(&mut out, &header.join("  "));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule.join("  "));

        if rows.is_empty() {
            push_line(&mut out, &self.empty_text);
            return out;
        }

        for i in 0..rows.len() {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(col, w)| fit(&col[i], *w))
                .collect();
            push_line(&mut out, &line.join("  "));
        }
        out
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        count: u32,
    }

    fn table() -> Table<Row> {
        Table::new(vec![
            Column::new("Name", |r: &Row| r.name.to_string()).flex_width(4, 8),
            Column::new("N", |r: &Row| r.count.to_string()).fixed_width(3),
        ])
    }

    #[test]
    fn test_render_aligns_and_truncates() {
        let a = Row { name: "Boiler", count: 3 };
        let b = Row { name: "Very long device name", count: 12 };
        let text = table().render(&[&a, &b]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name      N");
        assert_eq!(lines[1], "--------  ---");
        assert_eq!(lines[2], "Boiler    3");
        assert_eq!(lines[3], "Very ...  12");
    }

    #[test]
    fn test_empty_rows_show_placeholder() {
        let text = table().empty_text("Nothing here").render(&[]);
        assert_eq!(text.lines().last(), Some("Nothing here"));
    }
}
