//! Plain-text tables and key/value panels for terminal output.

use colored::{Color, Colorize};

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone)]
struct Column {
    header: String,
    align: Align,
    color: Option<Color>,
}

/// A titled table with per-column alignment and colour.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn column(mut self, header: &str, align: Align, color: Option<Color>) -> Self {
        self.columns.push(Column {
            header: header.to_string(),
            align,
            color,
        });
        self
    }

    /// Add a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[i]))
                    .chain(std::iter::once(display_width(&column.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        let mut output = String::new();

        if let Some(ref title) = self.title {
            output.push_str(&format!(
                "{}\n",
                pad(title, total_width, Align::Center).bold().italic()
            ));
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| pad(&column.header, *width, column.align).bold().to_string())
            .collect();
        output.push_str(header.join(" │ ").trim_end());
        output.push('\n');

        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        output.push_str(&rule.join("─┼─"));
        output.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .zip(row)
                .map(|((column, width), cell)| {
                    let padded = pad(cell, *width, column.align);
                    match column.color {
                        Some(color) => padded.color(color).to_string(),
                        None => padded,
                    }
                })
                .collect();
            output.push_str(cells.join(" │ ").trim_end());
            output.push('\n');
        }

        output
    }
}

/// A bordered list of label/value pairs.
pub fn render_panel(title: &str, rows: &[(&str, String)]) -> String {
    let label_width = rows.iter().map(|(label, _)| display_width(label)).max().unwrap_or(0);
    let mut output = String::new();

    output.push_str(&format!("╭─ {} ─\n", title.bold().magenta()));
    for (label, value) in rows {
        output.push_str(&format!(
            "│ {}  {}\n",
            pad(label, label_width, Align::Left).cyan(),
            value
        ));
    }
    output.push_str("╰─\n");

    output
}

/// Fold `text` onto one line and shorten it to `max` characters, ending
/// with "..." when cut. Runs of whitespace (line breaks included) become a
/// single space.
pub fn truncate(text: &str, max: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if display_width(&text) <= max {
        return text;
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(display_width(text));
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        colored::control::set_override(false);

        let mut table = Table::new()
            .column("ID", Align::Right, Some(Color::Cyan))
            .column("Name", Align::Left, None);
        table.add_row(["1", "Ada Lovelace"]);
        table.add_row(["42", "Bob"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID │ Name");
        assert_eq!(lines[1], "───┼─────────────");
        assert_eq!(lines[2], " 1 │ Ada Lovelace");
        assert_eq!(lines[3], "42 │ Bob");
    }

    #[test]
    fn test_short_rows_are_padded() {
        colored::control::set_override(false);

        let mut table = Table::titled("T")
            .column("A", Align::Left, None)
            .column("B", Align::Left, None);
        table.add_row(["x"]);
        assert_eq!(table.render().lines().last(), Some("x │"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_folds_whitespace() {
        assert_eq!(truncate("a\n\tb  c\r\n", 50), "a b c");
        assert_eq!(truncate("one\ntwo three", 8), "one t...");
    }

    #[test]
    fn test_pad_center() {
        assert_eq!(pad("ab", 6, Align::Center), "  ab  ");
        assert_eq!(pad("abc", 2, Align::Right), "abc");
    }
}
