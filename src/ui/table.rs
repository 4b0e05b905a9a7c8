//! Box-drawn tables for summaries.

/// A simple table, used for the `upgrade` summary.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; cells beyond the header count are dropped.
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.truncate(self.headers.len());
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of each column in characters.
    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(header.chars().count(), usize::max)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: &[String]| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    format!(" {:<w$} ", cell, w = *w)
                })
                .collect();
            format!("│{}│", padded.join("│"))
        };

        let mut lines = vec![border("┌", "┬", "┐"), line(&self.headers), border("├", "┼", "┤")];
        lines.extend(self.rows.iter().map(|row| line(row)));
        lines.push(border("└", "┴", "┘"));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_renders_headers() {
        let table = Table::new(vec!["environment", "deps"]);
        assert!(table.is_empty());
        let output = table.render();
        assert!(output.contains("environment"));
        assert!(output.contains("deps"));
    }

    #[test]
    fn rows_widen_columns() {
        let mut table = Table::new(vec!["env"]);
        table.add_row(vec!["a-much-longer-name"]);

        let output = table.render();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
        assert!(output.contains("a-much-longer-name"));
    }

    #[test]
    fn upgrade_summary_shape() {
        let mut table = Table::new(vec!["environment", "python", "deps", "scripts"]);
        table.add_row(vec!["web", "ok", "failed", "ok"]);
        table.add_row(vec!["api", "ok", "ok", "ok"]);

        let output = table.render();
        assert_eq!(table.row_count(), 2);
        // top border, header, separator, two rows, bottom border
        assert_eq!(output.lines().count(), 6);
        assert!(output.contains("┼"));
    }

    #[test]
    fn missing_cells_render_blank() {
        let mut table = Table::new(vec!["A", "B", "C"]);
        table.add_row(vec!["only"]);
        assert!(table.render().contains("only"));
    }
}
