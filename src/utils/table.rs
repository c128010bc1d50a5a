/// Plain-text table for terminal output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
    right_aligned: Vec<bool>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
            right_aligned: vec![false; headers.len()],
        }
    }

    /// Right-align a column (amounts)
    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(column) {
            *flag = true;
        }
        self
    }

    /// Add a row; cells beyond the header count are ignored, missing ones are blank
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).take(self.headers.len()).collect();
        cells.resize(self.headers.len(), String::new());

        for (width, cell) in self.col_widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                // Pad by chars, not bytes, so currency symbols line up
                let padding = " ".repeat(self.col_widths[i].saturating_sub(cell.chars().count()));
                if self.right_aligned[i] {
                    format!("{}{}", padding, cell)
                } else {
                    format!("{}{}", cell, padding)
                }
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(&["Counterpart", "Amount"]).align_right(1);
        table.add_row(["Ana", "€50.00"]);
        table.add_row(["Bartholomew", "$1,250.00"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Counterpart |    Amount");
        assert_eq!(lines[1], "------------+----------");
        assert_eq!(lines[2], "Ana         |    €50.00");
        assert_eq!(lines[3], "Bartholomew | $1,250.00");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(vec!["x".to_string()]);
        assert!(!table.is_empty());
        assert_eq!(table.render().lines().nth(2), Some("x |   |"));
    }
}
