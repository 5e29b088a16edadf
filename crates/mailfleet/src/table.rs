/// Box-drawn table with per-column widths.
///
/// Column widths fit the widest cell (or header), clamped between the
/// header length and the column's maximum.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

impl TableFormatter {
    /// `columns` pairs each header with its maximum width.
    pub fn new(columns: &[(&'static str, usize)], rows: &[Vec<String>]) -> Self {
        let headers = columns.iter().map(|(header, _)| *header).collect();
        let widths = columns
            .iter()
            .enumerate()
            .map(|(i, (header, max_width))| {
                let min_width = header.chars().count();
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(min_width)
                    .clamp(min_width, (*max_width).max(min_width))
            })
            .collect();

        Self { headers, widths }
    }

    pub fn print_table(&self, rows: &[Vec<String>]) {
        println!("{}", self.render(rows));
    }

    pub fn render(&self, rows: &[Vec<String>]) -> String {
        let mut lines = vec![
            self.border('┌', '┬', '┐'),
            self.row(self.headers.iter().copied()),
            self.border('├', '┼', '┤'),
        ];
        lines.extend(rows.iter().map(|cells| self.row(cells.iter().map(String::as_str))));
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn row<'a>(&self, cells: impl Iterator<Item = &'a str>) -> String {
        let cells: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| truncate(cell, *width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
