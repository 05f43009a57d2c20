// reStructuredText simple-table rendering.
// Lays out rows in `=`-ruled columns sized by terminal display width.

use unicode_width::UnicodeWidthStr;

/// Extra columns reserved next to each header.
const HEADER_PADDING: usize = 2;
const COLUMN_SEPARATOR: &str = "  ";

/// Render rows as an RST simple table.
///
/// Cells are trimmed and left-aligned; each line has trailing whitespace
/// removed. The result has no trailing newline.
pub fn rst_table<R, C>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<String> =
                row.into_iter().map(|c| c.as_ref().trim().to_string()).collect();
            cells.resize(headers.len(), String::new());
            cells
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].width())
                .fold(header.width() + HEADER_PADDING, usize::max)
        })
        .collect();

    let rule = widths
        .iter()
        .map(|w| "=".repeat(*w))
        .collect::<Vec<_>>()
        .join(COLUMN_SEPARATOR);

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(rule.clone());
    lines.push(format_row(headers, &widths));
    lines.push(rule.clone());
    for row in &rows {
        lines.push(format_row(row, &widths));
    }
    lines.push(rule);

    lines.join("\n")
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            let fill = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(fill))
        })
        .collect();
    padded.join(COLUMN_SEPARATOR).trim_end().to_string()
}
