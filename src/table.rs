//! Plain text tables for reports.

/// Renders `rows` under `headers` as a pipe-delimited table. The first column is left aligned and
/// the remaining columns, which hold amounts, are right aligned. Rows shorter than the header are
/// padded with empty cells.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::from("(no columns)\n");
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(headers.len()).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    out.push('|');
    for w in &widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('|');
    }
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if i == 0 {
            out.push_str(&format!(" {cell:<w$} |"));
        } else {
            out.push_str(&format!(" {cell:>w$} |"));
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let rows = vec![
            vec!["January".to_string(), "$100.00".to_string()],
            vec!["Feb".to_string()],
        ];
        let table = render(&["Month", "Spent"], &rows);
        let expected = "\
| Month   |   Spent |
|---------|---------|
| January | $100.00 |
| Feb     |         |
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_no_columns() {
        assert_eq!(render(&[], &[]), "(no columns)\n");
    }
}
