//! Number formatting and plain-text tables for the CLI.
//!
//! The pipeline returns numbers; everything string-shaped happens
//! here. Values render rounded to whole units with thousands
//! separators, and absent values render as a placeholder dash.

use crate::utils::config::MISSING_VALUE;

/// Format a value for display: `1,234,567`, or `—` when absent
///
/// **Public** - used by every table and KPI card
pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => MISSING_VALUE.to_string(),
        Some(v) if v.is_nan() => MISSING_VALUE.to_string(),
        Some(v) => group_thousands(v.round() as i64),
    }
}

/// Insert thousands separators into a whole number
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Render rows as an aligned text table.
///
/// First column is left-aligned (names), the rest right-aligned
/// (numbers). Column widths come from the content.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    append_row(&mut out, headers.iter().map(|h| h.to_string()), &widths);

    let total_width: usize = widths.iter().sum::<usize>() + 2 * (columns.saturating_sub(1));
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for row in rows {
        append_row(&mut out, row.iter().cloned(), &widths);
    }

    out
}

fn append_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let pad = widths[i].saturating_sub(cell.chars().count());
        if i == 0 {
            out.push_str(&cell);
            out.push_str(&" ".repeat(pad));
        } else {
            out.push_str(&" ".repeat(pad));
            out.push_str(&cell);
        }
    }
    // Trailing spaces on the last column are not worth keeping
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}
