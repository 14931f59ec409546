//! Column-aligned tables.
//!
//! Rows are laid out in two passes: every cell is measured first, then each
//! line is written with explicit padding. A column's width is decided per
//! block of consecutive rows that reach that column, so a short row splits
//! the columns to its right into independently aligned blocks above and
//! below it.
//!
//! The last cell of a row is never padded. Widths are measured in terminal
//! columns with escape sequences ignored, so styled cells align with plain
//! ones.
//!
//! Cells are joined with tabs and rows end in newlines before layout, as if
//! the text went through a tab-stop writer: a tab inside a cell starts a new
//! column and a newline inside a cell starts a new line.

use console::strip_ansi_codes;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Smallest width a column can have, padding included.
pub const MIN_WIDTH: usize = 0;
/// Spaces added after the widest cell of a column.
pub const PADDING: usize = 4;

fn display_width(cell: &str) -> usize {
    strip_ansi_codes(cell).width()
}

/// Renders `rows` as aligned lines, each starting with `prefix`.
pub fn format_table(prefix: &str, rows: &[Vec<String>]) -> String {
    let lines: Vec<Vec<String>> = rows
        .iter()
        .flat_map(|row| split_cells(&format!("{}{}", prefix, row.join("\t"))))
        .collect();

    // Widths of the padded cells: all but the last cell of each line.
    let measured: Vec<Vec<usize>> = lines
        .iter()
        .map(|cells| {
            cells[..cells.len() - 1]
                .iter()
                .map(|c| display_width(c))
                .collect()
        })
        .collect();

    let mut widths: Vec<Vec<usize>> = measured.iter().map(|m| vec![0; m.len()]).collect();
    layout_columns(&measured, 0, 0, measured.len(), &mut widths);

    let mut out = String::new();
    for ((cells, cell_widths), column_widths) in lines.iter().zip(&measured).zip(&widths) {
        let last = cells.len() - 1;
        for (i, cell) in cells.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                let pad = column_widths[i].saturating_sub(cell_widths[i]);
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

/// Splits one row's text into lines of cells.
fn split_cells(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.split('\t').map(String::from).collect())
        .collect()
}

/// Assigns widths for `column` to every block of consecutive lines in
/// `start..end` that has a padded cell there, then recurses into the block
/// for the next column.
fn layout_columns(
    measured: &[Vec<usize>],
    column: usize,
    start: usize,
    end: usize,
    widths: &mut [Vec<usize>],
) {
    let mut line = start;
    while line < end {
        if measured[line].len() <= column {
            line += 1;
            continue;
        }

        let block_start = line;
        let mut width = MIN_WIDTH;
        while line < end && measured[line].len() > column {
            width = width.max(measured[line][column] + PADDING);
            line += 1;
        }
        for row in &mut widths[block_start..line] {
            row[column] = width;
        }
        layout_columns(measured, column + 1, block_start, line, widths);
    }
}

/// Writes the table to `sink` and flushes it.
pub fn write_table<W: Write>(sink: &mut W, prefix: &str, rows: &[Vec<String>]) -> io::Result<()> {
    sink.write_all(format_table(prefix, rows).as_bytes())?;
    sink.flush()
}
