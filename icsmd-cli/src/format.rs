//! Markdown table pretty-printing.
//!
//! The core renders an unaligned table. This pads every cell to its column's
//! display width so the file reads well as plain text too. Anything that is
//! not a single well-formed table is rejected, and the caller keeps the
//! unaligned text.

use pulldown_cmark::{Alignment, Event, Options, Parser, Tag, TagEnd};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

/// Narrowest column, so separators stay recognizable.
const MIN_COLUMN_WIDTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("no Markdown table found")]
    NoTable,

    #[error("unexpected content outside the table")]
    ContentOutsideTable,

    #[error("table has {found} lines, expected {expected}")]
    LineCount { found: usize, expected: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Shape of the table as seen by a CommonMark parser.
struct TableShape {
    alignments: Vec<Alignment>,
    body_rows: usize,
}

fn table_shape(markdown: &str) -> Result<TableShape, FormatError> {
    let mut shape: Option<TableShape> = None;
    let mut in_table = false;

    for event in Parser::new_ext(markdown, Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Table(alignments)) => {
                if shape.is_some() {
                    return Err(FormatError::ContentOutsideTable);
                }
                in_table = true;
                shape = Some(TableShape {
                    alignments,
                    body_rows: 0,
                });
            }
            Event::End(TagEnd::Table) => in_table = false,
            Event::Start(Tag::TableRow) => {
                if let Some(shape) = shape.as_mut() {
                    shape.body_rows += 1;
                }
            }
            _ if !in_table => return Err(FormatError::ContentOutsideTable),
            _ => {}
        }
    }

    shape.ok_or(FormatError::NoTable)
}

/// Cells of one table line, split on unescaped pipes and trimmed.
fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = match line.strip_suffix('|') {
        Some(inner) if !inner.ends_with('\\') => inner,
        _ => line,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in line.chars() {
        if c == '|' && !escaped {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
        escaped = c == '\\' && !escaped;
    }
    cells.push(current.trim().to_string());

    cells
}

fn separator_cell(alignment: Alignment, width: usize) -> String {
    match alignment {
        Alignment::None => "-".repeat(width),
        Alignment::Left => format!(":{}", "-".repeat(width - 1)),
        Alignment::Right => format!("{}:", "-".repeat(width - 1)),
        Alignment::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}

fn padded(cell: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(cell.width());
    match alignment {
        Alignment::Right => format!("{}{cell}", " ".repeat(fill)),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(fill - left))
        }
        Alignment::None | Alignment::Left => format!("{cell}{}", " ".repeat(fill)),
    }
}

fn join_row(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

/// Align the columns of a single Markdown table.
///
/// Cell contents are kept byte for byte; only padding changes.
pub fn format_table(markdown: &str) -> Result<String, FormatError> {
    let shape = table_shape(markdown)?;
    let columns = shape.alignments.len();

    let lines: Vec<&str> = markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let expected = shape.body_rows + 2;
    if lines.len() != expected {
        return Err(FormatError::LineCount {
            found: lines.len(),
            expected,
        });
    }

    // Header plus body; the separator line is rebuilt.
    let rows: Vec<Vec<String>> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, line)| split_cells(line))
        .collect();

    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != columns {
            return Err(FormatError::RaggedRow {
                row,
                found: cells.len(),
                expected: columns,
            });
        }
    }

    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .map(|cells| cells[col].width())
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let pad_row = |cells: &[String]| -> Vec<String> {
        cells
            .iter()
            .zip(&widths)
            .zip(&shape.alignments)
            .map(|((cell, &width), &alignment)| padded(cell, width, alignment))
            .collect()
    };

    let mut formatted = join_row(&pad_row(&rows[0]));
    let separator: Vec<String> = widths
        .iter()
        .zip(&shape.alignments)
        .map(|(&width, &alignment)| separator_cell(alignment, width))
        .collect();
    formatted.push_str(&join_row(&separator));
    for cells in &rows[1..] {
        formatted.push_str(&join_row(&pad_row(cells)));
    }

    Ok(formatted)
}
