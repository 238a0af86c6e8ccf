//! Markdown table rendering.

use crate::event::{AttributePresence, Event};

/// A table column: header, whether the dataset has it, how to fill a cell.
struct Column {
    header: &'static str,
    present: fn(&AttributePresence) -> bool,
    cell: fn(&Event) -> String,
}

/// Columns in display order.
static COLUMNS: [Column; 5] = [
    Column {
        header: "Date",
        present: AttributePresence::has_time,
        cell: date_cell,
    },
    Column {
        header: "Time",
        present: AttributePresence::has_time,
        cell: time_cell,
    },
    Column {
        header: "Location",
        present: |p| p.location,
        cell: |e| text_cell(e.location()),
    },
    Column {
        header: "Event",
        present: |p| p.summary,
        cell: |e| text_cell(e.summary()),
    },
    Column {
        header: "Description",
        present: |p| p.description,
        cell: |e| text_cell(e.description()),
    },
];

/// A literal `|` would end the cell early.
fn text_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn date_cell(event: &Event) -> String {
    event.start().format("%Y-%m-%d").to_string()
}

fn time_cell(event: &Event) -> String {
    format!(
        "{}-{}",
        event.start().format("%H:%M"),
        event.end().format("%H:%M")
    )
}

fn row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cells: Vec<S> = cells.into_iter().collect();
    let joined = cells
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" | ");
    format!("| {joined} |\n")
}

/// Render events as a pipe-delimited Markdown table.
///
/// Only columns whose attribute appears somewhere in the dataset are
/// emitted, and every row gets a cell for each of them (empty if this event
/// lacks the value). Rows follow the order of `events`. The output is left
/// unaligned.
pub fn render<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    presence: &AttributePresence,
) -> String {
    let columns: Vec<&Column> = COLUMNS.iter().filter(|c| (c.present)(presence)).collect();

    let mut markdown = row(columns.iter().map(|c| c.header));
    markdown.push_str(&row(columns.iter().map(|c| "-".repeat(c.header.len()))));

    for event in events {
        markdown.push_str(&row(columns.iter().map(|c| (c.cell)(event))));
    }

    markdown
}
