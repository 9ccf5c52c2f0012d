//! Plain-text rendering of tables.

use std::fmt::Write;

use admissions::{CrossTable, FrequencyTable, Slice, Table, TableSet};

const BAR_WIDTH: usize = 30;
const NO_DATA: &str = "  (no data for this slice)\n";

/// Render a full tabulation result.
pub fn table_set(set: &TableSet) -> String {
    match set {
        TableSet::Single(s) => slice(s),
        TableSet::Faceted {
            facet_label,
            facets,
            ..
        } => {
            let mut out = String::new();
            for facet in facets {
                let _ = writeln!(
                    out,
                    "== {}: {} ({} records)",
                    facet_label, facet.value, facet.records
                );
                out.push_str(&slice(&facet.slice));
                out.push('\n');
            }
            out
        }
    }
}

fn slice(slice: &Slice) -> String {
    match slice {
        Slice::Empty => NO_DATA.to_string(),
        Slice::Table(Table::Frequency(t)) => frequency(t),
        Slice::Table(Table::Cross(t)) => cross(t),
    }
}

/// Label, count and a proportional bar per row.
pub fn frequency(table: &FrequencyTable) -> String {
    let width = label_width(table.entries.keys(), &table.label);
    let max = table.entries.values().copied().max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "  {:width$}  {:>8}", table.label, "Count");
    for (label, count) in &table.entries {
        let bar_len = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        let _ = writeln!(out, "  {:width$}  {:>8}  {}", label, count, "#".repeat(bar_len));
    }
    let _ = writeln!(out, "  {:width$}  {:>8}", "Total", table.total());
    out
}

/// A grid with row and column totals.
pub fn cross(table: &CrossTable) -> String {
    let header = format!("{} \\ {}", table.row_label, table.col_label);
    let width = label_width(table.row_labels.iter(), &header);
    let col_width = |label: &str| label.chars().count().max(6);

    let mut out = String::new();
    let _ = write!(out, "  {:width$}", header);
    for label in &table.col_labels {
        let _ = write!(out, "  {:>w$}", label, w = col_width(label));
    }
    let _ = writeln!(out, "  {:>6}", "Total");

    for ((label, counts), total) in table
        .row_labels
        .iter()
        .zip(&table.counts)
        .zip(table.row_totals())
    {
        let _ = write!(out, "  {:width$}", label);
        for (count, col) in counts.iter().zip(&table.col_labels) {
            let _ = write!(out, "  {:>w$}", count, w = col_width(col));
        }
        let _ = writeln!(out, "  {:>6}", total);
    }

    let _ = write!(out, "  {:width$}", "Total");
    for (total, col) in table.col_totals().iter().zip(&table.col_labels) {
        let _ = write!(out, "  {:>w$}", total, w = col_width(col));
    }
    let _ = writeln!(out, "  {:>6}", table.total());
    out
}

fn label_width<'a>(labels: impl Iterator<Item = &'a String>, header: &str) -> usize {
    labels
        .map(|l| l.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .chain(std::iter::once("Total".len()))
        .max()
        .unwrap_or(0)
}
