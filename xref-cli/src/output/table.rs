//! Table output formatting using the `tabled` crate

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Widest a single cell may get before it is shortened.
const MAX_CELL_WIDTH: usize = 48;

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format a simple key-value table
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::first()).with(Alignment::right()));

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }

    /// Create a simple table from rows of strings
    ///
    /// Numeric-looking columns are right-aligned.
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|cell| {
                if config.should_truncate() {
                    truncate(cell, MAX_CELL_WIDTH)
                } else {
                    cell.clone()
                }
            }));
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        for col in 0..headers.len() {
            let numeric = rows
                .iter()
                .all(|row| row.get(col).is_some_and(|c| c.parse::<u64>().is_ok()));
            if numeric {
                table.with(Modify::new(Columns::single(col)).with(Alignment::right()));
            }
        }

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }
}
