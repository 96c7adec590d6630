//! Columnar event table, the narrow interface to the external store
//!
//! The store holds one named table per file: an ordered set of named
//! floating-point columns, one value per event. The analysis only ever
//! reads columns, appends new named columns 1:1 with events, and rewrites
//! the file; everything else about storage lives outside the core.
//!
//! Text layout: the first non-blank line is the table name, and every
//! further non-blank line is a field name followed by one value per event.

use crate::{
    error::AnalysisError,
    event::{EventRecord, REQUIRED_FIELDS},
    numeric::Float,
};

use std::{fmt::Write as _, fs, path::Path};

/// Name of the event table produced by the reconstruction
pub const EVENT_TABLE: &str = "Tout";

/// A named, ordered columnar table of floating-point event fields
#[derive(Debug, Clone)]
pub struct ColumnarTable {
    name: String,
    columns: Vec<(String, Vec<Float>)>,
    num_events: usize,
}
//
impl ColumnarTable {
    /// Open a table from the store
    ///
    /// Fails with `StoreUnavailable` if the file cannot be read and with
    /// `MissingTable` if it holds a different table than requested.
    pub fn open(path: &Path, table_name: &str) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path).map_err(|source| AnalysisError::StoreUnavailable {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, table_name)
    }

    /// Decode a table from its text form
    pub fn parse(text: &str, table_name: &str) -> Result<Self, AnalysisError> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        let name = lines.next().unwrap_or("");
        if name != table_name {
            return Err(AnalysisError::MissingTable(table_name.to_owned()));
        }

        let mut columns: Vec<(String, Vec<Float>)> = Vec::new();
        let mut num_events = None;
        for line in lines {
            let mut items = line.split_whitespace();
            let Some(field) = items.next() else { continue };
            let values = items
                .map(str::parse::<Float>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| {
                    AnalysisError::MalformedTable(format!(
                        "field '{field}' holds a non-numeric value"
                    ))
                })?;
            match num_events {
                None => num_events = Some(values.len()),
                Some(expected) if values.len() != expected => {
                    return Err(AnalysisError::MalformedTable(format!(
                        "field '{field}' has {} values, expected {expected}",
                        values.len()
                    )));
                }
                Some(_) => {}
            }
            columns.push((field.to_owned(), values));
        }

        Ok(ColumnarTable {
            name: name.to_owned(),
            columns,
            num_events: num_events.unwrap_or(0),
        })
    }

    /// Name of this table
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of events (rows)
    pub fn num_events(&self) -> usize {
        self.num_events
    }

    /// Read-only view of a named column
    pub fn column(&self, field: &str) -> Result<&[Float], AnalysisError> {
        self.columns
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| AnalysisError::MissingField(field.to_owned()))
    }

    /// Append a new named column, one value per event
    ///
    /// A column of the same name left behind by an earlier pass is replaced,
    /// which makes repeated passes over the same store idempotent.
    pub fn append_field(&mut self, field: &str, values: Vec<Float>) {
        assert_eq!(
            values.len(),
            self.num_events,
            "appended fields carry exactly one value per event"
        );
        match self.columns.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((field.to_owned(), values)),
        }
    }

    /// Serialize the table back to its text form
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        text.push_str(&self.name);
        text.push('\n');
        for (field, values) in &self.columns {
            text.push_str(field);
            for value in values {
                let _ = write!(text, " {value}");
            }
            text.push('\n');
        }
        text
    }

    /// Rewrite the store file in place
    pub fn write_back(&self, path: &Path) -> Result<(), AnalysisError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Bind the required fields and materialize the events in table order
    ///
    /// Binding is fail-fast: a missing field is reported before any event is
    /// read.
    pub fn read_events(&self) -> Result<Vec<EventRecord>, AnalysisError> {
        let columns = REQUIRED_FIELDS
            .iter()
            .map(|field| self.column(field))
            .collect::<Result<Vec<_>, _>>()?;

        let mut events = Vec::with_capacity(self.num_events);
        for i in 0..self.num_events {
            let get = |j: usize| columns[j][i];
            events.push(EventRecord {
                beam_monitor_energy: get(0),
                momentum_x: get(1),
                momentum_y: get(2),
                momentum_z: get(3),
                vertex_x: get(4),
                vertex_y: get(5),
                vertex_z: get(6),
                preshower_energy: get(7),
                shower_energy: get(8),
                e_over_p: get(9),
                hcal_x: get(10),
                hcal_y: get(11),
                hcal_energy: get(12),
                hcal_time: get(13),
                shower_time: get(14),
            });
        }
        Ok(events)
    }
}
