use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::error::{Result, RosterError};
use crate::guard::clamp_quota;
use crate::schedule::Slot;

/// One guard's weekly submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRow {
    pub name: String,
    pub available: Vec<Slot>,
    /// Desired shift count, `None` when the row never states one
    pub quota: Option<u8>,
}

/// What a single sheet cell means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Present,
    Quota(u8),
}

/// Classifies a cell: blank, a non-negative integer (the weekly quota), or a presence marker
fn parse_cell(value: &str) -> Cell {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    match trimmed.parse::<i64>() {
        // Negative numbers are neither a quota nor a presence marker
        Ok(number) if number < 0 => Cell::Empty,
        Ok(number) => Cell::Quota(clamp_quota(number)),
        Err(_) => Cell::Present,
    }
}

/// Scans the 21 weekly cells of a row
///
/// Cells are read day by day (morning, midday, night). The first integer
/// cell sets the quota and ends the scan; anything after it is ignored.
pub fn parse_row<'a, I>(name: &str, cells: I) -> PreferenceRow
where
    I: IntoIterator<Item = &'a str>,
{
    let mut available = Vec::new();
    let mut quota = None;

    for (position, value) in cells.into_iter().enumerate() {
        match parse_cell(value) {
            Cell::Empty => {}
            Cell::Quota(q) => {
                quota = Some(q);
                break;
            }
            Cell::Present => match Slot::from_position(position) {
                Ok(slot) => available.push(slot),
                // Cells past the week carry no slot
                Err(_) => debug!(guard = name, position, "ignoring presence marker past the last slot"),
            },
        }
    }

    PreferenceRow {
        name: name.trim().to_string(),
        available,
        quota,
    }
}

/// Reads the weekly preference export: a header row, then the name followed by the slot cells
///
/// Rows with an empty name are skipped. When a name appears more than once
/// the later row replaces the earlier one (re-submission).
pub fn parse_preferences<R: Read>(reader: R) -> Result<Vec<PreferenceRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // Preserve first-seen order while letting re-submissions overwrite
    let mut order: Vec<String> = Vec::new();
    let mut rows_by_name: HashMap<String, PreferenceRow> = HashMap::new();

    for result in reader.records() {
        let record = result.map_err(|e| RosterError::unavailable("preference feed", e))?;

        let name = record.get(0).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }

        let row = parse_row(name, record.iter().skip(1));
        if !rows_by_name.contains_key(&row.name) {
            order.push(row.name.clone());
        }
        rows_by_name.insert(row.name.clone(), row);
    }

    let rows: Vec<PreferenceRow> = order
        .into_iter()
        .filter_map(|name| rows_by_name.remove(&name))
        .collect();

    Ok(rows)
}

/// Loads the weekly preference export from a CSV file
pub fn load_preferences<P: AsRef<Path>>(csv_path: P) -> Result<Vec<PreferenceRow>> {
    let path = csv_path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| RosterError::unavailable(format!("preference feed {}", path.display()), e))?;
    let rows = parse_preferences(file)?;
    info!(rows = rows.len(), path = %path.display(), "loaded weekly preferences");
    Ok(rows)
}
