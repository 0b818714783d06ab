use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, RosterError};
use crate::guard::{GuardId, PersonnelRecord, WeeklyUpdate};

const HEADERS: [&str; 8] = [
    "eID",
    "E_Name",
    "Is_Officer",
    "Has_Height",
    "Can_Drive",
    "Shabat_Night",
    "Shabat_Count",
    "Nights_Count",
];

/// Long-lived personnel records, read before a run and updated after publishing
pub trait PersonnelStore {
    fn load(&self) -> Result<Vec<PersonnelRecord>>;

    /// Writes next week's counters for every guard in `updates`
    fn apply_week(&mut self, updates: &[WeeklyUpdate]) -> Result<()>;
}

/// A column of the personnel file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreField {
    Name,
    IsOfficer,
    HasHeight,
    CanDrive,
    ShabatNight,
    ShabatCount,
    NightsCount,
}

impl StoreField {
    pub fn column(self) -> &'static str {
        match self {
            StoreField::Name => "E_Name",
            StoreField::IsOfficer => "Is_Officer",
            StoreField::HasHeight => "Has_Height",
            StoreField::CanDrive => "Can_Drive",
            StoreField::ShabatNight => "Shabat_Night",
            StoreField::ShabatCount => "Shabat_Count",
            StoreField::NightsCount => "Nights_Count",
        }
    }
}

/// Raw row as found in the file, validated into a [`PersonnelRecord`]
#[derive(Debug, Deserialize)]
struct StoreRow {
    #[serde(rename = "eID")]
    id: String,
    #[serde(rename = "E_Name")]
    name: String,
    #[serde(rename = "Is_Officer")]
    is_officer: String,
    #[serde(rename = "Has_Height")]
    has_height: String,
    #[serde(rename = "Can_Drive")]
    can_drive: String,
    #[serde(rename = "Shabat_Night")]
    shabat_night: String,
    #[serde(rename = "Shabat_Count")]
    shabat_count: String,
    #[serde(rename = "Nights_Count")]
    nights_count: String,
}

impl StoreRow {
    fn into_record(self) -> Result<PersonnelRecord> {
        let id: GuardId = parse_number(&self.id, "eID")?;
        PersonnelRecord::new(
            id,
            &self.name,
            parse_bool(&self.is_officer, "Is_Officer")?,
            parse_bool(&self.has_height, "Has_Height")?,
            parse_bool(&self.can_drive, "Can_Drive")?,
            parse_number(&self.shabat_count, "Shabat_Count")?,
            parse_number(&self.nights_count, "Nights_Count")?,
            parse_bool(&self.shabat_night, "Shabat_Night")?,
        )
    }
}

/// Parses a boolean cell from the usual spreadsheet spellings
fn parse_bool(value: &str, column: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(RosterError::invalid(format!(
            "{} expects a boolean, got {:?}",
            column, other
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, column: &str) -> Result<T> {
    let trimmed = value.trim();
    // Spreadsheet exports sometimes write integers as "3.0"
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    trimmed
        .parse()
        .map_err(|_| RosterError::invalid(format!("{} expects an integer, got {:?}", column, value)))
}

/// Reads personnel records, rejecting malformed rows and duplicate ids
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PersonnelRecord>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    let mut ids = HashSet::new();

    for result in reader.deserialize::<StoreRow>() {
        let row = result.map_err(|e| RosterError::invalid(format!("malformed personnel row: {}", e)))?;
        let record = row.into_record()?;
        if !ids.insert(record.id()) {
            return Err(RosterError::invalid(format!("duplicate guard id {}", record.id())));
        }
        records.push(record);
    }

    Ok(records)
}

/// Writes personnel records with the standard header
pub fn write_records<W: Write>(writer: W, records: &[PersonnelRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADERS)?;

    for record in records {
        wtr.write_record(&[
            record.id().to_string(),
            record.name().to_string(),
            record.is_officer().to_string(),
            record.has_height_permission().to_string(),
            record.can_drive().to_string(),
            record.works_shabat_night().to_string(),
            record.shabat_counter().to_string(),
            record.nights_counter().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Personnel store kept in a CSV file
#[derive(Debug, Clone)]
pub struct CsvPersonnelStore {
    path: PathBuf,
}

impl CsvPersonnelStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvPersonnelStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with the given records
    pub fn save(&self, records: &[PersonnelRecord]) -> Result<()> {
        let file = File::create(&self.path)?;
        write_records(file, records)
    }

    /// Appends a new guard; the id must not be taken
    pub fn add_guard(&mut self, record: PersonnelRecord) -> Result<()> {
        let mut records = self.load()?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(RosterError::invalid(format!("guard id {} already exists", record.id())));
        }
        records.push(record);
        self.save(&records)
    }

    /// Sets one column of one guard, validating the value for that column
    pub fn update_field(&mut self, id: GuardId, field: StoreField, value: &str) -> Result<()> {
        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RosterError::invalid(format!("no guard with id {}", id)))?;

        match field {
            StoreField::Name => record.set_name(value)?,
            StoreField::IsOfficer => record.set_officer(parse_bool(value, field.column())?),
            StoreField::HasHeight => record.set_height_permission(parse_bool(value, field.column())?),
            StoreField::CanDrive => record.set_can_drive(parse_bool(value, field.column())?),
            StoreField::ShabatNight => record.set_work_shabat_night(parse_bool(value, field.column())?),
            StoreField::ShabatCount => record.set_shabat_counter(parse_number(value, field.column())?)?,
            StoreField::NightsCount => record.set_nights_counter(parse_number(value, field.column())?)?,
        }

        self.save(&records)
    }

    /// Deletes the listed guards; unknown ids are ignored
    pub fn remove_guards(&mut self, ids: &[GuardId]) -> Result<()> {
        let mut records = self.load()?;
        records.retain(|r| !ids.contains(&r.id()));
        self.save(&records)
    }

    /// Resets a counter column to zero (or false) for everyone
    pub fn reset_counter(&mut self, field: StoreField) -> Result<()> {
        if !matches!(
            field,
            StoreField::ShabatCount | StoreField::NightsCount | StoreField::ShabatNight
        ) {
            return Err(RosterError::invalid(format!(
                "{} is not a counter column",
                field.column()
            )));
        }

        let mut records = self.load()?;
        for record in &mut records {
            match field {
                StoreField::ShabatCount => record.set_shabat_counter(0)?,
                StoreField::NightsCount => record.set_nights_counter(0)?,
                _ => record.set_work_shabat_night(false),
            }
        }
        self.save(&records)
    }
}

impl PersonnelStore for CsvPersonnelStore {
    fn load(&self) -> Result<Vec<PersonnelRecord>> {
        let file = File::open(&self.path).map_err(|e| {
            RosterError::unavailable(format!("personnel store {}", self.path.display()), e)
        })?;
        let records = read_records(file)?;
        info!(guards = records.len(), path = %self.path.display(), "loaded personnel records");
        Ok(records)
    }

    fn apply_week(&mut self, updates: &[WeeklyUpdate]) -> Result<()> {
        let mut records = self.load()?;
        for record in &mut records {
            if let Some(update) = updates.iter().find(|u| u.id == record.id()) {
                record.apply(update);
            }
        }
        self.save(&records)?;
        info!(updated = updates.len(), "personnel counters updated");
        Ok(())
    }
}
