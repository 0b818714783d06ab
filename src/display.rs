use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Result, RosterError};
use crate::guard::{GuardId, PersonnelRecord};
use crate::schedule::slot_utils::publication_key;
use crate::schedule::{Day, Period, Slot, TrialResult};

const TWELVE_HOUR_MARK: &str = " * 12 *";

/// Finished roster text, one block per (period, day)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPublication {
    blocks: BTreeMap<(Period, Day), String>,
    pub shortage_count: usize,
    pub warning_count: usize,
}

/// Formats a guard's line, marking 12-hour extensions
pub fn format_guard_name(name: &str, extended: bool) -> String {
    if extended {
        format!("{}{}", name, TWELVE_HOUR_MARK)
    } else {
        name.to_string()
    }
}

impl RosterPublication {
    /// Builds the text blocks for a winning trial
    ///
    /// Each block lists the assigned names, one per line, then the slot's
    /// warning line. The midday warning is left blank when 12-hour
    /// extensions from both the morning and the night would complete it.
    pub fn from_trial(result: &TrialResult, records: &[PersonnelRecord]) -> Self {
        let names: BTreeMap<GuardId, &str> = records.iter().map(|r| (r.id(), r.name())).collect();
        let mut blocks = BTreeMap::new();

        for slot in Slot::all() {
            let backfill = result.backfill.get(slot.day.index() as usize);
            let mut block = String::new();

            for &guard in result.arrangement.guards(slot) {
                let extended = backfill.map(|b| b.is_extended(slot, guard)).unwrap_or(false);
                let name = names.get(&guard).copied().unwrap_or("?");
                block.push_str(&format_guard_name(name, extended));
                block.push('\n');
            }

            let suppressed = slot.period == Period::Midday
                && backfill.map(|b| b.covers_shortage).unwrap_or(false);
            if !suppressed {
                let warning = result.warnings.get(slot);
                if warning.is_warning() {
                    block.push_str(warning.text());
                    block.push('\n');
                }
            }

            blocks.insert(publication_key(slot), block);
        }

        RosterPublication {
            blocks,
            shortage_count: result.shortage_count,
            warning_count: result.warning_count,
        }
    }

    pub fn block(&self, period: Period, day: Day) -> &str {
        self.blocks.get(&(period, day)).map(String::as_str).unwrap_or("")
    }

    /// One JSON row per period, keyed by day name, matching the shared sheet layout
    pub fn sheet_rows(&self) -> Vec<Value> {
        Period::ALL
            .iter()
            .map(|&period| {
                let mut row = serde_json::Map::new();
                row.insert("shift".to_string(), json!(period.name()));
                for day in Day::all() {
                    row.insert(day.name().to_string(), json!(self.block(period, day)));
                }
                json!({ "chart1": Value::Object(row) })
            })
            .collect()
    }

    /// Plain-text rendering, periods in sheet order
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for period in Period::ALL {
            out.push_str(&format!("** {} **\n", period.name()));
            for day in Day::all() {
                out.push_str(&format!("-- {} --\n", day.name()));
                out.push_str(self.block(period, day));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Shortage: {}, warnings: {}\n",
            self.shortage_count, self.warning_count
        ));
        out
    }
}

/// Writes the roster text to a file with a generation timestamp
pub fn write_roster_to_file(publication: &RosterPublication, filename: &Path) -> Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "# Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC"))?;
    write!(file, "{}", publication.render_text())?;
    Ok(())
}

/// Hands the finished roster to whatever displays it
pub trait RosterPublisher {
    fn publish(&self, publication: &RosterPublication) -> Result<()>;
}

/// Publishes to a directory: `roster.txt` plus the sheet rows as `roster.json`
#[derive(Debug, Clone)]
pub struct FilePublisher {
    dir: PathBuf,
}

impl FilePublisher {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        FilePublisher {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl RosterPublisher for FilePublisher {
    fn publish(&self, publication: &RosterPublication) -> Result<()> {
        let text_path = self.dir.join("roster.txt");
        let json_path = self.dir.join("roster.json");

        write_roster_to_file(publication, &text_path)
            .map_err(|e| RosterError::Publication(format!("{}: {}", text_path.display(), e)))?;

        let rows = serde_json::to_string_pretty(&publication.sheet_rows())?;
        std::fs::write(&json_path, rows)
            .map_err(|e| RosterError::Publication(format!("{}: {}", json_path.display(), e)))?;

        info!(dir = %self.dir.display(), "roster published");
        Ok(())
    }
}
