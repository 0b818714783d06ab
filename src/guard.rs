use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::schedule::{Day, Period, Slot, WeekSchedule};

pub type GuardId = u32;

pub const MIN_GUARD_ID: GuardId = 10000;
pub const MAX_GUARD_ID: GuardId = 99999;
pub const MAX_SHABAT_COUNTER: u8 = 3;
pub const MAX_NIGHTS_COUNTER: u8 = 7;
pub const MAX_QUOTA: u8 = 6;

/// Long-lived attributes of a security guard, as kept in the personnel store
///
/// The counters describe past weeks and are never touched by the search;
/// they only change through [`WeeklyUpdate`] after a roster is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonnelRecord {
    id: GuardId,
    name: String,
    is_officer: bool,
    has_height_permission: bool,
    can_drive: bool,
    shabat_counter: u8,
    nights_counter: u8,
    work_shabat_night: bool,
}

impl PersonnelRecord {
    /// Builds a validated record
    ///
    /// # Errors
    /// `InvalidInput` if the name is blank, the id is not a 5-digit number,
    /// or one of the counters is out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: GuardId,
        name: &str,
        is_officer: bool,
        has_height_permission: bool,
        can_drive: bool,
        shabat_counter: u8,
        nights_counter: u8,
        work_shabat_night: bool,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::invalid(format!("guard {} has an empty name", id)));
        }
        if !(MIN_GUARD_ID..=MAX_GUARD_ID).contains(&id) {
            return Err(RosterError::invalid(format!(
                "guard id must be a 5-digit number, got {}",
                id
            )));
        }
        if shabat_counter > MAX_SHABAT_COUNTER {
            return Err(RosterError::invalid(format!(
                "shabat counter of {} must be between 0 and {}, got {}",
                name, MAX_SHABAT_COUNTER, shabat_counter
            )));
        }
        if nights_counter > MAX_NIGHTS_COUNTER {
            return Err(RosterError::invalid(format!(
                "nights counter of {} must be between 0 and {}, got {}",
                name, MAX_NIGHTS_COUNTER, nights_counter
            )));
        }

        Ok(PersonnelRecord {
            id,
            name: name.to_string(),
            is_officer,
            has_height_permission,
            can_drive,
            shabat_counter,
            nights_counter,
            work_shabat_night,
        })
    }

    pub fn id(&self) -> GuardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_officer(&self) -> bool {
        self.is_officer
    }

    pub fn has_height_permission(&self) -> bool {
        self.has_height_permission
    }

    pub fn can_drive(&self) -> bool {
        self.can_drive
    }

    pub fn shabat_counter(&self) -> u8 {
        self.shabat_counter
    }

    pub fn nights_counter(&self) -> u8 {
        self.nights_counter
    }

    pub fn works_shabat_night(&self) -> bool {
        self.work_shabat_night
    }

    pub(crate) fn set_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::invalid(format!("guard {} has an empty name", self.id)));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub(crate) fn set_officer(&mut self, value: bool) {
        self.is_officer = value;
    }

    pub(crate) fn set_height_permission(&mut self, value: bool) {
        self.has_height_permission = value;
    }

    pub(crate) fn set_can_drive(&mut self, value: bool) {
        self.can_drive = value;
    }

    pub(crate) fn set_shabat_counter(&mut self, value: u8) -> Result<()> {
        if value > MAX_SHABAT_COUNTER {
            return Err(RosterError::invalid(format!(
                "shabat counter must be between 0 and {}, got {}",
                MAX_SHABAT_COUNTER, value
            )));
        }
        self.shabat_counter = value;
        Ok(())
    }

    pub(crate) fn set_nights_counter(&mut self, value: u8) -> Result<()> {
        if value > MAX_NIGHTS_COUNTER {
            return Err(RosterError::invalid(format!(
                "nights counter must be between 0 and {}, got {}",
                MAX_NIGHTS_COUNTER, value
            )));
        }
        self.nights_counter = value;
        Ok(())
    }

    pub(crate) fn set_work_shabat_night(&mut self, value: bool) {
        self.work_shabat_night = value;
    }

    /// Applies the end-of-week counter update computed from the winning roster
    pub fn apply(&mut self, update: &WeeklyUpdate) {
        debug_assert_eq!(update.id, self.id);
        self.shabat_counter = update.shabat_counter;
        self.nights_counter = update.nights_counter;
        self.work_shabat_night = update.work_shabat_night;
    }
}

/// Counter values written back to the personnel store after publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyUpdate {
    pub id: GuardId,
    pub shabat_counter: u8,
    pub nights_counter: u8,
    pub work_shabat_night: bool,
}

impl WeeklyUpdate {
    /// Derives next week's counters from this week's assignments
    ///
    /// The Sabbath streak grows when any Sabbath-adjacent slot was worked and
    /// restarts from zero otherwise.
    pub fn from_schedule(record: &PersonnelRecord, week: &WeekSchedule) -> WeeklyUpdate {
        let shabat_counter = if week.worked_sabbath() {
            (record.shabat_counter + 1).min(MAX_SHABAT_COUNTER)
        } else {
            0
        };

        WeeklyUpdate {
            id: record.id,
            shabat_counter,
            nights_counter: week.night_count().min(MAX_NIGHTS_COUNTER),
            work_shabat_night: week.is_assigned(Slot::new(Day::SATURDAY, Period::Night)),
        }
    }
}

/// Clamps a declared weekly quota into the accepted range
pub fn clamp_quota(value: i64) -> u8 {
    value.clamp(0, MAX_QUOTA as i64) as u8
}
