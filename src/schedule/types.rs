use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::guard::GuardId;

pub const DAYS_PER_WEEK: u8 = 7;
pub const PERIODS_PER_DAY: u8 = 3;
pub const SLOTS_PER_WEEK: usize = 21;

/// Day of the week, Sunday = 0 through Saturday = 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Day(u8);

impl Day {
    pub const SUNDAY: Day = Day(0);
    pub const FRIDAY: Day = Day(5);
    pub const SATURDAY: Day = Day(6);

    pub fn new(index: u8) -> Result<Day> {
        if index < DAYS_PER_WEEK {
            Ok(Day(index))
        } else {
            Err(RosterError::invalid(format!(
                "day index must be between 0 and 6, got {}",
                index
            )))
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (0..DAYS_PER_WEEK).map(Day)
    }

    pub fn previous(self) -> Option<Day> {
        self.0.checked_sub(1).map(Day)
    }

    pub fn next(self) -> Option<Day> {
        if self.0 + 1 < DAYS_PER_WEEK {
            Some(Day(self.0 + 1))
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "sunday",
            1 => "monday",
            2 => "tuesday",
            3 => "wednesday",
            4 => "thursday",
            5 => "friday",
            _ => "saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three daily periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Morning,
    Midday,
    Night,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Morning, Period::Midday, Period::Night];

    pub fn index(self) -> u8 {
        match self {
            Period::Morning => 0,
            Period::Midday => 1,
            Period::Night => 2,
        }
    }

    pub fn from_index(index: u8) -> Result<Period> {
        match index {
            0 => Ok(Period::Morning),
            1 => Ok(Period::Midday),
            2 => Ok(Period::Night),
            _ => Err(RosterError::invalid(format!(
                "period index must be between 0 and 2, got {}",
                index
            ))),
        }
    }

    /// Name used by the published roster sheet (the midday row is labelled "Evening")
    pub fn name(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Midday => "Evening",
            Period::Night => "Night",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (day, period) unit of coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    pub period: Period,
}

impl Slot {
    pub fn new(day: Day, period: Period) -> Slot {
        Slot { day, period }
    }

    /// Builds a slot from raw indices, rejecting anything outside the week
    pub fn from_indices(day: u8, period: u8) -> Result<Slot> {
        Ok(Slot::new(Day::new(day)?, Period::from_index(period)?))
    }

    /// Slot for the n-th cell of a weekly row (day-major, three periods per day)
    pub fn from_position(position: usize) -> Result<Slot> {
        if position >= SLOTS_PER_WEEK {
            return Err(RosterError::invalid(format!(
                "slot position must be below {}, got {}",
                SLOTS_PER_WEEK, position
            )));
        }
        Slot::from_indices(
            (position / PERIODS_PER_DAY as usize) as u8,
            (position % PERIODS_PER_DAY as usize) as u8,
        )
    }

    pub fn position(self) -> usize {
        self.day.index() as usize * PERIODS_PER_DAY as usize + self.period.index() as usize
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        Day::all().flat_map(|day| Period::ALL.into_iter().map(move |period| Slot::new(day, period)))
    }

    /// Friday midday through Saturday midday
    pub fn is_sabbath_adjacent(self) -> bool {
        matches!(
            (self.day.index(), self.period),
            (5, Period::Midday) | (5, Period::Night) | (6, Period::Morning) | (6, Period::Midday)
        )
    }

    pub fn is_saturday_morning(self) -> bool {
        self.day == Day::SATURDAY && self.period == Period::Morning
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.period)
    }
}

/// Weekly assignment matrix for one guard, one bit per slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekSchedule(u32);

impl WeekSchedule {
    const NIGHT_MASK: u32 = {
        let mut mask = 0u32;
        let mut day = 0;
        while day < DAYS_PER_WEEK as u32 {
            mask |= 1 << (day * PERIODS_PER_DAY as u32 + 2);
            day += 1;
        }
        mask
    };

    pub fn assign(&mut self, slot: Slot) {
        self.0 |= 1 << slot.position();
    }

    pub fn unassign(&mut self, slot: Slot) {
        self.0 &= !(1 << slot.position());
    }

    pub fn is_assigned(&self, slot: Slot) -> bool {
        self.0 & (1 << slot.position()) != 0
    }

    pub fn works(&self, day: Day, period: Period) -> bool {
        self.is_assigned(Slot::new(day, period))
    }

    pub fn shift_count(&self) -> u8 {
        self.0.count_ones() as u8
    }

    pub fn night_count(&self) -> u8 {
        (self.0 & Self::NIGHT_MASK).count_ones() as u8
    }

    pub fn worked_sabbath(&self) -> bool {
        Slot::all().any(|slot| slot.is_sabbath_adjacent() && self.is_assigned(slot))
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Outcome classification for one filled slot, first matching rule wins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotWarning {
    #[default]
    None,
    NoOfficers,
    LackOfEmployees,
    InsufficientDrivers,
    InsufficientHeightPermission,
}

impl SlotWarning {
    pub fn is_warning(self) -> bool {
        self != SlotWarning::None
    }

    /// Line printed under the slot in the published roster
    pub fn text(self) -> &'static str {
        match self {
            SlotWarning::None => "",
            SlotWarning::NoOfficers => "* No Officers *",
            SlotWarning::LackOfEmployees => "* Lack of Employees *",
            SlotWarning::InsufficientDrivers => "* No Enough Drivers *",
            SlotWarning::InsufficientHeightPermission => "* No Enough Height permissions *",
        }
    }
}

/// Guards assigned to every slot of the week, in assignment order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    slots: Vec<Vec<GuardId>>,
}

impl Default for Arrangement {
    fn default() -> Self {
        Arrangement {
            slots: vec![Vec::new(); SLOTS_PER_WEEK],
        }
    }
}

impl Arrangement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guards(&self, slot: Slot) -> &[GuardId] {
        &self.slots[slot.position()]
    }

    pub fn headcount(&self, slot: Slot) -> usize {
        self.slots[slot.position()].len()
    }

    pub fn contains(&self, slot: Slot, guard: GuardId) -> bool {
        self.slots[slot.position()].contains(&guard)
    }

    pub fn add(&mut self, slot: Slot, guard: GuardId) {
        let assigned = &mut self.slots[slot.position()];
        if !assigned.contains(&guard) {
            assigned.push(guard);
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(Vec::clear);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &[GuardId])> {
        Slot::all().map(move |slot| (slot, self.guards(slot)))
    }
}

/// Warning classification recorded for every slot of a trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWarnings {
    warnings: Vec<SlotWarning>,
}

impl Default for SlotWarnings {
    fn default() -> Self {
        SlotWarnings {
            warnings: vec![SlotWarning::None; SLOTS_PER_WEEK],
        }
    }
}

impl SlotWarnings {
    pub fn get(&self, slot: Slot) -> SlotWarning {
        self.warnings[slot.position()]
    }

    pub fn set(&mut self, slot: Slot, warning: SlotWarning) {
        self.warnings[slot.position()] = warning;
    }

    pub fn count(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_warning()).count()
    }

    pub fn clear(&mut self) {
        self.warnings.iter_mut().for_each(|w| *w = SlotWarning::None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_positions_cover_the_week_in_order() {
        let positions: Vec<usize> = Slot::all().map(Slot::position).collect();
        assert_eq!(positions, (0..SLOTS_PER_WEEK).collect::<Vec<_>>());
        for position in 0..SLOTS_PER_WEEK {
            assert_eq!(Slot::from_position(position).unwrap().position(), position);
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        assert!(Day::new(7).is_err());
        assert!(Period::from_index(3).is_err());
        assert!(Slot::from_indices(2, 5).is_err());
        assert!(Slot::from_position(21).is_err());
    }

    #[test]
    fn sabbath_adjacent_slots_are_the_four_weekend_slots() {
        let adjacent: Vec<Slot> = Slot::all().filter(|s| s.is_sabbath_adjacent()).collect();
        assert_eq!(
            adjacent,
            vec![
                Slot::new(Day::FRIDAY, Period::Midday),
                Slot::new(Day::FRIDAY, Period::Night),
                Slot::new(Day::SATURDAY, Period::Morning),
                Slot::new(Day::SATURDAY, Period::Midday),
            ]
        );
    }

    #[test]
    fn week_schedule_counts_shifts_and_nights() {
        let mut week = WeekSchedule::default();
        week.assign(Slot::new(Day::SUNDAY, Period::Morning));
        week.assign(Slot::new(Day::SUNDAY, Period::Night));
        week.assign(Slot::new(Day::SATURDAY, Period::Night));
        assert_eq!(week.shift_count(), 3);
        assert_eq!(week.night_count(), 2);
        assert!(!week.worked_sabbath());

        week.assign(Slot::new(Day::FRIDAY, Period::Night));
        assert!(week.worked_sabbath());

        week.unassign(Slot::new(Day::SUNDAY, Period::Night));
        assert!(!week.works(Day::SUNDAY, Period::Night));
        assert_eq!(week.night_count(), 2);

        week.reset();
        assert_eq!(week.shift_count(), 0);
    }

    #[test]
    fn arrangement_ignores_duplicate_members() {
        let mut arrangement = Arrangement::new();
        let slot = Slot::new(Day::SUNDAY, Period::Midday);
        arrangement.add(slot, 10001);
        arrangement.add(slot, 10001);
        arrangement.add(slot, 10002);
        assert_eq!(arrangement.guards(slot), &[10001, 10002]);
        arrangement.clear();
        assert_eq!(arrangement.headcount(slot), 0);
    }
}
