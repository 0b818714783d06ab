use std::collections::HashMap;

use crate::guard::{GuardId, PersonnelRecord};
use super::availability::PreferenceIndex;
use super::types::{Arrangement, Slot, SlotWarnings, WeekSchedule};

/// Per-trial view of one guard: the long-lived record plus this week's schedule
#[derive(Debug, Clone)]
pub struct GuardWeek<'a> {
    pub record: &'a PersonnelRecord,
    pub quota: u8,
    pub schedule: WeekSchedule,
}

impl<'a> GuardWeek<'a> {
    pub fn id(&self) -> GuardId {
        self.record.id()
    }

    pub fn shift_count(&self) -> u8 {
        self.schedule.shift_count()
    }

    /// Nights counted against the rolling cap: last week's plus those assigned so far
    pub fn rolling_nights(&self) -> u8 {
        self.record.nights_counter().saturating_add(self.schedule.night_count())
    }
}

/// Everything a trial mutates, kept apart from the personnel records
///
/// A fresh state is built (or [`reset`](SimulationState::reset)) before each
/// trial so no assignment leaks from one trial into the next.
#[derive(Debug, Clone)]
pub struct SimulationState<'a> {
    guards: HashMap<GuardId, GuardWeek<'a>>,
    pub arrangement: Arrangement,
    pub warnings: SlotWarnings,
}

impl<'a> SimulationState<'a> {
    pub fn new(records: &'a [PersonnelRecord], preferences: &PreferenceIndex) -> Self {
        let guards = records
            .iter()
            .map(|record| {
                (
                    record.id(),
                    GuardWeek {
                        record,
                        quota: preferences.quota(record.id()),
                        schedule: WeekSchedule::default(),
                    },
                )
            })
            .collect();

        SimulationState {
            guards,
            arrangement: Arrangement::new(),
            warnings: SlotWarnings::default(),
        }
    }

    /// Clears every weekly schedule, the arrangement and the warnings
    pub fn reset(&mut self) {
        for guard in self.guards.values_mut() {
            guard.schedule.reset();
        }
        self.arrangement.clear();
        self.warnings.clear();
    }

    pub fn guard(&self, id: GuardId) -> Option<&GuardWeek<'a>> {
        self.guards.get(&id)
    }

    pub fn guards(&self) -> impl Iterator<Item = &GuardWeek<'a>> {
        self.guards.values()
    }

    /// Marks the guard on the slot and adds them to the arrangement
    pub fn assign(&mut self, slot: Slot, id: GuardId) {
        if let Some(guard) = self.guards.get_mut(&id) {
            guard.schedule.assign(slot);
            self.arrangement.add(slot, id);
        }
    }

    /// Weekly schedules of every guard, keyed by id
    pub fn schedules(&self) -> HashMap<GuardId, WeekSchedule> {
        self.guards
            .iter()
            .map(|(id, guard)| (*id, guard.schedule))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, Period, SlotWarning};

    #[test]
    fn reset_clears_schedules_regardless_of_prior_state() {
        let records = vec![
            PersonnelRecord::new(10001, "Noa", true, true, true, 2, 3, false).unwrap(),
            PersonnelRecord::new(10002, "Omer", false, true, false, 0, 0, false).unwrap(),
        ];
        let preferences = PreferenceIndex::new();
        let mut state = SimulationState::new(&records, &preferences);

        let slot = Slot::new(Day::SUNDAY, Period::Night);
        state.assign(slot, 10001);
        state.assign(Slot::new(Day::FRIDAY, Period::Midday), 10002);
        state.warnings.set(slot, SlotWarning::LackOfEmployees);
        assert_eq!(state.guard(10001).unwrap().rolling_nights(), 4);

        state.reset();
        for guard in state.guards() {
            assert_eq!(guard.shift_count(), 0);
            assert!(Slot::all().all(|s| !guard.schedule.is_assigned(s)));
        }
        assert_eq!(state.arrangement.headcount(slot), 0);
        assert_eq!(state.warnings.count(), 0);
        // Historical counters are untouched
        assert_eq!(state.guard(10001).unwrap().record.shabat_counter(), 2);
        assert_eq!(state.guard(10001).unwrap().rolling_nights(), 3);
    }

    #[test]
    fn unknown_guards_are_not_assigned() {
        let records = vec![PersonnelRecord::new(10001, "Noa", true, true, true, 0, 0, false).unwrap()];
        let preferences = PreferenceIndex::new();
        let mut state = SimulationState::new(&records, &preferences);
        let slot = Slot::new(Day::SUNDAY, Period::Morning);
        state.assign(slot, 55555);
        assert_eq!(state.arrangement.headcount(slot), 0);
    }
}
