use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::RuleConfig;
use crate::guard::GuardId;
use super::slot_utils::required_headcount;
use super::state::SimulationState;
use super::types::{Slot, SlotWarning};

/// Officers placed on a slot before anyone else
const LEAD_OFFICERS: usize = 2;

/// Fills one slot from its eligible candidates and classifies the result
///
/// Both lists are shuffled first so equal candidates are picked at random.
/// Up to two officers go in, then non-officers up to the cap, then extra
/// officers if seats remain. Officers count as drivers and as height-permitted
/// staff without looking at their own flags.
pub fn assign_slot<R: Rng + ?Sized>(
    state: &mut SimulationState<'_>,
    slot: Slot,
    mut officers: Vec<GuardId>,
    mut others: Vec<GuardId>,
    rules: &RuleConfig,
    rng: &mut R,
) -> SlotWarning {
    officers.shuffle(rng);
    others.shuffle(rng);

    let capacity = required_headcount(slot, rules);
    let officers_available = officers.len();

    // Lead officers
    let lead = officers_available.min(LEAD_OFFICERS).min(capacity);
    for &officer in &officers[..lead] {
        state.assign(slot, officer);
    }
    let mut drivers = lead;
    let mut height_permitted = lead;

    // Non-officers up to the cap
    for &guard in &others {
        if state.arrangement.headcount(slot) >= capacity {
            break;
        }
        state.assign(slot, guard);
        if let Some(week) = state.guard(guard) {
            if week.record.can_drive() {
                drivers += 1;
            }
            if week.record.has_height_permission() {
                height_permitted += 1;
            }
        }
    }

    // Remaining seats go to the officers left over
    let shortage = capacity.saturating_sub(state.arrangement.headcount(slot));
    if shortage > 0 && officers_available > LEAD_OFFICERS {
        let end = (shortage + LEAD_OFFICERS).min(officers_available);
        for &officer in &officers[LEAD_OFFICERS..end] {
            state.assign(slot, officer);
            drivers += 1;
            height_permitted += 1;
        }
    }

    let headcount = state.arrangement.headcount(slot);
    let warning = if officers_available == 0 {
        SlotWarning::NoOfficers
    } else if headcount < capacity {
        SlotWarning::LackOfEmployees
    } else if drivers < rules.min_drivers {
        SlotWarning::InsufficientDrivers
    } else if height_permitted < rules.min_height {
        SlotWarning::InsufficientHeightPermission
    } else {
        SlotWarning::None
    };

    state.warnings.set(slot, warning);
    warning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::PersonnelRecord;
    use crate::schedule::availability::PreferenceIndex;
    use crate::schedule::{Day, Period};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn officer(id: GuardId) -> PersonnelRecord {
        PersonnelRecord::new(id, &format!("officer-{}", id), true, false, false, 0, 0, false).unwrap()
    }

    fn guard(id: GuardId, drive: bool, height: bool) -> PersonnelRecord {
        PersonnelRecord::new(id, &format!("guard-{}", id), false, height, drive, 0, 0, false).unwrap()
    }

    fn ids(records: &[PersonnelRecord], officers: bool) -> Vec<GuardId> {
        records
            .iter()
            .filter(|r| r.is_officer() == officers)
            .map(|r| r.id())
            .collect()
    }

    fn run(records: &[PersonnelRecord], slot: Slot) -> (SlotWarning, usize) {
        let preferences = PreferenceIndex::new();
        let mut state = SimulationState::new(records, &preferences);
        let mut rng = StdRng::seed_from_u64(7);
        let warning = assign_slot(
            &mut state,
            slot,
            ids(records, true),
            ids(records, false),
            &RuleConfig::default(),
            &mut rng,
        );
        (warning, state.arrangement.headcount(slot))
    }

    fn monday_morning() -> Slot {
        Slot::new(Day::new(1).unwrap(), Period::Morning)
    }

    #[test]
    fn single_officer_is_lack_of_employees() {
        let records = vec![officer(10001)];
        assert_eq!(run(&records, monday_morning()), (SlotWarning::LackOfEmployees, 1));
    }

    #[test]
    fn no_officers_wins_over_everything() {
        let records: Vec<PersonnelRecord> = (0..3).map(|i| guard(10010 + i, false, false)).collect();
        assert_eq!(run(&records, monday_morning()), (SlotWarning::NoOfficers, 3));
    }

    #[test]
    fn officers_backfill_remaining_seats() {
        let records: Vec<PersonnelRecord> = (0..7).map(|i| officer(10001 + i)).collect();
        assert_eq!(run(&records, monday_morning()), (SlotWarning::None, 5));
        assert_eq!(
            run(&records, Slot::new(Day::SATURDAY, Period::Morning)),
            (SlotWarning::None, 4)
        );
    }

    #[test]
    fn drivers_and_height_are_checked_in_order() {
        // One officer counts once for each requirement
        let mut records = vec![officer(10001)];
        records.extend((0..4).map(|i| guard(10010 + i, false, true)));
        assert_eq!(run(&records, monday_morning()), (SlotWarning::InsufficientDrivers, 5));

        let mut records = vec![officer(10001)];
        records.extend((0..4).map(|i| guard(10010 + i, true, false)));
        assert_eq!(
            run(&records, monday_morning()),
            (SlotWarning::InsufficientHeightPermission, 5)
        );

        let mut records = vec![officer(10001), officer(10002)];
        records.extend((0..3).map(|i| guard(10010 + i, false, false)));
        assert_eq!(run(&records, monday_morning()), (SlotWarning::None, 5));
    }

    #[test]
    fn non_officers_fill_before_extra_officers() {
        let mut records: Vec<PersonnelRecord> = (0..4).map(|i| officer(10001 + i)).collect();
        records.extend((0..3).map(|i| guard(10010 + i, true, true)));
        let preferences = PreferenceIndex::new();
        let mut state = SimulationState::new(&records, &preferences);
        let mut rng = StdRng::seed_from_u64(3);
        let slot = monday_morning();
        assign_slot(
            &mut state,
            slot,
            ids(&records, true),
            ids(&records, false),
            &RuleConfig::default(),
            &mut rng,
        );
        let assigned = state.arrangement.guards(slot);
        let officer_count = assigned
            .iter()
            .filter(|id| state.guard(**id).unwrap().record.is_officer())
            .count();
        assert_eq!(assigned.len(), 5);
        assert_eq!(officer_count, 2);
    }
}
