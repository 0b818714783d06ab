use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::Rng;
use tracing::trace;

use crate::config::RuleConfig;
use crate::guard::GuardId;
use super::assigner::assign_slot;
use super::availability::PreferenceIndex;
use super::eligibility::is_eligible;
use super::state::SimulationState;
use super::types::{Period, Slot};

/// Declared-availability count of a slot; ordered by count, then day, then period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotDemand {
    pub available: usize,
    pub slot: Slot,
}

/// Slots in the order they are filled, least-available first
///
/// Morning and night slots share one queue and midday slots have their own;
/// two edge slots are taken for every midday slot.
#[derive(Debug, Clone)]
pub struct SlotQueue {
    edges: BinaryHeap<Reverse<SlotDemand>>,
    middays: BinaryHeap<Reverse<SlotDemand>>,
    taken: usize,
}

impl SlotQueue {
    pub fn new(preferences: &PreferenceIndex) -> Self {
        let mut edges = BinaryHeap::new();
        let mut middays = BinaryHeap::new();
        for slot in Slot::all() {
            let demand = SlotDemand {
                available: preferences.availability_count(slot),
                slot,
            };
            if slot.period == Period::Midday {
                middays.push(Reverse(demand));
            } else {
                edges.push(Reverse(demand));
            }
        }
        SlotQueue { edges, middays, taken: 0 }
    }
}

impl Iterator for SlotQueue {
    type Item = SlotDemand;

    fn next(&mut self) -> Option<SlotDemand> {
        let prefer_midday = self.taken % 3 == 2;
        let popped = if prefer_midday {
            self.middays.pop().or_else(|| self.edges.pop())
        } else {
            self.edges.pop().or_else(|| self.middays.pop())
        };
        self.taken += 1;
        popped.map(|Reverse(demand)| demand)
    }
}

/// Runs one trial: every slot is visited once and filled from its eligible guards
///
/// The caller hands in a freshly reset state; the arrangement and warnings are
/// written into it.
pub fn run_trial<R: Rng + ?Sized>(
    state: &mut SimulationState<'_>,
    preferences: &PreferenceIndex,
    rules: &RuleConfig,
    rng: &mut R,
) {
    for SlotDemand { available, slot } in SlotQueue::new(preferences) {
        let mut officers: Vec<GuardId> = Vec::new();
        let mut others: Vec<GuardId> = Vec::new();

        for &id in preferences.available(slot) {
            let Some(guard) = state.guard(id) else {
                continue;
            };
            if !is_eligible(guard, slot, rules) {
                continue;
            }
            if guard.record.is_officer() {
                officers.push(id);
            } else {
                others.push(id);
            }
        }

        let warning = assign_slot(state, slot, officers, others, rules, rng);
        trace!(%slot, available, warning = ?warning, "slot filled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::PersonnelRecord;
    use crate::schedule::{Day, SlotWarning};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn queue_interleaves_two_edges_per_midday() {
        let preferences = PreferenceIndex::new();
        let order: Vec<Slot> = SlotQueue::new(&preferences).map(|d| d.slot).collect();
        assert_eq!(order.len(), 21);
        for (i, slot) in order.iter().enumerate() {
            assert_eq!(slot.period == Period::Midday, i % 3 == 2, "position {}", i);
        }
    }

    #[test]
    fn least_available_slots_come_first() {
        let scarce = Slot::new(Day::new(4).unwrap(), Period::Night);
        let mut sparse = PreferenceIndex::new();
        for slot in Slot::all() {
            sparse.mark_available(slot, 10001);
            if slot != scarce {
                sparse.mark_available(slot, 10002);
            }
        }
        let first = SlotQueue::new(&sparse).next().unwrap();
        assert_eq!(first.slot, scarce);
        assert_eq!(first.available, 1);
    }

    #[test]
    fn trial_only_uses_declared_guards() {
        let records = vec![
            PersonnelRecord::new(10001, "Noa", true, true, true, 0, 0, false).unwrap(),
            PersonnelRecord::new(10002, "Omer", false, true, true, 0, 0, false).unwrap(),
        ];
        let sunday_midday = Slot::new(Day::SUNDAY, Period::Midday);
        let mut preferences = PreferenceIndex::new();
        preferences.mark_available(sunday_midday, 10001);
        preferences.set_quota(10001, 3);
        preferences.set_quota(10002, 3);

        let mut state = SimulationState::new(&records, &preferences);
        let mut rng = StdRng::seed_from_u64(1);
        run_trial(&mut state, &preferences, &RuleConfig::default(), &mut rng);

        assert_eq!(state.arrangement.guards(sunday_midday), &[10001]);
        assert_eq!(state.warnings.get(sunday_midday), SlotWarning::LackOfEmployees);
        for slot in Slot::all().filter(|s| *s != sunday_midday) {
            assert_eq!(state.arrangement.headcount(slot), 0);
            assert_eq!(state.warnings.get(slot), SlotWarning::NoOfficers);
        }
    }
}
