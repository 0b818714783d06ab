use crate::config::RuleConfig;
use super::types::{Day, Period, Slot};

/// Headcount the slot should reach, also its cap
pub fn required_headcount(slot: Slot, rules: &RuleConfig) -> usize {
    if slot.is_saturday_morning() {
        rules.saturday_morning_cap
    } else {
        rules.max_per_slot
    }
}

/// Slots whose assignment rules out the given slot for the same guard
///
/// Morning needs the previous night and the rest of the day free, midday needs
/// the same day's edges free, and night needs the same day and the next
/// morning free.
pub fn rest_conflicts(slot: Slot) -> Vec<Slot> {
    let day = slot.day;
    let mut conflicts = Vec::with_capacity(3);
    match slot.period {
        Period::Morning => {
            conflicts.push(Slot::new(day, Period::Midday));
            conflicts.push(Slot::new(day, Period::Night));
            if let Some(previous) = day.previous() {
                conflicts.push(Slot::new(previous, Period::Night));
            }
        }
        Period::Midday => {
            conflicts.push(Slot::new(day, Period::Morning));
            conflicts.push(Slot::new(day, Period::Night));
        }
        Period::Night => {
            conflicts.push(Slot::new(day, Period::Morning));
            conflicts.push(Slot::new(day, Period::Midday));
            if let Some(next) = day.next() {
                conflicts.push(Slot::new(next, Period::Morning));
            }
        }
    }
    conflicts
}

/// Key used by the published sheet: (period, day)
pub fn publication_key(slot: Slot) -> (Period, Day) {
    (slot.period, slot.day)
}
