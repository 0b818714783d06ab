use crate::config::RuleConfig;
use super::slot_utils::rest_conflicts;
use super::state::GuardWeek;
use super::types::{Day, Period, Slot};

/// Why a guard cannot take a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    SabbathStreak,
    WorkedSaturdayNight,
    NoRest,
    NightCap,
    QuotaReached,
    WeeklyCap,
}

/// Checks whether the guard may take the slot given what they already hold this week
///
/// Returns the first rule that blocks the assignment. Pure: nothing is mutated.
pub fn check_eligibility(guard: &GuardWeek<'_>, slot: Slot, rules: &RuleConfig) -> Result<(), Ineligibility> {
    let record = guard.record;

    // Too many Sabbaths in a row
    if slot.is_sabbath_adjacent() && record.shabat_counter() >= rules.max_sabbath_streak {
        return Err(Ineligibility::SabbathStreak);
    }

    // Worked last Saturday night, so no Sunday morning
    if slot.period == Period::Morning && slot.day == Day::SUNDAY && record.works_shabat_night() {
        return Err(Ineligibility::WorkedSaturdayNight);
    }

    if rest_conflicts(slot)
        .into_iter()
        .any(|other| guard.schedule.is_assigned(other))
    {
        return Err(Ineligibility::NoRest);
    }

    if slot.period == Period::Night && guard.rolling_nights() >= rules.max_nights {
        return Err(Ineligibility::NightCap);
    }

    let current = guard.shift_count();
    if current == guard.quota {
        return Err(Ineligibility::QuotaReached);
    }
    if current >= rules.max_shifts {
        return Err(Ineligibility::WeeklyCap);
    }

    Ok(())
}

/// Convenience wrapper over [`check_eligibility`]
pub fn is_eligible(guard: &GuardWeek<'_>, slot: Slot, rules: &RuleConfig) -> bool {
    check_eligibility(guard, slot, rules).is_ok()
}
