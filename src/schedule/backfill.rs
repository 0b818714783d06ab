use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::guard::GuardId;
use super::availability::PreferenceIndex;
use super::types::{Arrangement, Day, Period, Slot};

/// Guards who could stretch into a 12-hour shift to cover one day's midday gap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoonBackfill {
    pub midday_headcount: usize,
    /// Morning guards who also declared midday
    pub from_morning: Vec<GuardId>,
    /// Night guards who also declared midday
    pub from_night: Vec<GuardId>,
    /// Whether both extensions bring midday to full strength
    pub covers_shortage: bool,
}

impl NoonBackfill {
    /// Seats still missing at midday once the smaller of the two extensions is counted
    pub fn remaining_shortage(&self, rules: &RuleConfig) -> usize {
        rules
            .max_per_slot
            .saturating_sub(self.midday_headcount)
            .saturating_sub(self.from_morning.len().min(self.from_night.len()))
    }

    pub fn is_extended(&self, slot: Slot, guard: GuardId) -> bool {
        match slot.period {
            Period::Morning => self.from_morning.contains(&guard),
            Period::Night => self.from_night.contains(&guard),
            Period::Midday => false,
        }
    }
}

/// Looks for 12-hour extensions on one day
///
/// Reporting only: the arrangement is not changed and rest or quota rules
/// are not re-checked for the suggested extensions.
pub fn analyze_day(
    day: Day,
    arrangement: &Arrangement,
    preferences: &PreferenceIndex,
    rules: &RuleConfig,
) -> NoonBackfill {
    let midday = Slot::new(day, Period::Midday);
    let midday_headcount = arrangement.headcount(midday);
    let missing = rules.max_per_slot.saturating_sub(midday_headcount);

    let pick = |period: Period| -> Vec<GuardId> {
        arrangement
            .guards(Slot::new(day, period))
            .iter()
            .copied()
            .filter(|guard| preferences.is_available(midday, *guard))
            .take(missing)
            .collect()
    };

    let (from_morning, from_night) = if missing > 0 {
        (pick(Period::Morning), pick(Period::Night))
    } else {
        (Vec::new(), Vec::new())
    };

    let covers_shortage = midday_headcount + from_morning.len() >= rules.max_per_slot
        && midday_headcount + from_night.len() >= rules.max_per_slot;

    NoonBackfill {
        midday_headcount,
        from_morning,
        from_night,
        covers_shortage,
    }
}

/// Runs [`analyze_day`] for the whole week
pub fn analyze_week(
    arrangement: &Arrangement,
    preferences: &PreferenceIndex,
    rules: &RuleConfig,
) -> Vec<NoonBackfill> {
    Day::all()
        .map(|day| analyze_day(day, arrangement, preferences, rules))
        .collect()
}
