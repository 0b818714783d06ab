use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::guard::{GuardId, PersonnelRecord, WeeklyUpdate};
use super::availability::PreferenceIndex;
use super::backfill::{analyze_week, NoonBackfill};
use super::slot_utils::required_headcount;
use super::types::{Arrangement, Period, Slot, SlotWarnings, WeekSchedule, SLOTS_PER_WEEK};

/// Everything kept from one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub arrangement: Arrangement,
    pub warnings: SlotWarnings,
    pub backfill: Vec<NoonBackfill>,
    /// Weekly schedule of each guard at the end of the trial
    pub schedules: HashMap<GuardId, WeekSchedule>,
    pub shortage_count: usize,
    pub warning_count: usize,
}

impl TrialResult {
    /// Next week's counters for every record, in record order
    ///
    /// Guards missing from `schedules` are treated as having worked nothing.
    pub fn weekly_updates(&self, records: &[PersonnelRecord]) -> Vec<WeeklyUpdate> {
        records
            .iter()
            .map(|record| {
                let week = self.schedules.get(&record.id()).copied().unwrap_or_default();
                WeeklyUpdate::from_schedule(record, &week)
            })
            .collect()
    }
}

/// Two-factor quality of a trial, rounded to three decimals
///
/// Stored in thousandths so it can be hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateScore {
    coverage_milli: i64,
    compliance_milli: i64,
}

impl CandidateScore {
    pub fn new(shortage_count: usize, warning_count: usize) -> Self {
        let coverage = 1.0 - shortage_count as f64 / 100.0;
        let compliance = (SLOTS_PER_WEEK as f64 - warning_count as f64) / SLOTS_PER_WEEK as f64;
        CandidateScore {
            coverage_milli: (coverage * 1000.0).round() as i64,
            compliance_milli: (compliance * 1000.0).round() as i64,
        }
    }

    pub fn coverage(&self) -> f64 {
        self.coverage_milli as f64 / 1000.0
    }

    pub fn compliance(&self) -> f64 {
        self.compliance_milli as f64 / 1000.0
    }

    /// Ranking key: coverage plus compliance
    pub fn total_milli(&self) -> i64 {
        self.coverage_milli + self.compliance_milli
    }

    pub fn total(&self) -> f64 {
        self.total_milli() as f64 / 1000.0
    }
}

/// Seats left empty across the week
///
/// Edge slots count against their required headcount; a midday slot counts
/// against five minus the 12-hour extensions available from both sides.
///
/// Saturday morning counts against its cap of four, not five, so a week with
/// every edge slot empty reports one seat fewer than a flat five-per-slot
/// count would. The offset is the same for every trial and does not change
/// which roster wins.
pub fn shortage_count(arrangement: &Arrangement, backfill: &[NoonBackfill], rules: &RuleConfig) -> usize {
    Slot::all()
        .map(|slot| match slot.period {
            Period::Midday => backfill
                .get(slot.day.index() as usize)
                .map(|day| day.remaining_shortage(rules))
                .unwrap_or_else(|| rules.max_per_slot.saturating_sub(arrangement.headcount(slot))),
            _ => required_headcount(slot, rules).saturating_sub(arrangement.headcount(slot)),
        })
        .sum()
}

/// Scores a finished trial and packages it for the optimizer
pub fn evaluate(
    arrangement: Arrangement,
    warnings: SlotWarnings,
    schedules: HashMap<GuardId, WeekSchedule>,
    preferences: &PreferenceIndex,
    rules: &RuleConfig,
) -> (CandidateScore, TrialResult) {
    let backfill = analyze_week(&arrangement, preferences, rules);
    let shortage = shortage_count(&arrangement, &backfill, rules);
    let warning_count = warnings.count();

    let result = TrialResult {
        arrangement,
        warnings,
        backfill,
        schedules,
        shortage_count: shortage,
        warning_count,
    };
    (CandidateScore::new(shortage, warning_count), result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, SlotWarning};

    #[test]
    fn perfect_week_scores_two() {
        let score = CandidateScore::new(0, 0);
        assert_eq!(score.total_milli(), 2000);
        assert_eq!(score.coverage(), 1.0);
        assert_eq!(score.compliance(), 1.0);
    }

    #[test]
    fn scores_round_to_three_decimals() {
        let score = CandidateScore::new(7, 1);
        assert_eq!(score.coverage(), 0.93);
        // 20 / 21 = 0.95238...
        assert_eq!(score.compliance(), 0.952);
        assert_eq!(CandidateScore::new(7, 1), score);
    }

    #[test]
    fn empty_week_counts_every_seat() {
        let rules = RuleConfig::default();
        let arrangement = Arrangement::new();
        let preferences = PreferenceIndex::new();
        let backfill = analyze_week(&arrangement, &preferences, &rules);
        // 20 slots of five plus Saturday morning's four
        assert_eq!(shortage_count(&arrangement, &backfill, &rules), 104);
    }

    #[test]
    fn weekly_updates_follow_the_winning_schedules() {
        let records = vec![
            PersonnelRecord::new(10001, "Noa", true, true, true, 1, 5, false).unwrap(),
            PersonnelRecord::new(10002, "Omer", false, true, true, 3, 2, true).unwrap(),
        ];
        let mut week = WeekSchedule::default();
        week.assign(Slot::new(Day::SATURDAY, Period::Night));
        week.assign(Slot::new(Day::FRIDAY, Period::Night));
        let mut schedules = HashMap::new();
        schedules.insert(10001, week);

        let (_, result) = evaluate(
            Arrangement::new(),
            SlotWarnings::default(),
            schedules,
            &PreferenceIndex::new(),
            &RuleConfig::default(),
        );
        let updates = result.weekly_updates(&records);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, 10001);
        assert_eq!(updates[0].shabat_counter, 2);
        assert_eq!(updates[0].nights_counter, 2);
        assert!(updates[0].work_shabat_night);
        // Absent from the schedules: a blank week
        assert_eq!(updates[1].id, 10002);
        assert_eq!(updates[1].shabat_counter, 0);
        assert_eq!(updates[1].nights_counter, 0);
        assert!(!updates[1].work_shabat_night);
    }

    #[test]
    fn evaluate_counts_warnings() {
        let rules = RuleConfig::default();
        let mut warnings = SlotWarnings::default();
        warnings.set(Slot::new(Day::SUNDAY, Period::Night), SlotWarning::NoOfficers);
        warnings.set(Slot::new(Day::FRIDAY, Period::Midday), SlotWarning::InsufficientDrivers);
        let (score, result) = evaluate(
            Arrangement::new(),
            warnings,
            HashMap::new(),
            &PreferenceIndex::new(),
            &rules,
        );
        assert_eq!(result.warning_count, 2);
        assert_eq!(result.shortage_count, 104);
        assert_eq!(score, CandidateScore::new(104, 2));
    }
}
