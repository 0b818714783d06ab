use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::guard::{GuardId, PersonnelRecord};
use crate::parser::PreferenceRow;
use super::types::{Slot, SLOTS_PER_WEEK};

/// Who declared availability for each slot, and how many shifts each guard wants
#[derive(Debug, Clone, Default)]
pub struct PreferenceIndex {
    available: Vec<BTreeSet<GuardId>>,
    quotas: HashMap<GuardId, u8>,
}

impl PreferenceIndex {
    pub fn new() -> Self {
        PreferenceIndex {
            available: vec![BTreeSet::new(); SLOTS_PER_WEEK],
            quotas: HashMap::new(),
        }
    }

    /// Matches preference rows to personnel records by name
    ///
    /// Rows naming nobody in the store are skipped. Guards missing from the
    /// feed keep an empty availability and a quota of zero. When two records
    /// share a name, rows bind to the first of them.
    pub fn bind(records: &[PersonnelRecord], rows: &[PreferenceRow]) -> Self {
        let mut index = PreferenceIndex::new();
        let mut by_name: HashMap<&str, GuardId> = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(&first) = by_name.get(record.name()) {
                warn!(
                    guard = %record.name(),
                    kept = first,
                    ignored = record.id(),
                    "two guards share a name, submissions go to the first"
                );
                continue;
            }
            by_name.insert(record.name(), record.id());
        }

        for row in rows {
            let Some(&guard) = by_name.get(row.name.trim()) else {
                warn!(guard = %row.name, "preference row does not match any guard, skipping");
                continue;
            };
            for slot in &row.available {
                index.mark_available(*slot, guard);
            }
            if let Some(quota) = row.quota {
                index.set_quota(guard, quota);
            }
        }

        index
    }

    pub fn mark_available(&mut self, slot: Slot, guard: GuardId) {
        self.available[slot.position()].insert(guard);
    }

    pub fn set_quota(&mut self, guard: GuardId, quota: u8) {
        self.quotas.insert(guard, quota);
    }

    /// Guards who declared the slot, in id order
    pub fn available(&self, slot: Slot) -> &BTreeSet<GuardId> {
        &self.available[slot.position()]
    }

    pub fn is_available(&self, slot: Slot, guard: GuardId) -> bool {
        self.available[slot.position()].contains(&guard)
    }

    pub fn availability_count(&self, slot: Slot) -> usize {
        self.available[slot.position()].len()
    }

    /// Desired weekly shift count, zero for guards who did not submit one
    pub fn quota(&self, guard: GuardId) -> u8 {
        self.quotas.get(&guard).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, Period};

    fn guard(id: GuardId, name: &str) -> PersonnelRecord {
        PersonnelRecord::new(id, name, false, true, true, 0, 0, false).unwrap()
    }

    #[test]
    fn bind_matches_rows_by_name() {
        let records = vec![guard(10001, "Noa"), guard(10002, "Omer")];
        let monday_night = Slot::new(Day::new(1).unwrap(), Period::Night);
        let rows = vec![
            PreferenceRow {
                name: "Noa".to_string(),
                available: vec![monday_night],
                quota: Some(4),
            },
            PreferenceRow {
                name: "Stranger".to_string(),
                available: vec![monday_night],
                quota: Some(2),
            },
        ];

        let index = PreferenceIndex::bind(&records, &rows);
        assert!(index.is_available(monday_night, 10001));
        assert_eq!(index.availability_count(monday_night), 1);
        assert_eq!(index.quota(10001), 4);
        assert_eq!(index.quota(10002), 0);
    }

    #[test]
    fn shared_name_binds_to_the_first_record() {
        let records = vec![guard(10001, "Noa"), guard(10002, "Noa")];
        let sunday_morning = Slot::new(Day::SUNDAY, Period::Morning);
        let rows = vec![PreferenceRow {
            name: "Noa".to_string(),
            available: vec![sunday_morning],
            quota: Some(3),
        }];

        let index = PreferenceIndex::bind(&records, &rows);
        assert!(index.is_available(sunday_morning, 10001));
        assert!(!index.is_available(sunday_morning, 10002));
        assert_eq!(index.quota(10001), 3);
        assert_eq!(index.quota(10002), 0);
    }
}
