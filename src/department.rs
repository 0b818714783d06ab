use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::display::{RosterPublication, RosterPublisher};
use crate::error::Result;
use crate::guard::{PersonnelRecord, WeeklyUpdate};
use crate::parser::PreferenceRow;
use crate::schedule::{optimize, BestArrangement, PreferenceIndex};
use crate::store::PersonnelStore;

/// Result of one weekly run, kept until it is published and committed
#[derive(Debug, Clone)]
pub struct RosterOutcome {
    pub best: BestArrangement,
    pub publication: RosterPublication,
    pub shortage_count: usize,
    pub warning_count: usize,
    /// Counter updates derived from the winning roster
    pub updates: Vec<WeeklyUpdate>,
}

/// One week's roster job: personnel, submissions and engine settings
#[derive(Debug, Clone)]
pub struct Department {
    records: Vec<PersonnelRecord>,
    preferences: PreferenceIndex,
    config: EngineConfig,
}

impl Department {
    /// Reads the personnel store and binds this week's submissions to it
    ///
    /// Any store error aborts here, before a single trial runs.
    pub fn load<S: PersonnelStore + ?Sized>(
        store: &S,
        rows: &[PreferenceRow],
        config: EngineConfig,
    ) -> Result<Self> {
        let records = store.load()?;
        let preferences = PreferenceIndex::bind(&records, rows);
        info!(guards = records.len(), submissions = rows.len(), "department loaded");
        Ok(Department {
            records,
            preferences,
            config,
        })
    }

    pub fn new(records: Vec<PersonnelRecord>, preferences: PreferenceIndex, config: EngineConfig) -> Self {
        Department {
            records,
            preferences,
            config,
        }
    }

    pub fn records(&self) -> &[PersonnelRecord] {
        &self.records
    }

    pub fn preferences(&self) -> &PreferenceIndex {
        &self.preferences
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Searches for the best roster and renders it
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RosterOutcome> {
        let best = optimize(&self.records, &self.preferences, &self.config, rng)?;
        let publication = RosterPublication::from_trial(&best.result, &self.records);
        let updates = best.result.weekly_updates(&self.records);

        Ok(RosterOutcome {
            shortage_count: best.result.shortage_count,
            warning_count: best.result.warning_count,
            best,
            publication,
            updates,
        })
    }

    /// Like [`run`](Department::run), seeding from the configured seed or OS entropy
    pub fn run_seeded(&self) -> Result<RosterOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run(&mut rng)
    }

    /// Hands the roster to the publisher
    ///
    /// A failure is logged and returned; the outcome stays with the caller
    /// so it can be published again.
    pub fn publish<P: RosterPublisher + ?Sized>(&self, outcome: &RosterOutcome, publisher: &P) -> Result<()> {
        publisher.publish(&outcome.publication).map_err(|e| {
            error!(error = %e, "roster publication failed");
            e
        })
    }

    /// Writes next week's counters back to the store and to the in-memory records
    pub fn commit<S: PersonnelStore + ?Sized>(&mut self, outcome: &RosterOutcome, store: &mut S) -> Result<()> {
        store.apply_week(&outcome.updates)?;
        for record in &mut self.records {
            if let Some(update) = outcome.updates.iter().find(|u| u.id == record.id()) {
                record.apply(update);
            }
        }
        Ok(())
    }
}
