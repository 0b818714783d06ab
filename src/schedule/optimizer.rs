use std::collections::HashSet;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, RosterError};
use crate::guard::PersonnelRecord;
use super::availability::PreferenceIndex;
use super::scheduler::run_trial;
use super::scoring::{evaluate, CandidateScore, TrialResult};
use super::state::SimulationState;

/// The winning trial together with its score
#[derive(Debug, Clone)]
pub struct BestArrangement {
    pub score: CandidateScore,
    pub result: TrialResult,
    /// Trials actually run
    pub trials_run: usize,
    /// Trials kept after dropping duplicate scores
    pub distinct_scores: usize,
}

/// Runs the scheduler repeatedly and keeps the best-scoring roster
///
/// Every trial starts from a reset state. A trial whose rounded score was
/// already seen is dropped, so among equal scores the earliest trial wins.
#[tracing::instrument(level = "debug", name = "Roster Search", skip_all, fields(guards = records.len(), trials = config.trials))]
pub fn optimize<R: Rng + ?Sized>(
    records: &[PersonnelRecord],
    preferences: &PreferenceIndex,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<BestArrangement> {
    if config.trials == 0 {
        return Err(RosterError::invalid("at least one trial is required"));
    }

    let started = Instant::now();
    let mut state = SimulationState::new(records, preferences);
    let mut seen: HashSet<CandidateScore> = HashSet::new();
    let mut best: Option<(CandidateScore, TrialResult)> = None;
    let mut trials_run = 0;

    for trial in 0..config.trials {
        if let Some(limit) = config.time_limit {
            if trial > 0 && started.elapsed() >= limit {
                warn!(trial, ?limit, "time limit reached, stopping the search early");
                break;
            }
        }

        state.reset();
        run_trial(&mut state, preferences, &config.rules, rng);
        trials_run += 1;

        let (score, result) = evaluate(
            state.arrangement.clone(),
            state.warnings.clone(),
            state.schedules(),
            preferences,
            &config.rules,
        );
        debug!(
            trial,
            coverage = score.coverage(),
            compliance = score.compliance(),
            shortage = result.shortage_count,
            warnings = result.warning_count,
            "trial scored"
        );

        if !seen.insert(score) {
            debug!(trial, "score already seen, discarding trial");
            continue;
        }

        // Strictly greater, so the first inserted wins ties
        let better = match &best {
            Some((current, _)) => score.total_milli() > current.total_milli(),
            None => true,
        };
        if better {
            best = Some((score, result));
        }
    }

    let (score, result) = best.ok_or_else(|| RosterError::invalid("no trial completed"))?;
    info!(
        trials = trials_run,
        distinct = seen.len(),
        coverage = score.coverage(),
        compliance = score.compliance(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "selected best roster"
    );

    Ok(BestArrangement {
        score,
        result,
        trials_run,
        distinct_scores: seen.len(),
    })
}
