use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Staffing rules applied by the eligibility filter and the slot assigner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Absolute weekly shift cap per guard
    pub max_shifts: u8,
    /// Rolling night cap (last week's nights plus this week's)
    pub max_nights: u8,
    /// Consecutive Sabbath weeks after which a guard must rest
    pub max_sabbath_streak: u8,
    /// Headcount cap and minimum for every slot except Saturday morning
    pub max_per_slot: usize,
    /// Headcount cap and minimum for Saturday morning
    pub saturday_morning_cap: usize,
    pub min_drivers: usize,
    pub min_height: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            max_shifts: 6,
            max_nights: 7,
            max_sabbath_streak: 3,
            max_per_slot: 5,
            saturday_morning_cap: 4,
            min_drivers: 2,
            min_height: 2,
        }
    }
}

/// Search configuration for the trial optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trials: usize,
    /// Fixed seed for reproducible runs, `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Upper bound on the total time spent in trials
    pub time_limit: Option<Duration>,
    pub rules: RuleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            trials: 50,
            seed: None,
            time_limit: None,
            rules: RuleConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Builds the default configuration and applies the overrides found in
    /// `ROSTER_TRIALS`, `ROSTER_SEED` and `ROSTER_TIME_LIMIT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(raw) = lookup("ROSTER_TRIALS") {
            let trials: usize = parse_env("ROSTER_TRIALS", &raw)?;
            if trials == 0 {
                return Err(RosterError::invalid("ROSTER_TRIALS must be at least 1"));
            }
            config.trials = trials;
        }
        if let Some(raw) = lookup("ROSTER_SEED") {
            config.seed = Some(parse_env("ROSTER_SEED", &raw)?);
        }
        if let Some(raw) = lookup("ROSTER_TIME_LIMIT_SECS") {
            let secs: u64 = parse_env("ROSTER_TIME_LIMIT_SECS", &raw)?;
            config.time_limit = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| RosterError::invalid(format!("{} has an invalid value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_department_rules() {
        let config = EngineConfig::default();
        assert_eq!(config.trials, 50);
        assert_eq!(config.rules.max_shifts, 6);
        assert_eq!(config.rules.max_nights, 7);
        assert_eq!(config.rules.max_sabbath_streak, 3);
        assert_eq!(config.rules.max_per_slot, 5);
        assert_eq!(config.rules.saturday_morning_cap, 4);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("ROSTER_TRIALS", "12"),
            ("ROSTER_SEED", "99"),
            ("ROSTER_TIME_LIMIT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.trials, 12);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.time_limit, Some(Duration::from_secs(3)));
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("ROSTER_TRIALS", "many")]));
        assert!(matches!(err, Err(RosterError::InvalidInput(_))));

        let err = EngineConfig::from_lookup(lookup_from(&[("ROSTER_TRIALS", "0")]));
        assert!(matches!(err, Err(RosterError::InvalidInput(_))));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"trials": 5, "rules": {"max_per_slot": 6}}"#).unwrap();
        assert_eq!(config.trials, 5);
        assert_eq!(config.rules.max_per_slot, 6);
        assert_eq!(config.rules.max_shifts, 6);
        assert_eq!(config.seed, None);
    }
}
