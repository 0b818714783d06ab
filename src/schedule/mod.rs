pub mod types;
pub mod slot_utils;
pub mod availability;
pub mod state;
pub mod eligibility;
pub mod assigner;
pub mod scheduler;
pub mod backfill;
pub mod scoring;
pub mod optimizer;

pub use types::{Arrangement, Day, Period, Slot, SlotWarning, SlotWarnings, WeekSchedule, SLOTS_PER_WEEK};
pub use availability::PreferenceIndex;
pub use state::{GuardWeek, SimulationState};
pub use eligibility::{check_eligibility, is_eligible, Ineligibility};
pub use assigner::assign_slot;
pub use scheduler::{run_trial, SlotDemand, SlotQueue};
pub use backfill::{analyze_day, analyze_week, NoonBackfill};
pub use scoring::{CandidateScore, TrialResult};
pub use optimizer::{optimize, BestArrangement};
