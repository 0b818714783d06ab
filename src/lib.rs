//! Weekly shift assignment for a security guard department.
//!
//! Personnel come from a [`store::PersonnelStore`], this week's submissions
//! from the preference feed ([`parser`]). [`department::Department`] runs the
//! randomized trial search in [`schedule`], renders the winner with
//! [`display`] and writes the counter updates back to the store.

pub mod config;
pub mod department;
pub mod display;
pub mod error;
pub mod guard;
pub mod parser;
pub mod schedule;
pub mod store;

pub use config::{EngineConfig, RuleConfig};
pub use department::{Department, RosterOutcome};
pub use display::{FilePublisher, RosterPublication, RosterPublisher};
pub use error::{Result, RosterError};
pub use guard::{GuardId, PersonnelRecord, WeeklyUpdate};
pub use parser::{load_preferences, parse_preferences, PreferenceRow};
pub use schedule::{optimize, Arrangement, BestArrangement, Day, Period, PreferenceIndex, Slot, SlotWarning};
pub use store::{CsvPersonnelStore, PersonnelStore, StoreField};
