//! # finals-engine
//!
//! Rule-based validation of a proposed final-exam schedule against the regular
//! class schedule exported by a university registrar.
//!
//! Given normalized course [`Section`]s and scheduled [`FinalExamEntry`] rows keyed
//! by CRN, [`validate`] produces one annotated section per input, each carrying the
//! ordered set of [`ErrorCode`]s raised against it. Faults are data, never panics:
//! a malformed row only short-circuits the checks that need the malformed field.
//!
//! ```rust
//! use finals_engine::{validate, ErrorCode, FinalExamEntry, FinalsGrid, RoomCapacities,
//!     Section, ValidationConfig};
//!
//! let sections = vec![Section::new("10001", "MW", "08:00-09:15")];
//! let report = validate(
//!     sections,
//!     &Vec::<FinalExamEntry>::new(),
//!     &RoomCapacities::default(),
//!     FinalsGrid::standard(),
//!     &ValidationConfig::default(),
//! );
//! assert_eq!(report.sections[0].errors, vec![ErrorCode::NoFinal]);
//! ```
//!
//! ## Modules
//!
//! - [`time`]: time-of-day normalization, `TimeRange`, weekday codes
//! - [`model`]: sections, final-exam entries, error codes, room capacities
//! - [`grid`]: the institutional finals grid reference table
//! - [`matching`]: pair each section with its final (NO_FINAL, MULTIPLE_FINALS, WRONG_DAY)
//! - [`overlap`]: instructor and room double-booking sweeps
//! - [`capacity`]: suppress block overlaps that fit in the room; capacity faults
//! - [`conformance`]: compare each final against the finals grid
//! - [`report`]: the full pipeline and the annotated report
//! - [`config`]: externally supplied validation parameters
//! - [`error`]: error types for parse/load failures

pub mod capacity;
pub mod config;
pub mod conformance;
pub mod error;
pub mod grid;
pub mod matching;
pub mod model;
pub mod overlap;
pub mod report;
pub mod time;

pub use config::ValidationConfig;
pub use error::EngineError;
pub use grid::{FinalsGrid, GridKey, GridRule};
pub use model::{ErrorCode, FinalExamEntry, FinalSlot, RoomCapacities, Section};
pub use report::{validate, Report};
pub use time::{date_to_weekday_code, normalize_time, DayCode, TimeRange};
