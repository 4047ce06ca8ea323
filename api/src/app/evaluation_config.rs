//! Evaluation tuning constants
//!
//! The thresholds, windows, and clamps the peer-evaluation pipeline runs on.

/// Fraction of assignments that must be completed before ratings update
pub const PARTICIPATION_THRESHOLD: f64 = 0.8;

/// Hours evaluators have to submit before the record expires
pub const EVALUATION_WINDOW_HOURS: i64 = 72;

/// Teammates each evaluator is asked to rate
pub const TARGETS_PER_EVALUATOR: usize = 2;

/// Minimum eligible players match-wide for a record to be created
pub const MIN_ELIGIBLE_PLAYERS: usize = 3;

/// Overall rating clamp
pub const OVR_MIN: i32 = 40;
pub const OVR_MAX: i32 = 99;

/// Sub-attribute clamp
pub const ATTR_MIN: i32 = 20;
pub const ATTR_MAX: i32 = 99;

/// Fallback overall rating when a roster entry has none
pub const DEFAULT_OVR: i32 = 70;

/// Completed-assignment history entries returned per player
pub const COMPLETED_HISTORY_LIMIT: usize = 20;
