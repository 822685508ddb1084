//! Safety-rule engine.
//!
//! Pure logic: no database access, no clock access. The caller supplies
//! the reading, the threshold configuration, and the evaluation instant,
//! which makes `evaluate` safe for unbounded parallel invocation.

mod engine;
mod thresholds;
mod violation;

pub use engine::{check_proximity, evaluate, haversine_distance_m};
pub use thresholds::SafetyThresholds;
pub use violation::{RuleKind, Violation};
