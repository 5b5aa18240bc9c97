//! # engram-scoring
//!
//! Pure retrieval scoring: composite score from importance, confidence,
//! access frequency, and exponential time decay. Also decides retirement
//! eligibility for the consolidation engine. No side effects anywhere in
//! this crate; the current time is always an explicit parameter.

pub mod engine;
pub mod formula;
pub mod retirement;

pub use engine::ScoringEngine;
pub use formula::{compute, compute_breakdown, ScoreBreakdown};
pub use retirement::{evaluate as evaluate_retirement, RetirementDecision};
