//! Analyzer module - listing audit engine

pub mod criteria;
pub mod engine;
pub mod scoring;
pub mod validation;

pub use criteria::{Criterion, CriterionRegistry, ScoringCriterion};
pub use engine::{AggregateStats, AuditEngine, AuditJob};
pub use scoring::ScoreCalculator;
pub use validation::validate_structure;
