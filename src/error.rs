//! Error types for registry construction and audits

use thiserror::Error;

/// Failures surfaced by the registries and the audit engine.
///
/// Problems with the listing itself are never errors: they are reported as
/// diagnostics inside a successful [`crate::AuditResult`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QaError {
    /// No profile is registered under this id, or it is disabled
    #[error("unknown or disabled marketplace: {0}")]
    UnknownMarketplace(String),

    /// A profile failed its consistency checks at registration time
    #[error("configuration defect in marketplace '{marketplace}': {reason}")]
    ConfigurationDefect {
        marketplace: String,
        reason: DefectReason,
    },

    /// A criterion produced a value outside its contract
    #[error("criterion '{criterion}' produced an invalid value: {value}")]
    CriterionDefect { criterion: String, value: f64 },
}

/// Why a marketplace profile was refused at registration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefectReason {
    #[error("scoring weights sum to {sum:.4}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("weight {weight} for criterion '{criterion}' is outside [0, 1]")]
    WeightOutOfRange { criterion: String, weight: f64 },

    #[error("criterion '{0}' is not in the criterion registry")]
    UnknownCriterion(String),

    #[error("criterion '{0}' is weighted more than once")]
    DuplicateCriterion(String),

    #[error("no scoring criteria declared")]
    NoCriteria,

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("marketplace id is already registered")]
    DuplicateMarketplace,

    #[error("marketplace id is empty")]
    EmptyId,

    #[error("marketplace is not registered")]
    NotRegistered,
}

impl QaError {
    pub(crate) fn defect(marketplace: &str, reason: DefectReason) -> Self {
        QaError::ConfigurationDefect {
            marketplace: marketplace.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_message_names_marketplace_and_reason() {
        let err = QaError::defect("ebay", DefectReason::WeightSum { sum: 0.95 });
        let msg = err.to_string();
        assert!(msg.contains("ebay"));
        assert!(msg.contains("0.9500"));
    }

    #[test]
    fn test_unknown_marketplace_message() {
        let err = QaError::UnknownMarketplace("mercadolibre".to_string());
        assert_eq!(
            err.to_string(),
            "unknown or disabled marketplace: mercadolibre"
        );
    }
}
