//! Listing QA: marketplace-aware quality auditor for product listings
//!
//! This library judges a piece of listing content against a marketplace
//! profile (an ordered field shape plus weighted scoring criteria) and returns
//! a normalized 0-100 score with actionable diagnostics.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod history;
pub mod marketplace;
pub mod mcp;
pub mod reporter;

pub use analyzer::{AuditEngine, Criterion, CriterionRegistry};
pub use error::{DefectReason, QaError};
pub use marketplace::{FieldKey, FieldSpec, MarketplaceProfile, ProfileRegistry};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Listing content submitted for audit.
///
/// Fields a marketplace does not declare in its shape are ignored by that
/// marketplace's audit. Unknown JSON keys are ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// May contain markup; counted as raw characters
    #[serde(default)]
    pub description: String,
    /// Search terms that are not shown to customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_keywords: Option<String>,
    /// Marketplace-specific fields
    #[serde(default)]
    pub extensions: ListingExtensions,
}

impl ListingContent {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backend_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.backend_keywords = Some(keywords.into());
        self
    }

    pub fn with_extensions(mut self, extensions: ListingExtensions) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Marketplace-specific extension bag, tagged by `kind`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingExtensions {
    #[default]
    None,
    Amazon(AmazonExtensions),
    Ebay(EbayExtensions),
    Etsy(EtsyExtensions),
}

/// Catalog-style extras (enhanced brand content)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmazonExtensions {
    #[serde(default)]
    pub a_plus_modules: Vec<APlusModule>,
}

/// One enhanced-content block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct APlusModule {
    #[serde(default)]
    pub module_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// Auction-style extras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EbayExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub item_specifics: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_notes: Option<String>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// Handmade-marketplace extras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EtsyExtensions {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
}

/// A listing document as accepted by the CLI and MCP surfaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRequest {
    /// Target marketplace id (optional when supplied by the caller)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
    #[serde(flatten)]
    pub content: ListingContent,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Listing should not be considered sellable as-is
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Stable machine-readable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    MissingRequiredField,
    FieldTooLong,
    TooShort,
    EmptyOptionalField,
    NoSearchTerms,
    FewSearchTerms,
    LowKeywordCoverage,
    KeywordStuffing,
    RestrictedClaim,
    DuplicateEntry,
    BlankEntry,
    TooFewEntries,
    ShoutingTitle,
    RepeatedPunctuation,
    WhitespaceNoise,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MissingRequiredField => "missing_required_field",
            DiagnosticCode::FieldTooLong => "field_too_long",
            DiagnosticCode::TooShort => "too_short",
            DiagnosticCode::EmptyOptionalField => "empty_optional_field",
            DiagnosticCode::NoSearchTerms => "no_search_terms",
            DiagnosticCode::FewSearchTerms => "few_search_terms",
            DiagnosticCode::LowKeywordCoverage => "low_keyword_coverage",
            DiagnosticCode::KeywordStuffing => "keyword_stuffing",
            DiagnosticCode::RestrictedClaim => "restricted_claim",
            DiagnosticCode::DuplicateEntry => "duplicate_entry",
            DiagnosticCode::BlankEntry => "blank_entry",
            DiagnosticCode::TooFewEntries => "too_few_entries",
            DiagnosticCode::ShoutingTitle => "shouting_title",
            DiagnosticCode::RepeatedPunctuation => "repeated_punctuation",
            DiagnosticCode::WhitespaceNoise => "whitespace_noise",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity-tagged note attached to an audit result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Field the note points at, when applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldKey>,
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Suggested correction (if available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        field: Option<FieldKey>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            severity,
            code,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(code: DiagnosticCode, field: FieldKey, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, Some(field), message)
    }

    pub fn warning(code: DiagnosticCode, field: FieldKey, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, Some(field), message)
    }

    pub fn info(code: DiagnosticCode, field: FieldKey, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, Some(field), message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of one criterion: a value in [0, 1] plus its notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// 0 = complete failure of the dimension, 1 = ideal
    pub value: f64,
    pub messages: Vec<Diagnostic>,
}

impl CriterionScore {
    /// Clamp into [0, 1]. NaN and infinities are passed through so the engine
    /// can reject them.
    pub fn new(value: f64, messages: Vec<Diagnostic>) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            value
        };
        Self {
            value,
            messages,
        }
    }

    pub fn perfect() -> Self {
        Self::new(1.0, Vec::new())
    }
}

/// The main result of auditing one listing for one marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Marketplace id the listing was judged against
    pub marketplace: String,
    /// Overall quality score (0-100)
    pub score: u8,
    /// Structural diagnostics first, then criterion diagnostics
    pub validation: Vec<Diagnostic>,
    /// Per-criterion outcome keyed by criterion name
    pub breakdown: BTreeMap<String, CriterionScore>,
}

impl AuditResult {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.validation
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True when at least one diagnostic makes the listing unsellable as-is
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn diagnostics_for(&self, field: FieldKey) -> impl Iterator<Item = &Diagnostic> {
        self.validation
            .iter()
            .filter(move |d| d.field == Some(field))
    }
}

/// An audit result tied to the listing file it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditedListing {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: AuditResult,
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}
