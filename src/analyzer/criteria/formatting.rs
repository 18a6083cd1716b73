//! Title formatting hygiene: capitalization, punctuation, whitespace

use super::ScoringCriterion;
use crate::marketplace::{FieldKey, MarketplaceProfile};
use crate::{CriterionScore, Diagnostic, DiagnosticCode, ListingContent};

const SHOUTING_PENALTY: f64 = 0.4;
const PUNCTUATION_PENALTY: f64 = 0.3;
const WHITESPACE_PENALTY: f64 = 0.1;
const NOISY_PUNCTUATION: &[char] = &['!', '?', '*', '$', '~'];

/// Rule scoring how cleanly a title is typed
pub struct TitleFormattingRule;

impl TitleFormattingRule {
    pub fn new() -> Self {
        Self
    }

    /// More than half of the words with 3+ letters are all caps
    pub fn is_shouting(title: &str) -> bool {
        let lettered: Vec<&str> = title
            .split_whitespace()
            .filter(|w| w.chars().filter(|c| c.is_alphabetic()).count() >= 3)
            .collect();
        if lettered.len() < 3 {
            return false;
        }
        let caps = lettered
            .iter()
            .filter(|w| w.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase))
            .count();
        caps * 2 > lettered.len()
    }

    /// First run like "!!" or "?!"
    pub fn repeated_punctuation(title: &str) -> Option<String> {
        let chars: Vec<char> = title.chars().collect();
        chars.windows(2).find_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let noisy = NOISY_PUNCTUATION.contains(&a) && NOISY_PUNCTUATION.contains(&b);
            let same_or_mixed = a == b || (matches!(a, '!' | '?') && matches!(b, '!' | '?'));
            (noisy && same_or_mixed).then(|| pair.iter().collect())
        })
    }

    fn has_whitespace_noise(title: &str) -> bool {
        title.trim() != title || title.contains("  ") || title.contains('\t')
    }
}

impl Default for TitleFormattingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringCriterion for TitleFormattingRule {
    fn name(&self) -> &'static str {
        "title_formatting"
    }

    fn evaluate(&self, content: &ListingContent, profile: &MarketplaceProfile) -> CriterionScore {
        if !profile.declares(FieldKey::Title) {
            return CriterionScore::perfect();
        }
        let title = profile.field(FieldKey::Title, content).as_text().unwrap_or("");
        if title.trim().is_empty() {
            return CriterionScore::new(0.0, Vec::new());
        }

        let mut value = 1.0;
        let mut messages = Vec::new();

        if Self::is_shouting(title) {
            value -= SHOUTING_PENALTY;
            messages.push(
                Diagnostic::warning(
                    DiagnosticCode::ShoutingTitle,
                    FieldKey::Title,
                    "Title is mostly capital letters",
                )
                .with_suggestion("Use title case; keep all caps for acronyms and brand names"),
            );
        }

        if let Some(run) = Self::repeated_punctuation(title) {
            value -= PUNCTUATION_PENALTY;
            messages.push(
                Diagnostic::warning(
                    DiagnosticCode::RepeatedPunctuation,
                    FieldKey::Title,
                    format!("Title contains repeated punctuation \"{}\"", run),
                )
                .with_suggestion("Drop decorative punctuation; search ignores it"),
            );
        }

        if Self::has_whitespace_noise(title) {
            value -= WHITESPACE_PENALTY;
            messages.push(Diagnostic::info(
                DiagnosticCode::WhitespaceNoise,
                FieldKey::Title,
                "Title has leading, trailing or doubled whitespace",
            ));
        }

        CriterionScore::new(value, messages)
    }
}
