//! Text helpers shared by criteria

use regex::Regex;
use std::sync::OnceLock;

const STOPWORDS: &[&str] = &[
    "and", "for", "the", "with", "this", "that", "from", "your", "you", "are", "our", "all",
    "its", "into", "can", "will", "has", "have", "not", "but", "per", "was", "who", "any",
];

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Drop markup tags and common entities, keeping only shopper-visible text
pub(crate) fn strip_markup(text: &str) -> String {
    markup_regex()
        .replace_all(text, " ")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Lowercased alphanumeric words
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether a lowercased word can carry search intent: 3+ characters, not a stopword
pub(crate) fn is_term(word: &str) -> bool {
    word.chars().count() >= 3 && !STOPWORDS.contains(&word)
}

pub(crate) fn terms(text: &str) -> Vec<String> {
    words(text).into_iter().filter(|w| is_term(w)).collect()
}

/// Comparison key for duplicate detection
pub(crate) fn normalize_entry(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(['.', ',', ';', ':', '!'])
        .to_string()
}

/// Short quotation of an entry for messages
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(max_chars).collect();
        format!("{}...", head.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            words(&strip_markup("<p>Solid <b>oak</b>&nbsp;table</p>")),
            vec!["solid", "oak", "table"]
        );
    }

    #[test]
    fn test_terms_drop_short_words_and_stopwords() {
        assert_eq!(
            terms("The 4K TV with HDR and a 55in panel"),
            vec!["hdr", "55in", "panel"]
        );
    }

    #[test]
    fn test_normalize_entry() {
        assert_eq!(normalize_entry("  Leak   Proof Lid. "), "leak proof lid");
        assert_eq!(normalize_entry("leak proof lid"), "leak proof lid");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a fairly long bullet point", 8), "a fairly...");
    }
}
