//! Field schema: declared listing fields and how to read them from content

use crate::{APlusModule, ListingContent, ListingExtensions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every content field a marketplace shape may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Title,
    Bullets,
    Description,
    BackendKeywords,
    #[serde(rename = "a_plus_modules")]
    APlusModules,
    Subtitle,
    ItemSpecifics,
    ConditionNotes,
    ShippingNotes,
    ReturnsNotes,
    CategoryHint,
    ComplianceNotes,
    Assumptions,
    Tags,
    Materials,
}

impl FieldKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Title => "title",
            FieldKey::Bullets => "bullets",
            FieldKey::Description => "description",
            FieldKey::BackendKeywords => "backend_keywords",
            FieldKey::APlusModules => "a_plus_modules",
            FieldKey::Subtitle => "subtitle",
            FieldKey::ItemSpecifics => "item_specifics",
            FieldKey::ConditionNotes => "condition_notes",
            FieldKey::ShippingNotes => "shipping_notes",
            FieldKey::ReturnsNotes => "returns_notes",
            FieldKey::CategoryHint => "category_hint",
            FieldKey::ComplianceNotes => "compliance_notes",
            FieldKey::Assumptions => "assumptions",
            FieldKey::Tags => "tags",
            FieldKey::Materials => "materials",
        }
    }

    /// Whether shoppers see this field on the listing page
    pub fn is_customer_visible(&self) -> bool {
        !matches!(
            self,
            FieldKey::BackendKeywords
                | FieldKey::CategoryHint
                | FieldKey::ComplianceNotes
                | FieldKey::Assumptions
        )
    }

    /// Read this field out of the content. Extension fields resolve to
    /// `Absent` unless the content carries the matching extension variant.
    pub fn value<'c>(&self, content: &'c ListingContent) -> FieldValue<'c> {
        let ext = &content.extensions;
        match self {
            FieldKey::Title => FieldValue::Text(&content.title),
            FieldKey::Bullets => FieldValue::List(&content.bullets),
            FieldKey::Description => FieldValue::Text(&content.description),
            FieldKey::BackendKeywords => FieldValue::from_opt(content.backend_keywords.as_deref()),
            FieldKey::APlusModules => match ext {
                ListingExtensions::Amazon(a) => FieldValue::Modules(&a.a_plus_modules),
                _ => FieldValue::Absent,
            },
            FieldKey::Subtitle => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.subtitle.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::ItemSpecifics => match ext {
                ListingExtensions::Ebay(e) => FieldValue::Map(&e.item_specifics),
                _ => FieldValue::Absent,
            },
            FieldKey::ConditionNotes => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.condition_notes.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::ShippingNotes => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.shipping_notes.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::ReturnsNotes => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.returns_notes.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::CategoryHint => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.category_hint.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::ComplianceNotes => match ext {
                ListingExtensions::Ebay(e) => FieldValue::from_opt(e.compliance_notes.as_deref()),
                _ => FieldValue::Absent,
            },
            FieldKey::Assumptions => match ext {
                ListingExtensions::Ebay(e) => FieldValue::List(&e.assumptions),
                _ => FieldValue::Absent,
            },
            FieldKey::Tags => match ext {
                ListingExtensions::Etsy(e) => FieldValue::List(&e.tags),
                _ => FieldValue::Absent,
            },
            FieldKey::Materials => match ext {
                ListingExtensions::Etsy(e) => FieldValue::List(&e.materials),
                _ => FieldValue::Absent,
            },
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of one field's content
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'c> {
    Absent,
    Text(&'c str),
    List(&'c [String]),
    Map(&'c BTreeMap<String, String>),
    Modules(&'c [APlusModule]),
}

impl<'c> FieldValue<'c> {
    fn from_opt(text: Option<&'c str>) -> Self {
        text.map(FieldValue::Text).unwrap_or(FieldValue::Absent)
    }

    /// Absent, or nothing but whitespace in every entry
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Text(t) => t.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
            FieldValue::Map(map) => map.values().all(|v| v.trim().is_empty()),
            FieldValue::Modules(modules) => modules.iter().all(|m| {
                m.body.trim().is_empty()
                    && m.headline.as_deref().map_or(true, |h| h.trim().is_empty())
            }),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            FieldValue::List(_) | FieldValue::Map(_) | FieldValue::Modules(_)
        )
    }

    /// Character count compared against `maxLength`. For collections the
    /// limit applies per entry, so this is the longest entry.
    pub fn char_count(&self) -> usize {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Text(t) => t.chars().count(),
            _ => self
                .entries()
                .iter()
                .map(|e| e.chars().count())
                .max()
                .unwrap_or(0),
        }
    }

    /// Character count ignoring surrounding whitespace
    pub fn trimmed_char_count(&self) -> usize {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Text(t) => t.trim().chars().count(),
            _ => self
                .entries()
                .iter()
                .map(|e| e.trim().chars().count())
                .max()
                .unwrap_or(0),
        }
    }

    /// Text entries: list items, mapping values, module bodies
    pub fn entries(&self) -> Vec<&'c str> {
        match *self {
            FieldValue::Absent => Vec::new(),
            FieldValue::Text(t) => vec![t],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Map(map) => map.values().map(String::as_str).collect(),
            FieldValue::Modules(modules) => modules.iter().map(|m| m.body.as_str()).collect(),
        }
    }

    /// Every piece of text in the field, including module headlines
    pub fn all_text(&self) -> Vec<&'c str> {
        match *self {
            FieldValue::Modules(modules) => modules
                .iter()
                .flat_map(|m| m.headline.as_deref().into_iter().chain([m.body.as_str()]))
                .collect(),
            _ => self.entries(),
        }
    }

    pub fn as_text(&self) -> Option<&'c str> {
        match *self {
            FieldValue::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// One declared field in a marketplace's listing shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: FieldKey,
    /// Maximum characters (per entry for collections); `None` is unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub required: bool,
    pub description: String,
    /// For collections: how many distinct entries buyers expect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_entries: Option<usize>,
}

impl FieldSpec {
    pub fn required(name: FieldKey, description: impl Into<String>) -> Self {
        Self {
            name,
            max_length: None,
            required: true,
            description: description.into(),
            ideal_entries: None,
        }
    }

    pub fn optional(name: FieldKey, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_ideal_entries(mut self, count: usize) -> Self {
        self.ideal_entries = Some(count);
        self
    }
}
