//! Structural validation of content against a marketplace's listing shape

use crate::marketplace::MarketplaceProfile;
use crate::{Diagnostic, DiagnosticCode, ListingContent};

/// Check required fields and length limits.
///
/// Emits at most one `missing_required_field` error and one `field_too_long`
/// warning per declared field, in listing-shape order. Overruns never become
/// errors: the listing is still scored and shown for correction.
pub fn validate_structure(content: &ListingContent, profile: &MarketplaceProfile) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for spec in &profile.listing_shape {
        let value = spec.name.value(content);

        if spec.required && value.is_blank() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::MissingRequiredField,
                    spec.name,
                    format!("Required field `{}` is missing or empty", spec.name),
                )
                .with_suggestion(spec.description.clone()),
            );
        }

        if let Some(max) = spec.max_length {
            let length = value.char_count();
            if length > max {
                let message = if value.is_collection() {
                    format!(
                        "`{}` has an entry of {} characters; the limit is {} per entry",
                        spec.name, length, max
                    )
                } else {
                    format!(
                        "`{}` is {} characters; the limit is {}",
                        spec.name, length, max
                    )
                };
                diagnostics.push(
                    Diagnostic::warning(DiagnosticCode::FieldTooLong, spec.name, message)
                        .with_suggestion(format!("Trim {} character(s)", length - max)),
                );
            }
        }
    }

    diagnostics
}
