//! FAQ projection with deterministic fallback synthesis.
//!
//! Every page must surface non-empty FAQ structured data, even when the
//! source record has none; search engines drop FAQ rich results for empty
//! lists. The fallback wording is fixed — never generated.

use domain::content::{ContentRecord, FaqEntry};
use domain::identity::ResolvedIdentity;
use serde_json::{json, Value as Json};

use super::label::format_segment_label;

/// Number of entries synthesized when the record carries none.
pub const SYNTHESIZED_FAQ_COUNT: usize = 3;

/// `{title, faqs}` document. Source FAQs pass through verbatim — no
/// merging with the synthesized set.
#[tracing::instrument(skip_all)]
pub fn build_faq_document(record: &ContentRecord, identity: &ResolvedIdentity) -> Json {
    let faqs = if record.faqs.is_empty() {
        synthesize_faqs(identity)
    } else {
        record.faqs.clone()
    };

    json!({
        "title": record.title,
        "faqs": faqs,
    })
}

/// Exactly [`SYNTHESIZED_FAQ_COUNT`] templated entries from the resolved
/// category/city/state labels.
pub fn synthesize_faqs(identity: &ResolvedIdentity) -> Vec<FaqEntry> {
    let category = format_segment_label(identity.category.as_deref());
    let place = format_segment_label(identity.city.as_deref().or(Some(identity.state.as_str())));
    let state = format_segment_label(Some(&identity.state));

    vec![
        FaqEntry {
            question: format!("What {category} services are available in {place}?"),
            answer: format!(
                "We cover the full range of {category} work for businesses in {place}, \
                 from initial strategy through launch and ongoing support."
            ),
        },
        FaqEntry {
            question: format!("How much does {category} cost in {place}?"),
            answer: format!(
                "Pricing for {category} in {place} depends on project scope. \
                 Most engagements in {state} start with a free consultation and \
                 a fixed-price proposal."
            ),
        },
        FaqEntry {
            question: format!("How do I get started with {category} in {place}?"),
            answer: format!(
                "Reach out through the contact form with a short brief. A {category} \
                 specialist serving {place} will respond within one business day."
            ),
        },
    ]
}
