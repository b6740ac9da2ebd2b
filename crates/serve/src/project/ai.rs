//! AI-summary projection: the machine-readable digest of one page served
//! to search crawlers and LLM agents.

use domain::content::ContentRecord;
use domain::identity::{ContentFamily, ResolvedIdentity};
use serde_json::{json, Value as Json};

use super::label::format_segment_label;

/// Build the AI-summary document for one record.
///
/// Fallback chains: `summary` prefers `meta_description`, then `excerpt`,
/// then a synthesized sentence from the resolved labels; `updated_at`
/// falls back to `published_at`.
#[tracing::instrument(skip_all)]
pub fn build_summary(
    record: &ContentRecord,
    identity: &ResolvedIdentity,
    family: ContentFamily,
) -> Json {
    let summary = record
        .meta_description
        .clone()
        .or_else(|| record.excerpt.clone())
        .unwrap_or_else(|| synthesized_summary(identity));

    json!({
        "title": record.title,
        "summary": summary,
        "excerpt": record.excerpt,
        "keywords": record.keywords,
        "author": record.author_name,
        "category": identity.category,
        "geo": {
            "country": identity.country,
            "state": identity.state,
            "city": identity.city,
        },
        "published_at": record.published_at,
        "updated_at": record.updated_at.clone().or_else(|| record.published_at.clone()),
        "read_time_minutes": record.read_time_minutes,
        "url": identity.canonical_path(family),
    })
}

fn synthesized_summary(identity: &ResolvedIdentity) -> String {
    let category = format_segment_label(identity.category.as_deref());
    let city = format_segment_label(identity.city.as_deref().or(Some(identity.state.as_str())));
    format!("Insights on {category} from {city}.")
}
