//! Breadcrumb trails from path segments.

use serde::Serialize;
use serde_json::{json, Value as Json};

use super::label::format_segment_label;

/// At most this many segments become crumbs; deeper paths are truncated.
pub const MAX_CRUMBS: usize = 4;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub url: String,
}

/// Walk up to [`MAX_CRUMBS`] segments, accumulating URLs as it goes.
/// Segment 0 is treated as a country code and upper-cased; the rest are
/// slug-humanized.
#[tracing::instrument(skip_all)]
pub fn build_breadcrumbs(prefix: &str, segments: &[&str]) -> Vec<Crumb> {
    let mut crumbs = Vec::new();
    let mut url = prefix.trim_end_matches('/').to_owned();

    for (i, segment) in segments.iter().take(MAX_CRUMBS).enumerate() {
        url.push('/');
        url.push_str(segment);
        let label = if i == 0 {
            segment.to_uppercase()
        } else {
            format_segment_label(Some(segment))
        };
        crumbs.push(Crumb {
            label,
            url: url.clone(),
        });
    }

    crumbs
}

/// JSON-LD `BreadcrumbList` over the same trail.
#[tracing::instrument(skip_all)]
pub fn breadcrumb_list(prefix: &str, segments: &[&str]) -> Json {
    let elements: Vec<Json> = build_breadcrumbs(prefix, segments)
        .into_iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.label,
                "item": crumb.url,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}
