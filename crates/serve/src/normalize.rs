//! Envelope normalization for upstream payloads.
//!
//! The content API answers with whatever shape a given endpoint grew over
//! time: a bare array, `{data: [...]}`, `{posts: [...]}`, a single record
//! wrapped in `{data: {...}}`, or the record itself. Callers never need to
//! know which endpoint returned which shape.

use domain::content::{ContentRecord, FaqEntry};
use serde_json::{Map, Value as Json};

/// Named collection fields, checked in this fixed order after `data`.
const COLLECTION_KEYS: [&str; 3] = ["posts", "blogs", "items"];

/// Extract a list of raw records from any of the known list envelopes.
///
/// Precedence, first match wins:
///   1. payload is itself an array
///   2. object with an array field `data`
///   3. array field `posts`, `blogs`, or `items`, in that order
///   4. first array-valued field in enumeration order
///   5. nothing array-shaped → empty
#[tracing::instrument(skip_all)]
pub fn extract_collection(payload: &Json) -> Vec<Json> {
    if let Json::Array(items) = payload {
        return items.clone();
    }

    let Json::Object(map) = payload else {
        return Vec::new();
    };

    if let Some(Json::Array(items)) = map.get("data") {
        return items.clone();
    }

    for key in COLLECTION_KEYS {
        if let Some(Json::Array(items)) = map.get(key) {
            return items.clone();
        }
    }

    for value in map.values() {
        if let Json::Array(items) = value {
            return items.clone();
        }
    }

    Vec::new()
}

/// Unwrap a single-record envelope and map it onto a [`ContentRecord`].
///
/// `{data: {...}}` is unwrapped one level; any other object is used as the
/// record itself. Non-objects normalize to `None`.
#[tracing::instrument(skip_all)]
pub fn normalize(payload: &Json) -> Option<ContentRecord> {
    let record = match payload {
        Json::Object(map) => match map.get("data") {
            Some(inner @ Json::Object(_)) => inner,
            _ => payload,
        },
        _ => return None,
    };

    record_from_value(record)
}

/// Loose-dictionary → typed record. Fields are extracted one at a time:
/// a field that is absent or wrongly typed defaults on its own, it never
/// sinks the rest of the record. Upstream mixes snake_case and camelCase
/// names, so each field checks its known spellings in order.
pub fn record_from_value(value: &Json) -> Option<ContentRecord> {
    let map = value.as_object()?;
    Some(ContentRecord {
        title: opt_string(map, &["title"]).unwrap_or_default(),
        excerpt: opt_string(map, &["excerpt"]),
        meta_description: opt_string(map, &["meta_description", "metaDescription"]),
        content_html: opt_string(map, &["content_html", "contentHtml", "content"]),
        keywords: string_list(map, "keywords"),
        faqs: faq_list(map),
        author_name: opt_string(map, &["author_name", "authorName", "author"]),
        published_at: opt_string(map, &["published_at", "publishedAt"]),
        updated_at: opt_string(map, &["updated_at", "updatedAt"]),
        read_time_minutes: opt_minutes(map, &["read_time_minutes", "readTime", "read_time"]),
    })
}

/// Normalize every record in a list envelope, dropping entries that are
/// not objects.
#[tracing::instrument(skip_all)]
pub fn extract_records(payload: &Json) -> Vec<ContentRecord> {
    extract_collection(payload)
        .iter()
        .filter_map(record_from_value)
        .collect()
}

// ---------- tolerant field extraction ----------

fn field<'a>(map: &'a Map<String, Json>, keys: &[&str]) -> Option<&'a Json> {
    keys.iter().find_map(|key| map.get(*key))
}

fn opt_string(map: &Map<String, Json>, keys: &[&str]) -> Option<String> {
    field(map, keys).and_then(Json::as_str).map(str::to_owned)
}

/// Minutes arrive as a number or, from some endpoints, a numeric string.
fn opt_minutes(map: &Map<String, Json>, keys: &[&str]) -> Option<u32> {
    let value = field(map, keys)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_str().and_then(|s| s.trim().parse().ok())
}

fn string_list(map: &Map<String, Json>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Json::Array(items)) => items
            .iter()
            .filter_map(Json::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn faq_list(map: &Map<String, Json>) -> Vec<FaqEntry> {
    let Some(Json::Array(items)) = map.get("faqs") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let entry = item.as_object()?;
            Some(FaqEntry {
                question: entry.get("question")?.as_str()?.to_owned(),
                answer: entry.get("answer")?.as_str()?.to_owned(),
            })
        })
        .collect()
}
