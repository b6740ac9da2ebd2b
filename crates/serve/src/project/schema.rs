//! schema.org JSON-LD builders.
//!
//! Pure mappers from a normalized record to structured-data objects.
//! Optional schema fields are emitted only when the source data provides
//! them — a missing `dateModified` is omitted, never null.

use domain::content::ContentRecord;
use domain::identity::{ContentFamily, ResolvedIdentity};
use serde_json::{json, Map, Value as Json};

use super::label::format_segment_label;

const CONTEXT: &str = "https://schema.org";

fn insert_opt(doc: &mut Map<String, Json>, key: &str, value: Option<Json>) {
    if let Some(value) = value {
        doc.insert(key.to_owned(), value);
    }
}

fn description_of(record: &ContentRecord) -> Option<String> {
    record
        .meta_description
        .clone()
        .or_else(|| record.excerpt.clone())
}

fn postal_address(identity: &ResolvedIdentity) -> Json {
    let mut address = Map::new();
    address.insert("@type".into(), json!("PostalAddress"));
    insert_opt(
        &mut address,
        "addressLocality",
        identity
            .city
            .as_deref()
            .map(|c| json!(format_segment_label(Some(c)))),
    );
    address.insert(
        "addressRegion".into(),
        json!(format_segment_label(Some(&identity.state))),
    );
    address.insert(
        "addressCountry".into(),
        json!(identity.country.to_uppercase()),
    );
    Json::Object(address)
}

/// `LocalBusiness` for a geo-scoped services page.
#[tracing::instrument(skip_all)]
pub fn local_business(record: &ContentRecord, identity: &ResolvedIdentity) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("LocalBusiness"));
    doc.insert("name".into(), json!(record.title));
    insert_opt(&mut doc, "description", description_of(record).map(Json::from));
    doc.insert("address".into(), postal_address(identity));
    doc.insert(
        "url".into(),
        json!(identity.canonical_path(ContentFamily::Services)),
    );
    Json::Object(doc)
}

/// `Service` describing the offered category in its service area.
#[tracing::instrument(skip_all)]
pub fn service(record: &ContentRecord, identity: &ResolvedIdentity) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("Service"));
    doc.insert("name".into(), json!(record.title));
    insert_opt(&mut doc, "description", description_of(record).map(Json::from));
    insert_opt(
        &mut doc,
        "serviceType",
        identity
            .category
            .as_deref()
            .map(|c| json!(format_segment_label(Some(c)))),
    );
    doc.insert(
        "areaServed".into(),
        json!(format_segment_label(
            identity.city.as_deref().or(Some(identity.state.as_str()))
        )),
    );
    Json::Object(doc)
}

/// `Article` for a blog post.
#[tracing::instrument(skip_all)]
pub fn article(record: &ContentRecord, identity: &ResolvedIdentity) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("Article"));
    doc.insert("headline".into(), json!(record.title));
    insert_opt(&mut doc, "description", description_of(record).map(Json::from));
    insert_opt(
        &mut doc,
        "author",
        record
            .author_name
            .as_deref()
            .map(|name| json!({"@type": "Person", "name": name})),
    );
    insert_opt(
        &mut doc,
        "datePublished",
        record.published_at.as_deref().map(Json::from),
    );
    insert_opt(
        &mut doc,
        "dateModified",
        record.updated_at.as_deref().map(Json::from),
    );
    if !record.keywords.is_empty() {
        doc.insert("keywords".into(), json!(record.keywords.join(", ")));
    }
    doc.insert(
        "mainEntityOfPage".into(),
        json!(identity.canonical_path(ContentFamily::Blog)),
    );
    Json::Object(doc)
}

/// `Product` for pages that present an offering as a purchasable package.
#[tracing::instrument(skip_all)]
pub fn product(record: &ContentRecord, identity: &ResolvedIdentity) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("Product"));
    doc.insert("name".into(), json!(record.title));
    insert_opt(&mut doc, "description", description_of(record).map(Json::from));
    insert_opt(
        &mut doc,
        "category",
        identity
            .category
            .as_deref()
            .map(|c| json!(format_segment_label(Some(c)))),
    );
    Json::Object(doc)
}

/// Comparison `WebPage`. `hasPart` appears only when parts exist.
#[tracing::instrument(skip_all)]
pub fn comparison_page(title: &str, description: Option<&str>, parts: &[Json]) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("WebPage"));
    doc.insert("name".into(), json!(title));
    insert_opt(&mut doc, "description", description.map(Json::from));
    if !parts.is_empty() {
        doc.insert("hasPart".into(), json!(parts));
    }
    Json::Object(doc)
}

/// Ranked `ItemList`. Positions are 1-based; `itemListElement` appears
/// only when there are items.
#[tracing::instrument(skip_all)]
pub fn ranked_item_list(name: &str, items: &[(String, String)]) -> Json {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!(CONTEXT));
    doc.insert("@type".into(), json!("ItemList"));
    doc.insert("name".into(), json!(name));
    if !items.is_empty() {
        let elements: Vec<Json> = items
            .iter()
            .enumerate()
            .map(|(i, (item_name, url))| {
                json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "name": item_name,
                    "url": url,
                })
            })
            .collect();
        doc.insert("itemListElement".into(), json!(elements));
    }
    Json::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ResolvedIdentity {
        ResolvedIdentity {
            country: "us".into(),
            state: "texas".into(),
            city: Some("austin".into()),
            category: Some("web-design".into()),
            slug: "best-agency".into(),
        }
    }

    fn record() -> ContentRecord {
        ContentRecord {
            title: "Best Agency".into(),
            meta_description: Some("md".into()),
            ..Default::default()
        }
    }

    #[test]
    fn article_omits_date_modified_when_absent() {
        let doc = article(&record(), &identity());
        assert_eq!(doc["@type"], "Article");
        assert_eq!(doc["headline"], "Best Agency");
        assert!(doc.get("dateModified").is_none());
        assert!(doc.get("author").is_none());
    }

    #[test]
    fn article_includes_provided_dates_and_author() {
        let mut rec = record();
        rec.author_name = Some("Ann".into());
        rec.published_at = Some("2024-01-01".into());
        rec.updated_at = Some("2024-02-02".into());
        let doc = article(&rec, &identity());
        assert_eq!(doc["author"]["name"], "Ann");
        assert_eq!(doc["datePublished"], "2024-01-01");
        assert_eq!(doc["dateModified"], "2024-02-02");
    }

    #[test]
    fn local_business_address_uses_labels() {
        let doc = local_business(&record(), &identity());
        assert_eq!(doc["address"]["addressLocality"], "Austin");
        assert_eq!(doc["address"]["addressRegion"], "Texas");
        assert_eq!(doc["address"]["addressCountry"], "US");
    }

    #[test]
    fn service_area_falls_back_to_state() {
        let mut id = identity();
        id.city = None;
        let doc = service(&record(), &id);
        assert_eq!(doc["areaServed"], "Texas");
        assert_eq!(doc["serviceType"], "Web Design");
    }

    #[test]
    fn comparison_page_has_part_only_with_parts() {
        let empty = comparison_page("Cmp", None, &[]);
        assert!(empty.get("hasPart").is_none());

        let parts = vec![json!({"@type": "WebPageElement"})];
        let full = comparison_page("Cmp", Some("d"), &parts);
        assert_eq!(full["hasPart"].as_array().unwrap().len(), 1);
        assert_eq!(full["description"], "d");
    }

    #[test]
    fn item_list_positions_are_one_based() {
        let items = vec![
            ("First".to_owned(), "/a".to_owned()),
            ("Second".to_owned(), "/b".to_owned()),
        ];
        let doc = ranked_item_list("Top", &items);
        let elements = doc["itemListElement"].as_array().unwrap();
        assert_eq!(elements[0]["position"], 1);
        assert_eq!(elements[1]["position"], 2);
        assert_eq!(elements[1]["name"], "Second");
    }

    #[test]
    fn empty_item_list_omits_elements() {
        let doc = ranked_item_list("Top", &[]);
        assert!(doc.get("itemListElement").is_none());
    }
}
