use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

use app::{app_router, AppState};
use domain::api::{ApiResult, Fetched};
use domain::cache::CachePolicy;
use domain::identity::ContentFamily;
use domain::lead::{LeadRequest, LeadResponse};
use infra::ContentSource;

// === In-memory upstream ===

#[derive(Debug, Clone, Default)]
struct PageCall {
    country: String,
    state: String,
    city_or_state: String,
    category: String,
    slug: String,
}

/// Scriptable stand-in for the content API. Unset endpoints answer
/// "success, nothing there", which the routes must treat as 404.
struct StubSource {
    page: ApiResult<Value>,
    story: ApiResult<Value>,
    stories: ApiResult<Value>,
    lead: ApiResult<LeadResponse>,
    last_page_call: Mutex<Option<PageCall>>,
}

impl Default for StubSource {
    fn default() -> Self {
        Self {
            page: ApiResult::empty(),
            story: ApiResult::empty(),
            stories: ApiResult::empty(),
            lead: ApiResult::empty(),
            last_page_call: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ContentSource for StubSource {
    async fn page_by_location(
        &self,
        family: ContentFamily,
        country: &str,
        state: &str,
        city_or_state: &str,
        category: &str,
        slug: &str,
    ) -> Fetched<Value> {
        *self.last_page_call.lock().unwrap() = Some(PageCall {
            country: country.into(),
            state: state.into(),
            city_or_state: city_or_state.into(),
            category: category.into(),
            slug: slug.into(),
        });
        Fetched::new(
            self.page.clone(),
            CachePolicy::seconds(3600, vec![format!("page:{}:{slug}", family.as_str())]),
        )
    }

    async fn story_by_slug(&self, slug: &str) -> Fetched<Value> {
        Fetched::new(
            self.story.clone(),
            CachePolicy::seconds(3600, vec![format!("story:{slug}")]),
        )
    }

    async fn stories(&self) -> Fetched<Value> {
        Fetched::new(
            self.stories.clone(),
            CachePolicy::always_fresh(vec!["stories".into()]),
        )
    }

    async fn generate_story(&self, _source_type: &str, _source_id: &str) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!({"queued": true})),
            CachePolicy::always_fresh(vec!["stories".into()]),
        )
    }

    async fn categories(&self, _page: Option<u32>, _per_page: Option<u32>) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!({"data": []})),
            CachePolicy::seconds(86_400, vec!["categories".into()]),
        )
    }

    async fn category_by_slug(&self, slug: &str) -> Fetched<Value> {
        Fetched::new(
            ApiResult::empty(),
            CachePolicy::seconds(86_400, vec![format!("category:{slug}")]),
        )
    }

    async fn countries(&self) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!(["us", "ca"])),
            CachePolicy::seconds(86_400, vec!["geo-countries".into()]),
        )
    }

    async fn states(&self, country: &str) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!({"data": ["texas"]})),
            CachePolicy::seconds(86_400, vec![format!("geo-states:{country}")]),
        )
    }

    async fn cities(&self, country: &str) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!({"data": ["austin"]})),
            CachePolicy::seconds(86_400, vec![format!("geo-cities:{country}")]),
        )
    }

    async fn search(&self, _query: &str) -> Fetched<Value> {
        Fetched::new(
            ApiResult::success(json!({"items": []})),
            CachePolicy::seconds(60, vec!["search".into()]),
        )
    }

    async fn submit_lead(&self, _lead: &LeadRequest) -> ApiResult<LeadResponse> {
        self.lead.clone()
    }
}

// === Harness ===

fn build_app(stub: StubSource) -> (Router, Arc<StubSource>) {
    let stub = Arc::new(stub);
    let app = app_router(AppState::new(stub.clone()));
    (app, stub)
}

async fn read(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let req = Request::get(path).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    read(resp).await
}

async fn get_raw(app: &Router, path: &str) -> Response {
    let req = Request::get(path).body(Body::empty()).unwrap();
    app.clone().oneshot(req).await.unwrap()
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    read(resp).await
}

fn page_record(meta: &str) -> ApiResult<Value> {
    ApiResult::success(json!({
        "data": {
            "title": "Best Agency",
            "metaDescription": meta,
        }
    }))
}

// === AI summaries ===

#[tokio::test]
async fn blog_summary_happy_path() {
    let (app, _) = build_app(StubSource {
        page: page_record("A summary."),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/blog/us/texas/austin/web-design/best-agency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Best Agency");
    assert_eq!(body["summary"], "A summary.");
    assert_eq!(body["url"], "/blog/us/texas/austin/web-design/best-agency");
    assert_eq!(body["geo"]["city"], "austin");
}

#[tokio::test]
async fn summary_response_carries_cache_headers() {
    let (app, _) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    let resp = get_raw(&app, "/ai/blog/us/texas/austin/web-design/best-agency").await;
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
    assert_eq!(
        resp.headers().get("cache-tag").unwrap(),
        "page:blog:best-agency"
    );
}

#[tokio::test]
async fn header_unsafe_cache_tag_is_dropped_not_fatal() {
    let (app, _) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    // The slug decodes to "café"; the resulting tag is not a legal header
    // value, so it is omitted while the response itself still succeeds.
    let resp = get_raw(&app, "/ai/blog/us/texas/austin/web-design/caf%C3%A9").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
    assert!(resp.headers().get("cache-tag").is_none());
}

#[tokio::test]
async fn swapped_segments_reach_the_gateway_resolved() {
    let (app, stub) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    // city slot holds "texas" (0 hyphens) and the category slot a 3-hyphen
    // token: the resolver must reinterpret them before fetching.
    let (status, body) = get(&app, "/ai/blog/us/texas/texas/seo-web-design-agency/some-slug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "/blog/us/texas/texas/seo-web-design-agency");

    let call = stub.last_page_call.lock().unwrap().clone().unwrap();
    assert_eq!(call.country, "us");
    assert_eq!(call.state, "texas");
    // resolver nulled the city, so the state stands in for it upstream
    assert_eq!(call.city_or_state, "texas");
    assert_eq!(call.category, "texas");
    assert_eq!(call.slug, "seo-web-design-agency");
}

#[tokio::test]
async fn general_sentinel_is_resubstituted_for_the_lookup() {
    let (app, stub) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    // The swap nulls a "general" city-token, but the page lookup still
    // needs the literal category string.
    let (status, _) = get(&app, "/ai/blog/us/texas/general/seo-web-design-agency/some-slug").await;
    assert_eq!(status, StatusCode::OK);

    let call = stub.last_page_call.lock().unwrap().clone().unwrap();
    assert_eq!(call.category, "general");
    assert_eq!(call.slug, "seo-web-design-agency");
}

#[tokio::test]
async fn missing_record_is_404_with_error_body() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = get(&app, "/ai/blog/us/texas/austin/web-design/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn malformed_path_is_404() {
    let (app, _) = build_app(StubSource::default());
    let (status, _) = get(&app, "/ai/blog/us/texas").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_500_maps_to_502() {
    let (app, _) = build_app(StubSource {
        page: ApiResult::failure("upstream returned 500", Some(500)),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/blog/us/texas/austin/web-design/slug").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("status 500"), "got: {message}");
}

#[tokio::test]
async fn upstream_404_maps_to_404() {
    let (app, _) = build_app(StubSource {
        page: ApiResult::failure("upstream returned 404", Some(404)),
        ..Default::default()
    });

    let (status, _) = get(&app, "/ai/blog/us/texas/austin/web-design/slug").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === FAQ documents ===

#[tokio::test]
async fn faq_synthesizes_exactly_three_entries() {
    let (app, _) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/faq/services/us/texas/austin/web-design/my-slug").await;
    assert_eq!(status, StatusCode::OK);
    let faqs = body["faqs"].as_array().unwrap();
    assert_eq!(faqs.len(), 3);
    for entry in faqs {
        let q = entry["question"].as_str().unwrap();
        assert!(q.contains("Web Design"));
        assert!(q.contains("Austin"));
    }
}

#[tokio::test]
async fn source_faqs_are_passed_through_verbatim() {
    let (app, _) = build_app(StubSource {
        page: ApiResult::success(json!({
            "data": {
                "title": "T",
                "faqs": [{"question": "Q?", "answer": "A."}],
            }
        })),
        ..Default::default()
    });

    let (_, body) = get(&app, "/ai/faq/blog/us/texas/austin/web-design/my-slug").await;
    let faqs = body["faqs"].as_array().unwrap();
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0]["question"], "Q?");
}

// === Structured data ===

#[tokio::test]
async fn blog_schema_document() {
    let (app, _) = build_app(StubSource {
        page: ApiResult::success(json!({
            "data": {"title": "T", "updatedAt": "2024-02-02"}
        })),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/schema/blog/us/texas/austin/web-design/my-slug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["@type"], "Article");
    assert_eq!(body["article"]["dateModified"], "2024-02-02");
    let crumbs = body["breadcrumbs"]["itemListElement"].as_array().unwrap();
    assert_eq!(crumbs[0]["name"], "US");
    assert_eq!(crumbs[1]["name"], "Texas");
}

#[tokio::test]
async fn services_schema_document() {
    let (app, _) = build_app(StubSource {
        page: page_record("s"),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/schema/services/us/texas/austin/web-design/my-slug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["local_business"]["@type"], "LocalBusiness");
    assert_eq!(body["local_business"]["address"]["addressLocality"], "Austin");
    assert_eq!(body["service"]["serviceType"], "Web Design");
    assert_eq!(body["product"]["@type"], "Product");
}

// === Stories ===

#[tokio::test]
async fn stories_feed_stamps_generated_at_and_no_store() {
    let (app, _) = build_app(StubSource {
        stories: ApiResult::success(json!({
            "data": [
                {
                    "title": "S1",
                    "slug": "s1",
                    "excerpt": "e1",
                    "keywords": ["growth", "seo"],
                    "authorName": "Ann",
                    "publishedAt": "2024-01-01",
                    "readTime": 4,
                },
                {"title": "S2", "slug": "s2"},
            ]
        })),
        ..Default::default()
    });

    let resp = get_raw(&app, "/ai/stories").await;
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["generated_at"].as_str().is_some());
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["url"], "/story/s1");
    assert_eq!(body["items"][0]["updated_at"], "2024-01-01");
    let ranked = body["schema"]["itemListElement"].as_array().unwrap();
    assert_eq!(ranked[1]["position"], 2);
}

#[tokio::test]
async fn stories_feed_items_carry_the_summary_field_set() {
    let (app, _) = build_app(StubSource {
        stories: ApiResult::success(json!({
            "data": [{
                "title": "S1",
                "slug": "s1",
                "excerpt": "e1",
                "keywords": ["growth", "seo"],
                "authorName": "Ann",
                "publishedAt": "2024-01-01",
                "readTime": 4,
            }]
        })),
        ..Default::default()
    });

    let (status, body) = get(&app, "/ai/stories").await;
    assert_eq!(status, StatusCode::OK);
    let item = &body["items"][0];
    assert_eq!(item["title"], "S1");
    assert_eq!(item["summary"], "e1");
    assert_eq!(item["excerpt"], "e1");
    assert_eq!(item["keywords"], json!(["growth", "seo"]));
    assert_eq!(item["author"], "Ann");
    assert_eq!(item["published_at"], "2024-01-01");
    assert_eq!(item["read_time_minutes"], 4);
    // stories are not geo- or category-scoped
    assert!(item.get("geo").is_none());
    assert!(item.get("category").is_none());
}

#[tokio::test]
async fn story_not_found() {
    let (app, _) = build_app(StubSource::default());
    let (status, _) = get(&app, "/story/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn story_record_is_normalized() {
    let (app, _) = build_app(StubSource {
        story: ApiResult::success(json!({
            "data": {"title": "Story", "authorName": "Ann"}
        })),
        ..Default::default()
    });

    let (status, body) = get(&app, "/story/story").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Story");
    assert_eq!(body["author_name"], "Ann");
}

#[tokio::test]
async fn generate_story_validates_source_type() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = post_json(
        &app,
        "/story/generate",
        json!({"source_type": "podcast", "source_id": "1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("source_type"));
}

#[tokio::test]
async fn generate_story_accepts_blog_source() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = post_json(
        &app,
        "/story/generate",
        json!({"source_type": "blog", "source_id": "42"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queued"], true);
}

// === Search & catalog ===

#[tokio::test]
async fn search_requires_query() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = get(&app, "/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("q"));
}

#[tokio::test]
async fn geo_lists_unwrap_envelopes() {
    let (app, _) = build_app(StubSource::default());

    // bare array and {data: [...]} shapes both come back as {data: [...]}
    let (_, countries) = get(&app, "/geo/countries").await;
    assert_eq!(countries["data"], json!(["us", "ca"]));

    let (_, states) = get(&app, "/geo/countries/us/states").await;
    assert_eq!(states["data"], json!(["texas"]));
}

// === Leads ===

#[tokio::test]
async fn lead_without_email_is_400() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = post_json(&app, "/leads", json!({"brief": "Need a site."})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing email");
}

#[tokio::test]
async fn lead_without_brief_is_400() {
    let (app, _) = build_app(StubSource::default());
    let (status, body) = post_json(&app, "/leads", json!({"email": "a@b.co"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing brief");
}

#[tokio::test]
async fn lead_submission_forwards_upstream_response() {
    let (app, _) = build_app(StubSource {
        lead: ApiResult::success(LeadResponse {
            success: true,
            lead_id: Some("lead-1".into()),
        }),
        ..Default::default()
    });

    let (status, body) = post_json(
        &app,
        "/leads",
        json!({"email": "a@b.co", "brief": "Need a site."}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["leadId"], "lead-1");
}
