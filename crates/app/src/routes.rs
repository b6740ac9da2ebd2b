//! Route handlers: resolve → fetch → normalize → project, one pipeline
//! per request. Handlers shape the final response and status code; all
//! business logic lives in `serve`, all I/O in `infra`.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use domain::api::ApiResult;
use domain::cache::CachePolicy;
use domain::content::ContentRecord;
use domain::identity::{ContentFamily, ResolvedIdentity};
use domain::lead::LeadRequest;
use serve::normalize::{extract_collection, normalize, record_from_value};
use serve::project::{ai, breadcrumb, faq, schema};
use serve::resolver::{resolve_segments, split_path, GENERAL_CATEGORY};

use crate::error::{require_data, AppError};
use crate::state::AppState;

static CACHE_TAG: HeaderName = HeaderName::from_static("cache-tag");

/// JSON response carrying the cache directives the gateway declared for
/// the call that produced it.
fn cached_json(body: Value, cache: &CachePolicy) -> Response {
    let mut response = Json(body).into_response();
    match HeaderValue::from_str(&cache.cache_control()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, value);
        }
        Err(error) => tracing::warn!(%error, "dropping unusable cache-control value"),
    }
    if let Some(tag) = cache.cache_tag() {
        match HeaderValue::from_str(&tag) {
            Ok(value) => {
                response.headers_mut().insert(CACHE_TAG.clone(), value);
            }
            // A dropped tag means purges will miss this response; leave a trace.
            Err(error) => tracing::warn!(%error, tag = %tag, "dropping unusable cache-tag value"),
        }
    }
    response
}

/// Resolve a wildcard remainder and fetch its page record.
///
/// The upstream lookup wants a city-or-state token and a concrete
/// category: when the resolver nulled the city we send the state in its
/// place, and when it nulled the category we send the literal sentinel —
/// the API requires the actual category value even for "no category".
async fn fetch_page(
    state: &AppState,
    family: ContentFamily,
    raw_path: &str,
) -> Result<(ResolvedIdentity, ContentRecord, CachePolicy), AppError> {
    let segments = split_path(raw_path).ok_or(AppError::NotFound)?;
    let identity = resolve_segments(&segments);

    let fetched = state
        .content
        .page_by_location(
            family,
            &identity.country,
            &identity.state,
            identity.city.as_deref().unwrap_or(&identity.state),
            identity.category.as_deref().unwrap_or(GENERAL_CATEGORY),
            &identity.slug,
        )
        .await;

    let payload = require_data(fetched.result)?;
    let record = normalize(&payload).ok_or(AppError::NotFound)?;
    Ok((identity, record, fetched.cache))
}

// ---------- AI summaries ----------

#[tracing::instrument(skip_all)]
pub async fn blog_summary(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    page_summary(state, ContentFamily::Blog, path).await
}

#[tracing::instrument(skip_all)]
pub async fn services_summary(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    page_summary(state, ContentFamily::Services, path).await
}

async fn page_summary(
    state: AppState,
    family: ContentFamily,
    path: String,
) -> Result<Response, AppError> {
    let (identity, record, cache) = fetch_page(&state, family, &path).await?;
    let doc = ai::build_summary(&record, &identity, family);
    Ok(cached_json(doc, &cache))
}

/// Aggregate AI feed over the stories list. `generated_at` is stamped at
/// response construction, feed-level only.
#[tracing::instrument(skip_all)]
pub async fn stories_feed(State(state): State<AppState>) -> Result<Response, AppError> {
    let fetched = state.content.stories().await;
    let payload = require_data(fetched.result)?;

    let items: Vec<Value> = extract_collection(&payload)
        .iter()
        .filter_map(|raw| story_feed_item(raw))
        .collect();

    let ranked: Vec<(String, String)> = items
        .iter()
        .filter_map(|item| {
            Some((
                item["title"].as_str()?.to_owned(),
                item["url"].as_str()?.to_owned(),
            ))
        })
        .collect();

    let doc = json!({
        "generated_at": Utc::now().to_rfc3339(),
        "count": items.len(),
        "items": items,
        "schema": schema::ranked_item_list("Stories", &ranked),
    });
    Ok(cached_json(doc, &fetched.cache))
}

/// Project one raw story into the same field set the page summaries use.
/// Stories carry no location or category, so those fields are absent.
fn story_feed_item(raw: &Value) -> Option<Value> {
    let record = record_from_value(raw)?;
    let slug = raw.get("slug").and_then(Value::as_str)?;
    let summary = record
        .meta_description
        .clone()
        .or_else(|| record.excerpt.clone())
        .unwrap_or_default();
    let updated_at = record
        .updated_at
        .clone()
        .or_else(|| record.published_at.clone());
    Some(json!({
        "title": record.title,
        "summary": summary,
        "excerpt": record.excerpt,
        "keywords": record.keywords,
        "author": record.author_name,
        "published_at": record.published_at,
        "updated_at": updated_at,
        "read_time_minutes": record.read_time_minutes,
        "url": format!("/story/{slug}"),
    }))
}

// ---------- FAQ documents ----------

#[tracing::instrument(skip_all)]
pub async fn blog_faq(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    page_faq(state, ContentFamily::Blog, path).await
}

#[tracing::instrument(skip_all)]
pub async fn services_faq(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    page_faq(state, ContentFamily::Services, path).await
}

async fn page_faq(
    state: AppState,
    family: ContentFamily,
    path: String,
) -> Result<Response, AppError> {
    let (identity, record, cache) = fetch_page(&state, family, &path).await?;
    let doc = faq::build_faq_document(&record, &identity);
    Ok(cached_json(doc, &cache))
}

// ---------- Structured data ----------

#[tracing::instrument(skip_all)]
pub async fn blog_schema(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let (identity, record, cache) = fetch_page(&state, ContentFamily::Blog, &path).await?;
    let trail = trail_segments(&identity);
    let doc = json!({
        "article": schema::article(&record, &identity),
        "breadcrumbs": breadcrumb::breadcrumb_list("/blog", &trail),
    });
    Ok(cached_json(doc, &cache))
}

#[tracing::instrument(skip_all)]
pub async fn services_schema(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let (identity, record, cache) = fetch_page(&state, ContentFamily::Services, &path).await?;
    let trail = trail_segments(&identity);
    let doc = json!({
        "local_business": schema::local_business(&record, &identity),
        "service": schema::service(&record, &identity),
        "product": schema::product(&record, &identity),
        "breadcrumbs": breadcrumb::breadcrumb_list("/services", &trail),
    });
    Ok(cached_json(doc, &cache))
}

fn trail_segments(identity: &ResolvedIdentity) -> Vec<&str> {
    let mut trail = vec![identity.country.as_str(), identity.state.as_str()];
    if let Some(city) = identity.city.as_deref() {
        trail.push(city);
    }
    if let Some(category) = identity.category.as_deref() {
        trail.push(category);
    }
    trail
}

// ---------- Catalog: categories & geo lists ----------

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[tracing::instrument(skip_all)]
pub async fn categories(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let fetched = state.content.categories(params.page, params.per_page).await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

/// One category, plus a comparison page over whatever item list its
/// payload carries (omitted cleanly when there is none).
#[tracing::instrument(skip_all)]
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let fetched = state.content.category_by_slug(&slug).await;
    let payload = require_data(fetched.result)?;
    let record = normalize(&payload).ok_or(AppError::NotFound)?;

    let parts: Vec<Value> = extract_collection(&payload)
        .iter()
        .filter_map(|item| {
            let title = item.get("title").and_then(Value::as_str)?;
            Some(json!({"@type": "WebPageElement", "name": title}))
        })
        .collect();

    let doc = json!({
        "category": payload,
        "schema": schema::comparison_page(
            &record.title,
            record.meta_description.as_deref().or(record.excerpt.as_deref()),
            &parts,
        ),
    });
    Ok(cached_json(doc, &fetched.cache))
}

#[tracing::instrument(skip_all)]
pub async fn countries(State(state): State<AppState>) -> Result<Response, AppError> {
    let fetched = state.content.countries().await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

#[tracing::instrument(skip_all)]
pub async fn states(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Response, AppError> {
    let fetched = state.content.states(&country).await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

#[tracing::instrument(skip_all)]
pub async fn cities(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Response, AppError> {
    let fetched = state.content.cities(&country).await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

// ---------- Search ----------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[tracing::instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("missing query parameter `q`".to_owned()))?;

    let fetched = state.content.search(query).await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

// ---------- Stories ----------

#[tracing::instrument(skip_all)]
pub async fn stories(State(state): State<AppState>) -> Result<Response, AppError> {
    let fetched = state.content.stories().await;
    let payload = require_data(fetched.result)?;
    let doc = json!({"data": extract_collection(&payload)});
    Ok(cached_json(doc, &fetched.cache))
}

#[tracing::instrument(skip_all)]
pub async fn story(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let fetched = state.content.story_by_slug(&slug).await;
    let payload = require_data(fetched.result)?;
    let record = normalize(&payload).ok_or(AppError::NotFound)?;
    let doc = serde_json::to_value(record).map_err(|_| AppError::Internal)?;
    Ok(cached_json(doc, &fetched.cache))
}

#[derive(Debug, Deserialize)]
pub struct GenerateStoryRequest {
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub source_id: String,
}

#[tracing::instrument(skip_all)]
pub async fn generate_story(
    State(state): State<AppState>,
    Json(request): Json<GenerateStoryRequest>,
) -> Result<Response, AppError> {
    if !matches!(request.source_type.as_str(), "blog" | "service") {
        return Err(AppError::Validation(
            "source_type must be `blog` or `service`".to_owned(),
        ));
    }
    if request.source_id.trim().is_empty() {
        return Err(AppError::Validation("missing source_id".to_owned()));
    }

    let fetched = state
        .content
        .generate_story(&request.source_type, &request.source_id)
        .await;
    let payload = require_data(fetched.result)?;
    Ok(cached_json(payload, &fetched.cache))
}

// ---------- Leads ----------

#[tracing::instrument(skip_all)]
pub async fn submit_lead(
    State(state): State<AppState>,
    Json(lead): Json<LeadRequest>,
) -> Result<Response, AppError> {
    if lead.email.trim().is_empty() {
        return Err(AppError::Validation("missing email".to_owned()));
    }
    if lead.brief.trim().is_empty() {
        return Err(AppError::Validation("missing brief".to_owned()));
    }

    match state.content.submit_lead(&lead).await {
        ApiResult::Success {
            data: Some(response),
        } => Ok(Json(response).into_response()),
        ApiResult::Success { data: None } => Err(AppError::Upstream {
            error: "empty lead response".to_owned(),
            status: None,
        }),
        ApiResult::Failure { error, status } => Err(AppError::Upstream { error, status }),
    }
}
