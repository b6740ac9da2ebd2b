//! Content Gateway: turns a resolved identity (or plain slug) into a
//! cached upstream call and a uniform [`ApiResult`] envelope.
//!
//! Failure policy: nothing escapes this module as an error. Transport
//! failures, non-2xx statuses and unparseable bodies all become
//! `ApiResult::Failure`; route handlers alone decide what that means in
//! HTTP terms.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value as Json};

use domain::api::{ApiResult, Fetched};
use domain::cache::CachePolicy;
use domain::config::GatewayConfig;
use domain::identity::ContentFamily;
use domain::lead::{LeadRequest, LeadResponse};

// Revalidation windows per content family. Catalog data (categories, geo
// lists) barely changes; individual posts change occasionally; live search
// must stay close to fresh; the stories list is never cached because a
// generate call can extend it at any moment.
const CATALOG_TTL: u32 = 86_400;
const POST_TTL: u32 = 3_600;
const SEARCH_TTL: u32 = 60;

/// Path-segment encoding set: everything except RFC 3986 unreserved
/// characters. Each user-controlled segment is encoded on its own, never
/// the composed path, so a `/` inside a token cannot become a separator.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// The upstream content API, seen from this side.
///
/// Trait rather than concrete struct so route handlers can be exercised
/// against an in-memory stub; [`ContentApi`] is the production
/// implementation.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn page_by_location(
        &self,
        family: ContentFamily,
        country: &str,
        state: &str,
        city_or_state: &str,
        category: &str,
        slug: &str,
    ) -> Fetched<Json>;

    async fn story_by_slug(&self, slug: &str) -> Fetched<Json>;
    async fn stories(&self) -> Fetched<Json>;
    async fn generate_story(&self, source_type: &str, source_id: &str) -> Fetched<Json>;

    async fn categories(&self, page: Option<u32>, per_page: Option<u32>) -> Fetched<Json>;
    async fn category_by_slug(&self, slug: &str) -> Fetched<Json>;

    async fn countries(&self) -> Fetched<Json>;
    async fn states(&self, country: &str) -> Fetched<Json>;
    async fn cities(&self, country: &str) -> Fetched<Json>;

    async fn search(&self, query: &str) -> Fetched<Json>;

    async fn submit_lead(&self, lead: &LeadRequest) -> ApiResult<LeadResponse>;
}

pub struct ContentApi {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl ContentApi {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Compose an upstream URL from already-trusted literals and
    /// user-controlled segments, encoding the latter individually.
    fn url(&self, segments: &[&str]) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let tail: Vec<String> = segments.iter().map(|s| encode_segment(s)).collect();
        format!("{}/{}", base, tail.join("/"))
    }

    async fn get_json(&self, url: String, query: &[(&str, String)]) -> ApiResult<Json> {
        let request = self.http.get(&url).query(query);
        Self::into_result(request.send().await).await
    }

    async fn post_json(&self, url: String, body: &Json) -> ApiResult<Json> {
        let request = self.http.post(&url).json(body);
        Self::into_result(request.send().await).await
    }

    async fn into_result(
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> ApiResult<Json> {
        let response = match sent {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "upstream transport failure");
                return ApiResult::failure(format!("upstream unreachable: {error}"), None);
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ApiResult::failure(
                format!("upstream returned {status}"),
                Some(status.as_u16()),
            );
        }

        match response.json::<Json>().await {
            Ok(Json::Null) => ApiResult::empty(),
            Ok(body) => ApiResult::success(body),
            Err(error) => ApiResult::failure(
                format!("upstream body was not JSON: {error}"),
                Some(status.as_u16()),
            ),
        }
    }
}

#[async_trait]
impl ContentSource for ContentApi {
    #[tracing::instrument(skip_all, fields(family = family.as_str(), slug = %slug))]
    async fn page_by_location(
        &self,
        family: ContentFamily,
        country: &str,
        state: &str,
        city_or_state: &str,
        category: &str,
        slug: &str,
    ) -> Fetched<Json> {
        let url = self.url(&[
            "v1",
            "pages",
            family.as_str(),
            country,
            state,
            city_or_state,
            category,
            slug,
        ]);
        let cache = CachePolicy::seconds(
            POST_TTL,
            vec![format!("page:{}:{}", family.as_str(), slug)],
        );
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all, fields(slug = %slug))]
    async fn story_by_slug(&self, slug: &str) -> Fetched<Json> {
        let url = self.url(&["story", slug]);
        let cache = CachePolicy::seconds(POST_TTL, vec![format!("story:{slug}")]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all)]
    async fn stories(&self) -> Fetched<Json> {
        let url = self.url(&["stories"]);
        let cache = CachePolicy::always_fresh(vec!["stories".to_owned()]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all, fields(source_type = %source_type, source_id = %source_id))]
    async fn generate_story(&self, source_type: &str, source_id: &str) -> Fetched<Json> {
        let url = self.url(&["story", "generate"]);
        let body = json!({"source_type": source_type, "source_id": source_id});
        // A generate call invalidates the stories list, so it shares the tag.
        let cache = CachePolicy::always_fresh(vec!["stories".to_owned()]);
        Fetched::new(self.post_json(url, &body).await, cache)
    }

    #[tracing::instrument(skip_all)]
    async fn categories(&self, page: Option<u32>, per_page: Option<u32>) -> Fetched<Json> {
        let url = self.url(&["v1", "categories"]);
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = per_page {
            query.push(("per_page", per_page.to_string()));
        }
        let cache = CachePolicy::seconds(CATALOG_TTL, vec!["categories".to_owned()]);
        Fetched::new(self.get_json(url, &query).await, cache)
    }

    #[tracing::instrument(skip_all, fields(slug = %slug))]
    async fn category_by_slug(&self, slug: &str) -> Fetched<Json> {
        let url = self.url(&["v1", "categories", slug]);
        let cache = CachePolicy::seconds(CATALOG_TTL, vec![format!("category:{slug}")]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all)]
    async fn countries(&self) -> Fetched<Json> {
        let url = self.url(&["v1", "geo", "countries"]);
        let cache = CachePolicy::seconds(CATALOG_TTL, vec!["geo-countries".to_owned()]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all, fields(country = %country))]
    async fn states(&self, country: &str) -> Fetched<Json> {
        let url = self.url(&["v1", "geo", "countries", country, "states"]);
        let cache = CachePolicy::seconds(CATALOG_TTL, vec![format!("geo-states:{country}")]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all, fields(country = %country))]
    async fn cities(&self, country: &str) -> Fetched<Json> {
        let url = self.url(&["v1", "geo", "countries", country, "cities"]);
        let cache = CachePolicy::seconds(CATALOG_TTL, vec![format!("geo-cities:{country}")]);
        Fetched::new(self.get_json(url, &[]).await, cache)
    }

    #[tracing::instrument(skip_all)]
    async fn search(&self, query: &str) -> Fetched<Json> {
        let url = self.url(&["search"]);
        let cache = CachePolicy::seconds(SEARCH_TTL, vec!["search".to_owned()]);
        Fetched::new(
            self.get_json(url, &[("q", query.to_owned())]).await,
            cache,
        )
    }

    #[tracing::instrument(skip_all)]
    async fn submit_lead(&self, lead: &LeadRequest) -> ApiResult<LeadResponse> {
        let url = self.url(&["leads"]);
        let body = match serde_json::to_value(lead) {
            Ok(body) => body,
            Err(error) => {
                return ApiResult::failure(format!("lead serialization failed: {error}"), None)
            }
        };

        match self.post_json(url, &body).await {
            ApiResult::Success { data: Some(value) } => {
                match serde_json::from_value::<LeadResponse>(value) {
                    Ok(response) => ApiResult::success(response),
                    Err(error) => ApiResult::failure(
                        format!("unexpected lead response shape: {error}"),
                        None,
                    ),
                }
            }
            ApiResult::Success { data: None } => ApiResult::empty(),
            ApiResult::Failure { error, status } => ApiResult::Failure { error, status },
        }
    }
}
