//! Ambiguous-segment resolution for geo/category/slug paths.
//!
//! Paths of the shape `/country/state/city/category/slug` arrive mangled:
//! the outer router can drop `city`, duplicate `state` into it, or shift a
//! category fragment into the city slot. This module infers, from token
//! shape alone, what each slot actually denotes. The inference is a
//! heuristic, not a guarantee — upstream emitting an unambiguous route
//! shape would make all of this unnecessary.

use domain::identity::{PathSegments, ResolvedIdentity};

/// A genuine city name is almost always a single or un-hyphenated token.
pub const SWAP_CITY_MAX_HYPHENS: usize = 1;

/// A category slug minted for SEO paths is usually multi-word-hyphenated.
pub const SWAP_CATEGORY_MIN_HYPHENS: usize = 2;

/// Sentinel category meaning "no specific category". Nulled out here, but
/// preserved everywhere else: the upstream page lookup requires the literal
/// string, so the gateway re-substitutes it. The asymmetry is inherited
/// from upstream behavior and deliberately not unified.
pub const GENERAL_CATEGORY: &str = "general";

fn hyphens(token: &str) -> usize {
    token.matches('-').count()
}

/// Disambiguated `{city, category, slug}` triple. Merged into a full
/// [`ResolvedIdentity`] by [`resolve_segments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub city: Option<String>,
    pub category: Option<String>,
    pub slug: String,
}

/// Infer what the `city`/`category`/`slug` tokens actually denote.
///
/// Pure function of its inputs; idempotent when re-applied to its own
/// output. Precedence order matters — first match wins.
#[tracing::instrument(skip_all)]
pub fn resolve(city: Option<&str>, category: Option<&str>, slug: &str) -> Resolved {
    // -------------------------------------------------------------
    // Step 1: category duplicates slug — malformed upstream route
    //         where the same token landed in both slots.
    // -------------------------------------------------------------
    if let Some(cat) = category {
        if cat.eq_ignore_ascii_case(slug) {
            return Resolved {
                city: city.map(str::to_owned),
                category: None,
                slug: slug.to_owned(),
            };
        }
    }

    // -------------------------------------------------------------
    // Step 2: city/category swap. A short token in the city slot
    //         next to a heavily hyphenated "category" means the slots
    //         shifted left: city holds the category and category
    //         holds the slug. Hyphen counts are literal `-` counts.
    // -------------------------------------------------------------
    if let (Some(city), Some(cat)) = (city, category) {
        if hyphens(city) <= SWAP_CITY_MAX_HYPHENS && hyphens(cat) >= SWAP_CATEGORY_MIN_HYPHENS {
            let category = if city.eq_ignore_ascii_case(GENERAL_CATEGORY) {
                None
            } else {
                Some(city.to_owned())
            };
            return Resolved {
                city: None,
                category,
                slug: cat.to_owned(),
            };
        }
    }

    // -------------------------------------------------------------
    // Step 3: tokens already denote what their slots claim.
    // -------------------------------------------------------------
    Resolved {
        city: city.map(str::to_owned),
        category: category.map(str::to_owned),
        slug: slug.to_owned(),
    }
}

/// Split a wildcard-route remainder into raw path segments.
///
/// Accepts the 5-token `country/state/city/category/slug` form and the
/// 4-token form where the router collapsed `city` away. Anything else is
/// not a geo content path.
#[tracing::instrument(skip_all)]
pub fn split_path(raw: &str) -> Option<PathSegments> {
    let tokens: Vec<&str> = raw
        .trim_matches('/')
        .split('/')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [country, state, city, category, slug] => Some(PathSegments {
            country: (*country).to_owned(),
            state: (*state).to_owned(),
            city: Some((*city).to_owned()),
            category: Some((*category).to_owned()),
            slug: (*slug).to_owned(),
        }),
        [country, state, category, slug] => Some(PathSegments {
            country: (*country).to_owned(),
            state: (*state).to_owned(),
            city: None,
            category: Some((*category).to_owned()),
            slug: (*slug).to_owned(),
        }),
        _ => None,
    }
}

/// Full pipeline entry: split tokens, disambiguate, and merge the stable
/// country/state prefix back in.
#[tracing::instrument(skip_all)]
pub fn resolve_segments(segments: &PathSegments) -> ResolvedIdentity {
    let resolved = resolve(
        segments.city.as_deref(),
        segments.category.as_deref(),
        &segments.slug,
    );
    ResolvedIdentity {
        country: segments.country.clone(),
        state: segments.state.clone(),
        city: resolved.city,
        category: resolved.category,
        slug: resolved.slug,
    }
}
