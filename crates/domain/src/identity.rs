use serde::{Deserialize, Serialize};

/// Which upstream content family a geo-scoped path addresses.
///
/// Only two families carry the 5-slot geo/category/slug shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContentFamily {
    Blog,
    Services,
}

impl ContentFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFamily::Blog => "blog",
            ContentFamily::Services => "services",
        }
    }
}

/// Raw path tokens as the outer router produced them.
///
/// `city` is untrustworthy: upstream routing can omit it, duplicate the
/// state into it, or leave a mis-split category fragment in its slot. Only
/// the resolver may promote these tokens into a [`ResolvedIdentity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments {
    pub country: String,
    pub state: String,
    pub city: Option<String>,
    pub category: Option<String>,
    pub slug: String,
}

/// The disambiguated address of one piece of content.
///
/// Invariants: `slug` is always present; `category` is `None` only when no
/// category token was recoverable from the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub country: String,
    pub state: String,
    pub city: Option<String>,
    pub category: Option<String>,
    pub slug: String,
}

impl ResolvedIdentity {
    /// Canonical site path for this identity, e.g.
    /// `/blog/us/texas/austin/web-design/best-agency`. `None` segments are
    /// omitted rather than rendered as placeholders.
    pub fn canonical_path(&self, family: ContentFamily) -> String {
        let mut path = format!("/{}/{}/{}", family.as_str(), self.country, self.state);
        if let Some(city) = &self.city {
            path.push('/');
            path.push_str(city);
        }
        if let Some(category) = &self.category {
            path.push('/');
            path.push_str(category);
        }
        path.push('/');
        path.push_str(&self.slug);
        path
    }
}
