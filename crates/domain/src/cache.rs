/// How long a cached response may be served before refetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revalidate {
    Seconds(u32),
    /// Never serve from cache; the stories list changes on every generate.
    Always,
}

/// Cache directives declared per upstream call.
///
/// This subsystem never stores or evicts anything itself — it only hands
/// the hosting layer a max-age and a set of invalidation tags keyed by
/// content identity, so a targeted upstream change can purge one entry
/// without flushing unrelated ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub revalidate: Revalidate,
    pub tags: Vec<String>,
}

impl CachePolicy {
    pub fn seconds(secs: u32, tags: Vec<String>) -> Self {
        Self {
            revalidate: Revalidate::Seconds(secs),
            tags,
        }
    }

    pub fn always_fresh(tags: Vec<String>) -> Self {
        Self {
            revalidate: Revalidate::Always,
            tags,
        }
    }

    /// `Cache-Control` header value for this policy.
    pub fn cache_control(&self) -> String {
        match self.revalidate {
            Revalidate::Seconds(secs) => format!("public, max-age={secs}"),
            Revalidate::Always => "no-store".to_owned(),
        }
    }

    /// `Cache-Tag` header value, or `None` when no tags were declared.
    pub fn cache_tag(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(","))
        }
    }
}
