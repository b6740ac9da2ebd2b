use serde::{Deserialize, Serialize};

/// One question/answer pair from upstream page data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A normalized page/post/story record.
///
/// Upstream treats records as loose dictionaries; here every optional field
/// is an explicit `Option` so fallback chains are checked at compile time
/// instead of discovered at runtime. Only `title` is expected to exist, and
/// even that is defaulted when upstream omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentRecord {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default, alias = "metaDescription")]
    pub meta_description: Option<String>,

    #[serde(default, alias = "contentHtml", alias = "content")]
    pub content_html: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub faqs: Vec<FaqEntry>,

    #[serde(default, alias = "authorName", alias = "author")]
    pub author_name: Option<String>,

    #[serde(default, alias = "publishedAt")]
    pub published_at: Option<String>,

    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<String>,

    #[serde(default, alias = "readTime", alias = "read_time")]
    pub read_time_minutes: Option<u32>,
}
