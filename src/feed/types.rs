use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Wire Types (rss2json relay)
// ============================================================================

/// Top-level JSON envelope returned by the relay.
///
/// Both fields are optional: a relay error page or a half-empty response
/// still deserializes, and the fetcher decides what counts as usable.
#[derive(Debug, Default, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,

    /// Kept as raw JSON values so one odd entry cannot fail the whole batch.
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
}

impl FeedEnvelope {
    /// True when the relay reported `"status": "ok"`.
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

/// A single feed item as served by the relay. Untrusted: any field may be
/// missing, and a field holding the wrong JSON type is read as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFeedItem {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "content:encoded", deserialize_with = "lenient_string")]
    pub content_encoded: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(rename = "pubDate", deserialize_with = "lenient_string")]
    pub pub_date: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub link: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(rename = "dc:creator", deserialize_with = "lenient_string")]
    pub creator: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub thumbnail: Option<String>,
}

impl RawFeedItem {
    /// Builds an item from an arbitrary JSON value.
    ///
    /// Non-object values (`null`, numbers, arrays) yield an item with every
    /// field absent rather than an error.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// HTML body used for the excerpt and read time: the first non-empty of
    /// `description`, `content:encoded`, `content`.
    pub fn body(&self) -> &str {
        [&self.description, &self.content_encoded, &self.content]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ============================================================================
// Category
// ============================================================================

/// Topic bucket assigned to every post.
///
/// Variant order is the classification order: earlier buckets win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Backend,
    Frontend,
    Database,
    DevOps,
    Security,
    Web,
}

impl Category {
    /// All categories in classification order.
    pub const ALL: [Category; 6] = [
        Category::Backend,
        Category::Frontend,
        Category::Database,
        Category::DevOps,
        Category::Security,
        Category::Web,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Backend => "Backend Development",
            Category::Frontend => "Frontend Development",
            Category::Database => "Database",
            Category::DevOps => "DevOps",
            Category::Security => "Security",
            Category::Web => "Web Development",
        }
    }

    /// Looks a category up by display name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Category::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category: {name}")))
    }
}

// ============================================================================
// Post
// ============================================================================

/// A normalized blog post.
///
/// Serializes with the field names the site templates consume
/// (`readTime`, `mediumUrl`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// 1-based position in the fetched batch. Not stable across fetches.
    pub id: usize,
    pub title: String,
    pub excerpt: String,
    /// Publish timestamp exactly as the feed gave it.
    pub date: String,
    /// `"N min read"`, N >= 1.
    pub read_time: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub featured: bool,
    pub slug: String,
    pub url: String,
    pub medium_url: String,
    pub author: String,
    pub thumbnail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_status_ok() {
        let env: FeedEnvelope = serde_json::from_value(json!({"status": "ok", "items": []})).unwrap();
        assert!(env.is_ok());
        assert_eq!(env.items.map(|i| i.len()), Some(0));
    }

    #[test]
    fn test_envelope_missing_fields() {
        let env: FeedEnvelope = serde_json::from_value(json!({})).unwrap();
        assert!(!env.is_ok());
        assert!(env.items.is_none());
    }

    #[test]
    fn test_envelope_status_wrong_type() {
        let env: FeedEnvelope = serde_json::from_value(json!({"status": 200})).unwrap();
        assert!(!env.is_ok());
    }

    #[test]
    fn test_raw_item_full() {
        let item = RawFeedItem::from_value(json!({
            "title": "Hello",
            "pubDate": "2025-09-14 14:26:36",
            "link": "https://medium.com/@me/hello",
            "author": "Me",
            "thumbnail": "https://cdn/img.png",
            "description": "<p>Body</p>",
            "content": "<p>Body</p>",
            "categories": ["rust", "web"]
        }));
        assert_eq!(item.title.as_deref(), Some("Hello"));
        assert_eq!(item.pub_date.as_deref(), Some("2025-09-14 14:26:36"));
        assert_eq!(item.categories, vec!["rust", "web"]);
        assert_eq!(item.body(), "<p>Body</p>");
    }

    #[test]
    fn test_raw_item_wrong_types_read_as_missing() {
        let item = RawFeedItem::from_value(json!({
            "title": 42,
            "categories": "not-a-list",
            "thumbnail": {"url": "x"},
            "link": null
        }));
        assert!(item.title.is_none());
        assert!(item.categories.is_empty());
        assert!(item.thumbnail.is_none());
        assert!(item.link.is_none());
    }

    #[test]
    fn test_raw_item_mixed_categories_keeps_strings() {
        let item = RawFeedItem::from_value(json!({"categories": ["a", 1, null, "b"]}));
        assert_eq!(item.categories, vec!["a", "b"]);
    }

    #[test]
    fn test_raw_item_non_object() {
        let item = RawFeedItem::from_value(json!(null));
        assert!(item.title.is_none());
        let item = RawFeedItem::from_value(json!([1, 2]));
        assert!(item.categories.is_empty());
    }

    #[test]
    fn test_body_skips_empty_description() {
        let item = RawFeedItem::from_value(json!({
            "description": "",
            "content:encoded": "<p>encoded</p>",
            "content": "<p>plain</p>"
        }));
        assert_eq!(item.body(), "<p>encoded</p>");
    }

    #[test]
    fn test_body_empty_when_absent() {
        assert_eq!(RawFeedItem::default().body(), "");
    }

    #[test]
    fn test_category_names_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::from_name(c.name()), Some(c));
        }
        assert_eq!(Category::from_name("devops"), Some(Category::DevOps));
        assert_eq!(Category::from_name("Gardening"), None);
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post {
            id: 1,
            title: "T".into(),
            excerpt: "E...".into(),
            date: "2025-01-01".into(),
            read_time: "1 min read".into(),
            category: Category::DevOps,
            tags: vec![],
            featured: true,
            slug: "t".into(),
            url: "u".into(),
            medium_url: "u".into(),
            author: "A".into(),
            thumbnail: String::new(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["readTime"], "1 min read");
        assert_eq!(value["mediumUrl"], "u");
        assert_eq!(value["category"], "DevOps");
    }
}
