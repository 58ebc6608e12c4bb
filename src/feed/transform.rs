//! Pure mapping from relay items to [`Post`] records.

use super::types::{Category, Post, RawFeedItem};
use crate::util::{
    collapse_whitespace, compiled, strip_entities, strip_tags, truncate_chars, word_count,
};
use regex::Regex;
use std::sync::OnceLock;

/// Characters kept from the cleaned body before the ellipsis.
pub const EXCERPT_CHARS: usize = 200;
/// Reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;
/// Source categories kept as tags.
pub const MAX_TAGS: usize = 5;
/// Items at positions below this are flagged `featured`.
pub const FEATURED_COUNT: usize = 2;

/// Author used when an item names none.
pub const DEFAULT_AUTHOR: &str = "Achraf Chehboun";

/// Keyword rules for one category bucket.
struct CategoryRule {
    category: Category,
    /// Matched against lowercased tags, whole-tag equality.
    tags: &'static [&'static str],
    /// Matched against the lowercased title, substring containment.
    title: &'static [&'static str],
}

/// Checked top to bottom; first match wins. Anything unmatched is
/// [`Category::Web`].
const CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        category: Category::Backend,
        tags: &[
            "backend", "api", "server", "laravel", "php", "python", "django", "flask", "nodejs",
            "express",
        ],
        title: &["api", "backend", "server"],
    },
    CategoryRule {
        category: Category::Frontend,
        tags: &[
            "frontend",
            "react",
            "vue",
            "angular",
            "javascript",
            "css",
            "html",
            "ui",
            "ux",
        ],
        title: &["frontend", "react", "vue"],
    },
    CategoryRule {
        category: Category::Database,
        tags: &["database", "mysql", "postgresql", "mongodb", "sql", "nosql"],
        title: &["database", "sql"],
    },
    CategoryRule {
        category: Category::DevOps,
        tags: &[
            "devops",
            "docker",
            "kubernetes",
            "ci/cd",
            "deployment",
            "aws",
            "azure",
            "git",
        ],
        title: &["devops", "docker", "deployment"],
    },
    CategoryRule {
        category: Category::Security,
        tags: &[
            "security",
            "authentication",
            "authorization",
            "encryption",
            "cybersecurity",
        ],
        title: &["security", "auth"],
    },
];

/// Converts one relay item at `index` (0-based, within the limited batch)
/// into a [`Post`].
///
/// Missing fields flow through as empty strings; nothing here rejects an
/// item.
pub fn transform_item(item: &RawFeedItem, index: usize, default_author: &str) -> Post {
    let title = item.title.clone().unwrap_or_default();
    let body = item.body();
    let link = item.link.clone().unwrap_or_default();

    let author = [&item.author, &item.creator]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .find(|s| !s.is_empty())
        .unwrap_or(default_author)
        .to_string();

    Post {
        id: index + 1,
        excerpt: excerpt(body),
        date: item.pub_date.clone().unwrap_or_default(),
        read_time: format!("{} min read", read_time_minutes(body)),
        category: classify(&item.categories, &title),
        tags: item.categories.iter().take(MAX_TAGS).cloned().collect(),
        featured: index < FEATURED_COUNT,
        slug: slugify(&title),
        url: link.clone(),
        medium_url: link,
        author,
        thumbnail: item.thumbnail.clone().unwrap_or_default(),
        title,
    }
}

/// Plain-text teaser: tags and entities removed, whitespace collapsed,
/// first [`EXCERPT_CHARS`] characters, then `"..."` (always appended).
pub fn excerpt(html: &str) -> String {
    let text = strip_tags(html);
    let text = strip_entities(&text);
    let text = collapse_whitespace(&text);
    format!("{}...", truncate_chars(text.trim(), EXCERPT_CHARS))
}

/// Estimated minutes to read `html`, never less than 1.
pub fn read_time_minutes(html: &str) -> usize {
    word_count(&strip_tags(html))
        .div_ceil(WORDS_PER_MINUTE)
        .max(1)
}

/// Assigns a category from tags first, then title keywords, bucket by bucket.
pub fn classify(tags: &[String], title: &str) -> Category {
    let title = title.to_lowercase();
    let tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();

    CATEGORY_RULES
        .iter()
        .find(|rule| {
            tags.iter().any(|t| rule.tags.contains(&t.as_str()))
                || rule.title.iter().any(|kw| title.contains(kw))
        })
        .map(|rule| rule.category)
        .unwrap_or(Category::Web)
}

static RE_SLUG_DROP: OnceLock<Regex> = OnceLock::new();
static RE_SLUG_SPACE: OnceLock<Regex> = OnceLock::new();
static RE_SLUG_HYPHENS: OnceLock<Regex> = OnceLock::new();

/// URL slug from a title. Lossy: distinct titles can share a slug.
///
/// # Examples
///
/// ```
/// use mediumfeed::feed::slugify;
///
/// assert_eq!(slugify("10 Lessons I Learned!"), "10-lessons-i-learned");
/// ```
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = compiled(&RE_SLUG_DROP, r"[^a-z0-9\s-]").replace_all(&lower, "");
    let hyphenated = compiled(&RE_SLUG_SPACE, r"\s+").replace_all(&kept, "-");
    let collapsed = compiled(&RE_SLUG_HYPHENS, r"-+").replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}
