//! Browsing helpers over a fetched batch of posts: filtering by category and
//! tag, newest-first ordering, pagination, featured teaser and slug lookup.
//!
//! Everything here is pure and works on borrowed posts, so a single fetch
//! can back several views.

use crate::feed::{Category, Post};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Posts per page on the full listing.
pub const DEFAULT_PER_PAGE: usize = 6;
/// Featured posts shown on the homepage teaser.
pub const TEASER_SIZE: usize = 3;
/// Width of the page-number window in pagination controls.
const PAGE_WINDOW: usize = 5;

// ============================================================================
// Facets
// ============================================================================

/// Distinct categories present in `posts`, sorted by display name.
pub fn categories(posts: &[Post]) -> Vec<Category> {
    let mut found: Vec<Category> = posts
        .iter()
        .map(|p| p.category)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    found.sort_by_key(|c| c.name());
    found
}

/// Distinct tags present in `posts`, sorted.
pub fn tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// Filter
// ============================================================================

/// Category and tag selection.
///
/// A post matches when the category is unset or equal, and either no tags
/// are selected or the post carries at least one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub category: Option<Category>,
    pub tags: Vec<String>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        let category_match = self.category.map_or(true, |c| post.category == c);
        let tag_match = self.tags.is_empty() || self.tags.iter().any(|t| post.tags.contains(t));
        category_match && tag_match
    }

    /// Matching posts, in input order.
    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.matches(p)).collect()
    }

    /// `None` selects every category.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    /// Adds `tag` to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.category = None;
        self.tags.clear();
    }

    pub fn is_active(&self) -> bool {
        self.category.is_some() || !self.tags.is_empty()
    }
}

/// `Showing 6 of 14 posts in "DevOps" tagged with "docker, aws"`.
pub fn summary_line(shown: usize, total: usize, filter: &PostFilter) -> String {
    let mut line = format!("Showing {shown} of {total} posts");
    if let Some(category) = filter.category {
        line.push_str(&format!(" in \"{category}\""));
    }
    if !filter.tags.is_empty() {
        line.push_str(&format!(" tagged with \"{}\"", filter.tags.join(", ")));
    }
    line
}

// ============================================================================
// Dates
// ============================================================================

/// Parses the publish dates seen in practice: RFC 3339 (the pinned article),
/// `YYYY-MM-DD HH:MM:SS` (rss2json, UTC) and RFC 2822 (raw RSS).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Long-form date, e.g. `September 14, 2025`. Unparseable input is
/// returned unchanged.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Stable sort, newest first. Posts with unparseable dates go last.
pub fn sort_newest_first<P: Borrow<Post>>(posts: &mut [P]) {
    posts.sort_by_cached_key(|p| Reverse(parse_date(&p.borrow().date)));
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a listing.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number, clamped into range.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    /// Slices page `page` (1-based) out of `all`. Out-of-range page numbers
    /// are clamped; `per_page` of 0 is treated as 1.
    pub fn of(all: &'a [T], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = all.len().div_ceil(per_page);
        let number = page.clamp(1, total_pages.max(1));
        let start = ((number - 1) * per_page).min(all.len());
        let end = (start + per_page).min(all.len());

        Self {
            items: &all[start..end],
            number,
            total_pages,
            total_items: all.len(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Page numbers to show in the controls: every page when there are at
    /// most five, otherwise a five-wide window starting two before the
    /// current page (narrower near the end).
    pub fn page_numbers(&self) -> Vec<usize> {
        if self.total_pages <= PAGE_WINDOW {
            return (1..=self.total_pages).collect();
        }
        let start = self.number.saturating_sub(2).max(1);
        let end = (start + PAGE_WINDOW - 1).min(self.total_pages);
        (start..=end).collect()
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Featured posts in input order, at most `max`.
pub fn featured(posts: &[Post], max: usize) -> Vec<&Post> {
    posts.iter().filter(|p| p.featured).take(max).collect()
}

/// Route key for a post: its slug, or `article-<id>` when the slug is empty.
pub fn route_key(post: &Post) -> String {
    if post.slug.is_empty() {
        format!("article-{}", post.id)
    } else {
        post.slug.clone()
    }
}

/// First post whose [`route_key`] equals `slug`.
pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|p| route_key(p) == slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: usize, category: Category, tags: &[&str], date: &str) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            excerpt: "...".into(),
            date: date.into(),
            read_time: "1 min read".into(),
            category,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured: id <= 2,
            slug: format!("post-{id}"),
            url: String::new(),
            medium_url: String::new(),
            author: "A".into(),
            thumbnail: String::new(),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post(1, Category::DevOps, &["docker", "aws"], "2025-01-10 09:00:00"),
            post(2, Category::Backend, &["laravel"], "2025-03-01 12:00:00"),
            post(3, Category::Backend, &["php", "docker"], "not a date"),
            post(4, Category::Frontend, &["react"], "2025-02-14T08:00:00.000Z"),
        ]
    }

    #[test]
    fn test_categories_sorted_by_name() {
        assert_eq!(
            categories(&sample()),
            vec![Category::Backend, Category::DevOps, Category::Frontend]
        );
    }

    #[test]
    fn test_categories_sort_uses_names_not_bucket_order() {
        let posts = vec![
            post(1, Category::Web, &[], ""),
            post(2, Category::Database, &[], ""),
            post(3, Category::Security, &[], ""),
        ];
        assert_eq!(
            categories(&posts),
            vec![Category::Database, Category::Security, Category::Web]
        );
    }

    #[test]
    fn test_tags_distinct_sorted() {
        assert_eq!(tags(&sample()), vec!["aws", "docker", "laravel", "php", "react"]);
    }

    #[test]
    fn test_filter_default_matches_all() {
        let posts = sample();
        let filter = PostFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&posts).len(), 4);
    }

    #[test]
    fn test_filter_category_and_tags() {
        let posts = sample();
        let mut filter = PostFilter::default();
        filter.set_category(Some(Category::Backend));
        assert_eq!(filter.apply(&posts).len(), 2);

        filter.toggle_tag("docker");
        let ids: Vec<usize> = filter.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_filter_tags_match_any() {
        let posts = sample();
        let mut filter = PostFilter::default();
        filter.toggle_tag("react");
        filter.toggle_tag("laravel");
        let ids: Vec<usize> = filter.apply(&posts).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_toggle_tag_twice_removes() {
        let mut filter = PostFilter::default();
        filter.toggle_tag("docker");
        filter.toggle_tag("docker");
        assert!(filter.tags.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut filter = PostFilter {
            category: Some(Category::DevOps),
            tags: vec!["aws".into()],
        };
        assert!(filter.is_active());
        filter.clear();
        assert_eq!(filter, PostFilter::default());
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(6, 14, &PostFilter::default()),
            "Showing 6 of 14 posts"
        );
        let filter = PostFilter {
            category: Some(Category::DevOps),
            tags: vec!["docker".into(), "aws".into()],
        };
        assert_eq!(
            summary_line(2, 2, &filter),
            r#"Showing 2 of 2 posts in "DevOps" tagged with "docker, aws""#
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let a = parse_date("2025-09-14T14:26:36.000Z").unwrap();
        let b = parse_date("2025-09-14 14:26:36").unwrap();
        let c = parse_date("Sun, 14 Sep 2025 14:26:36 GMT").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(parse_date("").is_none());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-09-14 14:26:36"), "September 14, 2025");
        assert_eq!(display_date("2025-03-01T00:00:00Z"), "March 1, 2025");
        assert_eq!(display_date("garbage"), "garbage");
    }

    #[test]
    fn test_sort_newest_first_unparseable_last() {
        let posts = sample();
        let mut refs: Vec<&Post> = posts.iter().collect();
        sort_newest_first(&mut refs);
        let ids: Vec<usize> = refs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut posts = vec![
            post(1, Category::Web, &[], "2025-01-01 00:00:00"),
            post(2, Category::Web, &[], "2025-01-01 00:00:00"),
        ];
        sort_newest_first(&mut posts);
        assert_eq!(posts[0].id, 1);
    }

    #[test]
    fn test_page_slicing() {
        let items: Vec<usize> = (1..=14).collect();
        let page = Page::of(&items, 3, 6);
        assert_eq!(page.items, [13, 14]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 14);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_clamps_out_of_range() {
        let items: Vec<usize> = (1..=7).collect();
        assert_eq!(Page::of(&items, 0, 6).number, 1);
        let last = Page::of(&items, 99, 6);
        assert_eq!(last.number, 2);
        assert_eq!(last.items, [7]);
    }

    #[test]
    fn test_page_empty() {
        let items: Vec<usize> = Vec::new();
        let page = Page::of(&items, 1, 6);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.number, 1);
        assert!(!page.has_previous());
        assert!(!page.has_next());
        assert!(page.page_numbers().is_empty());
    }

    #[test]
    fn test_page_numbers_small() {
        let items: Vec<usize> = (1..=20).collect();
        assert_eq!(Page::of(&items, 2, 6).page_numbers(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_page_numbers_window() {
        let items: Vec<usize> = (1..=60).collect(); // 10 pages
        assert_eq!(Page::of(&items, 1, 6).page_numbers(), vec![1, 2, 3, 4, 5]);
        assert_eq!(Page::of(&items, 5, 6).page_numbers(), vec![3, 4, 5, 6, 7]);
        // Window narrows at the end rather than shifting back
        assert_eq!(Page::of(&items, 10, 6).page_numbers(), vec![8, 9, 10]);
    }

    #[test]
    fn test_featured_teaser() {
        let posts = sample();
        let ids: Vec<usize> = featured(&posts, TEASER_SIZE).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(featured(&posts, 1).len(), 1);
    }

    #[test]
    fn test_find_by_slug() {
        let mut posts = sample();
        posts[3].slug.clear();
        assert_eq!(find_by_slug(&posts, "post-2").map(|p| p.id), Some(2));
        assert_eq!(find_by_slug(&posts, "article-4").map(|p| p.id), Some(4));
        assert!(find_by_slug(&posts, "post-4").is_none());
        assert!(find_by_slug(&posts, "missing").is_none());
    }
}
