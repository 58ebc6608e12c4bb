use super::types::{Category, Post};

const SLUG: &str = "10-lessons-i-learned-from-my-first-laravel-project";

/// The pinned article served when every feed source fails.
///
/// Always a single record, whatever limit the caller asked for.
pub fn fallback_posts() -> Vec<Post> {
    vec![Post {
        id: 1,
        title: "10 Lessons I Learned from My First Laravel Project".to_string(),
        excerpt: "When I started my very first Laravel project, I had no idea what I was \
                  getting myself into. I thought it would be just another PHP framework, but \
                  it turned out to be much more. From excitement to frustration, I went \
                  through every emotion while trying to build something that actually worked."
            .to_string(),
        date: "2025-09-14T14:26:36.000Z".to_string(),
        read_time: "3 min read".to_string(),
        category: Category::Backend,
        tags: vec![
            "laravel-framework".to_string(),
            "laravel".to_string(),
            "coding".to_string(),
        ],
        featured: true,
        slug: SLUG.to_string(),
        url: format!("/blog/{SLUG}"),
        medium_url: "https://medium.com/@ashrafchehboun/10-lessons-i-learned-from-my-first-laravel-project-729a35e143b4"
            .to_string(),
        author: "sha9orono".to_string(),
        thumbnail: String::new(),
    }]
}
