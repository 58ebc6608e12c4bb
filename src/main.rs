use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use mediumfeed::config::Config;
use mediumfeed::feed::{Category, FeedIngestor, Post};
use mediumfeed::listing::{self, Page, PostFilter, TEASER_SIZE};

/// Get the config directory path (~/.config/mediumfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("mediumfeed"))
}

#[derive(Parser, Debug)]
#[command(name = "mediumfeed", about = "Medium posts via the rss2json relay")]
struct Args {
    /// Config file (default: ~/.config/mediumfeed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Medium handle, overrides `owner` from the config file
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List posts, newest first, with optional filters and paging
    List {
        /// Posts to fetch
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,

        /// Only posts in this category (e.g. "DevOps")
        #[arg(long)]
        category: Option<String>,

        /// Only posts carrying any of these tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Page number, 1-based
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Fail instead of serving the pinned fallback article
        #[arg(long)]
        strict: bool,
    },

    /// Featured posts, as shown on the homepage
    Featured {
        /// Posts to fetch
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one post by slug (or `article-<id>`)
    Show {
        slug: String,

        /// Posts to search
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump the relay's raw response for the primary feed URL
    Raw,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let Some(owner) = args.owner.clone().or_else(|| config.owner.clone()) else {
        eprintln!("Error: No Medium handle configured.");
        eprintln!();
        eprintln!("Pass one on the command line:");
        eprintln!("  mediumfeed --owner yourhandle list");
        eprintln!();
        eprintln!("Or set `owner = \"yourhandle\"` in {}", config_path.display());
        std::process::exit(1);
    };

    let mut client = reqwest::Client::builder();
    if config.request_timeout_secs > 0 {
        client = client.timeout(Duration::from_secs(config.request_timeout_secs));
    }
    let client = client.build().context("Failed to build HTTP client")?;

    let ingestor = FeedIngestor::new(client, &config.proxy_base_url)
        .with_context(|| format!("Invalid proxy_base_url {:?}", config.proxy_base_url))?
        .with_default_author(config.default_author.clone());

    match args.command {
        Command::List {
            limit,
            category,
            tags,
            page,
            json,
            strict,
        } => {
            let category = category.map(|name| parse_category(&name)).transpose()?;
            let posts = if strict {
                ingestor
                    .fetch_live(&owner, usize::from(limit))
                    .await
                    .context("Could not read the Medium feed")?
            } else {
                ingestor.fetch(&owner, usize::from(limit)).await
            };
            let filter = PostFilter { category, tags };
            print_listing(&posts, &filter, page, config.posts_per_page, json)?;
        }
        Command::Featured { limit, json } => {
            let posts = ingestor.fetch(&owner, usize::from(limit)).await;
            let teaser = listing::featured(&posts, TEASER_SIZE);
            if json {
                println!("{}", serde_json::to_string_pretty(&teaser)?);
            } else {
                for post in teaser {
                    print_card(post);
                }
            }
        }
        Command::Show { slug, limit, json } => {
            let posts = ingestor.fetch(&owner, usize::from(limit)).await;
            let Some(post) = listing::find_by_slug(&posts, &slug) else {
                eprintln!("Error: No article with slug '{}'", slug);
                std::process::exit(1);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(post)?);
            } else {
                print_article(post);
            }
        }
        Command::Raw => match ingestor.fetch_raw(&owner).await {
            Ok(data) => {
                let items_count = data
                    .get("items")
                    .and_then(|v| v.as_array())
                    .map_or(0, Vec::len);
                let report = serde_json::json!({
                    "success": true,
                    "data": data,
                    "itemsCount": items_count,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(e) => {
                tracing::error!(owner = %owner, error = %e, "Raw relay fetch failed");
                let report = serde_json::json!({ "success": false, "error": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&report)?);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn parse_category(name: &str) -> Result<Category> {
    Category::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        anyhow::anyhow!(
            "Unknown category '{}'. Expected one of: {}",
            name,
            known.join(", ")
        )
    })
}

fn print_listing(
    posts: &[Post],
    filter: &PostFilter,
    page: usize,
    per_page: usize,
    json: bool,
) -> Result<()> {
    let mut matching = filter.apply(posts);
    listing::sort_newest_first(&mut matching);
    let page = Page::of(&matching, page, per_page);

    if json {
        let report = serde_json::json!({
            "page": page.number,
            "totalPages": page.total_pages,
            "totalPosts": page.total_items,
            "categories": listing::categories(posts),
            "tags": listing::tags(posts),
            "posts": page.items,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}",
        listing::summary_line(page.items.len(), page.total_items, filter)
    );
    println!();
    for post in page.items {
        print_card(post);
    }

    if page.total_pages > 1 {
        let numbers: Vec<String> = page
            .page_numbers()
            .into_iter()
            .map(|n| {
                if n == page.number {
                    format!("[{n}]")
                } else {
                    n.to_string()
                }
            })
            .collect();
        println!(
            "{} {} {}",
            if page.has_previous() { "< prev" } else { "      " },
            numbers.join(" "),
            if page.has_next() { "next >" } else { "" }
        );
    }

    Ok(())
}

fn print_card(post: &Post) {
    let badge = if post.featured { "★ " } else { "" };
    println!("{}{} [{}]", badge, post.title, post.category);
    println!(
        "  {} · {} · {}",
        listing::display_date(&post.date),
        post.read_time,
        listing::route_key(post)
    );
    println!("  {}", post.excerpt);
    if !post.tags.is_empty() {
        println!("  #{}", post.tags.join(" #"));
    }
    println!();
}

fn print_article(post: &Post) {
    print_card(post);
    println!("  By {}", post.author);
    if !post.medium_url.is_empty() {
        println!("  Read on Medium: {}", post.medium_url);
    }
    if !post.thumbnail.is_empty() {
        println!("  Image: {}", post.thumbnail);
    }
}
