use url::Url;

/// Public relay that converts an RSS feed to JSON and serves it with CORS
/// headers.
pub const DEFAULT_PROXY_URL: &str = "https://api.rss2json.com/v1/api.json";

/// Query parameter the relay reads the feed URL from.
const RSS_URL_PARAM: &str = "rss_url";

/// The feed URL shapes Medium serves for one author, in the order they are
/// tried. A leading `@` on `owner` is ignored.
///
/// # Examples
///
/// ```
/// use mediumfeed::feed::candidate_urls;
///
/// let urls = candidate_urls("@jane");
/// assert_eq!(urls[0], "https://medium.com/feed/@jane");
/// assert_eq!(urls[2], "https://jane.medium.com/feed");
/// ```
pub fn candidate_urls(owner: &str) -> [String; 3] {
    let owner = owner.trim();
    let owner = owner.strip_prefix('@').unwrap_or(owner);
    [
        format!("https://medium.com/feed/@{owner}"),
        format!("https://medium.com/@{owner}/feed"),
        format!("https://{owner}.medium.com/feed"),
    ]
}

/// Wraps `feed_url` in a relay request: `<proxy>?rss_url=<encoded feed_url>`.
///
/// Any query string already on `proxy` is preserved.
pub fn proxied_url(proxy: &Url, feed_url: &str) -> Url {
    let mut url = proxy.clone();
    url.query_pairs_mut().append_pair(RSS_URL_PARAM, feed_url);
    url
}
