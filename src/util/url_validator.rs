use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur while validating the relay (proxy) base URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP pointed at something other than the local machine.
    #[error("Insecure proxy URL: HTTPS required (except localhost for testing), got host {0}")]
    Insecure(String),
    /// The URL has no host component.
    #[error("Proxy URL has no host")]
    MissingHost,
}

/// Validates the base URL of the feed relay service.
///
/// The relay sees every feed URL we request, so it must be reached over
/// HTTPS. Plain HTTP is accepted only for loopback hosts, which is how
/// tests point the ingestor at a local mock server.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The URL cannot be parsed ([`UrlValidationError::InvalidUrl`])
/// - The scheme is not `http` or `https` ([`UrlValidationError::UnsupportedScheme`])
/// - The URL has no host ([`UrlValidationError::MissingHost`])
/// - The scheme is `http` and the host is not loopback ([`UrlValidationError::Insecure`])
///
/// # Examples
///
/// ```
/// use mediumfeed::util::validate_proxy_url;
///
/// assert!(validate_proxy_url("https://api.rss2json.com/v1/api.json").is_ok());
/// assert!(validate_proxy_url("http://127.0.0.1:8080/v1/api.json").is_ok());
/// assert!(validate_proxy_url("http://relay.example.com/api.json").is_err());
/// assert!(validate_proxy_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_proxy_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    let host = url
        .host_str()
        .ok_or(UrlValidationError::MissingHost)?
        .to_owned();

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback_host(&host) => {
            tracing::warn!(proxy = %url, "Using non-HTTPS proxy URL (localhost only)");
            Ok(url)
        }
        "http" => Err(UrlValidationError::Insecure(host)),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

fn is_loopback_host(host: &str) -> bool {
    if host == "localhost" {
        return true;
    }

    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    host_for_parse
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}
