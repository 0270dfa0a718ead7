use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// Plain HTTP was requested for a non-local API endpoint.
    #[error("Insecure API base URL: HTTPS required (except localhost for testing)")]
    InsecureApiBase,
}

/// Validates a URL string for use as a feed source.
///
/// Only `http` and `https` URLs with a host are accepted. The feed URL is
/// operator-supplied, so private and loopback addresses are allowed.
///
/// # Examples
///
/// ```
/// use rssbot::util::validate_feed_url;
///
/// assert!(validate_feed_url("https://example.com/rss").is_ok());
/// assert!(validate_feed_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_feed_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if !matches!(url.host_str(), Some(host) if !host.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validates the Telegram Bot API base URL.
///
/// The bot token is part of every request path, so the base must be HTTPS.
/// Plain HTTP is tolerated only for `localhost` and `127.0.0.1`, which is what
/// mock servers bind to in tests.
pub fn validate_api_base(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = validate_feed_url(url_str)?;

    if url.scheme() == "http" {
        let is_localhost = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
        if !is_localhost {
            tracing::error!(base_url = %url, "Rejecting non-HTTPS API base URL");
            return Err(UrlValidationError::InsecureApiBase);
        }
        tracing::warn!(base_url = %url, "Using non-HTTPS API base URL (localhost only)");
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_feed_urls() {
        assert!(validate_feed_url("https://example.com/feed.xml").is_ok());
        assert!(validate_feed_url("http://news.example.org").is_ok());
        assert!(validate_feed_url("  https://example.com/rss  ").is_ok());
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_feed_url("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_feed_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_unparseable_url() {
        assert!(matches!(
            validate_feed_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_local_feed_allowed() {
        assert!(validate_feed_url("http://127.0.0.1:8080/feed").is_ok());
        assert!(validate_feed_url("http://192.168.1.1/feed").is_ok());
    }

    #[test]
    fn test_https_api_base_allowed() {
        let url = validate_api_base("https://api.telegram.org").unwrap();
        assert_eq!(url.host_str(), Some("api.telegram.org"));
    }

    #[test]
    fn test_http_api_base_rejected() {
        assert!(matches!(
            validate_api_base("http://api.telegram.org"),
            Err(UrlValidationError::InsecureApiBase)
        ));
    }

    #[test]
    fn test_localhost_api_base_allowed() {
        assert!(validate_api_base("http://127.0.0.1:4567").is_ok());
        assert!(validate_api_base("http://localhost:4567").is_ok());
    }
}
