use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during store URL validation.
///
/// A store URL is the base of every `g:link` in the feed, so it has to be
/// an absolute address a shopping crawler can actually reach.
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
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not reachable by crawlers: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not reachable by crawlers")]
    Localhost,
}

/// Validates a store's public base URL.
///
/// Rejects:
/// - Non-HTTP(S) schemes (e.g., `file://`, `ftp://`)
/// - URLs without a host
/// - Localhost addresses (`localhost`, `127.0.0.1`, `::1`)
/// - Private IP ranges (RFC 1918, link-local, unique local IPv6)
///
/// # Errors
///
/// Returns [`UrlValidationError`] describing the first failed check.
///
/// # Examples
///
/// ```
/// use shopfeed::util::validate_store_url;
///
/// let url = validate_store_url("https://acme.test").unwrap();
/// assert_eq!(url.host_str(), Some("acme.test"));
///
/// assert!(validate_store_url("http://localhost:3000").is_err());
/// assert!(validate_store_url("acme.test").is_err());
/// ```
pub fn validate_store_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    let host = url.host_str().ok_or(UrlValidationError::MissingHost)?;
    if host == "localhost" {
        return Err(UrlValidationError::Localhost);
    }

    // Strip brackets from IPv6 addresses for parsing
    let host_for_parse = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
        if ip.is_loopback() {
            return Err(UrlValidationError::Localhost);
        }
        if is_private_ip(&ip) {
            return Err(UrlValidationError::PrivateIp(ip.to_string()));
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_loopback() || ipv6.is_unspecified() {
                return true;
            }
            let first = ipv6.segments()[0];
            // Unique Local (fc00::/7)
            let is_unique_local = (first & 0xfe00) == 0xfc00;
            // Link-Local (fe80::/10)
            let is_link_local = (first & 0xffc0) == 0xfe80;
            is_unique_local || is_link_local
        }
    }
}
