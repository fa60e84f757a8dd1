use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    // RFC 5322 simplified, anchored to the whole input
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Lower-cased, trimmed e-mail used as the lookup key for accounts and companies.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalize a user supplied business URL.
///
/// Adds `https://` when the scheme is missing, drops fragments and a trailing
/// slash on the root path. Only http(s) URLs with a host are accepted.
pub fn normalize_business_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("URL is empty");
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).with_context(|| format!("Invalid URL: {}", trimmed))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("Unsupported URL scheme: {}", url.scheme());
    }
    match url.host_str() {
        Some(host) if host.contains('.') || host == "localhost" => {}
        _ => bail!("URL has no valid host: {}", trimmed),
    }
    url.set_fragment(None);

    let mut normalized = url.to_string();
    if url.path() == "/" && url.query().is_none() {
        normalized.pop();
    }
    Ok(normalized)
}

/// Lower-cased host of a URL without a leading `www.`.
pub fn url_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("owner@shop.com"));
        assert!(is_valid_email("  First.Last+tag@sub.example.co.uk "));
        assert!(!is_valid_email("owner@shop"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email("a@b.com extra"));
    }

    #[test]
    fn adds_scheme_and_strips_root_slash() {
        assert_eq!(normalize_business_url("acme.com").unwrap(), "https://acme.com");
        assert_eq!(
            normalize_business_url("http://www.acme.com/").unwrap(),
            "http://www.acme.com"
        );
    }

    #[test]
    fn keeps_paths_and_drops_fragments() {
        assert_eq!(
            normalize_business_url("https://www.trustpilot.com/review/acme.com#reviews").unwrap(),
            "https://www.trustpilot.com/review/acme.com"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(normalize_business_url("").is_err());
        assert!(normalize_business_url("ftp://acme.com").is_err());
        assert!(normalize_business_url("https://acme").is_err());
    }

    #[test]
    fn host_strips_www() {
        let url = Url::parse("https://www.Yelp.com/biz/x").unwrap();
        assert_eq!(url_host(&url).as_deref(), Some("yelp.com"));
        let url = Url::parse("mailto:owner@acme.com").unwrap();
        assert_eq!(url_host(&url), None);
    }
}
