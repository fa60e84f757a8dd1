//! Review platform detection from URLs.

use url::Url;

use crate::common::utils::url_host;

/// Platform name for a review-site URL, or `None` for any other site.
pub fn detect_source_from_url(input: &str) -> Option<&'static str> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url_host(&url)?;
    let path = url.path().to_lowercase();

    let on = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));

    let source = if on("trustpilot.com") {
        "trustpilot"
    } else if on("g.page")
        || on("business.google.com")
        || on("maps.google.com")
        || on("maps.app.goo.gl")
        || (on("goo.gl") && path.starts_with("/maps"))
        || (host.starts_with("google.") || host.contains(".google.")) && path.starts_with("/maps")
    {
        "google"
    } else if on("play.google.com") {
        "google_play"
    } else if on("apps.apple.com") {
        "app_store"
    } else if on("yelp.com") || host.starts_with("yelp.") {
        "yelp"
    } else if on("tripadvisor.com") || host.starts_with("tripadvisor.") {
        "tripadvisor"
    } else if on("facebook.com") || on("fb.com") {
        "facebook"
    } else if on("g2.com") {
        "g2"
    } else if on("capterra.com") {
        "capterra"
    } else if on("amazon.com") || host.starts_with("amazon.") {
        "amazon"
    } else if on("booking.com") {
        "booking"
    } else if on("glassdoor.com") || host.starts_with("glassdoor.") {
        "glassdoor"
    } else if on("reddit.com") {
        "reddit"
    } else if on("bbb.org") {
        "bbb"
    } else {
        return None;
    };

    Some(source)
}

/// Distinct platforms detected in `urls`, in first-seen order.
pub fn detect_sources<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for source in urls.into_iter().filter_map(detect_source_from_url) {
        if !found.iter().any(|s| s == source) {
            found.push(source.to_string());
        }
    }
    found
}
