//! E-mail bodies.

use crate::common::ReportId;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Minimal HTML escaping for user supplied values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn report_url(app_base_url: &str, report_id: ReportId) -> String {
    format!("{}/report/{}", app_base_url.trim_end_matches('/'), report_id)
}

/// "Your VOC report is ready" notification.
pub fn report_ready(business_name: &str, app_base_url: &str, report_id: ReportId) -> RenderedEmail {
    let url = report_url(app_base_url, report_id);
    let name = escape_html(business_name);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: -apple-system, Segoe UI, Helvetica, Arial, sans-serif; color: #111827;">
    <h1 style="font-size: 20px;">Your Voice of Customer report is ready</h1>
    <p>We finished analysing customer reviews for <strong>{name}</strong>.</p>
    <p>See what customers praise, what they complain about, and how sentiment is trending.</p>
    <p>
      <a href="{url}" style="display: inline-block; padding: 10px 18px; background: #4f46e5; color: #ffffff; border-radius: 6px; text-decoration: none;">View report</a>
    </p>
    <p style="font-size: 12px; color: #6b7280;">Or open this link: {url}</p>
  </body>
</html>"#
    );

    let text = format!(
        "Your Voice of Customer report for {} is ready.\n\nView it here: {}\n",
        business_name, url
    );

    RenderedEmail {
        subject: format!("Your VOC report for {} is ready", business_name),
        html,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ready_links_to_report() {
        let id = ReportId::new();
        let email = report_ready("Acme <Coffee>", "https://app.execli.com/", id);
        let link = format!("https://app.execli.com/report/{}", id);

        assert!(email.html.contains(&link));
        assert!(email.text.contains(&link));
        assert!(email.html.contains("Acme &lt;Coffee&gt;"));
        assert_eq!(email.subject, "Your VOC report for Acme <Coffee> is ready");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
