// src/unsubscribe.rs
//
// Best-effort unsubscribe link extraction. The structured List-Unsubscribe
// header is tried first, then anchor text in the HTML body, then URL patterns
// in the raw HTML.

use log::debug;
use mailparse::{parse_mail, MailHeaderMap, ParsedMail};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static HEADER_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap());

static BODY_URL_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)https?://[^\s<>"]+(?:unsubscribe|opt[_-]out)[^\s<>"]*"#).unwrap(),
        Regex::new(r#"(?i)https?://[^\s<>"]+(?:click\.notification)[^\s<>"]*"#).unwrap(),
    ]
});

/// Derive an unsubscribe URL from a raw message. Never fails: anything that
/// cannot be parsed or decoded yields `None`.
pub fn extract(raw: &[u8]) -> Option<String> {
    let mail = match parse_mail(raw) {
        Ok(mail) => mail,
        Err(e) => {
            debug!("Unparseable message, no unsubscribe link: {}", e);
            return None;
        }
    };

    if let Some(url) = from_list_unsubscribe(&mail) {
        return Some(url);
    }

    let part = first_html_part(&mail)?;
    let html = match part.get_body() {
        Ok(html) => html,
        Err(e) => {
            debug!("Could not decode text/html part: {}", e);
            return None;
        }
    };
    from_html(&html)
}

fn from_list_unsubscribe(mail: &ParsedMail<'_>) -> Option<String> {
    let value = mail.headers.get_first_value("List-Unsubscribe")?;
    HEADER_URL_RE.find(&value).map(|m| m.as_str().to_string())
}

/// Pre-order walk: the message itself, then each subpart depth-first.
fn first_html_part<'a>(part: &'a ParsedMail<'a>) -> Option<&'a ParsedMail<'a>> {
    if part.ctype.mimetype.eq_ignore_ascii_case("text/html") {
        return Some(part);
    }
    part.subparts.iter().find_map(first_html_part)
}

/// Anchor text first, then the URL patterns in order.
pub fn from_html(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Ok(anchor_sel) = Selector::parse("a") {
        for anchor in document.select(&anchor_sel) {
            let text: String = anchor.text().collect();
            if text.to_lowercase().contains("unsubscribe") {
                return anchor
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|href| !href.is_empty())
                    .map(String::from);
            }
        }
    }

    BODY_URL_RES
        .iter()
        .find_map(|re| re.find(html))
        .map(|m| m.as_str().to_string())
}
