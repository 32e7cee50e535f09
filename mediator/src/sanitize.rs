//! Message body sanitization.
//!
//! Visitor-supplied content is reduced to a restricted allow-list before it
//! is interpolated into a template: paragraph and anchor elements only.
//! Every other tag is dropped (its inner text survives); anchors keep only
//! an `href` with an http, https, or mailto scheme, and a closing anchor
//! survives only when its opener was kept. A `<` that does not close is
//! escaped.

/// Allowed URL schemes on anchor `href` attributes.
const ALLOWED_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Sanitize a message body to paragraph and anchor markup.
pub fn sanitize_message(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    // Kept (not dropped) opening anchors still awaiting their close.
    let mut open_anchors = 0usize;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let Some(close) = after_open.find('>') else {
            // Unterminated tag: escape and stop scanning.
            out.push_str("&lt;");
            rest = after_open;
            continue;
        };

        let raw_tag = &after_open[..close];
        if let Some(tag) = rewrite_tag(raw_tag, &mut open_anchors) {
            out.push_str(&tag);
        }
        rest = &after_open[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Rewrite one tag body (the text between `<` and `>`) into its canonical
/// allowed form, or `None` when the tag is dropped. `open_anchors` pairs
/// each `</a>` with a kept opener; an orphan close is dropped.
fn rewrite_tag(raw: &str, open_anchors: &mut usize) -> Option<String> {
    let trimmed = raw.trim();
    let (closing, trimmed) = match trimmed.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let name: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    match (name.as_str(), closing) {
        ("p", false) => Some("<p>".to_string()),
        ("p", true) => Some("</p>".to_string()),
        ("a", true) => {
            *open_anchors = open_anchors.checked_sub(1)?;
            Some("</a>".to_string())
        }
        ("a", false) => {
            let href = extract_href(trimmed)?;
            *open_anchors += 1;
            Some(format!("<a href=\"{href}\">"))
        }
        _ => None,
    }
}

/// Pull a safe `href` value out of an anchor tag body. Any parse trouble or
/// disallowed scheme drops the attribute, which drops the tag.
fn extract_href(tag_body: &str) -> Option<String> {
    let lower = tag_body.to_lowercase();
    let at = lower.find("href")?;
    let after = tag_body[at + 4..].trim_start().strip_prefix('=')?.trim_start();

    let value = match after.chars().next()? {
        quote @ ('"' | '\'') => {
            let inner = &after[1..];
            &inner[..inner.find(quote)?]
        }
        _ => after.split_whitespace().next()?,
    };

    let value = value.trim();
    let lower_value = value.to_lowercase();
    if !ALLOWED_SCHEMES.iter().any(|s| lower_value.starts_with(s)) {
        return None;
    }
    if value.contains('"') || value.contains('<') || value.contains('>') {
        return None;
    }
    Some(value.to_string())
}
