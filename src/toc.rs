//! Anchor-link and table-of-contents helpers for the Markdown renderer.

/// Render a cross-reference as a markdown link.
///
/// Names that already are markdown links pass through untouched; bare URLs
/// are wrapped; everything else links to the anchor slug of the name.
pub fn render_link(text: &str) -> String {
    if contains_markdown_link(text) {
        return text.to_string();
    }
    if let Some(wrapped) = wrap_bare_url(text) {
        return wrapped;
    }
    format!("[{}](#{})", text, anchor_slug(text))
}

/// Generate a TOC list item.
pub fn render_toc_item(title: &str) -> String {
    format!("* [{}](#{})", title, anchor_slug(title))
}

/// Anchor slug for a display name.
///
/// Lowercase the name, drop every character that is not alphanumeric, space,
/// or underscore, then collapse whitespace runs into single hyphens.
pub fn anchor_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() {
            if !slug.is_empty() {
                pending_space = true;
            }
        } else if c.is_alphanumeric() || c == '_' {
            if pending_space {
                slug.push('-');
                pending_space = false;
            }
            slug.push(c);
        }
    }
    slug
}

/// Check if text contains a markdown link `[...](...)`.
fn contains_markdown_link(text: &str) -> bool {
    if let Some(open) = text.find('[') {
        if let Some(close) = text[open + 1..].find(']') {
            return text[open + 1 + close + 1..].starts_with('(');
        }
    }
    false
}

/// Wrap the first bare URL in markdown link syntax, if any.
fn wrap_bare_url(text: &str) -> Option<String> {
    for pattern in ["http://", "https://", "ftp://"] {
        if let Some(start) = text.find(pattern) {
            let tail = &text[start..];
            let end = tail
                .find(|c: char| c.is_whitespace())
                .unwrap_or(tail.len());
            let url = &text[start..start + end];
            return Some(text.replacen(url, &format!("[{url}]({url})"), 1));
        }
    }
    None
}
