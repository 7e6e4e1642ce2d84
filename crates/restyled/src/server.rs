//! Server-side critical-CSS extraction.
//!
//! After rendering markup to an HTML string, [`extract_critical`] pulls out
//! just the rules whose generated class names actually appear in that HTML,
//! and [`render_style`] wraps them in a style tag ready for injection into
//! the document head.
//!
//! Both take the cache explicitly. Extraction only makes sense against the
//! cache the markup was rendered with, and there is no ambient cache to fall
//! back on here; passing the wrong one yields an empty extraction, not a
//! confusing partial match.

use crate::cache::StyleCache;
use crate::serialize::strip_labels;

/// The critical subset of a cache's styles for one rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Critical {
    /// Rule text for every class found in the HTML, in first-appearance order.
    pub css: String,
    /// The serial keys of those classes, in the same order.
    pub ids: Vec<String>,
}

/// Extracts the rules whose class names occur in `html`.
///
/// Class names are matched as whole tokens: `css-1abc` does not match inside
/// `css-1abcdef`. Keys are returned without the cache prefix, mirroring how
/// they were generated.
pub fn extract_critical(html: &str, cache: &StyleCache) -> Critical {
    let prefix = format!("{}-", cache.key());

    let mut found: Vec<(usize, String, String)> = Vec::new();
    for (class, body) in cache.registered_snapshot() {
        if !class.starts_with(&prefix) {
            continue;
        }
        if let Some(pos) = find_class_token(html, &class) {
            let id = class[prefix.len()..].to_string();
            let rule = format!(".{}{{{}}}", class, strip_labels(&body));
            found.push((pos, id, rule));
        }
    }
    found.sort_by_key(|(pos, _, _)| *pos);

    let mut css = String::new();
    let mut ids = Vec::with_capacity(found.len());
    for (_, id, rule) in found {
        css.push_str(&rule);
        ids.push(id);
    }
    Critical { css, ids }
}

/// Renders the critical styles for `html` as a style tag:
/// `<style data-emotion-<prefix>="<space-joined ids>">…</style>`.
pub fn render_style(html: &str, cache: &StyleCache) -> String {
    let Critical { css, ids } = extract_critical(html, cache);
    format!(
        "<style data-emotion-{}=\"{}\">{}</style>",
        cache.key(),
        ids.join(" "),
        css
    )
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn find_class_token(html: &str, class: &str) -> Option<usize> {
    let mut start = 0;
    while let Some(rel) = html[start..].find(class) {
        let pos = start + rel;
        let before_ok = html[..pos]
            .chars()
            .next_back()
            .map(|c| !is_ident_char(c))
            .unwrap_or(true);
        let after_ok = html[pos + class.len()..]
            .chars()
            .next()
            .map(|c| !is_ident_char(c))
            .unwrap_or(true);
        if before_ok && after_ok {
            return Some(pos);
        }
        start = pos + class.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderContext, RenderInput};
    use crate::styled::styled;

    #[test]
    fn test_extracts_only_classes_present_in_html() {
        let ctx = RenderContext::detached();
        let used = styled("button").unwrap().styles("color: red;");
        let unused = styled("div").unwrap().styles("color: blue;");

        let html = used.render(&ctx, RenderInput::new()).to_html();
        // Render the unused definition too, so its rule is in the cache but
        // its class is absent from this document.
        unused.render(&ctx, RenderInput::new());

        let critical = extract_critical(&html, ctx.cache());
        assert_eq!(critical.ids.len(), 1);
        assert!(critical.css.contains("color: red;"));
        assert!(!critical.css.contains("color: blue;"));
    }

    #[test]
    fn test_ids_follow_document_order() {
        let ctx = RenderContext::detached();
        let first = styled("header").unwrap().styles("color: red;");
        let second = styled("footer").unwrap().styles("color: blue;");

        let head = first.render(&ctx, RenderInput::new());
        let foot = second.render(&ctx, RenderInput::new());
        let html = format!("{}{}", head.to_html(), foot.to_html());

        let critical = extract_critical(&html, ctx.cache());
        let head_id = head.class().unwrap().trim_start_matches("css-").to_string();
        let foot_id = foot.class().unwrap().trim_start_matches("css-").to_string();
        assert_eq!(critical.ids, vec![head_id, foot_id]);
    }

    #[test]
    fn test_class_matches_are_whole_tokens() {
        let cache = StyleCache::default();
        cache.insert_styles(
            &crate::serialize::serialize_styles(
                &[crate::StyleFragment::css("color: red;")],
                &cache,
                &Default::default(),
            ),
            true,
        );
        let class = cache.registered_snapshot()[0].0.clone();

        let html = format!("<div class=\"{}zzz\"></div>", class);
        assert!(extract_critical(&html, &cache).ids.is_empty());

        let html = format!("<div class=\"{}\"></div>", class);
        assert_eq!(extract_critical(&html, &cache).ids.len(), 1);
    }

    #[test]
    fn test_render_style_wraps_in_style_tag() {
        let ctx = RenderContext::detached();
        let def = styled("button").unwrap().styles("color: red;");
        let html = def.render(&ctx, RenderInput::new()).to_html();

        let tag = render_style(&html, ctx.cache());
        let id = def
            .render(&ctx, RenderInput::new())
            .class()
            .unwrap()
            .trim_start_matches("css-")
            .to_string();

        assert_eq!(
            tag,
            format!(
                "<style data-emotion-css=\"{}\">.css-{}{{color: red;}}</style>",
                id, id
            )
        );
    }

    #[test]
    fn test_empty_html_extracts_nothing() {
        let ctx = RenderContext::detached();
        styled("button")
            .unwrap()
            .styles("color: red;")
            .render(&ctx, RenderInput::new());
        let critical = extract_critical("", ctx.cache());
        assert!(critical.ids.is_empty());
        assert!(critical.css.is_empty());
    }
}
