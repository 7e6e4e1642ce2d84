//! Global styles: rule registration without class composition.
//!
//! A [`GlobalStyle`] holds a fixed fragment list and, on every render pass,
//! serializes it against the ambient cache and the current props, inserting
//! the result unscoped. It produces no markup and computes no class name; it
//! exists purely so global rules (resets, `body` styles, font faces) ride the
//! same content-addressed pipeline as scoped styles.

use crate::element::PropMap;
use crate::fragment::{StyleFragment, StyleInput};
use crate::render::RenderContext;
use crate::serialize::serialize_styles;

/// A side-effect-only style holder for global CSS rules.
///
/// ```rust
/// use restyled::{GlobalStyle, RenderContext};
///
/// let reset = GlobalStyle::new("body { margin: 0; }");
/// let ctx = RenderContext::detached();
/// reset.apply(&ctx, &Default::default());
/// assert_eq!(ctx.cache().rules(), vec!["body { margin: 0; }"]);
/// ```
#[derive(Debug, Clone)]
pub struct GlobalStyle {
    fragments: Vec<StyleFragment>,
}

impl GlobalStyle {
    pub fn new(input: impl Into<StyleInput>) -> Self {
        let mut fragments = Vec::new();
        input.into().append_to(&mut fragments);
        Self { fragments }
    }

    pub fn fragments(&self) -> &[StyleFragment] {
        &self.fragments
    }

    /// Serializes and inserts the rules for this render pass.
    ///
    /// Insertion skips keys that are already present, so repeated renders
    /// with unchanged resolved styles leave exactly one rule in the sheet.
    /// The rule text goes in unscoped: fragments are full rules with their
    /// own selectors, not declarations awaiting a generated class.
    pub fn apply(&self, ctx: &RenderContext, props: &PropMap) {
        let cache = ctx.cache();

        let mut context = props.clone();
        if !context.contains_key("theme") {
            context.insert("theme".to_string(), ctx.theme().to_value());
        }

        let serialized = serialize_styles(&self.fragments, cache, &context);
        if !cache.is_inserted(&serialized.name) {
            cache.insert("", &serialized, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_apply_inserts_once_across_renders() {
        let global = GlobalStyle::new("body { color: red; }");
        let ctx = RenderContext::detached();

        let mut first = PropMap::new();
        first.insert("page".into(), Value::String("home".into()));
        let mut second = PropMap::new();
        second.insert("page".into(), Value::String("about".into()));

        global.apply(&ctx, &first);
        global.apply(&ctx, &second);

        assert_eq!(ctx.cache().rules(), vec!["body { color: red; }"]);
    }

    #[test]
    fn test_apply_resolves_dynamic_fragments_per_render() {
        let global = GlobalStyle::new(vec![StyleFragment::dynamic(|props| {
            let mode = props
                .get("mode")
                .and_then(Value::as_str)
                .unwrap_or("light");
            StyleFragment::Css(format!("body {{ background: {}; }}", mode).into())
        })]);
        let ctx = RenderContext::detached();

        let mut dark = PropMap::new();
        dark.insert("mode".into(), Value::String("black".into()));

        global.apply(&ctx, &PropMap::new());
        global.apply(&ctx, &dark);

        // Different resolved styles are different rules; each inserted once.
        assert_eq!(
            ctx.cache().rules(),
            vec![
                "body { background: light; }",
                "body { background: black; }"
            ]
        );
    }

    #[test]
    fn test_apply_produces_no_markup_state() {
        let global = GlobalStyle::new("body { margin: 0; }");
        assert_eq!(global.fragments().len(), 1);
        let ctx = RenderContext::detached();
        // apply returns nothing; the only observable effect is in the cache.
        global.apply(&ctx, &PropMap::new());
        assert!(ctx.cache().is_inserted(
            &crate::serialize::serialize_styles(
                global.fragments(),
                ctx.cache(),
                &{
                    let mut context = PropMap::new();
                    context.insert("theme".into(), ctx.theme().to_value());
                    context
                },
            )
            .name
        ));
    }
}
