//! The render binder: per-render resolution of a styled definition.
//!
//! [`StyledDefinition::render`] runs once per render pass of a mounted
//! instance, always on the host's render thread. It resolves the concrete
//! element, folds class-composed styles back into fragments, serializes
//! against the current context, ensures the rule exists in the shared sheet,
//! and emits the host element with the computed class merged in.
//!
//! Everything except the insertion side effect is referentially transparent:
//! rendering twice with the same context, attributes, and cache state yields
//! the same class string, and the insertion itself is idempotent per key.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::StyleCache;
use crate::element::{Element, ElementTag, Node, PropMap};
use crate::serialize::serialize_styles;
use crate::styled::StyledDefinition;
use crate::theme::Theme;

/// Explicit render-time context: the shared cache and the ambient theme.
///
/// A context is normally obtained from the app root (see
/// [`App::render_context`](crate::App::render_context));
/// [`detached`](RenderContext::detached) makes a fresh default-keyed cache
/// for call sites with no app, lazily per call so unrelated mounts never
/// share one by accident.
#[derive(Debug, Clone)]
pub struct RenderContext {
    cache: Arc<StyleCache>,
    theme: Theme,
}

impl RenderContext {
    pub fn new(cache: Arc<StyleCache>, theme: Theme) -> Self {
        Self { cache, theme }
    }

    /// A context over an existing cache with an empty theme.
    pub fn with_cache(cache: Arc<StyleCache>) -> Self {
        Self::new(cache, Theme::new())
    }

    /// A context with a freshly created default-keyed cache and empty theme.
    pub fn detached() -> Self {
        Self::new(Arc::new(StyleCache::default()), Theme::new())
    }

    pub fn cache(&self) -> &Arc<StyleCache> {
        &self.cache
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

/// Per-render input: pass-through attributes and child content.
///
/// Three attributes are control attributes consumed by the binder rather
/// than passed through: `class` (merged into the computed class string),
/// `as` (a render-time tag override), and `theme` (overrides the ambient
/// theme for this instance).
#[derive(Debug, Clone, Default)]
pub struct RenderInput {
    attrs: PropMap,
    children: Vec<Node>,
}

impl RenderInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one attribute.
    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    /// Replaces the whole attribute map.
    pub fn attrs(mut self, attrs: PropMap) -> Self {
        self.attrs = attrs;
        self
    }

    /// Sets the `class` attribute.
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Requests a different concrete tag for this render only.
    pub fn as_tag(self, tag: &str) -> Self {
        self.attr("as", tag)
    }

    /// Overrides the ambient theme for this instance.
    pub fn theme(self, theme: &Theme) -> Self {
        self.attr("theme", theme.to_value())
    }

    /// Appends a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Appends a text child.
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::text(content))
    }
}

impl StyledDefinition {
    /// Renders the definition against a context and per-render input.
    pub fn render(&self, ctx: &RenderContext, input: RenderInput) -> Element {
        let RenderInput { attrs, children } = input;
        let cache = ctx.cache();

        // The `as` attribute swaps the concrete tag for this render only.
        let concrete = match attrs.get("as").and_then(Value::as_str) {
            Some(tag) if !tag.is_empty() => ElementTag::Tag(tag.to_string()),
            _ => self.root().clone(),
        };

        // Class tokens that name registered styles fold back into fragments,
        // so a manually-composed class still merges into one rule. Tokens the
        // cache does not know are preserved verbatim.
        let mut interpolations = Vec::new();
        let mut raw_tokens = String::new();
        if let Some(class_attr) = attrs.get("class").and_then(Value::as_str) {
            raw_tokens = cache.registered_styles(class_attr, &mut interpolations);
        }

        // An explicit theme attribute wins over the ambient theme.
        let theme_value = match attrs.get("theme") {
            Some(value) => value.clone(),
            None => ctx.theme().to_value(),
        };
        let mut context = attrs.clone();
        context.remove("as");
        context.insert("theme".to_string(), theme_value);

        let mut fragments = self.fragments().to_vec();
        fragments.extend(interpolations);
        let serialized = serialize_styles(&fragments, cache, &context);

        cache.insert_styles(&serialized, concrete.is_plain());

        let mut class_name = format!("{}-{}", cache.key(), serialized.name);
        if !raw_tokens.is_empty() {
            class_name.push(' ');
            class_name.push_str(&raw_tokens);
        }
        if let Some(target) = self.target() {
            class_name.push(' ');
            class_name.push_str(target);
        }

        // Default props lowest, passed attributes highest, computed class on
        // top. Control attributes were consumed above and do not pass through.
        let mut merged = self.default_props().clone();
        for (name, value) in attrs {
            if name == "as" || name == "class" || name == "theme" {
                continue;
            }
            merged.insert(name, value);
        }
        merged.insert("class".to_string(), Value::String(class_name));

        Element::new(concrete, merged, children)
    }
}
