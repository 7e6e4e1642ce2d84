//! Style fragments: the units of style input.
//!
//! A fragment is one of three things: literal CSS-bearing text, a reference to
//! another styled definition (which resolves to that definition's class
//! selector at serialization time), or a function evaluated lazily against the
//! render-time prop/theme context. Fragments live in ordered sequences, and
//! order is cascade order: later fragments override earlier ones for the same
//! property.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::element::PropMap;
use crate::runtime;
use crate::styled::StyledDefinition;

/// A context-dependent fragment producer, evaluated once per render pass.
pub type DynamicFn = dyn Fn(&PropMap) -> StyleFragment + Send + Sync;

/// One unit of style input.
#[derive(Clone)]
pub enum StyleFragment {
    /// Literal CSS text.
    Css(Cow<'static, str>),
    /// A nested styled definition; serializes to its class selector.
    Ref(Arc<StyledDefinition>),
    /// A function of the merged prop/theme context, evaluated at render time.
    Dynamic(Arc<DynamicFn>),
}

impl StyleFragment {
    /// A literal CSS fragment.
    pub fn css(text: impl Into<Cow<'static, str>>) -> Self {
        StyleFragment::Css(text.into())
    }

    /// A fragment computed from the render-time context.
    ///
    /// ```rust
    /// use restyled::StyleFragment;
    ///
    /// let tone = StyleFragment::dynamic(|props| {
    ///     if props.get("muted").and_then(|v| v.as_bool()).unwrap_or(false) {
    ///         StyleFragment::css("color: gray;")
    ///     } else {
    ///         StyleFragment::css("color: black;")
    ///     }
    /// });
    /// ```
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&PropMap) -> StyleFragment + Send + Sync + 'static,
    {
        StyleFragment::Dynamic(Arc::new(f))
    }
}

impl fmt::Debug for StyleFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleFragment::Css(text) => f.debug_tuple("Css").field(text).finish(),
            StyleFragment::Ref(def) => f.debug_tuple("Ref").field(&def.display_label()).finish(),
            StyleFragment::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl PartialEq for StyleFragment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StyleFragment::Css(a), StyleFragment::Css(b)) => a == b,
            (StyleFragment::Ref(a), StyleFragment::Ref(b)) => Arc::ptr_eq(a, b),
            (StyleFragment::Dynamic(a), StyleFragment::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&'static str> for StyleFragment {
    fn from(text: &'static str) -> Self {
        StyleFragment::Css(Cow::Borrowed(text))
    }
}

impl From<String> for StyleFragment {
    fn from(text: String) -> Self {
        StyleFragment::Css(Cow::Owned(text))
    }
}

impl From<Arc<StyledDefinition>> for StyleFragment {
    fn from(def: Arc<StyledDefinition>) -> Self {
        StyleFragment::Ref(def)
    }
}

impl From<&Arc<StyledDefinition>> for StyleFragment {
    fn from(def: &Arc<StyledDefinition>) -> Self {
        StyleFragment::Ref(Arc::clone(def))
    }
}

/// A tagged-template-like structure: literal segments interleaved with
/// fragment values, in source order.
///
/// A `None` segment marks a hole left by an illegal escape sequence in the
/// source template; interleaving reports it as a development-mode diagnostic
/// and drops the segment from the rule text.
///
/// ```rust
/// use restyled::{StyleFragment, Template};
///
/// let template = Template::new()
///     .segment("color: ")
///     .value(StyleFragment::css("hotpink"))
///     .segment("; padding: 4px;");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Template {
    segments: Vec<Option<Cow<'static, str>>>,
    values: Vec<StyleFragment>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a literal segment.
    pub fn segment(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.segments.push(Some(text.into()));
        self
    }

    /// Appends a hole where a literal segment failed to resolve.
    pub fn hole(mut self) -> Self {
        self.segments.push(None);
        self
    }

    /// Appends an interpolated value.
    pub fn value(mut self, fragment: impl Into<StyleFragment>) -> Self {
        self.values.push(fragment.into());
        self
    }

    /// Interleaves segments and values into `out` in source order:
    /// segment 0, value 0, segment 1, value 1, and so on. Holes emit the
    /// illegal-escape diagnostic and contribute nothing.
    pub(crate) fn interleave_into(&self, out: &mut Vec<StyleFragment>) {
        fn push_segment(out: &mut Vec<StyleFragment>, segment: &Option<Cow<'static, str>>) {
            match segment {
                Some(text) => out.push(StyleFragment::Css(text.clone())),
                None => runtime::warn_illegal_escape(),
            }
        }

        if let Some(first) = self.segments.first() {
            push_segment(out, first);
        }
        for (index, value) in self.values.iter().enumerate() {
            out.push(value.clone());
            if let Some(segment) = self.segments.get(index + 1) {
                push_segment(out, segment);
            }
        }
    }
}

/// The input accepted when applying styles to an attacher: either a flat
/// fragment sequence or a template.
#[derive(Debug, Clone)]
pub enum StyleInput {
    Fragments(Vec<StyleFragment>),
    Template(Template),
}

impl StyleInput {
    /// Resolves the input into a flat fragment sequence, appending to `out`.
    pub(crate) fn append_to(&self, out: &mut Vec<StyleFragment>) {
        match self {
            StyleInput::Fragments(fragments) => out.extend(fragments.iter().cloned()),
            StyleInput::Template(template) => template.interleave_into(out),
        }
    }
}

impl From<&'static str> for StyleInput {
    fn from(text: &'static str) -> Self {
        StyleInput::Fragments(vec![StyleFragment::from(text)])
    }
}

impl From<String> for StyleInput {
    fn from(text: String) -> Self {
        StyleInput::Fragments(vec![StyleFragment::from(text)])
    }
}

impl From<StyleFragment> for StyleInput {
    fn from(fragment: StyleFragment) -> Self {
        StyleInput::Fragments(vec![fragment])
    }
}

impl From<Vec<StyleFragment>> for StyleInput {
    fn from(fragments: Vec<StyleFragment>) -> Self {
        StyleInput::Fragments(fragments)
    }
}

impl<const N: usize> From<[StyleFragment; N]> for StyleInput {
    fn from(fragments: [StyleFragment; N]) -> Self {
        StyleInput::Fragments(fragments.to_vec())
    }
}

impl From<Template> for StyleInput {
    fn from(template: Template) -> Self {
        StyleInput::Template(template)
    }
}
