//! The styled factory: from a base element to a reusable styled definition.
//!
//! [`create_styled`] is invoked once per styled-element definition, typically
//! at module setup time. It validates and unwraps the base element, and
//! returns a [`StyleAttacher`]; applying style input to the attacher yields an
//! immutable [`StyledDefinition`] that can be mounted and rendered any number
//! of times.
//!
//! # Example
//!
//! ```rust
//! use restyled::{create_styled, RenderContext, RenderInput, StyledOptions};
//!
//! let button = create_styled("button", StyledOptions::new().label("button"))
//!     .unwrap()
//!     .styles("color: hotpink; padding: 4px;");
//!
//! let ctx = RenderContext::detached();
//! let element = button.render(&ctx, RenderInput::new());
//! assert!(element.class().unwrap().starts_with("css-"));
//! ```
//!
//! Definitions compose: styling an existing definition inherits its fragments
//! (base first, overlay second, so the overlay wins cascade ties), and
//! [`StyledDefinition::with_component`] re-applies accumulated fragments to a
//! different base element without mutating the original.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::element::{ElementTag, PropMap};
use crate::error::ConfigurationError;
use crate::fragment::{StyleFragment, StyleInput};
use crate::runtime;

/// An opaque host component usable as a base element.
///
/// The factory never looks inside a host component for style data: it is a
/// leaf, identified only by its display name and optional default props. Data
/// that merely resembles a styled definition's internals is never inherited
/// from here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostComponent {
    name: String,
    default_props: PropMap,
}

impl HostComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_props: PropMap::new(),
        }
    }

    /// A component with no display name. Styled definitions built on one
    /// fall back to the `Styled(Component)` display label.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Adds a default prop, returning the component for chaining.
    pub fn default_prop(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.default_props.insert(name.to_string(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_props(&self) -> &PropMap {
        &self.default_props
    }
}

/// What a styled definition can be built on: a plain markup tag, an opaque
/// host component, or another styled definition.
///
/// The variants are the identity check: only the `Styled` variant ever
/// triggers fragment inheritance, so a foreign object that happens to carry
/// style-shaped data cannot be mistaken for a styled definition.
#[derive(Debug, Clone)]
pub enum BaseElement {
    /// A plain markup tag name, such as `div` or `button`.
    Tag(String),
    /// An opaque host component.
    Component(HostComponent),
    /// An existing styled definition to extend.
    Styled(Arc<StyledDefinition>),
}

impl From<&str> for BaseElement {
    fn from(tag: &str) -> Self {
        BaseElement::Tag(tag.to_string())
    }
}

impl From<String> for BaseElement {
    fn from(tag: String) -> Self {
        BaseElement::Tag(tag)
    }
}

impl From<HostComponent> for BaseElement {
    fn from(component: HostComponent) -> Self {
        BaseElement::Component(component)
    }
}

impl From<Arc<StyledDefinition>> for BaseElement {
    fn from(def: Arc<StyledDefinition>) -> Self {
        BaseElement::Styled(def)
    }
}

impl From<&Arc<StyledDefinition>> for BaseElement {
    fn from(def: &Arc<StyledDefinition>) -> Self {
        BaseElement::Styled(Arc::clone(def))
    }
}

/// Configuration for a styled definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledOptions {
    label: Option<String>,
    target: Option<String>,
}

impl StyledOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A debug identifier, embedded in generated class names as a readable
    /// suffix and used as the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// A static class always appended to the computed class string, giving
    /// external tooling a stable selector independent of generated hashes.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn label_value(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn target_value(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Per-field merge for `with_component`: fields set on `next` win, unset
    /// fields keep the current value.
    fn merged_over(self, next: StyledOptions) -> StyledOptions {
        StyledOptions {
            label: next.label.or(self.label),
            target: next.target.or(self.target),
        }
    }
}

/// Creates a style attacher for a base element.
///
/// The base is validated and unwrapped here, at construction time: an empty
/// tag name fails with a [`ConfigurationError`] rather than deferring a
/// broken definition to render time, and a `Styled` base is unwrapped to its
/// root element, inheriting accumulated fragments and default props.
pub fn create_styled(
    base: impl Into<BaseElement>,
    options: StyledOptions,
) -> Result<StyleAttacher, ConfigurationError> {
    let (root, inherited, default_props) = match base.into() {
        BaseElement::Tag(name) => {
            if name.is_empty() {
                return Err(ConfigurationError::EmptyTag);
            }
            (ElementTag::Tag(name), Vec::new(), PropMap::new())
        }
        BaseElement::Component(component) => {
            let HostComponent {
                name,
                default_props,
            } = component;
            (ElementTag::Component(name), Vec::new(), default_props)
        }
        BaseElement::Styled(def) => (
            def.root.clone(),
            def.fragments.clone(),
            def.default_props.clone(),
        ),
    };

    Ok(StyleAttacher {
        root,
        inherited,
        default_props,
        options,
    })
}

/// Shorthand for [`create_styled`] with default options.
pub fn styled(base: impl Into<BaseElement>) -> Result<StyleAttacher, ConfigurationError> {
    create_styled(base, StyledOptions::new())
}

/// The intermediate produced by the factory: holds the resolved base and
/// waits for style input.
#[derive(Debug, Clone)]
pub struct StyleAttacher {
    root: ElementTag,
    inherited: Vec<StyleFragment>,
    default_props: PropMap,
    options: StyledOptions,
}

impl StyleAttacher {
    /// Applies style input, producing the styled definition.
    ///
    /// Accumulated order is base-then-overlay: inherited fragments first, the
    /// synthetic `label:` fragment when a label is configured, then this
    /// layer's input in source order.
    pub fn styles(self, input: impl Into<StyleInput>) -> Arc<StyledDefinition> {
        let input = input.into();
        let StyleAttacher {
            root,
            mut inherited,
            default_props,
            options,
        } = self;

        if let Some(label) = options.label_value() {
            inherited.push(StyleFragment::css(format!("label:{};", label)));
        }
        input.append_to(&mut inherited);

        StyledDefinition::build(root, inherited, default_props, options)
    }

    /// Re-applies an already-accumulated fragment list, without re-injecting
    /// the label fragment it may carry. Used by `with_component` so fragments
    /// survive a base swap unchanged.
    pub(crate) fn reapply(self, fragments: Vec<StyleFragment>) -> Arc<StyledDefinition> {
        let StyleAttacher {
            root,
            mut inherited,
            default_props,
            options,
        } = self;
        inherited.extend(fragments);
        StyledDefinition::build(root, inherited, default_props, options)
    }
}

/// An immutable styled-element definition.
///
/// Created once at factory-application time; per-render state (serial key,
/// computed class string) is recomputed every render pass and lives only in
/// the shared [`StyleCache`](crate::StyleCache), keyed by content.
#[derive(Debug)]
pub struct StyledDefinition {
    root: ElementTag,
    fragments: Vec<StyleFragment>,
    display_label: String,
    default_props: PropMap,
    options: StyledOptions,
}

impl StyledDefinition {
    fn build(
        root: ElementTag,
        fragments: Vec<StyleFragment>,
        default_props: PropMap,
        options: StyledOptions,
    ) -> Arc<Self> {
        let display_label = match options.label_value() {
            Some(label) => label.to_string(),
            None if root.name().is_empty() => "Styled(Component)".to_string(),
            None => format!("Styled({})", root.name()),
        };
        Arc::new(Self {
            root,
            fragments,
            display_label,
            default_props,
            options,
        })
    }

    /// The unwrapped render target: always a tag or a host component, never
    /// another styled definition.
    pub fn root(&self) -> &ElementTag {
        &self.root
    }

    /// The accumulated fragments, in base-then-overlay order.
    pub fn fragments(&self) -> &[StyleFragment] {
        &self.fragments
    }

    pub fn display_label(&self) -> &str {
        &self.display_label
    }

    pub fn default_props(&self) -> &PropMap {
        &self.default_props
    }

    pub fn label(&self) -> Option<&str> {
        self.options.label_value()
    }

    pub fn target(&self) -> Option<&str> {
        self.options.target_value()
    }

    /// Re-applies the accumulated fragments to a different base element,
    /// producing a new definition. The original is never mutated.
    ///
    /// With no options the current ones are reused verbatim; explicit options
    /// replace per field, unset fields falling back to the current values.
    pub fn with_component(
        &self,
        base: impl Into<BaseElement>,
        options: Option<StyledOptions>,
    ) -> Result<Arc<StyledDefinition>, ConfigurationError> {
        let merged = match options {
            None => self.options.clone(),
            Some(next) => self.options.clone().merged_over(next),
        };
        Ok(create_styled(base, merged)?.reapply(self.fragments.clone()))
    }

    /// The definition's CSS selector, as rendered by `Display`.
    pub fn selector(&self) -> String {
        self.to_string()
    }
}

/// Renders the definition as a CSS selector: `.{target}` when a target class
/// is configured. Without one there is no stable selector; development builds
/// render a sentinel that makes the mistake visible in output, production
/// builds render nothing.
impl fmt::Display for StyledDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.options.target_value() {
            Some(target) => write!(f, ".{}", target),
            None if runtime::is_development() => f.write_str("NO_COMPONENT_SELECTOR"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{reset_build_mode, set_build_mode, BuildMode};
    use serial_test::serial;

    fn css_texts(fragments: &[StyleFragment]) -> Vec<String> {
        fragments
            .iter()
            .map(|fragment| match fragment {
                StyleFragment::Css(text) => text.to_string(),
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_empty_tag_fails_at_construction() {
        assert_eq!(
            create_styled("", StyledOptions::new()).unwrap_err(),
            ConfigurationError::EmptyTag
        );
    }

    #[test]
    fn test_display_label_from_tag() {
        let def = styled("button").unwrap().styles("color: red;");
        assert_eq!(def.display_label(), "Styled(button)");
    }

    #[test]
    fn test_display_label_from_component_name() {
        let def = styled(HostComponent::new("Card"))
            .unwrap()
            .styles("color: red;");
        assert_eq!(def.display_label(), "Styled(Card)");
    }

    #[test]
    fn test_display_label_anonymous_component() {
        let def = styled(HostComponent::anonymous())
            .unwrap()
            .styles("color: red;");
        assert_eq!(def.display_label(), "Styled(Component)");
    }

    #[test]
    fn test_explicit_label_wins() {
        let def = create_styled("button", StyledOptions::new().label("cta"))
            .unwrap()
            .styles("color: red;");
        assert_eq!(def.display_label(), "cta");
    }

    #[test]
    fn test_label_fragment_is_prepended() {
        let def = create_styled("button", StyledOptions::new().label("cta"))
            .unwrap()
            .styles("color: red;");
        assert_eq!(css_texts(def.fragments()), vec!["label:cta;", "color: red;"]);
    }

    #[test]
    fn test_styled_base_inherits_fragments_and_order() {
        let base = styled("button").unwrap().styles("color: red;");
        let overlay = styled(&base).unwrap().styles("padding: 4px;");

        assert_eq!(
            css_texts(overlay.fragments()),
            vec!["color: red;", "padding: 4px;"]
        );
        assert_eq!(overlay.root(), &ElementTag::Tag("button".into()));
    }

    #[test]
    fn test_component_base_inherits_default_props() {
        let base = HostComponent::new("Card").default_prop("kind", "plain");
        let def = styled(base).unwrap().styles("color: red;");
        assert_eq!(def.default_props().get("kind").unwrap(), "plain");
    }

    #[test]
    fn test_component_base_never_contributes_fragments() {
        // A component whose props merely look like styled internals is an
        // opaque leaf: nothing is inherited from it.
        let impostor = HostComponent::new("FakeStyled")
            .default_prop("__emotion_styles", "color: green;")
            .default_prop("__emotion_base", "button");
        let def = styled(impostor).unwrap().styles("color: red;");

        assert_eq!(css_texts(def.fragments()), vec!["color: red;"]);
        assert_eq!(def.root(), &ElementTag::Component("FakeStyled".into()));
    }

    #[test]
    fn test_with_component_preserves_fragments() {
        let def = styled("button")
            .unwrap()
            .styles(vec![
                StyleFragment::css("color: red;"),
                StyleFragment::css("padding: 4px;"),
            ]);
        let swapped = def.with_component("a", None).unwrap();

        assert_eq!(swapped.fragments(), def.fragments());
        assert_eq!(swapped.root(), &ElementTag::Tag("a".into()));
    }

    #[test]
    fn test_with_component_does_not_duplicate_label() {
        let def = create_styled("button", StyledOptions::new().label("cta"))
            .unwrap()
            .styles("color: red;");
        let swapped = def.with_component("a", None).unwrap();
        assert_eq!(swapped.fragments(), def.fragments());
    }

    #[test]
    fn test_with_component_reuses_options_when_absent() {
        let def = create_styled("button", StyledOptions::new().label("cta").target("t"))
            .unwrap()
            .styles("color: red;");
        let swapped = def.with_component("a", None).unwrap();
        assert_eq!(swapped.label(), Some("cta"));
        assert_eq!(swapped.target(), Some("t"));
    }

    #[test]
    fn test_with_component_merges_explicit_options() {
        let def = create_styled("button", StyledOptions::new().label("cta").target("t"))
            .unwrap()
            .styles("color: red;");
        let swapped = def
            .with_component("a", Some(StyledOptions::new().target("u")))
            .unwrap();
        assert_eq!(swapped.target(), Some("u"));
        // Unset fields fall back to the current options.
        assert_eq!(swapped.label(), Some("cta"));
    }

    #[test]
    fn test_with_component_validates_new_base() {
        let def = styled("button").unwrap().styles("color: red;");
        assert_eq!(
            def.with_component("", None).unwrap_err(),
            ConfigurationError::EmptyTag
        );
    }

    #[test]
    fn test_selector_with_target() {
        let def = create_styled("button", StyledOptions::new().target("cta-button"))
            .unwrap()
            .styles("color: red;");
        assert_eq!(def.selector(), ".cta-button");
    }

    #[test]
    #[serial]
    fn test_selector_sentinel_in_development() {
        set_build_mode(BuildMode::Development);
        let def = styled("button").unwrap().styles("color: red;");
        assert_eq!(def.selector(), "NO_COMPONENT_SELECTOR");
        reset_build_mode();
    }

    #[test]
    #[serial]
    fn test_selector_empty_in_production() {
        set_build_mode(BuildMode::Production);
        let def = styled("button").unwrap().styles("color: red;");
        assert_eq!(def.selector(), "");
        reset_build_mode();
    }
}
