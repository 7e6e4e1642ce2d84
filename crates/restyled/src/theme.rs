//! Theme tokens for value-dependent style fragments.
//!
//! A theme is an ordered collection of design tokens (colors, spacings,
//! anything JSON-representable) that dynamic style fragments read at render
//! time. Themes can be built programmatically or loaded from YAML files.
//!
//! # Construction
//!
//! ## Programmatic (Builder API)
//!
//! ```rust
//! use restyled::Theme;
//!
//! let theme = Theme::new()
//!     .set("primary", "hotpink")
//!     .set("spacing", 4);
//! ```
//!
//! ## From YAML
//!
//! ```rust
//! use restyled::Theme;
//!
//! let theme = Theme::from_yaml(r#"
//! primary: hotpink
//! spacing: 4
//! "#).unwrap();
//! assert_eq!(theme.get("spacing").unwrap(), 4);
//! ```
//!
//! During a render pass the theme is merged into the interpolation context
//! under the `theme` key; a `theme` attribute passed directly to an instance
//! takes precedence over the ambient one.

use serde_json::Value;

use crate::element::PropMap;
use crate::error::ThemeError;

/// A collection of named design tokens available to dynamic style fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    tokens: PropMap,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a theme from an existing token map.
    pub fn from_tokens(tokens: PropMap) -> Self {
        Self { tokens }
    }

    /// Creates a theme from YAML content.
    ///
    /// The document must be a mapping of token names to values:
    ///
    /// ```yaml
    /// primary: hotpink
    /// radius: 3
    /// shadows:
    ///   low: "0 1px 2px"
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`ThemeError`] if the content is not valid YAML or is not a
    /// mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let value = serde_json::to_value(parsed).map_err(|_| ThemeError::NotAMapping)?;
        match value {
            Value::Object(tokens) => Ok(Self { tokens }),
            Value::Null => Ok(Self::new()),
            _ => Err(ThemeError::NotAMapping),
        }
    }

    /// Sets a token, returning an updated theme for chaining.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.tokens.insert(name.to_string(), value.into());
        self
    }

    /// Looks up a token by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.tokens.get(name)
    }

    /// Returns the tokens as a JSON object for context merging.
    pub fn to_value(&self) -> Value {
        Value::Object(self.tokens.clone())
    }

    pub fn tokens(&self) -> &PropMap {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        assert!(Theme::new().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let theme = Theme::new().set("primary", "hotpink").set("spacing", 4);
        assert_eq!(theme.get("primary").unwrap(), "hotpink");
        assert_eq!(theme.get("spacing").unwrap(), 4);
        assert!(theme.get("missing").is_none());
    }

    #[test]
    fn test_set_replaces() {
        let theme = Theme::new().set("primary", "red").set("primary", "blue");
        assert_eq!(theme.get("primary").unwrap(), "blue");
    }

    #[test]
    fn test_from_yaml_mapping() {
        let theme = Theme::from_yaml("primary: hotpink\nspacing: 4\n").unwrap();
        assert_eq!(theme.get("primary").unwrap(), "hotpink");
        assert_eq!(theme.get("spacing").unwrap(), 4);
    }

    #[test]
    fn test_from_yaml_nested_values() {
        let theme = Theme::from_yaml("shadows:\n  low: 0 1px 2px\n").unwrap();
        let shadows = theme.get("shadows").unwrap();
        assert_eq!(shadows["low"], "0 1px 2px");
    }

    #[test]
    fn test_from_yaml_empty_document() {
        let theme = Theme::from_yaml("").unwrap();
        assert!(theme.is_empty());
    }

    #[test]
    fn test_from_yaml_rejects_non_mapping() {
        assert!(matches!(
            Theme::from_yaml("- just\n- a\n- list\n"),
            Err(ThemeError::NotAMapping)
        ));
    }

    #[test]
    fn test_from_yaml_rejects_invalid_yaml() {
        assert!(matches!(
            Theme::from_yaml("not: [valid: yaml"),
            Err(ThemeError::Parse(_))
        ));
    }
}
