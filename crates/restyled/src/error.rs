//! Error types for styled-definition construction.

/// Errors raised while creating a styled definition or a style cache.
///
/// These are construction-time failures: they surface before anything is
/// rendered, so a misconfigured definition breaks the build rather than
/// producing broken markup at runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The base element tag name was empty.
    #[error(
        "cannot create a styled element from an empty tag name\n\
         You may have forgotten to name the element you are styling."
    )]
    EmptyTag,

    /// The cache key prefix was empty or contained characters that are not
    /// valid in a class name.
    #[error(
        "invalid style cache key '{0}'\n\
         Cache keys prefix every generated class name and may only contain \
         lowercase letters, digits, and hyphens."
    )]
    InvalidCacheKey(String),
}

/// Errors raised while loading a theme from YAML.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// The YAML content could not be parsed.
    #[error("failed to parse theme: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The YAML document was valid but not a mapping of token names to values.
    #[error("theme must be a mapping of token names to values")]
    NotAMapping,
}
