//! App-level context: where the shared cache and ambient theme live.
//!
//! An [`App`] models the host framework's context-provider surface. The
//! [`install`] hook publishes a style cache app-wide, creating a fresh
//! default-keyed one when none is supplied, and flips it into compatibility
//! mode, so every mounted definition resolves the same cache and rules land
//! in the shared sheet once.

use std::sync::Arc;

use crate::cache::StyleCache;
use crate::render::RenderContext;
use crate::theme::Theme;

/// The app root: owns the provided cache and theme for its mount tree.
#[derive(Debug, Clone, Default)]
pub struct App {
    cache: Option<Arc<StyleCache>>,
    theme: Option<Theme>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides a cache without going through [`install`] (no compatibility
    /// flag is touched).
    pub fn provide_cache(&mut self, cache: Arc<StyleCache>) {
        self.cache = Some(cache);
    }

    /// Provides the ambient theme for the mount tree.
    pub fn provide_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }

    /// The provided cache, if any.
    pub fn cache(&self) -> Option<&Arc<StyleCache>> {
        self.cache.as_ref()
    }

    /// Resolves a render context from the provided cache and theme.
    ///
    /// When no cache was provided, a fresh default-keyed cache is created
    /// here, lazily per call: two unrelated resolutions never share state by
    /// accident.
    pub fn render_context(&self) -> RenderContext {
        let cache = match &self.cache {
            Some(cache) => Arc::clone(cache),
            None => Arc::new(StyleCache::default()),
        };
        RenderContext::new(cache, self.theme.clone().unwrap_or_default())
    }
}

/// Options for [`install`].
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// The cache to publish; a fresh default-keyed cache when absent.
    pub cache: Option<Arc<StyleCache>>,
}

/// Publishes a style cache into the app's context and marks it as operating
/// in compatibility mode.
pub fn install(app: &mut App, options: InstallOptions) {
    let cache = options
        .cache
        .unwrap_or_else(|| Arc::new(StyleCache::default()));
    cache.set_compat(true);
    app.cache = Some(cache);
}
