//! Build-mode detection and developer diagnostics.
//!
//! A handful of behaviors differ between development and production builds:
//! the selector sentinel for target-less definitions, and the illegal-escape
//! warning for style templates. Both consult [`build_mode`], which defaults to
//! the compile profile (`debug_assertions`) and can be overridden at runtime.

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Whether the styling layer behaves as a development or production build.
///
/// Development mode emits diagnostics and developer guards; production mode
/// suppresses them entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

static BUILD_MODE: Lazy<Mutex<Option<BuildMode>>> = Lazy::new(|| Mutex::new(None));

/// Overrides the build mode for the current process.
/// Useful for testing production-only behavior from a debug build.
pub fn set_build_mode(mode: BuildMode) {
    let mut guard = BUILD_MODE.lock().unwrap();
    *guard = Some(mode);
}

/// Clears any [`set_build_mode`] override, restoring profile-based detection.
pub fn reset_build_mode() {
    let mut guard = BUILD_MODE.lock().unwrap();
    *guard = None;
}

/// Returns the effective build mode.
pub fn build_mode() -> BuildMode {
    let guard = BUILD_MODE.lock().unwrap();
    match *guard {
        Some(mode) => mode,
        None if cfg!(debug_assertions) => BuildMode::Development,
        None => BuildMode::Production,
    }
}

/// Returns true when developer diagnostics should be emitted.
pub(crate) fn is_development() -> bool {
    build_mode() == BuildMode::Development
}

pub(crate) const ILLEGAL_ESCAPE_HINT: &str = "\
You have an illegal escape sequence in your style template, most likely inside \
a content property value. Escapes inside style text have to be double-escaped, \
so \"content: '\\00d7';\" should become \"content: '\\\\00d7';\". The affected \
segment was dropped from the rule text.";

/// Emits the illegal-escape warning for a template segment that failed to
/// resolve. Never fatal, never alters the serialized output, and silent in
/// production builds.
pub(crate) fn warn_illegal_escape() {
    if is_development() {
        tracing::error!("{}", ILLEGAL_ESCAPE_HINT);
    }
}
