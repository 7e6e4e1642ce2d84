//! The shared style cache and rule inserter.
//!
//! One cache typically lives per app root and is shared by reference with
//! every mounted styled definition. It owns three pieces of state: the
//! `registered` mapping (class name to rule body, consulted when composing
//! definitions through class names), the `inserted` mapping (serial key to
//! insertion marker, the idempotence guard), and the live sheet (ordered rule
//! text, in insertion order).
//!
//! All three live behind a single mutex so check-and-insert is atomic: even
//! on a multi-threaded host, concurrent inserts for the same key resolve to
//! one appended rule that every reader sees.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::ConfigurationError;
use crate::fragment::StyleFragment;
use crate::serialize::{strip_labels, Serialized};

/// How a serial key was recorded in the `inserted` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionMarker {
    /// The rule lives in the shared sheet.
    Cached,
    /// The rule was handed back to the caller for inline emission
    /// (non-compatibility mode, plain markup tags).
    Inline(String),
}

#[derive(Default)]
struct CacheInner {
    registered: HashMap<String, String>,
    inserted: HashMap<String, InsertionMarker>,
    sheet: Vec<String>,
}

/// A shared registry of serialized styles and the live stylesheet.
pub struct StyleCache {
    key: String,
    compat: AtomicBool,
    inner: Mutex<CacheInner>,
}

impl Default for StyleCache {
    /// A cache with the default `css` key prefix.
    fn default() -> Self {
        Self {
            key: "css".to_string(),
            compat: AtomicBool::new(false),
            inner: Mutex::new(CacheInner::default()),
        }
    }
}

impl StyleCache {
    /// Creates a cache with the given class-name key prefix.
    ///
    /// The key prefixes every generated class name, which is what keeps
    /// independently-configured style systems on one page from colliding.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidCacheKey`] unless the key starts
    /// with a lowercase letter and contains only lowercase letters, digits,
    /// and hyphens.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigurationError> {
        let key = key.into();
        let mut chars = key.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_start || !valid_rest {
            return Err(ConfigurationError::InvalidCacheKey(key));
        }
        Ok(Self {
            key,
            compat: AtomicBool::new(false),
            inner: Mutex::new(CacheInner::default()),
        })
    }

    /// The class-name key prefix.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flips compatibility mode: when set, every rule is cached in the shared
    /// sheet once; when clear, rules for plain markup tags are handed back to
    /// the caller for inline emission instead of being marked once-only.
    pub fn set_compat(&self, on: bool) {
        self.compat.store(on, Ordering::Relaxed);
    }

    pub fn is_compat(&self) -> bool {
        self.compat.load(Ordering::Relaxed)
    }

    /// The rule body registered under a class name, if any.
    pub fn registered_body(&self, class_name: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.registered.get(class_name).cloned()
    }

    /// Whether a serial key has already been inserted.
    pub fn is_inserted(&self, name: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.inserted.contains_key(name)
    }

    /// Low-level insert: appends `selector{styles}` (or the bare styles when
    /// the selector is empty, for global rules) to the live sheet.
    ///
    /// Inserting a key that is already present is a no-op, never a re-append.
    /// When `cache_rule` is false the key is not recorded, so a later insert
    /// appends again; callers that want once-only semantics pass true.
    pub fn insert(&self, selector: &str, serialized: &Serialized, cache_rule: bool) {
        let mut inner = self.inner.lock().unwrap();
        if inner.inserted.contains_key(&serialized.name) {
            return;
        }
        let rule = if selector.is_empty() {
            serialized.styles.clone()
        } else {
            format!("{}{{{}}}", selector, serialized.styles)
        };
        inner.sheet.push(rule);
        if cache_rule {
            inner
                .inserted
                .insert(serialized.name.clone(), InsertionMarker::Cached);
        }
    }

    /// Registers a serialized result and ensures its scoped rule exists in
    /// the live sheet exactly once.
    ///
    /// `is_plain_tag` says whether the render target is plain markup (as
    /// opposed to a composed definition): for plain tags the `label:` pseudo
    /// declarations are stripped before the rule reaches the sheet, while
    /// composed definitions keep them so nested lookups can recover the
    /// label. The registered mapping always keeps the unstripped body.
    ///
    /// Returns the rule text when the cache is not in compatibility mode and
    /// the target is a plain tag, so server renderers can emit it inline next
    /// to the element. In compatibility mode the return is always `None`.
    pub fn insert_styles(&self, serialized: &Serialized, is_plain_tag: bool) -> Option<String> {
        let class_name = format!("{}-{}", self.key, serialized.name);
        let compat = self.is_compat();

        let mut inner = self.inner.lock().unwrap();
        inner
            .registered
            .entry(class_name.clone())
            .or_insert_with(|| serialized.styles.clone());

        if inner.inserted.contains_key(&serialized.name) {
            return None;
        }

        let body = if is_plain_tag {
            strip_labels(&serialized.styles)
        } else {
            serialized.styles.clone()
        };
        let rule = format!(".{}{{{}}}", class_name, body);
        inner.sheet.push(rule.clone());

        if !compat && is_plain_tag {
            inner
                .inserted
                .insert(serialized.name.clone(), InsertionMarker::Inline(rule.clone()));
            Some(rule)
        } else {
            inner
                .inserted
                .insert(serialized.name.clone(), InsertionMarker::Cached);
            None
        }
    }

    /// Splits a `class` attribute into registered and unregistered tokens.
    ///
    /// Tokens that name registered classes push their rule bodies onto `out`
    /// as literal fragments, so a class-composed definition folds into the
    /// next serialization. Unregistered tokens are returned space-joined, to
    /// be preserved verbatim in the final class string.
    pub fn registered_styles(&self, class_attr: &str, out: &mut Vec<StyleFragment>) -> String {
        let inner = self.inner.lock().unwrap();
        let mut raw = String::new();
        for token in class_attr.split_whitespace() {
            match inner.registered.get(token) {
                Some(body) => out.push(StyleFragment::css(format!("{};", body))),
                None => {
                    if !raw.is_empty() {
                        raw.push(' ');
                    }
                    raw.push_str(token);
                }
            }
        }
        raw
    }

    /// A snapshot of the registered mapping, for server-side extraction.
    pub fn registered_snapshot(&self) -> Vec<(String, String)> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<(String, String)> = inner
            .registered
            .iter()
            .map(|(class, body)| (class.clone(), body.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// The live sheet's rules, in insertion order.
    pub fn rules(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.sheet.clone()
    }

    /// The live sheet as one CSS string.
    pub fn css(&self) -> String {
        self.rules().join("\n")
    }
}

impl std::fmt::Debug for StyleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap();
        f.debug_struct("StyleCache")
            .field("key", &self.key)
            .field("compat", &self.is_compat())
            .field("registered", &inner.registered.len())
            .field("inserted", &inner.inserted.len())
            .field("rules", &inner.sheet.len())
            .finish()
    }
}
