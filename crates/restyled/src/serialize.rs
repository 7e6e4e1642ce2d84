//! Style serialization: resolved fragments to a content-addressed key.
//!
//! Serialization is the pure half of the pipeline. Given an ordered fragment
//! sequence, the cache's registered mapping, and the render-time context, it
//! produces the canonical rule text and a cache-stable name derived from it:
//! a 32-bit MurmurHash2 of the text, base-36 encoded, with any `label:`
//! declarations folded in as a readable suffix. Identical inputs always
//! produce identical output, which is what makes content-addressed
//! deduplication across mounts work.
//!
//! Label declarations are discovered with the `cssparser` tokenizer rather
//! than substring matching, so labels inside nested blocks are found and
//! look-alikes inside string values are not.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

use crate::cache::StyleCache;
use crate::element::PropMap;
use crate::fragment::StyleFragment;

/// The output of serialization: a canonical name and the rule text it was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized {
    /// Content-derived key: hash of the rule text plus label suffixes.
    pub name: String,
    /// The resolved rule text, label declarations included.
    pub styles: String,
}

/// Serializes an ordered fragment sequence against the cache's registered
/// mapping and the merged prop/theme context.
///
/// Fragments are processed strictly in order so later fragments win cascade
/// ties. A literal fragment whose entire text is a registered class name is
/// inlined as that class's rule body, which is how composed definitions fold
/// into a single rule instead of two disjoint class names.
pub fn serialize_styles(
    fragments: &[StyleFragment],
    cache: &StyleCache,
    context: &PropMap,
) -> Serialized {
    let mut styles = String::new();
    for fragment in fragments {
        write_fragment(&mut styles, fragment, cache, context);
    }

    let mut name = to_base36(murmur2(styles.as_bytes()));
    for label in extract_labels(&styles) {
        name.push('-');
        name.push_str(&label);
    }

    Serialized { name, styles }
}

fn write_fragment(buf: &mut String, fragment: &StyleFragment, cache: &StyleCache, context: &PropMap) {
    match fragment {
        StyleFragment::Css(text) => match cache.registered_body(text.trim()) {
            Some(body) => buf.push_str(&body),
            None => buf.push_str(text),
        },
        StyleFragment::Ref(def) => buf.push_str(&def.selector()),
        StyleFragment::Dynamic(produce) => {
            let produced = produce(context);
            write_fragment(buf, &produced, cache, context);
        }
    }
}

/// 32-bit MurmurHash2 over the rule text. The exact function matters less
/// than its stability: the hash is the identity of a rule for the lifetime of
/// a cache, so it must not vary across calls, mounts, or processes.
fn murmur2(data: &[u8]) -> u32 {
    const M: u32 = 0x5bd1_e995;

    let mut h: u32 = 0;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> 24;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        h ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        h ^= tail[0] as u32;
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|b| *b as char).collect()
}

/// Collects `label: <ident>;` declarations from a rule body, including ones
/// nested inside pseudo-selector blocks.
fn extract_labels(styles: &str) -> Vec<String> {
    let mut input = ParserInput::new(styles);
    let mut parser = Parser::new(&mut input);
    let mut scanner = LabelScanner { labels: Vec::new() };

    // Parse errors are expected for arbitrary rule text; the body parser
    // recovers per item, so the scan still sees every declaration it can.
    let body = RuleBodyParser::new(&mut parser, &mut scanner);
    for _ in body {}

    scanner.labels
}

/// Removes `label:` declarations from a rule body before it reaches a live
/// sheet. The declarations stay in the registered mapping so nested lookups
/// keep their labels.
pub(crate) fn strip_labels(styles: &str) -> String {
    let mut out = String::with_capacity(styles.len());
    let mut rest = styles;
    while let Some(pos) = rest.find("label:") {
        let at_boundary = rest[..pos]
            .chars()
            .next_back()
            .map(|c| c == ';' || c == '{' || c.is_whitespace())
            .unwrap_or(true);
        if at_boundary {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + "label:".len()..];
            match after.find(';') {
                Some(end) => rest = &after[end + 1..],
                None => rest = "",
            }
        } else {
            out.push_str(&rest[..pos + "label:".len()]);
            rest = &rest[pos + "label:".len()..];
        }
    }
    out.push_str(rest);
    out
}

struct LabelScanner {
    labels: Vec<String>,
}

impl<'i> DeclarationParser<'i> for LabelScanner {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        if name.as_ref() == "label" {
            let label = input.expect_ident()?.as_ref().to_string();
            self.labels.push(label);
        } else {
            // Consume the value tokens so the parser can advance.
            while input.next().is_ok() {}
        }
        Ok(())
    }
}

impl<'i> QualifiedRuleParser<'i> for LabelScanner {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        while input.next().is_ok() {}
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let nested = RuleBodyParser::new(input, self);
        for _ in nested {}
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for LabelScanner {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (), ()> for LabelScanner {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StyleCache;
    use serde_json::Value;

    fn detached_cache() -> StyleCache {
        StyleCache::default()
    }

    fn context() -> PropMap {
        PropMap::new()
    }

    #[test]
    fn test_identical_input_identical_name() {
        let cache = detached_cache();
        let fragments = vec![StyleFragment::css("color: red;")];
        let first = serialize_styles(&fragments, &cache, &context());
        let second = serialize_styles(&fragments, &cache, &context());
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_is_significant() {
        let cache = detached_cache();
        let forward = serialize_styles(
            &[
                StyleFragment::css("color: red;"),
                StyleFragment::css("color: blue;"),
            ],
            &cache,
            &context(),
        );
        let reversed = serialize_styles(
            &[
                StyleFragment::css("color: blue;"),
                StyleFragment::css("color: red;"),
            ],
            &cache,
            &context(),
        );
        assert_ne!(forward.name, reversed.name);
        assert_eq!(forward.styles, "color: red;color: blue;");
        assert_eq!(reversed.styles, "color: blue;color: red;");
    }

    #[test]
    fn test_label_becomes_name_suffix() {
        let cache = detached_cache();
        let serialized = serialize_styles(
            &[
                StyleFragment::css("label:button;"),
                StyleFragment::css("color: red;"),
            ],
            &cache,
            &context(),
        );
        assert!(serialized.name.ends_with("-button"));
    }

    #[test]
    fn test_label_inside_nested_block_is_found() {
        let cache = detached_cache();
        let serialized = serialize_styles(
            &[StyleFragment::css(
                "color: red; &:hover { label:hovered; color: blue; }",
            )],
            &cache,
            &context(),
        );
        assert!(serialized.name.ends_with("-hovered"));
    }

    #[test]
    fn test_dynamic_fragment_resolves_against_context() {
        let cache = detached_cache();
        let fragments = vec![StyleFragment::dynamic(|props| {
            if props.get("primary").and_then(Value::as_bool).unwrap_or(false) {
                StyleFragment::css("color: blue;")
            } else {
                StyleFragment::css("color: gray;")
            }
        })];

        let mut primary = PropMap::new();
        primary.insert("primary".into(), Value::Bool(true));

        let on = serialize_styles(&fragments, &cache, &primary);
        let off = serialize_styles(&fragments, &cache, &context());
        assert_eq!(on.styles, "color: blue;");
        assert_eq!(off.styles, "color: gray;");
        assert_ne!(on.name, off.name);
    }

    #[test]
    fn test_registered_class_name_inlines_body() {
        let cache = detached_cache();
        let base = serialize_styles(&[StyleFragment::css("color: red;")], &cache, &context());
        cache.insert_styles(&base, true);

        let class_name = format!("{}-{}", cache.key(), base.name);
        let composed = serialize_styles(
            &[
                StyleFragment::css(class_name),
                StyleFragment::css("padding: 4px;"),
            ],
            &cache,
            &context(),
        );
        assert_eq!(composed.styles, "color: red;padding: 4px;");
    }

    #[test]
    fn test_strip_labels_removes_declaration() {
        assert_eq!(
            strip_labels("label:button;color: red;"),
            "color: red;"
        );
        assert_eq!(
            strip_labels("color: red; label:button; padding: 0;"),
            "color: red;  padding: 0;"
        );
    }

    #[test]
    fn test_strip_labels_ignores_look_alikes() {
        assert_eq!(
            strip_labels("content: 'label:nope;';"),
            "content: 'label:nope;';"
        );
    }

    #[test]
    fn test_base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_hash_differs_for_different_text() {
        assert_ne!(murmur2(b"color: red;"), murmur2(b"color: blue;"));
    }
}
