//! Syntax repair for structured output before parsing.

use regex::Regex;
use std::sync::OnceLock;

/// Remove trailing commas immediately before a closing `}` or `]`.
///
/// Generation services occasionally emit `{"nodes": [...],}` which strict
/// JSON parsers reject. The repair is textual and does not inspect string
/// literals; the generation schema never produces a literal `,}` or `,]`
/// inside a quoted value.
pub fn strip_trailing_commas(raw: &str) -> String {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    static ARRAY: OnceLock<Regex> = OnceLock::new();
    let object = OBJECT.get_or_init(|| Regex::new(r",\s*\}").expect("Invalid regex pattern"));
    let array = ARRAY.get_or_init(|| Regex::new(r",\s*\]").expect("Invalid regex pattern"));

    let repaired = object.replace_all(raw, "}");
    array.replace_all(&repaired, "]").into_owned()
}
