//! Key normalization.
//!
//! Module keys are camelized before every registry lookup so that
//! `basic`, `Basic` and `module_test` / `ModuleTest` all address the
//! same logical module regardless of how a user typed them in chat or
//! how the file is named on disk.

/// Camelizes a delimited string: `module_test` → `ModuleTest`.
///
/// Underscores and spaces act as word delimiters; the first letter of
/// every word is upper-cased and the delimiters are dropped. Characters
/// other than the first of each word keep their original case, so an
/// already-camelized key passes through unchanged.
pub fn camelize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for ch in input.chars() {
        if ch == '_' || ch == ' ' {
            at_word_start = true;
            continue;
        }
        if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }

    out
}
