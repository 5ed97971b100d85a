//! Splits a completion into individual numbered items.
//!
//! Every line that opens with `<digits>.` becomes one item with the numeral
//! prefix stripped. Intro text, blank lines and continuation lines are
//! dropped. Numbering is not validated: gaps, repeats and out-of-order
//! numbers are all accepted as-is.

use crate::domain::{Platform, RemixResult};

/// What the splitter is given
#[derive(Debug, Clone, Copy)]
pub enum SplitInput<'a> {
    /// Raw completion text
    Text(&'a str),

    /// Items that may already have been split
    Items(&'a [String]),
}

/// Split input into items.
///
/// `Items` whose elements are all single-line are already split and come
/// back unchanged, so an item that opens with a number ("3.14 reasons...")
/// is never cut a second time. Otherwise the items are joined and scanned
/// like text.
///
/// When no line carries a numeral prefix, `Items` input is returned
/// unchanged and `Text` input becomes a single trimmed item (or nothing if
/// it is blank).
pub fn split_numbered(input: SplitInput<'_>) -> Vec<String> {
    let joined;
    let text = match input {
        SplitInput::Text(text) => text,
        SplitInput::Items(items) => {
            if items.iter().all(|item| !item.contains('\n')) {
                return items.to_vec();
            }
            joined = items.join("\n");
            &joined
        }
    };

    let mut matched_any = false;
    let mut items = Vec::new();
    for line in text.lines() {
        if let Some(rest) = strip_numeral_prefix(line.trim()) {
            matched_any = true;
            let rest = rest.trim();
            if !rest.is_empty() {
                items.push(rest.to_string());
            }
        }
    }

    if matched_any {
        return items;
    }

    match input {
        SplitInput::Items(original) => original.to_vec(),
        SplitInput::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
    }
}

/// Shape a raw completion for its platform
pub fn split_for_platform(platform: Platform, raw: &str) -> RemixResult {
    if platform.is_sequence() {
        RemixResult::Sequence(split_numbered(SplitInput::Text(raw)))
    } else {
        RemixResult::Single(raw.trim().to_string())
    }
}

/// `"12. text"` -> `Some(" text")`; the line must already be trimmed
fn strip_numeral_prefix(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix('.')
}
