//! Turns the free-form text a fridge camera's OCR step produces into a clean
//! ingredient list.
//!
//! Each line goes through the same fixed sequence of clean-up steps:
//!
//! 1. drop parenthetical asides such as `(1 medium)`
//! 2. drop quantity tokens (`3`, `1.`, `1/2`, `½`, `1-2`, `2x`, `500g`)
//! 3. strip leading bullets, list markers and punctuation
//! 4. cut at the first list-delimiter dash
//! 5. drop approximation and container words
//! 6. tidy whitespace and punctuation, lowercase
//!
//! Quantities go before the dash split so a range like `1-2 onions` is not
//! mistaken for a delimiter, and before the leading strip so `500g beef` does not
//! leave a stray `g` behind. A dash with letters on both sides is a hyphen
//! (`stir-fry sauce`) and never splits.

use lazy_static::lazy_static;
use regex::Regex;

use crate::food::types::IngredientSet;

/// A line that reduces to exactly this word was a heading.
const SENTINEL: &str = "list";
/// Lines containing this were preamble or footer chatter ("Here is your list").
const PREAMBLE_MARKER: &str = "here";

const STOPWORDS: &[&str] = &[
    "around",
    "about",
    "approximately",
    "bunch",
    "bunches",
    "container",
    "containers",
    "head",
    "heads",
];

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)?").unwrap();
    static ref QUANTITY: Regex = Regex::new(
        r"(?i)^(?:[\d½¼¾⅓⅔⅛⅜⅝⅞.,/]+(?:[-–][\d½¼¾⅓⅔⅛⅜⅝⅞.,/]+)?)(?:x|×|g|kg|mg|ml|l|oz|lb|lbs|cl|dl)?$"
    )
    .unwrap();
}

/// Extracts a normalized ingredient set from raw scan text. Never fails; text
/// with nothing recognisable produces an empty set.
pub fn extract(raw: &str) -> IngredientSet {
    let mut set = IngredientSet::new();
    for line in raw.lines() {
        if let Some(name) = normalize_line(line) {
            set.insert(name);
        }
    }
    set
}

/// Runs one line through the clean-up pipeline, returning `None` when nothing
/// usable is left.
pub fn normalize_line(line: &str) -> Option<String> {
    let text = PARENTHETICAL.replace_all(line, " ");
    let text = strip_quantities(&text);
    let text = text.trim_start_matches(|c: char| !c.is_alphabetic());
    let text = before_delimiter(text);
    let text = strip_stopwords(text);

    let name = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, ':' | ',' | '.' | ';'))
        .trim()
        .to_lowercase();

    if name.is_empty() || name == SENTINEL || name.contains(PREAMBLE_MARKER) {
        return None;
    }
    Some(name)
}

fn strip_quantities(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !QUANTITY.is_match(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn before_delimiter(text: &str) -> &str {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !matches!(c, '-' | '–' | '—') {
            continue;
        }
        let letter_before = i > 0 && chars[i - 1].1.is_alphabetic();
        let letter_after = chars.get(i + 1).map_or(false, |(_, next)| next.is_alphabetic());
        if !(letter_before && letter_after) {
            return &text[..offset];
        }
    }
    text
}

fn strip_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
            !STOPWORDS.contains(&bare.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
