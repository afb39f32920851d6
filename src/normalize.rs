//! Translation text normalization.
//!
//! Upstream translation strings carry footnote markers as inline
//! `<sup foot_note="…">1</sup>` elements and inconsistent spacing.
//! [`normalize`] strips the markers and collapses whitespace;
//! [`normalize_translations`] applies it across a verses payload.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// `<sup …>…</sup>`, non-greedy, content may span lines. Case-sensitive.
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<sup\b[^>]*>[\s\S]*?</sup>").expect("footnote pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Strip footnote markup, collapse whitespace runs to one space, trim.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// ```rust
/// # use furqan::normalize::normalize;
/// assert_eq!(
///     normalize("Allah<sup foo=\"1\">1</sup> is Most Merciful"),
///     "Allah is Most Merciful"
/// );
/// assert_eq!(normalize("a   b\n\tc"), "a b c");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped = strip_footnotes(text);
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Remove footnotes until none are left.
///
/// A single pass can splice a new `<sup>…</sup>` together out of the text
/// around a removed one, so keep going to a fixed point.
fn strip_footnotes(text: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(text);
    while FOOTNOTE.is_match(&current) {
        current = Cow::Owned(FOOTNOTE.replace_all(&current, "").into_owned());
    }
    current
}

/// Normalize `verses[].translations[].text` in place.
///
/// Anything missing or of an unexpected shape (no `verses`, a verse
/// without `translations`, a non-string `text`) is left as it is.
/// Returns the number of translation strings rewritten.
pub fn normalize_translations(payload: &mut Value) -> usize {
    let Some(verses) = payload.get_mut("verses").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut rewritten = 0;
    for verse in verses {
        let Some(translations) = verse
            .get_mut("translations")
            .and_then(Value::as_array_mut)
        else {
            continue;
        };
        for translation in translations {
            if let Some(Value::String(text)) = translation.get_mut("text") {
                *text = normalize(text);
                rewritten += 1;
            }
        }
    }
    rewritten
}
