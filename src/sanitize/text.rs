use std::sync::LazyLock;

use regex::Regex;

/// Elements whose contents are code, not text.
static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid script pattern")
});

/// A tag opens with `<` followed by a letter, `/`, `!` or `?`; an unterminated one runs to
/// the end of input. Empty `<>` and a dangling trailing `<` count as markup too.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:[a-zA-Z/!?][^>]*(?:>|$)|>|\s*$)").expect("valid tag pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Tabs and line breaks become spaces, other control characters are dropped.
fn strip_controls(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '\t' | '\n' | '\r' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn collapse_whitespace(input: &str) -> String {
    WHITESPACE.replace_all(input, " ").trim().to_string()
}

/// Plain-text sanitization: no markup, no control characters, single spaces, trimmed.
///
/// A `<` that does not open a tag is kept, so `"Price < 5 and > 3"` survives intact.
pub fn sanitize_text(input: &str) -> String {
    let text = strip_controls(input);
    let text = SCRIPT_OR_STYLE.replace_all(&text, "");
    collapse_whitespace(&strip_tags(&collapse_whitespace(&text)))
}

/// Removing one tag can expose another (`<<b>b>`), so repeat until nothing matches.
fn strip_tags(input: &str) -> String {
    let mut text = input.to_string();
    while TAG.is_match(&text) {
        text = TAG.replace_all(&text, "").into_owned();
    }
    text
}

/// Raw recipient list: angle brackets are removed rather than treated as tags, so
/// `<user>@example.com` still yields an address.
pub fn sanitize_recipients(input: &str) -> String {
    let text = strip_controls(input).replace(['<', '>'], "");
    collapse_whitespace(&text)
}
