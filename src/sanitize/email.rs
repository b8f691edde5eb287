use std::sync::LazyLock;

use regex::Regex;

const MIN_EMAIL_LEN: usize = 6;

static LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]+$").expect("valid local part pattern")
});

static LOCAL_PART_INVALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9!#$%&'*+/=?^_`{|}~.-]").expect("valid local part pattern")
});

static DOMAIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("valid label pattern"));

static DOMAIN_LABEL_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9-]+").expect("valid label pattern"));

static REPEATED_DOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid dots pattern"));

fn is_trim_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B')
}

/// Split at the first `@`, which must not be the first character.
fn split_address(email: &str) -> Option<(&str, &str)> {
    match email.find('@') {
        Some(at) if at > 0 => Some((&email[..at], &email[at + 1..])),
        _ => None,
    }
}

/// Whether `email` is a syntactically valid address, without rewriting it.
pub fn is_email(email: &str) -> bool {
    if email.len() < MIN_EMAIL_LEN {
        return false;
    }

    let Some((local, domain)) = split_address(email) else {
        return false;
    };

    if !LOCAL_PART.is_match(local) || domain.contains("..") {
        return false;
    }

    if domain.trim_matches(|c| is_trim_char(c) || c == '.') != domain {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        label.trim_matches(|c| is_trim_char(c) || c == '-') == *label
            && DOMAIN_LABEL.is_match(label)
    })
}

/// Reduce `input` to a plausible email address, or the empty string.
///
/// Whitespace, angle brackets and other characters outside the address grammar are
/// removed; a result that cannot form `local@domain.tld` collapses to `""`.
pub fn sanitize_email(input: &str) -> String {
    let email = input.trim();
    if email.len() < MIN_EMAIL_LEN {
        return String::new();
    }

    let Some((local, domain)) = split_address(email) else {
        return String::new();
    };

    let local = LOCAL_PART_INVALID.replace_all(local, "");
    if local.is_empty() {
        return String::new();
    }

    let domain = REPEATED_DOTS.replace_all(domain, "");
    let domain = domain.trim_matches(|c| is_trim_char(c) || c == '.');
    if domain.is_empty() {
        return String::new();
    }

    let labels: Vec<String> = domain
        .split('.')
        .map(|label| {
            let label = label.trim_matches(|c| is_trim_char(c) || c == '-');
            DOMAIN_LABEL_INVALID.replace_all(label, "").into_owned()
        })
        .filter(|label| !label.is_empty())
        .collect();

    if labels.len() < 2 {
        return String::new();
    }

    format!("{}@{}", local, labels.join("."))
}
