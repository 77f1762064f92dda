//! Noise stripping for raw order references.
//!
//! Handles:
//! - PO/reference-number prefixes (first matching prefix only)
//! - Reorder-cycle boilerplate ("2-yr curtain changeover", "balance of curtains")
//! - Dates, quantity-size tokens and stray punctuation
//!
//! Hyphenated compounds such as "X-Ray" and room ranges such as "1-4" are
//! shielded while separators are split, so their hyphens survive.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Stands in for a protected hyphen while separators are split.
const HYPHEN_PLACEHOLDER: char = '\u{E000}';

/// Reference-number prefixes, anchored at the start. Only the first rule
/// that matches is applied.
static PREFIX_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // PO 4500123, PO-4500123, P.O. 4500123
        r"(?i)^\s*P\.?O\.?\s*[-#:]?\s*\d+[A-Z0-9]*",
        // Organization-specific codes followed by a reference number
        r"(?i)^\s*(?:PIN|LKC|LK|RT|FA|WN|GR|BS|NH|NCR|MT|SEO)\s*[-#:]?\s*\d+[A-Z0-9]*",
        // M1234 / G1234 style requisition numbers
        r"(?i)^\s*[MG]\d{4,}",
        // Dash-grouped numeric codes: 030-28-168
        r"^\s*\d{2,}(?:-\d+){2,}",
        // Bare reference numbers
        r"^\s*\d{5,}",
    ]
    .iter()
    .map(|p| Regex::new(&format!(r"{p}\s*-?\s*")).expect("valid prefix regex"))
    .collect()
});

static LEADING_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:+\s*").expect("valid leading colon regex"));

/// Order-administration boilerplate, applied globally in this order.
///
/// A rule with a `keep` group leaves its match untouched whenever that
/// group participates ("New Plymouth" is a town, not the word "new").
static BOILERPLATE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b\d+\s*-?\s*(?:yr|year)s?\s+(?:curtains?\s+)?(?:change\s*overs?|changes?|replacements?)\b",
        r"\b\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})\b",
        r"(?i)\bper(?:\s+[a-z]+){0,2}\s+e-?mail\b",
        r"(?i)\bbalance\s+of(?:\s+curtains?)?\b",
        r"(?i)\bacceptance\s+e-?mail\b",
        r"(?i)\be-?mail\b",
        r"(?i)\b\d+\s*x\s*(?:sml|small|med|medium|lge|large|xl)\b",
        r"(?i)\bcurtains?\b",
        r"(?i)\bscreens?\b",
        r"(?i)\b\d+\s*-?\s*(?:yr|year)s?\b",
        r"(?i)\bchange\s*overs?\b",
        r"(?i)\bchanges?\b",
        r"(?i)\bnew\b(?P<keep>\s+plymouth\b)?",
        r"(?i)\breplacements?\b",
        r"(?i)\bHW\b",
        r"\+",
        r"\b\d{5,}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid boilerplate regex"))
    .collect()
});

/// Hyphenated terms whose hyphen is part of the word, not a separator.
static PROTECTED_COMPOUNDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bx-rays?\b",
        r"(?i)\bpre-op\b",
        r"(?i)\bpost-op\b",
        r"(?i)\bday-stay\b",
        r"(?i)\b\d+-(?:yr|year)s?\b",
        // Numeric ranges ("Bay 1-4")
        r"\d+[A-Za-z]?-\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid compound regex"))
    .collect()
});

/// "5, 6" between numbers is a list, not a separator.
static NUMBER_LIST_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)\s*,\s*(\d)").expect("valid number list regex"));

/// Anything that is not a letter, digit, whitespace, `&`, `'` or a
/// protected hyphen.
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[^\p{{L}}\p{{N}}\s&'{HYPHEN_PLACEHOLDER}]"))
        .expect("valid separator regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Remove order-administrative noise from a raw reference.
///
/// Word order is preserved; the result is trimmed with single spaces.
pub fn strip_noise(raw: &str) -> String {
    let text = strip_prefix(raw);
    let text = strip_boilerplate(&text);
    let text = split_separators(&text);
    collapse_whitespace(&text)
}

/// Strip the first matching reference-number prefix and any colon it leaves.
pub fn strip_prefix(raw: &str) -> String {
    let stripped = PREFIX_RULES
        .iter()
        .find(|rule| rule.is_match(raw))
        .map(|rule| rule.replace(raw, "").into_owned())
        .unwrap_or_else(|| raw.to_string());

    LEADING_COLON.replace(&stripped, "").into_owned()
}

/// Remove reorder-cycle boilerplate, dates and quantity tokens.
pub fn strip_boilerplate(text: &str) -> String {
    BOILERPLATE_RULES
        .iter()
        .fold(text.to_string(), |acc, rule| {
            rule.replace_all(&acc, |caps: &Captures| {
                if caps.name("keep").is_some() {
                    caps[0].to_string()
                } else {
                    " ".to_string()
                }
            })
            .into_owned()
        })
}

/// Replace separators with spaces, keeping protected hyphens.
pub fn split_separators(text: &str) -> String {
    let listed = NUMBER_LIST_COMMA.replace_all(text, "$1 & $2");
    let protected = protect_compounds(&listed);
    let split = SEPARATORS.replace_all(&protected, " ");
    split.replace(HYPHEN_PLACEHOLDER, "-")
}

fn protect_compounds(text: &str) -> String {
    PROTECTED_COMPOUNDS
        .iter()
        .fold(text.to_string(), |acc, rule| {
            rule.replace_all(&acc, |caps: &Captures| {
                caps[0].replace('-', &HYPHEN_PLACEHOLDER.to_string())
            })
            .into_owned()
        })
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
