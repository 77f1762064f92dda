//! Declarative pattern rules.
//!
//! Rule tables are plain data: an ordered list of `(pattern, label, placement)`.
//! The three lookup procedures below are the only code that walks them.

use std::cmp::Reverse;

use regex::Regex;

/// Where a rule's label goes relative to its captured value when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// "Lvl 3"
    Before,
    /// "East Wing"
    After,
    /// Value only (compass directions, place names)
    ValueOnly,
}

/// A single pattern with the canonical label it stands for.
///
/// A named capture group `value` marks the part of the match that is kept
/// when rendering.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Regex,
    label: String,
    placement: Placement,
}

impl PatternRule {
    /// Create a rule from a regex source.
    pub fn new(
        pattern: &str,
        label: impl Into<String>,
        placement: Placement,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            label: label.into(),
            placement,
        })
    }

    /// Case-insensitive whole-word rule for a literal name.
    ///
    /// The label is the name itself, so a match renders in its canonical
    /// spelling whatever the input's casing.
    pub fn keyword(name: &str) -> Self {
        let source = format!(r"(?i)\b{}\b", regex::escape(name.trim()));
        Self {
            pattern: Regex::new(&source).expect("escaped literal is a valid regex"),
            label: name.trim().to_string(),
            placement: Placement::ValueOnly,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    fn first_match<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.pattern
            .captures(text)
            .and_then(|caps| RuleMatch::from_captures(self, &caps))
    }

    fn all_matches<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = RuleMatch<'r, 't>> {
        self.pattern
            .captures_iter(text)
            .filter_map(move |caps| RuleMatch::from_captures(self, &caps))
    }
}

/// A rule that matched somewhere in a text.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'r, 't> {
    rule: &'r PatternRule,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
    /// Full matched text
    pub matched: &'t str,
    /// The `value` capture, or the whole match when the rule has none
    pub value: &'t str,
}

impl<'r, 't> RuleMatch<'r, 't> {
    fn from_captures(rule: &'r PatternRule, caps: &regex::Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        let value = caps.name("value").map_or(whole.as_str(), |m| m.as_str());
        Some(Self {
            rule,
            start: whole.start(),
            end: whole.end(),
            matched: whole.as_str(),
            value,
        })
    }

    pub fn label(&self) -> &'r str {
        self.rule.label()
    }

    pub fn placement(&self) -> Placement {
        self.rule.placement()
    }

    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &RuleMatch<'_, '_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Compile a static table of `(pattern, label, placement)` entries.
    pub fn compile(table: &[(&str, &str, Placement)]) -> Result<Self, regex::Error> {
        let rules = table
            .iter()
            .map(|(pattern, label, placement)| PatternRule::new(pattern, *label, *placement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Build keyword rules for a list of names.
    ///
    /// Longer names are tried first so "North Shore" beats "Shore".
    pub fn keywords<S: AsRef<str>>(names: &[S]) -> Self {
        let mut names: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by_key(|n| Reverse(n.len()));
        Self {
            rules: names.into_iter().map(PatternRule::keyword).collect(),
        }
    }

    pub fn push(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule in priority order that matches anywhere in the text.
    pub fn find_first<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.rules.iter().find_map(|rule| rule.first_match(text))
    }

    /// Match that starts earliest in the text; longer wins on equal start,
    /// then rule order.
    pub fn find_leftmost<'r, 't>(&'r self, text: &'t str) -> Option<RuleMatch<'r, 't>> {
        self.rules
            .iter()
            .filter_map(|rule| rule.first_match(text))
            .min_by_key(|m| (m.start, Reverse(m.len())))
    }

    /// Every non-overlapping match of every rule, in text order.
    ///
    /// Where matches overlap, the one starting first (then the longer one,
    /// then the higher-priority rule) is kept.
    pub fn find_all<'r, 't>(&'r self, text: &'t str) -> Vec<RuleMatch<'r, 't>> {
        let mut candidates: Vec<(usize, RuleMatch<'r, 't>)> = self
            .rules
            .iter()
            .enumerate()
            .flat_map(|(priority, rule)| rule.all_matches(text).map(move |m| (priority, m)))
            .collect();
        candidates.sort_by_key(|(priority, m)| (m.start, Reverse(m.len()), *priority));

        let mut kept: Vec<RuleMatch<'r, 't>> = Vec::new();
        for (_, candidate) in candidates {
            if kept.iter().all(|k| !k.overlaps(&candidate)) {
                kept.push(candidate);
            }
        }
        kept
    }
}

/// Remove byte spans from a text, leaving a space where each span was.
///
/// Spans must not overlap.
pub fn remove_spans(text: &str, spans: &[(usize, usize)]) -> String {
    let mut spans = spans.to_vec();
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in spans {
        if start < cursor {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push(' ');
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rules() -> RuleSet {
        RuleSet::compile(&[
            (r"(?i)\bbay\s*(?P<value>\d+)", "Bay", Placement::Before),
            (r"(?i)\broom\s*(?P<value>\d+)", "Rm", Placement::Before),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_first_uses_rule_priority() {
        let rules = sample_rules();
        let m = rules.find_first("Room 4 Bay 2").unwrap();
        assert_eq!(m.label(), "Bay");
        assert_eq!(m.value, "2");
    }

    #[test]
    fn test_find_leftmost_uses_position() {
        let rules = sample_rules();
        let m = rules.find_leftmost("Room 4 Bay 2").unwrap();
        assert_eq!(m.label(), "Rm");
        assert_eq!(m.matched, "Room 4");
    }

    #[test]
    fn test_find_all_in_text_order() {
        let rules = sample_rules();
        let matches = rules.find_all("Bay 9 Room 4 Bay 2");
        let values: Vec<&str> = matches.iter().map(|m| m.value).collect();
        assert_eq!(values, vec!["9", "4", "2"]);
    }

    #[test]
    fn test_find_all_drops_overlaps() {
        let rules = RuleSet::compile(&[
            (r"(?i)\blevel\s*(?P<value>\d+)", "Lvl", Placement::Before),
            (r"(?i)\bl\w*\s*(?P<value>\d)", "Lvl", Placement::Before),
        ])
        .unwrap();
        let matches = rules.find_all("level 3");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_keyword_is_case_insensitive_and_canonical() {
        let rules = RuleSet::keywords(&["Shore", "North Shore"]);
        let m = rules.find_first("north shore ED").unwrap();
        assert_eq!(m.label(), "North Shore");
        assert_eq!(m.matched, "north shore");
    }

    #[test]
    fn test_keyword_respects_word_boundaries() {
        let rules = RuleSet::keywords(&["Hutt"]);
        assert!(rules.find_first("Shutters").is_none());
    }

    #[test]
    fn test_remove_spans() {
        assert_eq!(remove_spans("abc def ghi", &[(4, 7)]), "abc   ghi");
        assert_eq!(remove_spans("abc def ghi", &[(8, 11), (0, 3)]), "  def  ");
    }
}
