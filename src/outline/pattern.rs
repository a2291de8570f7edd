//! Layout-independent heading pattern scoring.
//!
//! Every rule is an independent weak signal. Weights of all matching rules
//! are summed in table order and the total is capped at 1.0, so a short
//! all-caps numbered title cannot run away with the score.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound of [`score`].
pub const MAX_SCORE: f64 = 1.0;

/// How a rule decides whether it applies to a string.
pub enum Matcher {
    /// Regular expression anchored at the start of the string.
    Regex(Regex),
    /// Plain predicate over the string.
    Predicate(fn(&str) -> bool),
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(text),
            Matcher::Predicate(predicate) => predicate(text),
        }
    }
}

/// One weighted heading signal.
pub struct PatternRule {
    /// Short identifier, used in logs and tests
    pub name: &'static str,
    /// The test applied to the text
    pub matcher: Matcher,
    /// Weight added when the test matches
    pub weight: f64,
}

impl PatternRule {
    fn regex(name: &'static str, pattern: &str, weight: f64) -> Self {
        Self {
            name,
            matcher: Matcher::Regex(Regex::new(pattern).expect("heading pattern must compile")),
            weight,
        }
    }

    fn predicate(name: &'static str, predicate: fn(&str) -> bool, weight: f64) -> Self {
        Self {
            name,
            matcher: Matcher::Predicate(predicate),
            weight,
        }
    }

    /// Check whether this rule fires for `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.matches(text)
    }
}

/// The rule table, in evaluation order.
pub static PATTERN_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::regex("chapter", r"^(Chapter|CHAPTER)\s+\d+", 0.3),
        PatternRule::regex("numbered", r"^\d+\.\s+", 0.3),
        PatternRule::regex("section", r"^\d+\.\d+\s+", 0.3),
        PatternRule::regex("subsection", r"^\d+\.\d+\.\d+\s+", 0.3),
        PatternRule::regex("all_caps_run", r"^[A-Z][A-Z\s]{2,}$", 0.3),
        PatternRule::regex("title_case", r"^[A-Z][a-z]+(\s+[A-Z][a-z]+)*$", 0.3),
        PatternRule::predicate("short_upper", is_short_upper, 0.2),
        PatternRule::predicate("capitalized_open", is_capitalized_open, 0.1),
        PatternRule::predicate("few_words", has_few_words, 0.1),
    ]
});

/// Score how heading-like `text` looks, in `[0.0, 1.0]`.
pub fn score(text: &str) -> f64 {
    let total: f64 = PATTERN_RULES
        .iter()
        .filter(|rule| rule.matches(text))
        .map(|rule| rule.weight)
        .sum();
    total.min(MAX_SCORE)
}

/// Names of the rules that fire for `text`.
pub fn matched_rules(text: &str) -> Vec<&'static str> {
    PATTERN_RULES
        .iter()
        .filter(|rule| rule.matches(text))
        .map(|rule| rule.name)
        .collect()
}

/// At least one cased letter and no lower-case letter.
pub(crate) fn is_upper(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

fn is_short_upper(text: &str) -> bool {
    is_upper(text) && text.chars().count() < 50
}

fn is_capitalized_open(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_uppercase()) && !text.ends_with('.')
}

fn has_few_words(text: &str) -> bool {
    text.split_whitespace().count() <= 8
}
