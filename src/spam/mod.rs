// Heuristic spam classifier for contact form submissions.
//
// Three independent checks; any single match flags the submission as spam:
//   1. A denylist keyword appears anywhere in the name or message
//   2. The message body contains more than `max_links` URLs
//   3. A longer message repeats its words heavily
//
// `classify` is a pure function of its inputs — no shared state, safe to
// call from any number of concurrent request handlers.

use std::collections::HashSet;

use anyhow::{Context, Result};
use regex_lite::Regex;

/// Keywords whose presence (as a case-insensitive substring) flags spam.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "casino",
    "gambling",
    "bitcoin",
    "crypto",
    "investment",
    "loan",
    "viagra",
    "pharmacy",
    "dating",
    "adult",
    "porn",
    "xxx",
    "free money",
    "click here",
    "limited time",
    "act now",
];

/// HTTP(S) URLs: scheme, then letters, digits, a small set of URL
/// punctuation, or percent-encoded octets.
pub const DEFAULT_URL_PATTERN: &str = r"https?://(?:[A-Za-z0-9$\-_@.&+!*'(),]|%[0-9a-fA-F]{2})+";

/// Classifier configuration. The thresholds are tuned constants carried
/// over from the original heuristics; they live here rather than being
/// hard-coded so tests can substitute their own ruleset.
#[derive(Debug, Clone)]
pub struct SpamRules {
    /// Denylist of substrings (matched case-insensitively).
    pub keywords: Vec<String>,
    /// Regex for extracting URLs from the message body.
    pub url_pattern: String,
    /// More than this many URLs in the message flags spam.
    pub max_links: usize,
    /// Repetition is only checked for messages longer than this many words.
    pub repetition_min_words: usize,
    /// Flag when distinct words fall below this fraction of total words.
    pub distinct_word_ratio: f64,
}

impl Default for SpamRules {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            url_pattern: DEFAULT_URL_PATTERN.to_string(),
            max_links: 2,
            repetition_min_words: 10,
            distinct_word_ratio: 0.5,
        }
    }
}

/// Evaluates a (name, message) pair against a fixed ruleset.
pub struct SpamClassifier {
    rules: SpamRules,
    url_re: Regex,
}

impl SpamClassifier {
    /// Build a classifier, compiling the URL pattern once up front.
    /// Keywords are lowercased so matching stays case-insensitive even
    /// with a caller-supplied denylist.
    pub fn new(mut rules: SpamRules) -> Result<Self> {
        let url_re = Regex::new(&rules.url_pattern)
            .with_context(|| format!("Invalid URL pattern: {}", rules.url_pattern))?;
        for keyword in &mut rules.keywords {
            *keyword = keyword.to_lowercase();
        }
        Ok(Self { rules, url_re })
    }

    /// Returns true when the submission looks like spam.
    pub fn classify(&self, name: &str, message: &str) -> bool {
        self.matches_keyword(name, message)
            || self.excessive_links(message)
            || self.excessive_repetition(message)
    }

    /// Denylist check over the lowercased name and message together.
    /// Plain substring match — "free money" matches anywhere in the text,
    /// not just on word boundaries.
    fn matches_keyword(&self, name: &str, message: &str) -> bool {
        let content = format!("{name} {message}").to_lowercase();
        self.rules
            .keywords
            .iter()
            .any(|keyword| content.contains(keyword.as_str()))
    }

    /// Count URLs in the message body only — a URL in the name field is
    /// odd but not what this rule is after.
    fn excessive_links(&self, message: &str) -> bool {
        self.url_re.find_iter(message).count() > self.rules.max_links
    }

    /// Repetition heuristic: a message with many words but few distinct
    /// ones reads like keyword stuffing. Short messages are exempt
    /// regardless of ratio, so an empty message never trips this rule.
    fn excessive_repetition(&self, message: &str) -> bool {
        let words: Vec<&str> = message.split_whitespace().collect();
        if words.len() <= self.rules.repetition_min_words {
            return false;
        }
        let distinct: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        (distinct.len() as f64) < (words.len() as f64) * self.rules.distinct_word_ratio
    }
}
