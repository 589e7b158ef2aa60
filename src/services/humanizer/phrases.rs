// Default phrase tables for the local rewriter.
// Kept as plain data so they can be overridden from config.json.

use serde::{Deserialize, Serialize};

/// A single phrase -> replacement rule, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRule {
    pub pattern: String,
    pub replacement: String,
}

impl PhraseRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

const CONTRACTIONS: &[(&str, &str)] = &[
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("he is", "he's"),
    ("she is", "she's"),
    ("who is", "who's"),
    ("what is", "what's"),
    ("where is", "where's"),
    ("when is", "when's"),
    ("why is", "why's"),
    ("how is", "how's"),
    ("I am", "I'm"),
    ("you are", "you're"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("I have", "I've"),
    ("you have", "you've"),
    ("we have", "we've"),
    ("they have", "they've"),
    ("would have", "would've"),
    ("could have", "could've"),
    ("should have", "should've"),
    ("will not", "won't"),
    ("cannot", "can't"),
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("has not", "hasn't"),
    ("have not", "haven't"),
    ("had not", "hadn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("should not", "shouldn't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
];

const TRANSITIONS: &[&str] = &[
    "However",
    "Moreover",
    "In addition",
    "Furthermore",
    "On the other hand",
    "Interestingly",
    "Notably",
    "As a result",
    "Consequently",
    "Therefore",
];

const FILLERS: &[&str] = &[
    "actually",
    "basically",
    "essentially",
    "honestly",
    "in fact",
    "of course",
    "surprisingly",
    "interestingly",
];

const EMPHASIS_WORDS: &[&str] = &["very", "really", "quite", "extremely"];

pub fn default_contractions() -> Vec<PhraseRule> {
    CONTRACTIONS
        .iter()
        .map(|(p, r)| PhraseRule::new(*p, *r))
        .collect()
}

pub fn default_transitions() -> Vec<String> {
    TRANSITIONS.iter().map(|s| s.to_string()).collect()
}

pub fn default_fillers() -> Vec<String> {
    FILLERS.iter().map(|s| s.to_string()).collect()
}

pub fn default_emphasis_words() -> Vec<String> {
    EMPHASIS_WORDS.iter().map(|s| s.to_string()).collect()
}
