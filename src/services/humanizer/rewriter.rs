// Local Rewriter
// Per-sentence style perturbations that push a text toward a human-like profile:
// contractions, transitions, fillers, rhetorical questions and emphasis words.
// Lossy by nature: meaning is mostly kept but grammar is not guaranteed.

use regex::Regex;
use thiserror::Error;

use crate::services::config_store::{HumanizerConfig, RewriteProbabilities};
use crate::services::text_processor::{normalize_spacing, split_sentences};

use super::random::{chance, pick, RandomSource};

/// Filler words go no further than this many word slots into a sentence.
const FILLER_MAX_SLOT: usize = 4;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("invalid contraction pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("probability for {step} must be within [0, 1], got {value}")]
    InvalidProbability { step: &'static str, value: f64 },
}

struct ContractionRule {
    matcher: Regex,
    replacement: String,
}

pub struct Rewriter {
    contractions: Vec<ContractionRule>,
    transitions: Vec<String>,
    fillers: Vec<String>,
    emphasis_words: Vec<String>,
    probabilities: RewriteProbabilities,
    min_sentence_words: usize,
}

fn check_probability(step: &'static str, value: f64) -> Result<(), RewriteError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RewriteError::InvalidProbability { step, value })
    }
}

impl Rewriter {
    pub fn new(config: &HumanizerConfig) -> Result<Self, RewriteError> {
        let p = &config.probabilities;
        check_probability("contraction", p.contraction)?;
        check_probability("transition", p.transition)?;
        check_probability("filler", p.filler)?;
        check_probability("question", p.question)?;
        check_probability("emphasis", p.emphasis)?;

        let contractions = config
            .contractions
            .iter()
            .filter(|rule| !rule.pattern.trim().is_empty())
            .map(|rule| {
                let source = format!("(?i){}", regex::escape(rule.pattern.trim()));
                Regex::new(&source)
                    .map(|matcher| ContractionRule {
                        matcher,
                        replacement: rule.replacement.clone(),
                    })
                    .map_err(|source| RewriteError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            contractions,
            transitions: config.transitions.clone(),
            fillers: config.fillers.clone(),
            emphasis_words: config.emphasis_words.clone(),
            probabilities: p.clone(),
            min_sentence_words: config.min_sentence_words,
        })
    }

    /// Rewrite the whole text. Sentences keep their order; output spacing is normalized.
    pub fn rewrite<R: RandomSource + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let rewritten: Vec<String> = split_sentences(text)
            .into_iter()
            .enumerate()
            .map(|(idx, sentence)| self.rewrite_sentence(idx, sentence, rng))
            .collect();
        normalize_spacing(&rewritten.join(" "))
    }

    fn rewrite_sentence<R: RandomSource + ?Sized>(&self, index: usize, sentence: String, rng: &mut R) -> String {
        if sentence.split_whitespace().count() < self.min_sentence_words {
            return sentence;
        }

        let mut s = self.apply_contractions(sentence, rng);

        if index > 0 && chance(rng, self.probabilities.transition) {
            if let Some(transition) = pick(rng, &self.transitions) {
                s = format!("{}, {}", transition, lowercase_first(&s));
            }
        }

        if chance(rng, self.probabilities.filler) {
            let mut words: Vec<&str> = s.split_whitespace().collect();
            if words.len() > FILLER_MAX_SLOT {
                let pos = rng.next_in_range(1, FILLER_MAX_SLOT.min(words.len() - 1));
                if let Some(filler) = pick(rng, &self.fillers) {
                    words.insert(pos, filler);
                    s = words.join(" ");
                }
            }
        }

        if chance(rng, self.probabilities.question) && !s.contains('?') && !s.contains('!') {
            if let Some(stripped) = s.strip_suffix('.') {
                s = format!("{}?", stripped);
            }
        }

        if chance(rng, self.probabilities.emphasis) {
            let mut words: Vec<&str> = s.split_whitespace().collect();
            if words.len() > 3 {
                let pos = rng.next_in_range(1, words.len() - 2);
                if let Some(word) = pick(rng, &self.emphasis_words) {
                    words.insert(pos, word);
                    s = words.join(" ");
                }
            }
        }

        s
    }

    fn apply_contractions<R: RandomSource + ?Sized>(&self, sentence: String, rng: &mut R) -> String {
        let mut s = sentence;
        for rule in &self.contractions {
            let Some(m) = rule.matcher.find(&s) else {
                continue;
            };
            if !chance(rng, self.probabilities.contraction) {
                continue;
            }
            let replacement = match_case(m.as_str(), &rule.replacement);
            s = format!("{}{}{}", &s[..m.start()], replacement, &s[m.end()..]);
        }
        s
    }
}

/// Carry a leading capital from the matched text onto the replacement.
fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().map_or(false, char::is_uppercase);
    if starts_upper {
        uppercase_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
