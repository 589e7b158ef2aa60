// Humanizer Module
// - phrases: default phrase tables (configuration data)
// - random: injectable random source
// - rewriter: the local per-sentence rewriter
// - strategy: local / remote humanizer strategies

pub mod phrases;
pub mod random;
pub mod rewriter;
pub mod strategy;

pub use phrases::PhraseRule;
pub use random::{RandomSource, SeededRandom};
pub use rewriter::{RewriteError, Rewriter};
pub use strategy::{humanizer_from_config, Humanizer, LocalHumanizer, RemoteHumanizer};

use crate::models::RewriteResult;

/// Rewrite with the default phrase tables and a fresh random source.
/// Not deterministic: identical input may give different output.
pub fn rewrite(text: &str) -> RewriteResult {
    LocalHumanizer::default().rewrite(text)
}
