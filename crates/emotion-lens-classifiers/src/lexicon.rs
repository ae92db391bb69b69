//! Offline keyword classifiers.
//!
//! Used when no inference endpoint is reachable. The emotion classifier
//! emits source-vocabulary labels so its output flows through the same
//! mapping table as any model's.
//!
//! Scoring per sentence (split on `.`, `!`, `?`), for every whole-word
//! keyword match:
//!
//! ```text
//! contribution = max(weight × intensity × negation, 0)
//! intensity    = modifier found in the 20 chars before the match, else 1.0
//! negation     = -0.5 if negatable and a negation word is in the 30 chars before, else 1.0
//! ```
//!
//! There is no sentence-count weighting (`0.7 + min(n / 3, 1) × 0.3`): it
//! scales every label by the same factor, and the engine's max normalization
//! cancels any uniform factor.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;
use tracing::trace;

use emotion_lens_core::types::NUM_TARGETS;
use emotion_lens_core::{
    ClassifierError, ClassifierResult, EmotionClassifier, RawEmotion, SentimentClassifier,
    SentimentResult, TargetEmotion,
};

const INTENSITY_WINDOW_CHARS: usize = 20;
const NEGATION_WINDOW_CHARS: usize = 30;
const NEGATION_MULTIPLIER: f64 = -0.5;

/// `(keyword, weight, negatable)`
type KeywordRow = (&'static str, f64, bool);

const PRIDE_KEYWORDS: &[KeywordRow] = &[
    ("proud", 0.9, true),
    ("proud of", 1.0, true),
    ("achievement", 0.8, true),
    ("accomplished", 0.9, true),
    ("success", 0.7, true),
    ("successful", 0.8, true),
    ("triumph", 0.95, true),
    ("excel", 0.8, true),
    ("excellence", 0.85, true),
    ("honor", 0.9, true),
    ("dignity", 0.85, true),
    ("strong", 0.6, true),
    ("strong tradition", 0.85, true),
    ("heritage", 0.75, false),
    ("legacy", 0.8, false),
    ("succeed", 0.8, true),
    ("superior", 0.75, true),
];

const NOSTALGIA_KEYWORDS: &[KeywordRow] = &[
    ("remember", 0.75, true),
    ("childhood", 0.85, false),
    ("past", 0.6, false),
    ("old days", 0.9, false),
    ("memories", 0.85, false),
    ("miss", 0.85, true),
    ("missing", 0.85, true),
    ("bygone", 0.9, false),
    ("reminisce", 0.9, false),
    ("homesick", 0.95, true),
    ("home", 0.5, false),
    ("hometown", 0.8, false),
    ("back home", 0.9, false),
    ("roots", 0.75, false),
    ("old times", 0.85, false),
    ("the good old days", 0.95, false),
    ("used to", 0.7, false),
    ("once", 0.6, false),
    ("childhood days", 0.95, false),
];

const LOVE_KEYWORDS: &[KeywordRow] = &[
    ("love", 0.95, true),
    ("loving", 0.85, true),
    ("care", 0.75, true),
    ("caring", 0.75, true),
    ("family", 0.6, false),
    ("dear", 0.8, true),
    ("affection", 0.9, true),
    ("affectionate", 0.9, true),
    ("cherish", 0.9, true),
    ("heart", 0.7, false),
    ("support", 0.7, true),
    ("compassion", 0.85, true),
    ("empathy", 0.85, true),
    ("tender", 0.8, true),
    ("devotion", 0.95, true),
    ("devoted", 0.95, true),
    ("adore", 0.95, true),
    ("beloved", 0.95, false),
    ("warmth", 0.85, false),
    ("close to", 0.75, true),
    ("bond", 0.8, false),
];

const HOPE_KEYWORDS: &[KeywordRow] = &[
    ("hope", 0.9, true),
    ("hopeful", 0.9, true),
    ("future", 0.6, false),
    ("better", 0.65, true),
    ("improve", 0.7, true),
    ("improvement", 0.75, true),
    ("dream", 0.75, false),
    ("aspire", 0.85, true),
    ("aspiring", 0.8, true),
    ("believe", 0.65, true),
    ("possibility", 0.7, false),
    ("achieve", 0.75, true),
    ("tomorrow", 0.7, false),
    ("positive", 0.65, true),
    ("optimistic", 0.85, true),
    ("optimism", 0.85, true),
    ("change", 0.6, false),
    ("progress", 0.75, true),
    ("new beginning", 0.9, false),
    ("opportunities", 0.75, false),
    ("potential", 0.7, false),
];

const INTENSITY_MODIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("deeply", 1.4),
    ("truly", 1.2),
    ("really", 1.25),
    ("so", 1.2),
    ("incredibly", 1.5),
    ("absolutely", 1.3),
    ("completely", 1.2),
    ("totally", 1.2),
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "didn't", "won't", "wouldn't", "can't", "couldn't", "isn't",
    "aren't",
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy", "fantastic", "awesome",
    "best", "proud", "hope", "grateful", "beautiful", "joy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "horrible", "worst", "sad", "angry", "disappointed",
    "poor", "miserable", "afraid", "lonely", "hurt", "lost",
];

/// Label emitted for each target. Hope is reported as `optimism`, the
/// source label that maps onto it most strongly.
fn source_label(target: TargetEmotion) -> &'static str {
    match target {
        TargetEmotion::Pride => "pride",
        TargetEmotion::Nostalgia => "nostalgia",
        TargetEmotion::Love => "love",
        TargetEmotion::Hope => "optimism",
    }
}

fn keywords_for(target: TargetEmotion) -> &'static [KeywordRow] {
    match target {
        TargetEmotion::Pride => PRIDE_KEYWORDS,
        TargetEmotion::Nostalgia => NOSTALGIA_KEYWORDS,
        TargetEmotion::Love => LOVE_KEYWORDS,
        TargetEmotion::Hope => HOPE_KEYWORDS,
    }
}

struct CompiledKeyword {
    target: TargetEmotion,
    pattern: Regex,
    weight: f64,
    negatable: bool,
}

/// Whole-word pattern for a literal phrase.
fn word_pattern(phrase: &str) -> ClassifierResult<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(phrase))).map_err(ClassifierError::config)
}

fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?']).filter(|s| !s.trim().is_empty())
}

/// Up to `n` characters immediately before byte offset `end`.
fn window_before(s: &str, end: usize, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let head = &s[..end];
    match head.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &head[idx..],
        None => head,
    }
}

/// Words of a window. Apostrophes stay inside words so `don't` survives.
fn window_words(window: &str) -> HashSet<&str> {
    window
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Keyword emotion classifier.
pub struct LexiconEmotionClassifier {
    keywords: Vec<CompiledKeyword>,
}

impl LexiconEmotionClassifier {
    pub fn new() -> ClassifierResult<Self> {
        let mut keywords = Vec::new();
        for target in TargetEmotion::ALL {
            for &(phrase, weight, negatable) in keywords_for(target) {
                keywords.push(CompiledKeyword {
                    target,
                    pattern: word_pattern(phrase)?,
                    weight,
                    negatable,
                });
            }
        }
        Ok(Self { keywords })
    }

    /// Accumulated keyword totals per target, before scaling.
    pub fn totals(&self, text: &str) -> [f64; NUM_TARGETS] {
        let mut totals = [0.0; NUM_TARGETS];

        for sentence in split_sentences(text) {
            let lower = sentence.to_lowercase();
            for kw in &self.keywords {
                for m in kw.pattern.find_iter(&lower) {
                    let intensity = intensity_multiplier(window_before(
                        &lower,
                        m.start(),
                        INTENSITY_WINDOW_CHARS,
                    ));
                    let negation = if kw.negatable {
                        negation_multiplier(window_before(&lower, m.start(), NEGATION_WINDOW_CHARS))
                    } else {
                        1.0
                    };
                    let contribution = (kw.weight * intensity * negation).max(0.0);
                    trace!(
                        keyword = m.as_str(),
                        target = %kw.target,
                        contribution,
                        "Lexicon match"
                    );
                    totals[kw.target.index()] += contribution;
                }
            }
        }

        totals
    }

    /// Scores in [0, 1]: totals divided by `max(largest total, 1)`.
    ///
    /// Targets without matches are omitted. Text with no keywords yields
    /// an empty list.
    pub fn score(&self, text: &str) -> Vec<RawEmotion> {
        let totals = self.totals(text);
        let scale = totals.iter().copied().fold(1.0, f64::max);

        TargetEmotion::ALL
            .into_iter()
            .filter(|t| totals[t.index()] > 0.0)
            .map(|t| RawEmotion::new(source_label(t), (totals[t.index()] / scale).min(1.0)))
            .collect()
    }
}

fn intensity_multiplier(window: &str) -> f64 {
    let words = window_words(window);
    INTENSITY_MODIFIERS
        .iter()
        .find(|(modifier, _)| words.contains(modifier))
        .map(|&(_, multiplier)| multiplier)
        .unwrap_or(1.0)
}

fn negation_multiplier(window: &str) -> f64 {
    let words = window_words(window);
    if NEGATION_WORDS.iter().any(|n| words.contains(n)) {
        NEGATION_MULTIPLIER
    } else {
        1.0
    }
}

#[async_trait]
impl EmotionClassifier for LexiconEmotionClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<Vec<RawEmotion>> {
        Ok(self.score(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Keyword sentiment classifier emitting `POSITIVE` / `NEGATIVE`.
pub struct LexiconSentimentClassifier {
    positive: Vec<Regex>,
    negative: Vec<Regex>,
}

impl LexiconSentimentClassifier {
    pub fn new() -> ClassifierResult<Self> {
        Ok(Self {
            positive: POSITIVE_WORDS
                .iter()
                .map(|w| word_pattern(w))
                .collect::<ClassifierResult<_>>()?,
            negative: NEGATIVE_WORDS
                .iter()
                .map(|w| word_pattern(w))
                .collect::<ClassifierResult<_>>()?,
        })
    }

    /// Label and its share of all hits. No hits reads as neutral-positive 0.5.
    pub fn score(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();
        let positive_hits = count_hits(&self.positive, &lower) as f64;
        let negative_hits = count_hits(&self.negative, &lower) as f64;
        let total = positive_hits + negative_hits;

        let positive_share = if total == 0.0 {
            0.5
        } else {
            positive_hits / total
        };

        if positive_share >= 0.5 {
            SentimentResult::new("POSITIVE", positive_share)
        } else {
            SentimentResult::new("NEGATIVE", 1.0 - positive_share)
        }
    }
}

fn count_hits(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().map(|p| p.find_iter(text).count()).sum()
}

#[async_trait]
impl SentimentClassifier for LexiconSentimentClassifier {
    async fn classify(&self, text: &str) -> ClassifierResult<SentimentResult> {
        Ok(self.score(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}
