//! Natural-language rule intent parsing.
//!
//! Turns free text like "keep at least 2 days between running and swimming"
//! into a [`RuleDraft`]. Deliberately keyword-level: the classifier decides
//! whether the text reads as a spacing request at all, then the parser
//! lifts the two tags from the "between X and Y" frame and the first
//! integer as the day gap. No model files, no process-global state -- the
//! classifier is a plain value the caller constructs and hands in, so it
//! never touches the validation core.

use thiserror::Error;

use crate::rule::RuleDraft;
use crate::tag::TagSet;

/// Coarse classification of a rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    /// The text reads as a request to keep events apart.
    Positive,
    /// The text does not read as a spacing request.
    Negative,
}

/// Classifies rule text. Implementations must be side-effect free.
pub trait Classifier {
    fn classify(&self, text: &str) -> Sentiment;
}

/// Default classifier: a small cue-word lexicon.
///
/// Counts spacing cues ("apart", "between", "gap", ...) against dismissal
/// cues ("ignore", "cancel", ...); the text is positive when the spacing
/// cues win.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

const SPACING_CUES: &[&str] = &[
    "apart", "at", "least", "between", "days", "day", "gap", "keep", "rest", "recovery",
    "separate", "space", "spacing",
];

const DISMISSAL_CUES: &[&str] = &["cancel", "delete", "forget", "ignore", "never", "nothing", "remove"];

impl Classifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        let mut score = 0i32;
        for token in tokens(text) {
            if SPACING_CUES.contains(&token.as_str()) {
                score += 1;
            }
            if DISMISSAL_CUES.contains(&token.as_str()) {
                score -= 1;
            }
        }
        if score > 0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

/// Errors from rule intent parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    /// The classifier did not read the text as a spacing request
    #[error("could not interpret the text as a spacing rule")]
    Unintelligible,

    /// The "between X and Y" frame is missing
    #[error("rule text must name two tags, e.g. \"keep 2 days between running and swimming\"")]
    MissingTags,
}

/// Parses rule text with an injected [`Classifier`].
#[derive(Debug, Clone)]
pub struct RuleIntentParser<C = LexiconClassifier> {
    classifier: C,
    default_min_days: u32,
}

impl<C: Classifier> RuleIntentParser<C> {
    /// `default_min_days` is used when the text names no number
    /// (configured via [`crate::storage::Config::default_min_days`]).
    pub fn new(classifier: C, default_min_days: u32) -> Self {
        Self {
            classifier,
            default_min_days,
        }
    }

    /// Interpret rule text into a draft, without storing anything.
    pub fn parse(&self, text: &str) -> Result<RuleDraft, IntentError> {
        if self.classifier.classify(text) == Sentiment::Negative {
            log::debug!("rule text classified as non-spacing: {text:?}");
            return Err(IntentError::Unintelligible);
        }

        let words = tokens(text);
        let between = words
            .iter()
            .position(|w| w == "between")
            .ok_or(IntentError::MissingTags)?;
        let tag1 = words.get(between + 1).ok_or(IntentError::MissingTags)?;
        let and = words[between..]
            .iter()
            .position(|w| w == "and")
            .map(|i| between + i)
            .ok_or(IntentError::MissingTags)?;
        let tag2 = words.get(and + 1).ok_or(IntentError::MissingTags)?;

        let min_days = words
            .iter()
            .find_map(|w| w.parse::<u32>().ok())
            .unwrap_or(self.default_min_days);

        let draft = RuleDraft {
            group1: TagSet::parse(tag1),
            group2: TagSet::parse(tag2),
            min_days,
        };
        draft.validate().map_err(|_| IntentError::MissingTags)?;
        Ok(draft)
    }
}

/// Lowercased tokens with surrounding punctuation stripped.
fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
