//! Normalized tag sets.
//!
//! Every tag that enters the system passes through the same normalization:
//! trim surrounding whitespace, then lowercase. Matching everywhere else is
//! exact string equality, so two spellings that normalize identically are
//! the same tag. Callers may hand in tags as a list or as a single
//! comma-joined string; both collapse to the one canonical representation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Normalize a single raw tag. Returns `None` if nothing is left after
/// trimming.
fn normalize(raw: &str) -> Option<String> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// An ordered set of normalized tags.
///
/// Used both for an event's tags and for one side of a separation rule
/// (where the members are alternatives).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-joined string, e.g. `"running, Swimming"`.
    ///
    /// Empty segments are dropped, so `"a,,b"` yields two tags.
    pub fn parse(joined: &str) -> Self {
        joined.split(',').collect()
    }

    /// Insert a raw tag, normalizing it first. No-op for blank input.
    pub fn insert(&mut self, raw: &str) {
        if let Some(tag) = normalize(raw) {
            self.0.insert(tag);
        }
    }

    pub fn contains(&self, raw: &str) -> bool {
        match normalize(raw) {
            Some(tag) => self.0.contains(&tag),
            None => false,
        }
    }

    /// Whether any tag appears in both sets.
    pub fn intersects(&self, other: &TagSet) -> bool {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().any(|tag| large.contains(tag))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for raw in iter {
            set.insert(raw.as_ref());
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.0 {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{tag}")?;
            first = false;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept either a JSON array of tags or a single comma-joined string.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Many(Vec<String>),
            Joined(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Many(tags) => tags.into_iter().collect(),
            Raw::Joined(joined) => TagSet::parse(&joined),
        })
    }
}
