//! Canonical tag sets.
//!
//! A [`Tags`] value is always sorted by key and holds at most one tag per
//! key. Building from raw input sorts stably and keeps the *last* tag of
//! every run of equal keys, so later input wins.

use crate::key::Key;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::slice;

/// A single key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    key: Key,
    value: String,
}

impl Tag {
    /// Create a tag
    pub fn new(key: impl Into<Key>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Tag key
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Tag value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

static EMPTY: Tags = Tags { tags: Vec::new() };

/// Immutable, sorted, deduplicated collection of [`Tag`]s
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Tags {
    tags: Vec<Tag>,
}

impl Tags {
    /// The shared empty tag set
    pub fn empty() -> &'static Tags {
        &EMPTY
    }

    /// Build a canonical tag set from tags in arbitrary order
    pub fn of<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        Self::canonical(tags.into_iter().collect())
    }

    /// Start an incremental builder
    pub fn builder() -> TagsBuilder {
        TagsBuilder::default()
    }

    /// Merge with `other`; tags in `other` win on key conflicts
    pub fn and(&self, other: &Tags) -> Tags {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        self.and_tags(other.tags.iter().cloned())
    }

    /// Merge a single tag, replacing any tag with the same key
    pub fn and_tag(&self, tag: Tag) -> Tags {
        self.and_tags(std::iter::once(tag))
    }

    /// Merge tags in input order; later tags win on key conflicts
    pub fn and_tags<I>(&self, tags: I) -> Tags
    where
        I: IntoIterator<Item = Tag>,
    {
        let mut merged = self.tags.clone();
        merged.extend(tags);
        if merged.len() == self.tags.len() {
            return self.clone();
        }
        Self::canonical(merged)
    }

    /// Merge two tag sources, the second winning on key conflicts
    pub fn concat<A, B>(first: A, second: B) -> Tags
    where
        A: IntoIterator<Item = Tag>,
        B: IntoIterator<Item = Tag>,
    {
        Self::canonical(first.into_iter().chain(second).collect())
    }

    /// Iterate in ascending key order
    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set holds no tags
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &Key) -> Option<&str> {
        self.tags
            .binary_search_by(|tag| tag.key.cmp(key))
            .ok()
            .map(|idx| self.tags[idx].value.as_str())
    }

    /// Whether a tag with `key` is present
    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Stable sort by key, then keep the last tag of every equal-key run.
    fn canonical(mut tags: Vec<Tag>) -> Tags {
        if tags.len() < 2 {
            return Tags { tags };
        }
        tags.sort_by(|a, b| a.key.cmp(&b.key));

        let mut deduped = Vec::with_capacity(tags.len());
        let mut iter = tags.into_iter().peekable();
        while let Some(tag) = iter.next() {
            if iter.peek().is_some_and(|next| next.key == tag.key) {
                continue;
            }
            deduped.push(tag);
        }
        Tags { tags: deduped }
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, tag) in self.tags.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("]")
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.tags.len()))?;
        for tag in &self.tags {
            seq.serialize_element(tag)?;
        }
        seq.end()
    }
}

/// Accumulates tags in insertion order and canonicalizes once on build
#[derive(Debug, Clone, Default)]
pub struct TagsBuilder {
    tags: Vec<Tag>,
}

impl TagsBuilder {
    /// Add a key/value pair
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    /// Add a prepared tag
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Finish into a canonical [`Tags`]
    pub fn build(self) -> Tags {
        Tags::canonical(self.tags)
    }
}
