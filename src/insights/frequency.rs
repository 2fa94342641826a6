use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::entry::Entry;

/// String-keyed map that iterates in first-insertion order.
///
/// "Most common" and correlation tie-breaks favor the key seen first, so
/// insertion order is part of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedCounts<V> {
    index: HashMap<String, usize>,
    items: Vec<(String, V)>,
}

impl<V> Default for OrderedCounts<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<V: Default> OrderedCounts<V> {
    pub fn slot(&mut self, key: &str) -> &mut V {
        let position = match self.index.get(key) {
            Some(&position) => position,
            None => {
                self.items.push((key.to_string(), V::default()));
                self.index.insert(key.to_string(), self.items.len() - 1);
                self.items.len() - 1
            }
        };
        &mut self.items[position].1
    }
}

impl<V> OrderedCounts<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.items[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.items.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedCounts<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (key, value) in &self.items {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Running score for every entry carrying a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TagScore {
    pub total_score: i32,
    pub count: u32,
}

impl TagScore {
    /// Only called for tags that were seen at least once.
    pub fn average(&self) -> f64 {
        f64::from(self.total_score) / f64::from(self.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frequencies {
    pub mood_counts: OrderedCounts<u32>,
    pub tag_counts: OrderedCounts<u32>,
    pub total_score: i32,
    pub tag_mood_scores: OrderedCounts<TagScore>,
}

/// Single pass over already-filtered entries.
///
/// Entries without a mood are not counted and add nothing to the total, but
/// their tags are still tallied with a score of 0.
pub fn calculate_frequencies<'a, I>(entries: I) -> Frequencies
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut freq = Frequencies::default();

    for entry in entries {
        let score = entry.score();

        if let Some(mood) = entry.mood_name() {
            *freq.mood_counts.slot(mood) += 1;
            freq.total_score += score;
        }

        for tag in &entry.tags {
            *freq.tag_counts.slot(tag) += 1;
            let tag_score = freq.tag_mood_scores.slot(tag);
            tag_score.total_score += score;
            tag_score.count += 1;
        }
    }

    freq
}
