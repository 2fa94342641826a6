use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::mood::{score_of, MoodInput};

pub const DEFAULT_LEVEL: i32 = 5;

fn default_level() -> i32 {
    DEFAULT_LEVEL
}

/// Entry identifier. New entries get a UUID v4; journals written by the
/// mobile client use millisecond timestamps, stored as strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(Number),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        };
        if id.is_empty() {
            return Err(de::Error::custom("entry id is empty"));
        }
        Ok(Self(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_mood")]
    pub mood: Option<String>,
    #[serde(default = "default_level")]
    pub intensity: i32,
    #[serde(default = "default_level")]
    pub energy: i32,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Logical entry date, when the user backdated the entry.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    pub fn create(req: CreateEntryRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::generate(),
            text: req.text,
            mood: req.mood.and_then(MoodInput::into_mood).map(|m| m.name().to_string()),
            intensity: req.intensity.unwrap_or(DEFAULT_LEVEL),
            energy: req.energy.unwrap_or(DEFAULT_LEVEL),
            tags: req.tags,
            favorite: req.favorite,
            date: Some(req.date.unwrap_or(now)),
            timestamp: now,
        }
    }

    pub fn apply(&mut self, req: UpdateEntryRequest) {
        if let Some(text) = req.text {
            self.text = Some(text);
        }
        if let Some(mood) = req.mood {
            self.mood = mood.into_mood().map(|m| m.name().to_string());
        }
        if let Some(intensity) = req.intensity {
            self.intensity = intensity;
        }
        if let Some(energy) = req.energy {
            self.energy = energy;
        }
        if let Some(tags) = req.tags {
            self.tags = tags;
        }
        if let Some(favorite) = req.favorite {
            self.favorite = favorite;
        }
        if let Some(date) = req.date {
            self.date = Some(date);
        }
    }

    /// The date insights are computed against: `date`, or `timestamp` if unset.
    pub fn logical_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.timestamp)
    }

    /// Calendar day used for trend bucketing.
    pub fn day(&self) -> NaiveDate {
        self.logical_date().date_naive()
    }

    /// Mood name, treating an empty string as no mood.
    pub fn mood_name(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }

    pub fn score(&self) -> i32 {
        self.mood_name().map_or(0, score_of)
    }
}

// Records written by older clients may carry a mood record instead of a
// name, or a non-list `tags`. Neither should make the entry unreadable.

fn lenient_mood<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let name = match value {
        Value::String(name) => Some(name),
        Value::Object(record) => record
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    Ok(name.filter(|n| !n.is_empty()))
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    #[validate(length(max = 10000, message = "Text must be at most 10000 characters"))]
    pub text: Option<String>,
    pub mood: Option<MoodInput>,
    #[validate(range(min = 1, max = 10, message = "Intensity must be between 1 and 10"))]
    pub intensity: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Energy must be between 1 and 10"))]
    pub energy: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    #[validate(length(max = 10000, message = "Text must be at most 10000 characters"))]
    pub text: Option<String>,
    pub mood: Option<MoodInput>,
    #[validate(range(min = 1, max = 10, message = "Intensity must be between 1 and 10"))]
    pub intensity: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Energy must be between 1 and 10"))]
    pub energy: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
    pub date: Option<DateTime<Utc>>,
}
