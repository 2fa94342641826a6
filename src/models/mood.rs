use serde::{Deserialize, Serialize};

/// The fixed set of moods offered by the mood selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Rad,
    Good,
    Meh,
    Bad,
    Awful,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::Rad,
        MoodLabel::Good,
        MoodLabel::Meh,
        MoodLabel::Bad,
        MoodLabel::Awful,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoodLabel::Rad => "rad",
            MoodLabel::Good => "good",
            MoodLabel::Meh => "meh",
            MoodLabel::Bad => "bad",
            MoodLabel::Awful => "awful",
        }
    }

    /// Signed score on the -2..=2 scale used by every aggregate.
    pub fn score(self) -> i32 {
        match self {
            MoodLabel::Rad => 2,
            MoodLabel::Good => 1,
            MoodLabel::Meh => 0,
            MoodLabel::Bad => -1,
            MoodLabel::Awful => -2,
        }
    }

    /// Exact lookup by stored name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.name() == name)
    }
}

/// A mood as picked by the user: one of the fixed labels or a custom one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mood {
    Known(MoodLabel),
    Custom(String),
}

impl Mood {
    /// Normalize raw client input. Known labels match case-insensitively and
    /// are stored in their canonical lowercase form.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mood = match MoodLabel::from_name(&trimmed.to_lowercase()) {
            Some(label) => Mood::Known(label),
            None => Mood::Custom(trimmed.to_string()),
        };
        Some(mood)
    }

    pub fn name(&self) -> &str {
        match self {
            Mood::Known(label) => label.name(),
            Mood::Custom(name) => name,
        }
    }

    pub fn score(&self) -> i32 {
        match self {
            Mood::Known(label) => label.score(),
            Mood::Custom(_) => 0,
        }
    }
}

/// Score of a stored mood name. Unrecognized names score 0.
pub fn score_of(name: &str) -> i32 {
    MoodLabel::from_name(name).map_or(0, MoodLabel::score)
}

/// Mood as sent by clients: either the bare name or the selector's full
/// mood record (`{"name": "rad", "label": "Rad", ...}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MoodInput {
    Name(String),
    Record { name: String },
}

impl MoodInput {
    pub fn into_mood(self) -> Option<Mood> {
        match self {
            MoodInput::Name(name) | MoodInput::Record { name } => Mood::normalize(&name),
        }
    }
}
