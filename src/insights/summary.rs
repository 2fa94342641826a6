use serde::Serialize;

use super::frequency::{OrderedCounts, TagScore};
use crate::models::entry::Entry;

pub const NOT_AVAILABLE: &str = "N/A";

// Outside the -2..=2 score range so any tag average replaces them.
const BEST_FLOOR: f64 = -3.0;
const WORST_CEILING: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCount {
    pub name: String,
    pub count: u32,
}

impl NameCount {
    pub fn not_available() -> Self {
        Self {
            name: NOT_AVAILABLE.into(),
            count: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.name != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub best_tag: Option<String>,
    pub worst_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub mood_value: i32,
    pub mood_name: Option<String>,
}

/// Key with the greatest count. Ties keep the earlier key.
pub fn most_common(counts: &OrderedCounts<u32>) -> NameCount {
    counts
        .iter()
        .fold(NameCount::not_available(), |best, (name, &count)| {
            if count > best.count {
                NameCount {
                    name: name.to_string(),
                    count,
                }
            } else {
                best
            }
        })
}

/// Tags with the highest and lowest average mood score. Ties keep the
/// earlier tag.
pub fn correlate(tag_scores: &OrderedCounts<TagScore>) -> Correlation {
    let mut best: Option<&str> = None;
    let mut worst: Option<&str> = None;
    let mut highest = BEST_FLOOR;
    let mut lowest = WORST_CEILING;

    for (tag, score) in tag_scores.iter().filter(|(_, s)| s.count > 0) {
        let avg = score.average();
        if avg > highest {
            highest = avg;
            best = Some(tag);
        }
        if avg < lowest {
            lowest = avg;
            worst = Some(tag);
        }
    }

    Correlation {
        best_tag: best.map(str::to_string),
        worst_tag: worst.map(str::to_string),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTier {
    Positive,
    Balanced,
    Difficult,
}

impl SummaryTier {
    pub fn from_average(average: f64) -> Self {
        if average >= 1.0 {
            SummaryTier::Positive
        } else if average >= 0.0 {
            SummaryTier::Balanced
        } else {
            SummaryTier::Difficult
        }
    }
}

pub fn summary_message(
    average: f64,
    most_common_mood: &NameCount,
    most_common_tag: &NameCount,
    correlation: &Correlation,
) -> String {
    match SummaryTier::from_average(average) {
        SummaryTier::Positive => {
            let mut message = format!(
                "You've been doing great! Your most common mood was {}.",
                most_common_mood.name.to_uppercase()
            );
            if let Some(tag) = &correlation.best_tag {
                message.push_str(&format!(" You seem happiest when you focus on {tag}."));
            }
            message
        }
        SummaryTier::Balanced => {
            let mut message = String::from("Things are balanced. Your mood is generally stable.");
            if most_common_tag.is_available() {
                message.push_str(&format!(
                    " {} has been a big part of your week.",
                    most_common_tag.name
                ));
            }
            message
        }
        SummaryTier::Difficult => {
            let mut message = String::from("It's been a tough period. Be kind to yourself.");
            if let Some(tag) = &correlation.worst_tag {
                message.push_str(&format!(
                    " You might want to reflect on how {tag} affects you."
                ));
            }
            message
        }
    }
}

pub fn empty_window_message(days: i64) -> String {
    format!("No entries in the last {days} days. Start logging your mood to see insights!")
}

pub fn trend_point(entry: &Entry) -> TrendPoint {
    TrendPoint {
        date: entry.day().format("%Y-%m-%d").to_string(),
        mood_value: entry.score(),
        mood_name: entry.mood_name().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> OrderedCounts<u32> {
        let mut counts = OrderedCounts::default();
        for (key, count) in pairs {
            *counts.slot(key) += count;
        }
        counts
    }

    fn scores(pairs: &[(&str, i32, u32)]) -> OrderedCounts<TagScore> {
        let mut scores = OrderedCounts::<TagScore>::default();
        for (tag, total_score, count) in pairs {
            *scores.slot(tag) = TagScore {
                total_score: *total_score,
                count: *count,
            };
        }
        scores
    }

    #[test]
    fn test_most_common_tie_favors_first_key() {
        let result = most_common(&counts(&[("good", 3), ("bad", 3)]));
        assert_eq!(result.name, "good");
        assert_eq!(result.count, 3);
    }

    #[test]
    fn test_most_common_picks_strict_maximum() {
        let result = most_common(&counts(&[("meh", 1), ("rad", 4), ("bad", 2)]));
        assert_eq!(result, NameCount { name: "rad".into(), count: 4 });
    }

    #[test]
    fn test_most_common_empty_is_not_available() {
        let result = most_common(&OrderedCounts::default());
        assert_eq!(result, NameCount::not_available());
        assert!(!result.is_available());
    }

    #[test]
    fn test_correlate_best_and_worst() {
        let result = correlate(&scores(&[("Work", -3, 2), ("Exercise", 4, 2), ("Sleep", 0, 1)]));
        assert_eq!(result.best_tag.as_deref(), Some("Exercise"));
        assert_eq!(result.worst_tag.as_deref(), Some("Work"));
    }

    #[test]
    fn test_correlate_ties_keep_earlier_tag() {
        let result = correlate(&scores(&[("Family", 1, 1), ("Friends", 2, 2)]));
        assert_eq!(result.best_tag.as_deref(), Some("Family"));
        assert_eq!(result.worst_tag.as_deref(), Some("Family"));
    }

    #[test]
    fn test_correlate_without_tags() {
        let result = correlate(&OrderedCounts::default());
        assert_eq!(result.best_tag, None);
        assert_eq!(result.worst_tag, None);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(SummaryTier::from_average(1.0), SummaryTier::Positive);
        assert_eq!(SummaryTier::from_average(0.99), SummaryTier::Balanced);
        assert_eq!(SummaryTier::from_average(0.0), SummaryTier::Balanced);
        assert_eq!(SummaryTier::from_average(-0.01), SummaryTier::Difficult);
    }

    #[test]
    fn test_positive_message_names_mood_and_best_tag() {
        let message = summary_message(
            1.5,
            &NameCount { name: "rad".into(), count: 1 },
            &NameCount { name: "Exercise".into(), count: 2 },
            &Correlation {
                best_tag: Some("Exercise".into()),
                worst_tag: Some("Exercise".into()),
            },
        );
        assert_eq!(
            message,
            "You've been doing great! Your most common mood was RAD. You seem happiest when you focus on Exercise."
        );
    }

    #[test]
    fn test_balanced_message_skips_missing_tag() {
        let message = summary_message(
            0.5,
            &NameCount { name: "good".into(), count: 1 },
            &NameCount::not_available(),
            &Correlation { best_tag: None, worst_tag: None },
        );
        assert_eq!(message, "Things are balanced. Your mood is generally stable.");
    }

    #[test]
    fn test_difficult_message_names_worst_tag() {
        let message = summary_message(
            -1.5,
            &NameCount { name: "awful".into(), count: 1 },
            &NameCount { name: "Work".into(), count: 2 },
            &Correlation {
                best_tag: Some("Work".into()),
                worst_tag: Some("Work".into()),
            },
        );
        assert!(message.starts_with("It's been a tough period."));
        assert!(message.ends_with("You might want to reflect on how Work affects you."));
    }
}
