use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::frequency::OrderedCounts;
use crate::models::entry::Entry;

pub const WEEK_DAYS: i64 = 7;
const TOP_TAG_LIMIT: usize = 3;
const UNKNOWN_MOOD: &str = "unknown";

// Intensity and energy are on a 1..=10 scale.
const HIGH_LEVEL: f64 = 7.0;
const LOW_LEVEL: f64 = 3.0;
const ADVICE_BELOW: f64 = 5.0;

const GREAT_WEEK: &str =
    "You've been having a great week! Your mood has been consistently positive.";
const HARD_WEEK: &str = "It looks like you've been going through a challenging time. Remember to be kind to yourself.";
const STABLE_WEEK: &str = "Your mood has been relatively stable this week.";
const HIGH_ENERGY: &str =
    "Your energy levels have been high - great job taking care of yourself!";
const LOW_ENERGY: &str = "Your energy levels have been low. Consider incorporating more rest or energizing activities.";

const MOOD_ADVICE: &str = "Consider trying a mood-lifting activity like exercise, meditation, or spending time with loved ones.";
const ENERGY_ADVICE: &str =
    "Focus on improving your sleep hygiene and consider reducing stress where possible.";
const FAVORITES_TIP: &str =
    "Try marking entries as favorites to track your most meaningful moments.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub average_intensity: f64,
    pub average_energy: f64,
    pub entries: u32,
}

/// Intensity/energy overview of the last seven days.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub total_entries: usize,
    pub average_intensity: f64,
    pub average_energy: f64,
    pub mood_distribution: OrderedCounts<u32>,
    pub top_tags: Vec<String>,
    pub favorite_entries: usize,
    pub daily_trends: Vec<DailyTrend>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Default)]
struct DayTotals {
    intensity: i64,
    energy: i64,
    entries: u32,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn raw_mean(total: i64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Most frequent named mood. Ties keep the earlier mood.
fn frequent_mood(distribution: &OrderedCounts<u32>) -> Option<&str> {
    distribution
        .iter()
        .filter(|(mood, _)| *mood != UNKNOWN_MOOD)
        .fold(None, |best: Option<(&str, u32)>, (mood, &count)| match best {
            Some((_, top)) if count <= top => best,
            _ => Some((mood, count)),
        })
        .map(|(mood, _)| mood)
}

fn week_insights(
    intensity: f64,
    energy: f64,
    distribution: &OrderedCounts<u32>,
    top_tags: &[String],
) -> Vec<String> {
    let mut insights = Vec::new();

    let mood_line = if intensity >= HIGH_LEVEL {
        GREAT_WEEK
    } else if intensity <= LOW_LEVEL {
        HARD_WEEK
    } else {
        STABLE_WEEK
    };
    insights.push(mood_line.to_string());

    if energy >= HIGH_LEVEL {
        insights.push(HIGH_ENERGY.to_string());
    } else if energy <= LOW_LEVEL {
        insights.push(LOW_ENERGY.to_string());
    }

    if let Some(mood) = frequent_mood(distribution) {
        insights.push(format!("You've been feeling \"{mood}\" most frequently."));
    }

    if !top_tags.is_empty() {
        insights.push(format!(
            "Your most frequent activities were: {}.",
            top_tags.join(", ")
        ));
    }

    insights
}

fn week_recommendations(intensity: f64, energy: f64, favorites: usize) -> Vec<String> {
    let mut recommendations = Vec::new();
    if intensity < ADVICE_BELOW {
        recommendations.push(MOOD_ADVICE.to_string());
    }
    if energy < ADVICE_BELOW {
        recommendations.push(ENERGY_ADVICE.to_string());
    }
    if favorites == 0 {
        recommendations.push(FAVORITES_TIP.to_string());
    }
    recommendations
}

pub fn weekly_summary(entries: &[Entry], now: DateTime<Utc>) -> WeeklySummary {
    let start = now - Duration::days(WEEK_DAYS);
    let week: Vec<&Entry> = entries
        .iter()
        .filter(|e| {
            let at = e.logical_date();
            at >= start && at <= now
        })
        .collect();

    let mut mood_distribution = OrderedCounts::<u32>::default();
    let mut tag_counts = OrderedCounts::<u32>::default();
    let mut days: Vec<(NaiveDate, DayTotals)> = Vec::new();
    let mut intensity_total = 0i64;
    let mut energy_total = 0i64;

    for entry in &week {
        intensity_total += i64::from(entry.intensity);
        energy_total += i64::from(entry.energy);
        *mood_distribution.slot(entry.mood_name().unwrap_or(UNKNOWN_MOOD)) += 1;
        for tag in &entry.tags {
            *tag_counts.slot(tag) += 1;
        }

        let date = entry.day();
        let position = match days.iter().position(|(day, _)| *day == date) {
            Some(position) => position,
            None => {
                days.push((date, DayTotals::default()));
                days.len() - 1
            }
        };
        let totals = &mut days[position].1;
        totals.intensity += i64::from(entry.intensity);
        totals.energy += i64::from(entry.energy);
        totals.entries += 1;
    }

    let mut ranked: Vec<(&str, u32)> = tag_counts.iter().map(|(t, &c)| (t, c)).collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_tags: Vec<String> = ranked
        .into_iter()
        .take(TOP_TAG_LIMIT)
        .map(|(tag, _)| tag.to_string())
        .collect();

    let daily_trends = days
        .into_iter()
        .map(|(date, totals)| {
            let count = totals.entries as usize;
            DailyTrend {
                date,
                average_intensity: round1(raw_mean(totals.intensity, count)),
                average_energy: round1(raw_mean(totals.energy, count)),
                entries: totals.entries,
            }
        })
        .collect();

    let favorite_entries = week.iter().filter(|e| e.favorite).count();
    let intensity = raw_mean(intensity_total, week.len());
    let energy = raw_mean(energy_total, week.len());

    // An empty week gets no advice.
    let (insights, recommendations) = if week.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        (
            week_insights(intensity, energy, &mood_distribution, &top_tags),
            week_recommendations(intensity, energy, favorite_entries),
        )
    };

    WeeklySummary {
        total_entries: week.len(),
        average_intensity: round1(intensity),
        average_energy: round1(energy),
        mood_distribution,
        top_tags,
        favorite_entries,
        daily_trends,
        insights,
        recommendations,
    }
}
