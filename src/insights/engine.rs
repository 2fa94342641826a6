use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::frequency::calculate_frequencies;
use super::summary::{
    correlate, empty_window_message, most_common, summary_message, trend_point, Correlation,
    NameCount, TrendPoint,
};
use crate::models::entry::Entry;
use crate::store::{EntryStore, StoreError};

pub const DEFAULT_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;

/// Maps the `period` query parameter to a window length in days.
pub fn period_days(period: Option<&str>) -> i64 {
    match period {
        Some("month") => MONTH_DAYS,
        _ => DEFAULT_DAYS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub time_period: i64,
    pub most_common_mood: NameCount,
    pub most_common_tag: NameCount,
    /// `None` when the window holds no entries.
    pub correlation: Option<Correlation>,
    pub summary_message: String,
    pub mood_trend_data: Vec<TrendPoint>,
}

/// Read-only insight pipeline over an entry store.
pub struct InsightEngine<S> {
    store: S,
}

impl<S: EntryStore> InsightEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insights for the last `days` days (7 when unspecified).
    pub async fn get_insights(&self, days: Option<i64>) -> Result<InsightReport, StoreError> {
        self.get_insights_at(days.unwrap_or(DEFAULT_DAYS), Utc::now())
            .await
    }

    pub async fn get_insights_at(
        &self,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<InsightReport, StoreError> {
        let entries = self.store.get_entries().await?;
        Ok(build_report(&entries, days, now))
    }
}

/// `now - days`, saturating at the earliest representable instant.
fn window_start(days: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Entries whose logical date falls on or after `now - days`, in store order.
pub fn entries_in_window(entries: &[Entry], days: i64, now: DateTime<Utc>) -> Vec<&Entry> {
    let cutoff = window_start(days, now);
    entries
        .iter()
        .filter(|e| e.logical_date() >= cutoff)
        .collect()
}

pub fn build_report(entries: &[Entry], days: i64, now: DateTime<Utc>) -> InsightReport {
    let recent = entries_in_window(entries, days, now);
    tracing::debug!(
        days,
        total = entries.len(),
        in_window = recent.len(),
        "Computing mood insights"
    );

    if recent.is_empty() {
        return InsightReport {
            time_period: days,
            most_common_mood: NameCount::not_available(),
            most_common_tag: NameCount::not_available(),
            correlation: None,
            summary_message: empty_window_message(days),
            mood_trend_data: Vec::new(),
        };
    }

    let freq = calculate_frequencies(recent.iter().copied());
    let average = f64::from(freq.total_score) / recent.len() as f64;

    let most_common_mood = most_common(&freq.mood_counts);
    let most_common_tag = most_common(&freq.tag_counts);
    let correlation = correlate(&freq.tag_mood_scores);
    let summary = summary_message(average, &most_common_mood, &most_common_tag, &correlation);

    InsightReport {
        time_period: days,
        most_common_mood,
        most_common_tag,
        correlation: Some(correlation),
        summary_message: summary,
        mood_trend_data: recent.iter().map(|e| trend_point(e)).collect(),
    }
}
