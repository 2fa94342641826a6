//! Insight aggregation over journal entries.
//!
//! Everything here is a pure function of an entry snapshot and a window
//! length, except [`InsightEngine`], which fetches the snapshot from an
//! [`EntryStore`](crate::store::EntryStore) first.

pub mod engine;
pub mod frequency;
pub mod prompts;
pub mod summary;
pub mod weekly;

pub use engine::{period_days, InsightEngine, InsightReport};
pub use prompts::{daily_prompt, pick_for_day};
pub use weekly::{weekly_summary, WeeklySummary};
