use chrono::{Datelike, NaiveDate};

pub const DAILY_PROMPTS: [&str; 10] = [
    "What made you smile today?",
    "What is one thing you are grateful for?",
    "How did you take care of yourself today?",
    "What was the most challenging part of your day?",
    "Who did you enjoy connecting with today?",
    "What is something you learned today?",
    "How would you describe your energy level today?",
    "What is one goal you have for tomorrow?",
    "What is a small win you had today?",
    "How did you handle stress today?",
];

/// Rotates through `items` by day of year (January 1st is day 1).
pub fn pick_for_day<T>(items: &[T], date: NaiveDate) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(date.ordinal() as usize % items.len())
}

/// Today's built-in reflection prompt.
pub fn daily_prompt(date: NaiveDate) -> &'static str {
    pick_for_day(&DAILY_PROMPTS, date).copied().unwrap_or(DAILY_PROMPTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rotation_by_day_of_year() {
        // Jan 1 is day 1.
        assert_eq!(daily_prompt(day(2026, 1, 1)), DAILY_PROMPTS[1]);
        assert_eq!(daily_prompt(day(2026, 1, 10)), DAILY_PROMPTS[0]);
        // 2026-10-19 is day 292.
        assert_eq!(daily_prompt(day(2026, 10, 19)), DAILY_PROMPTS[2]);
    }

    #[test]
    fn test_same_day_same_prompt() {
        assert_eq!(daily_prompt(day(2026, 3, 3)), daily_prompt(day(2026, 3, 3)));
    }

    #[test]
    fn test_pick_for_day_over_custom_list() {
        let custom = ["a", "b", "c"];
        assert_eq!(pick_for_day(&custom, day(2026, 1, 2)), Some(&"c"));
        assert_eq!(pick_for_day::<&str>(&[], day(2026, 1, 2)), None);
    }
}
