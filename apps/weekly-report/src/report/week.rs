use chrono::{Datelike, Duration, Local, NaiveDate};

/// Monday → Friday range of the week containing `date`, e.g. `2026-10-12 → 2026-10-16`.
pub fn week_range(date: NaiveDate) -> String {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let friday = monday + Duration::days(4);
    format!("{} → {}", monday.format("%Y-%m-%d"), friday.format("%Y-%m-%d"))
}

/// Week range for today in local time.
pub fn current_week_range() -> String {
    week_range(Local::now().date_naive())
}

/// Returns `week` trimmed, or the current week range when it is blank.
pub fn week_or_current(week: &str) -> String {
    let week = week.trim();
    if week.is_empty() {
        current_week_range()
    } else {
        week.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_range_midweek() {
        assert_eq!(week_range(date(2026, 10, 14)), "2026-10-12 → 2026-10-16");
    }

    #[test]
    fn test_week_range_on_monday() {
        assert_eq!(week_range(date(2026, 10, 12)), "2026-10-12 → 2026-10-16");
    }

    #[test]
    fn test_week_range_on_sunday_stays_in_same_week() {
        assert_eq!(week_range(date(2026, 10, 18)), "2026-10-12 → 2026-10-16");
    }

    #[test]
    fn test_week_range_crosses_month() {
        assert_eq!(week_range(date(2026, 9, 30)), "2026-09-28 → 2026-10-02");
    }

    #[test]
    fn test_week_or_current_keeps_value() {
        assert_eq!(week_or_current("  Sprint 12 "), "Sprint 12");
        assert_eq!(week_or_current(""), current_week_range());
    }
}
