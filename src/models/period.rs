use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{LABEL_FORTNIGHTLY, LABEL_MONTHLY};

/// A contiguous date interval `[start, end)` to composite over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Temporal partitioning policy, encoded in output filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    Monthly,
    Fortnightly,
}

impl Aggregation {
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Monthly => LABEL_MONTHLY,
            Aggregation::Fortnightly => LABEL_FORTNIGHTLY,
        }
    }
}

/// Lazy generator of calendar-month periods for one year.
///
/// Each period runs from the first of a month to the first of the next; the
/// December period rolls into January of the following year. When the year
/// equals the designated in-progress year only January is generated, since
/// the source catalog has not yet published later months.
#[derive(Debug, Clone)]
pub struct MonthlyPeriods {
    year: i32,
    next_month: u32,
    max_month: u32,
}

impl MonthlyPeriods {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            next_month: 1,
            max_month: 12,
        }
    }

    /// Cap generation to the first month when `year` is still in progress.
    pub fn with_in_progress_year(mut self, in_progress_year: i32) -> Self {
        if self.year == in_progress_year {
            self.max_month = 1;
        }
        self
    }
}

impl Iterator for MonthlyPeriods {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.next_month > self.max_month {
            return None;
        }
        let start = NaiveDate::from_ymd_opt(self.year, self.next_month, 1)?;
        let end = start.checked_add_months(Months::new(1))?;
        self.next_month += 1;
        Some(Period::new(start, end))
    }
}

/// Lazy generator of two fortnights per calendar month.
///
/// For each month in `[min_month, max_month]` this yields `[1st, 15th)`
/// followed by `[16th, last-day-of-month)`. Month lengths come from the
/// calendar, so February is 29 days long in leap years.
#[derive(Debug, Clone)]
pub struct FortnightlyPeriods {
    year: i32,
    month: u32,
    max_month: u32,
    second_half: bool,
}

impl FortnightlyPeriods {
    pub fn new(year: i32, min_month: u32, max_month: u32) -> Self {
        Self {
            year,
            month: min_month.max(1),
            max_month: max_month.min(12),
            second_half: false,
        }
    }

    /// All fortnights of `year`, capped to January for the in-progress year.
    pub fn for_year(year: i32, in_progress_year: i32) -> Self {
        let max_month = if year == in_progress_year { 1 } else { 12 };
        Self::new(year, 1, max_month)
    }
}

impl Iterator for FortnightlyPeriods {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.month > self.max_month {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        if !self.second_half {
            self.second_half = true;
            Some(Period::new(first, first.with_day(15)?))
        } else {
            self.second_half = false;
            self.month += 1;
            let start = first.with_day(16)?;
            let end = last_day_of_month(first)?;
            Some(Period::new(start, end))
        }
    }
}

fn last_day_of_month(first_of_month: NaiveDate) -> Option<NaiveDate> {
    first_of_month
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_full_year() {
        let periods: Vec<Period> = MonthlyPeriods::new(2023).collect();
        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0], Period::new(date(2023, 1, 1), date(2023, 2, 1)));
        assert_eq!(periods[1], Period::new(date(2023, 2, 1), date(2023, 3, 1)));
        assert_eq!(periods[11], Period::new(date(2023, 12, 1), date(2024, 1, 1)));
    }

    #[test]
    fn test_monthly_in_progress_year_caps_to_january() {
        let periods: Vec<Period> = MonthlyPeriods::new(2024)
            .with_in_progress_year(2024)
            .collect();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0], Period::new(date(2024, 1, 1), date(2024, 2, 1)));

        // A completed year is unaffected by the cutoff.
        let full: Vec<Period> = MonthlyPeriods::new(2023)
            .with_in_progress_year(2024)
            .collect();
        assert_eq!(full.len(), 12);
    }

    #[test]
    fn test_monthly_is_restartable() {
        let first: Vec<Period> = MonthlyPeriods::new(2022).collect();
        let second: Vec<Period> = MonthlyPeriods::new(2022).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fortnightly_pairs_per_month() {
        let periods: Vec<Period> = FortnightlyPeriods::new(2023, 1, 12).collect();
        assert_eq!(periods.len(), 24);
        assert_eq!(periods[0], Period::new(date(2023, 1, 1), date(2023, 1, 15)));
        assert_eq!(periods[1], Period::new(date(2023, 1, 16), date(2023, 1, 31)));
    }

    #[test]
    fn test_fortnightly_month_end_boundaries() {
        let periods: Vec<Period> = FortnightlyPeriods::new(2023, 1, 12).collect();
        for (month, expected_last_day) in [
            (1u32, 31u32),
            (2, 28),
            (3, 31),
            (4, 30),
            (5, 31),
            (6, 30),
            (7, 31),
            (8, 31),
            (9, 30),
            (10, 31),
            (11, 30),
            (12, 31),
        ] {
            let second = periods[(month as usize - 1) * 2 + 1];
            assert_eq!(
                second.end,
                date(2023, month, expected_last_day),
                "month {month}"
            );
        }
    }

    #[test]
    fn test_fortnightly_february_leap_year() {
        let periods: Vec<Period> = FortnightlyPeriods::new(2024, 2, 2).collect();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0], Period::new(date(2024, 2, 1), date(2024, 2, 15)));
        assert_eq!(periods[1], Period::new(date(2024, 2, 16), date(2024, 2, 29)));
    }

    #[test]
    fn test_fortnightly_february_non_leap() {
        let periods: Vec<Period> = FortnightlyPeriods::new(2023, 2, 2).collect();
        assert_eq!(periods[1], Period::new(date(2023, 2, 16), date(2023, 2, 28)));
    }

    #[test]
    fn test_fortnightly_for_in_progress_year() {
        let periods: Vec<Period> = FortnightlyPeriods::for_year(2024, 2024).collect();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[1].start, date(2024, 1, 16));

        let full: Vec<Period> = FortnightlyPeriods::for_year(2023, 2024).collect();
        assert_eq!(full.len(), 24);
    }

    #[test]
    fn test_fortnightly_month_range_is_clamped() {
        let periods: Vec<Period> = FortnightlyPeriods::new(2023, 0, 14).collect();
        assert_eq!(periods.len(), 24);
    }

    #[test]
    fn test_aggregation_labels() {
        assert_eq!(Aggregation::Monthly.label(), "monthlyavg");
        assert_eq!(Aggregation::Fortnightly.label(), "15dayavg");
    }

    #[test]
    fn test_period_days() {
        let p = Period::new(date(2023, 1, 1), date(2023, 2, 1));
        assert_eq!(p.days(), 31);
        assert_eq!(p.to_string(), "2023-01-01..2023-02-01");
    }
}
