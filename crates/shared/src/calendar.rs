use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use chrono::{Datelike, Days, Locale, NaiveDate, Weekday};

/// Long Turkish rendering, e.g. "2 Ocak 2027 Cumartesi".
pub const LONG_DATE_FORMAT: &str = "%-d %B %Y %A";

/// How many years past the current one a user may search.
pub const SELECTABLE_YEAR_SPAN: i32 = 20;

/// Lazy ascending walk over every Saturday and Sunday of one year.
///
/// The iterator is `Clone`; cloning before consuming it gives a fresh,
/// restartable copy of the sequence.
#[derive(Debug, Clone)]
pub struct WeekendDates {
    year: i32,
    next: Option<NaiveDate>,
}

pub fn weekend_dates(year: i32) -> WeekendDates {
    let next = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(first_weekend_on_or_after)
        .filter(|date| date.year() == year);

    WeekendDates { year, next }
}

impl WeekendDates {
    pub fn year(&self) -> i32 {
        self.year
    }
}

impl Iterator for WeekendDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = next_weekend_day(current).filter(|date| date.year() == self.year);
        Some(current)
    }
}

impl FusedIterator for WeekendDates {}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format_localized(LONG_DATE_FORMAT, Locale::tr_TR).to_string()
}

pub fn selectable_years(current_year: i32) -> RangeInclusive<i32> {
    current_year..=current_year.saturating_add(SELECTABLE_YEAR_SPAN)
}

fn first_weekend_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    if is_weekend(date) {
        return Some(date);
    }

    let days_until_saturday =
        Weekday::Sat.num_days_from_monday() - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(days_until_saturday)))
}

fn next_weekend_day(date: NaiveDate) -> Option<NaiveDate> {
    let step = if date.weekday() == Weekday::Sat { 1 } else { 6 };
    date.checked_add_days(Days::new(step))
}
