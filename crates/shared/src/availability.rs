use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

/// Dates picked during the session, in the order they were picked.
///
/// Append-only until [`UsedDateHistory::clear`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedDateHistory {
    dates: Vec<NaiveDate>,
    index: HashSet<NaiveDate>,
}

impl UsedDateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the date was already recorded.
    pub fn record(&mut self, date: NaiveDate) -> bool {
        if !self.index.insert(date) {
            return false;
        }
        self.dates.push(date);
        true
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.index.contains(date)
    }

    pub fn clear(&mut self) {
        self.dates.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl FromIterator<NaiveDate> for UsedDateHistory {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let mut history = Self::new();
        for date in iter {
            history.record(date);
        }
        history
    }
}

/// Keeps the dates not yet present in `history`, preserving order.
pub fn filter_available<I>(dates: I, history: &UsedDateHistory) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates
        .into_iter()
        .filter(|date| !history.contains(date))
        .collect()
}

/// Ordered, never-empty list of dates still on offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    dates: Vec<NaiveDate>,
}

impl CandidateSet {
    pub fn new(dates: Vec<NaiveDate>) -> Option<Self> {
        if dates.is_empty() {
            None
        } else {
            Some(Self { dates })
        }
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Leading candidates, at least one and at most `limit`.
    pub fn prefix(&self, limit: usize) -> &[NaiveDate] {
        &self.dates[..limit.clamp(1, self.dates.len())]
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        self.dates.choose(rng).copied().unwrap_or(self.dates[0])
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }
}
