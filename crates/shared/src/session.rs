use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::info;

use crate::animation::{AnimationSettings, DisplayReceiver, SelectionAnimator};
use crate::availability::{CandidateSet, UsedDateHistory, filter_available};
use crate::calendar::{selectable_years, weekend_dates};
use crate::categories::CategorySet;
use crate::recommendation::{
    HistoricalAnecdote, Recommendation, RecommendationClient, RecommendationSource,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("at least one event category must be selected")]
    NoCategories,
    #[error("no weekend dates remain for {year}")]
    NoDatesRemain { year: i32 },
    #[error("year {year} is outside the selectable range {first}-{last}")]
    YearOutOfRange { year: i32, first: i32, last: i32 },
}

/// Everything the UI renders. Only [`DateSession`] can change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    selected_date: Option<NaiveDate>,
    anecdote: Option<HistoricalAnecdote>,
    used_dates: UsedDateHistory,
    is_finalized: bool,
    year: i32,
    categories: CategorySet,
}

impl SessionState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: None,
            anecdote: None,
            used_dates: UsedDateHistory::new(),
            is_finalized: false,
            year: today.year().saturating_add(1),
            categories: CategorySet::default(),
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn anecdote(&self) -> Option<&HistoricalAnecdote> {
        self.anecdote.as_ref()
    }

    pub fn used_dates(&self) -> &UsedDateHistory {
        &self.used_dates
    }

    pub fn is_finalized(&self) -> bool {
        self.is_finalized
    }

    /// The year searched for weekend dates.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    fn apply_pick(&mut self, date: NaiveDate, anecdote: HistoricalAnecdote) {
        self.selected_date = Some(date);
        self.anecdote = Some(anecdote);
        self.used_dates.record(date);
        self.is_finalized = false;
    }
}

/// Owns the session state and the components that act on it.
pub struct DateSession {
    state: SessionState,
    today: NaiveDate,
    animator: SelectionAnimator,
    recommender: RecommendationClient,
}

impl DateSession {
    pub fn new(
        today: NaiveDate,
        animation: AnimationSettings,
        recommender: RecommendationClient,
    ) -> Self {
        Self {
            state: SessionState::new(today),
            today,
            animator: SelectionAnimator::new(animation),
            recommender,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Transient rolling date shown while a request is in flight.
    pub fn display(&self) -> DisplayReceiver {
        self.animator.subscribe()
    }

    pub fn selectable_years(&self) -> RangeInclusive<i32> {
        selectable_years(self.today.year())
    }

    pub fn is_recommender_configured(&self) -> bool {
        self.recommender.is_configured()
    }

    /// Weekend dates of the selected year that have not been picked yet.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        filter_available(weekend_dates(self.state.year), &self.state.used_dates)
    }

    /// Picks a new date and anecdote.
    ///
    /// Validation failures leave the state untouched. Otherwise the animation
    /// and the recommendation run side by side, and the pick is applied once
    /// both have finished. Dropping the future before then changes nothing.
    pub async fn request_date(&mut self) -> Result<RecommendationSource, SessionError> {
        if self.state.categories.is_empty() {
            return Err(SessionError::NoCategories);
        }

        let year = self.state.year;
        let Some(candidates) = CandidateSet::new(self.available_dates()) else {
            return Err(SessionError::NoDatesRemain { year });
        };

        info!(
            year,
            candidates = candidates.len(),
            categories = self.state.categories.len(),
            "requesting wedding date"
        );

        let animation = self.animator.start(candidates.clone());
        let (recommendation, ()) = tokio::join!(
            self.recommender
                .recommend(&candidates, &self.state.categories, self.today.year()),
            animation.finished(),
        );
        self.animator.clear();

        let Recommendation {
            date,
            anecdote,
            source,
        } = recommendation;
        info!(
            %date,
            fallback = matches!(source, RecommendationSource::Fallback { .. }),
            used = self.state.used_dates.len() + 1,
            "wedding date selected"
        );
        self.state.apply_pick(date, anecdote);

        Ok(source)
    }

    /// Confirms the current pick. Returns false when nothing is selected.
    pub fn finalize(&mut self) -> bool {
        if self.state.selected_date.is_none() {
            return false;
        }
        self.state.is_finalized = true;
        true
    }

    pub fn forget_history(&mut self) {
        self.state.used_dates.clear();
        self.state.selected_date = None;
        self.state.anecdote = None;
        self.state.is_finalized = false;
    }

    /// Returns true when the label is enabled after the call.
    pub fn toggle_category(&mut self, label: &str) -> bool {
        self.state.categories.toggle(label)
    }

    pub fn select_year(&mut self, year: i32) -> Result<(), SessionError> {
        let range = self.selectable_years();
        if !range.contains(&year) {
            return Err(SessionError::YearOutOfRange {
                year,
                first: *range.start(),
                last: *range.end(),
            });
        }
        self.state.year = year;
        Ok(())
    }
}
