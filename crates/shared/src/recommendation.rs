use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::availability::CandidateSet;
use crate::categories::CategorySet;
use crate::llm::{
    AnecdoteParseError, LlmGateway, LlmGatewayError, LlmGatewayRequest, anecdote_prompt,
    generate_with_telemetry, parse_anecdote_reply,
};

pub const FALLBACK_DESCRIPTION: &str = "Bu tarihin güzel bir geleceği var!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalAnecdote {
    description: String,
    year: i32,
    category: Option<String>,
}

impl HistoricalAnecdote {
    pub fn new(description: impl Into<String>, year: i32, category: Option<String>) -> Self {
        Self {
            description: description.into(),
            year,
            category,
        }
    }

    /// Generic, non-historical text used when no anecdote could be obtained.
    pub fn placeholder(year: i32) -> Self {
        Self::new(FALLBACK_DESCRIPTION, year, None)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("recommendation service is not configured")]
    NotConfigured,
    #[error(transparent)]
    Gateway(#[from] LlmGatewayError),
    #[error(transparent)]
    Parse(#[from] AnecdoteParseError),
}

#[derive(Debug)]
pub enum RecommendationSource {
    Model { model: String },
    Fallback { reason: RecommendationError },
}

#[derive(Debug)]
pub struct Recommendation {
    pub date: NaiveDate,
    pub anecdote: HistoricalAnecdote,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RecommendationSource::Fallback { .. })
    }
}

/// Asks the model for one (date, anecdote) pair and falls back to a random
/// candidate on any failure. Exactly one gateway call per recommendation.
#[derive(Clone)]
pub struct RecommendationClient {
    gateway: Option<Arc<dyn LlmGateway>>,
    candidate_limit: usize,
}

impl RecommendationClient {
    pub fn new(gateway: Arc<dyn LlmGateway>, candidate_limit: usize) -> Self {
        Self {
            gateway: Some(gateway),
            candidate_limit,
        }
    }

    /// Every recommendation takes the fallback path.
    pub fn unconfigured(candidate_limit: usize) -> Self {
        Self {
            gateway: None,
            candidate_limit,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub async fn recommend(
        &self,
        candidates: &CandidateSet,
        categories: &CategorySet,
        fallback_year: i32,
    ) -> Recommendation {
        match self.try_recommend(candidates, categories).await {
            Ok(recommendation) => recommendation,
            Err(reason) => {
                warn!(error = %reason, "anecdote recommendation failed, using fallback date");
                fallback_recommendation(candidates, fallback_year, reason)
            }
        }
    }

    async fn try_recommend(
        &self,
        candidates: &CandidateSet,
        categories: &CategorySet,
    ) -> Result<Recommendation, RecommendationError> {
        let gateway = self
            .gateway
            .as_deref()
            .ok_or(RecommendationError::NotConfigured)?;

        let submitted = candidates.prefix(self.candidate_limit);
        let request = LlmGatewayRequest::from_prompt(anecdote_prompt(categories, submitted));
        let (result, telemetry) = generate_with_telemetry(gateway, request).await;
        telemetry.emit();

        let response = result?;
        let reply = parse_anecdote_reply(&response.content)?;
        // `prefix` never returns an empty slice.
        let position = reply.candidate_position(submitted.len()).unwrap_or_default();
        let date = submitted[position];

        if let Some(category) = reply.category.as_deref()
            && !categories.contains(category)
        {
            debug!(category, "model returned a category outside the allowed set");
        }

        Ok(Recommendation {
            date,
            anecdote: HistoricalAnecdote::new(reply.event, reply.year, reply.category),
            source: RecommendationSource::Model {
                model: response.model,
            },
        })
    }
}

fn fallback_recommendation(
    candidates: &CandidateSet,
    fallback_year: i32,
    reason: RecommendationError,
) -> Recommendation {
    let date = candidates.choose(&mut rand::thread_rng());
    Recommendation {
        date,
        anecdote: HistoricalAnecdote::placeholder(fallback_year),
        source: RecommendationSource::Fallback { reason },
    }
}
