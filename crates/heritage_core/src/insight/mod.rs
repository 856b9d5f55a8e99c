//! Historical-insight collaborator boundary.
//!
//! # Responsibility
//! - Define the request/response contract for AI-generated insight text.
//! - Guarantee graceful degradation: callers always receive usable text.
//!
//! # Invariants
//! - `historical_context_with_fallback` never fails; provider errors are
//!   logged and replaced by the descriptive fallback.
//! - No network client lives in this crate; providers are plugged in from
//!   outside through [`InsightProvider`].

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod prompt;

pub use prompt::build_prompt;

/// Profile data sent to the insight provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    /// Member display name.
    pub name: String,
    /// Member birth date.
    pub birth_date: NaiveDate,
    /// Member birthplace.
    pub birthplace: String,
    /// Optional short biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    /// Response language, e.g. `en` or `ru`.
    pub locale: String,
}

/// Structured insight returned for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalInsight {
    /// Meaning and origin of the member's name.
    pub name_meaning: String,
    /// Significant historical events during the member's lifetime.
    pub historical_events: String,
    /// Relevant information about the member's birthplace.
    pub birthplace_information: String,
    /// Any additional historical insights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_insights: Option<String>,
}

/// Failures reported by insight providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightError {
    /// No provider is configured for this installation.
    Unconfigured,
    /// The configured provider failed; human-readable reason.
    Provider(String),
}

impl Display for InsightError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "no insight provider is configured"),
            Self::Provider(reason) => write!(f, "insight provider failed: {reason}"),
        }
    }
}

impl Error for InsightError {}

/// Pluggable insight backend.
pub trait InsightProvider {
    /// Stable identifier for diagnostics.
    fn provider_id(&self) -> &str;
    /// Produces structured insight for one member profile.
    fn historical_context(&self, request: &InsightRequest)
        -> Result<HistoricalInsight, InsightError>;
}

/// Default backend for installations without an AI provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredProvider;

impl InsightProvider for UnconfiguredProvider {
    fn provider_id(&self) -> &str {
        "unconfigured"
    }

    fn historical_context(
        &self,
        _request: &InsightRequest,
    ) -> Result<HistoricalInsight, InsightError> {
        Err(InsightError::Unconfigured)
    }
}

/// Requests insight, degrading to descriptive fallback text on any failure.
///
/// The fallback tells the user what is unavailable and why, so the UI can
/// present it verbatim instead of surfacing an error state.
pub fn historical_context_with_fallback(
    provider: &dyn InsightProvider,
    request: &InsightRequest,
) -> HistoricalInsight {
    match provider.historical_context(request) {
        Ok(insight) => insight,
        Err(err) => {
            warn!(
                "event=insight_fallback module=insight status=degraded provider={} error={}",
                provider.provider_id(),
                err
            );
            fallback_insight(request)
        }
    }
}

fn fallback_insight(request: &InsightRequest) -> HistoricalInsight {
    HistoricalInsight {
        name_meaning: format!("No name-meaning available for {}.", request.name),
        historical_events: "Historical context is not available — the AI service may be \
             unconfigured or temporarily unavailable."
            .to_string(),
        birthplace_information: format!(
            "No birthplace information is available for {}.",
            request.birthplace
        ),
        additional_insights: Some(
            "Try configuring an AI provider or check network settings to enable historical \
             insights."
                .to_string(),
        ),
    }
}
