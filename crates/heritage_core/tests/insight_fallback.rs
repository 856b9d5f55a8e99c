use chrono::NaiveDate;
use heritage_core::{
    historical_context_with_fallback, HistoricalInsight, InsightError, InsightProvider,
    InsightRequest, UnconfiguredProvider,
};

fn request() -> InsightRequest {
    InsightRequest {
        name: "Semyon Slizh".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1908, 10, 24).unwrap(),
        birthplace: "Slizhi, Belarus".to_string(),
        biography: Some("A carpenter by trade.".to_string()),
        locale: "en".to_string(),
    }
}

struct FailingProvider;

impl InsightProvider for FailingProvider {
    fn provider_id(&self) -> &str {
        "failing"
    }

    fn historical_context(
        &self,
        _request: &InsightRequest,
    ) -> Result<HistoricalInsight, InsightError> {
        Err(InsightError::Provider("connection refused".to_string()))
    }
}

struct CannedProvider;

impl InsightProvider for CannedProvider {
    fn provider_id(&self) -> &str {
        "canned"
    }

    fn historical_context(
        &self,
        request: &InsightRequest,
    ) -> Result<HistoricalInsight, InsightError> {
        Ok(HistoricalInsight {
            name_meaning: format!("Meaning of {}.", request.name),
            historical_events: "World War I and II.".to_string(),
            birthplace_information: format!("About {}.", request.birthplace),
            additional_insights: None,
        })
    }
}

#[test]
fn unconfigured_provider_degrades_to_descriptive_fallback() {
    let insight = historical_context_with_fallback(&UnconfiguredProvider, &request());

    assert!(insight.name_meaning.contains("Semyon Slizh"));
    assert!(insight.historical_events.contains("not available"));
    assert!(insight.birthplace_information.contains("Slizhi, Belarus"));
    assert!(insight.additional_insights.is_some());
}

#[test]
fn provider_failure_degrades_instead_of_propagating() {
    let insight = historical_context_with_fallback(&FailingProvider, &request());
    assert!(insight.historical_events.contains("not available"));
}

#[test]
fn successful_provider_result_passes_through() {
    let insight = historical_context_with_fallback(&CannedProvider, &request());
    assert_eq!(insight.name_meaning, "Meaning of Semyon Slizh.");
    assert_eq!(insight.historical_events, "World War I and II.");
    assert_eq!(insight.additional_insights, None);
}

#[test]
fn insight_serializes_with_camel_case_fields() {
    let insight = historical_context_with_fallback(&CannedProvider, &request());
    let json = serde_json::to_string(&insight).unwrap();
    assert!(json.contains("\"nameMeaning\""));
    assert!(json.contains("\"birthplaceInformation\""));
    assert!(!json.contains("\"additionalInsights\""));
}
