use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::{LlmGateway, LlmGatewayError, LlmGatewayRequest, LlmGatewayResponse};

#[derive(Debug, Clone)]
pub struct LlmTelemetryEvent {
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub model: Option<String>,
    pub provider_request_id: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub error_type: Option<&'static str>,
}

impl LlmTelemetryEvent {
    pub fn emit(&self) {
        if self.error_type.is_some() {
            warn!(
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                error_type = self.error_type,
                "llm request failed"
            );
        } else {
            info!(
                outcome = self.outcome,
                latency_ms = self.latency_ms,
                model = self.model.as_deref(),
                provider_request_id = self.provider_request_id.as_deref(),
                prompt_tokens = self.prompt_tokens,
                completion_tokens = self.completion_tokens,
                total_tokens = self.total_tokens,
                "llm request completed"
            );
        }
    }
}

pub async fn generate_with_telemetry(
    llm_gateway: &dyn LlmGateway,
    request: LlmGatewayRequest,
) -> (
    Result<LlmGatewayResponse, LlmGatewayError>,
    LlmTelemetryEvent,
) {
    let started_at = Instant::now();
    let result = llm_gateway.generate(request).await;
    let telemetry = telemetry_for_result(started_at.elapsed(), &result);
    (result, telemetry)
}

fn telemetry_for_result(
    latency: Duration,
    result: &Result<LlmGatewayResponse, LlmGatewayError>,
) -> LlmTelemetryEvent {
    let latency_ms = duration_to_millis(latency);
    match result {
        Ok(response) => {
            let usage = response.usage.clone();
            LlmTelemetryEvent {
                outcome: "success",
                latency_ms,
                model: Some(response.model.clone()),
                provider_request_id: response.provider_request_id.clone(),
                prompt_tokens: usage.as_ref().map(|usage| usage.prompt_tokens),
                completion_tokens: usage.as_ref().map(|usage| usage.completion_tokens),
                total_tokens: usage.as_ref().map(|usage| usage.total_tokens),
                error_type: None,
            }
        }
        Err(err) => LlmTelemetryEvent {
            outcome: "failure",
            latency_ms,
            model: None,
            provider_request_id: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            error_type: Some(error_type(err)),
        },
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn error_type(error: &LlmGatewayError) -> &'static str {
    match error {
        LlmGatewayError::Timeout => "timeout",
        LlmGatewayError::ProviderFailure(_) => "provider_failure",
        LlmGatewayError::InvalidProviderPayload(_) => "invalid_provider_payload",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::telemetry_for_result;
    use crate::llm::{LlmGatewayError, LlmGatewayResponse, LlmTokenUsage};

    #[test]
    fn telemetry_records_usage_on_success() {
        let result = Ok(LlmGatewayResponse {
            model: "mixtral-8x7b-32768".to_string(),
            provider_request_id: Some("req-1".to_string()),
            content: "{}".to_string(),
            usage: Some(LlmTokenUsage {
                prompt_tokens: 120,
                completion_tokens: 40,
                total_tokens: 160,
            }),
        });

        let event = telemetry_for_result(Duration::from_millis(850), &result);

        assert_eq!(event.outcome, "success");
        assert_eq!(event.latency_ms, 850);
        assert_eq!(event.total_tokens, Some(160));
        assert_eq!(event.error_type, None);
    }

    #[test]
    fn telemetry_classifies_failures() {
        let result = Err(LlmGatewayError::Timeout);
        let event = telemetry_for_result(Duration::from_secs(15), &result);

        assert_eq!(event.outcome, "failure");
        assert_eq!(event.error_type, Some("timeout"));
        assert_eq!(event.model, None);
    }
}
