//! Advisory service: demand forecasts and free-text chat
//!
//! Both operations delegate to the generative text service when a client
//! is configured and degrade to deterministic fallbacks otherwise. No
//! failure on this path ever reaches the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shared::{fallback_predictions, parse_predictions, DemandPrediction};

use crate::external::GenerativeTextClient;

/// Response source markers.
const SOURCE_GENERATIVE: &str = "gemini_ai";
const SOURCE_MOCK_DATA: &str = "mock_data";
const SOURCE_MOCK_RESPONSE: &str = "mock_response";

/// Fixed advisory returned when the generative service cannot answer.
const FALLBACK_CHAT_RESPONSE: &str = "I'm your intelligent MedChain AI assistant. I can help with \
    inventory management, expiry monitoring, demand forecasting, and supply chain optimization. \
    However, the AI service is currently unavailable. Please check your API configuration.";

/// Advisory service routing free-text requests to the generative client
#[derive(Clone)]
pub struct AdvisoryService {
    client: Option<GenerativeTextClient>,
}

/// Demand forecast response
#[derive(Debug, Serialize)]
pub struct DemandForecast {
    pub predictions: Vec<DemandPrediction>,
    pub generated_at: DateTime<Utc>,
    pub source: &'static str,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub language: String,
    pub timestamp: DateTime<Utc>,
    pub source: &'static str,
}

impl AdvisoryService {
    pub fn new(client: Option<GenerativeTextClient>) -> Self {
        Self { client }
    }

    /// Predict demand for the given horizon. Generated text is scraped for
    /// a JSON payload; any failure along the way (no client, send error,
    /// nothing extractable) selects the static table instead, filtered by
    /// the requested drug substring.
    pub async fn predict_demand(
        &self,
        location: Option<&str>,
        drug: Option<&str>,
        horizon_days: i64,
        now: DateTime<Utc>,
    ) -> DemandForecast {
        if let Some(client) = &self.client {
            let prompt = demand_prompt(location, drug, horizon_days);
            match client.generate(&prompt).await {
                Ok(text) => {
                    if let Some(predictions) = parse_predictions(&text) {
                        return DemandForecast {
                            predictions,
                            generated_at: now,
                            source: SOURCE_GENERATIVE,
                        };
                    }
                    tracing::warn!("No prediction payload in generated text; using fallback");
                }
                Err(e) => {
                    tracing::warn!("Demand prediction request failed: {}; using fallback", e);
                }
            }
        }

        DemandForecast {
            predictions: fallback_predictions(drug),
            generated_at: now,
            source: SOURCE_MOCK_DATA,
        }
    }

    /// Answer a free-text question. The generated text is returned
    /// verbatim; on any failure the fixed advisory string is used.
    pub async fn chat(&self, message: &str, language: &str, now: DateTime<Utc>) -> ChatReply {
        if let Some(client) = &self.client {
            let prompt = chat_prompt(message, language);
            match client.generate(&prompt).await {
                Ok(text) => {
                    return ChatReply {
                        response: text,
                        language: language.to_string(),
                        timestamp: now,
                        source: SOURCE_GENERATIVE,
                    };
                }
                Err(e) => {
                    tracing::warn!("Chat request failed: {}; using fallback", e);
                }
            }
        }

        ChatReply {
            response: FALLBACK_CHAT_RESPONSE.to_string(),
            language: language.to_string(),
            timestamp: now,
            source: SOURCE_MOCK_RESPONSE,
        }
    }
}

fn demand_prompt(location: Option<&str>, drug: Option<&str>, horizon_days: i64) -> String {
    format!(
        r#"As a healthcare supply chain AI expert, predict demand for the next {} days.
Location: {}
Drug: {}

Provide predictions in this JSON format:
{{
    "predictions": [
        {{"drug": "Drug Name", "predicted_demand": 1500, "confidence": 0.92, "trend": "increasing"}},
        ...
    ]
}}

Consider seasonal patterns, historical usage, and current health trends."#,
        horizon_days,
        location.unwrap_or("All locations"),
        drug.unwrap_or("All drugs"),
    )
}

fn chat_prompt(message: &str, language: &str) -> String {
    format!(
        r#"You are an intelligent healthcare supply chain AI assistant for MedChain platform.
User question: {}
Response language: {}

You have access to real-time inventory data and can provide insights about:
- Drug inventory management
- Expiry date monitoring
- Low stock alerts and reorder automation
- Supply chain optimization
- Demand forecasting
- Drug authentication and safety
- Healthcare logistics
- Batch verification
- Multi-location inventory tracking

Provide helpful, accurate, and actionable information. Use emojis and formatting to make responses clear and engaging.
Keep responses professional and focused on healthcare supply chain management.

If the user asks in a language other than English, respond in that same language."#,
        message, language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_733_011_200, 0).unwrap()
    }

    fn offline() -> AdvisoryService {
        AdvisoryService::new(None)
    }

    #[tokio::test]
    async fn predictions_fall_back_without_a_client() {
        let forecast = offline().predict_demand(None, None, 30, now()).await;

        assert_eq!(forecast.source, "mock_data");
        assert_eq!(forecast.predictions.len(), 5);
        assert_eq!(forecast.generated_at, now());
    }

    #[tokio::test]
    async fn fallback_predictions_filter_by_drug() {
        let forecast = offline()
            .predict_demand(None, Some("aspirin"), 30, now())
            .await;

        assert_eq!(forecast.predictions.len(), 1);
        assert_eq!(forecast.predictions[0].drug, "Aspirin 325mg");
    }

    #[tokio::test]
    async fn chat_falls_back_without_a_client() {
        let reply = offline().chat("What is low in stock?", "en", now()).await;

        assert_eq!(reply.source, "mock_response");
        assert_eq!(reply.language, "en");
        assert!(reply.response.contains("currently unavailable"));
    }

    #[tokio::test]
    async fn chat_fallback_echoes_the_requested_language() {
        let reply = offline().chat("¿Qué hay en stock?", "es", now()).await;
        assert_eq!(reply.language, "es");
    }

    #[test]
    fn demand_prompt_names_the_horizon_and_filters() {
        let prompt = demand_prompt(Some("Central Hospital"), Some("Aspirin"), 14);
        assert!(prompt.contains("next 14 days"));
        assert!(prompt.contains("Location: Central Hospital"));
        assert!(prompt.contains("Drug: Aspirin"));

        let unfiltered = demand_prompt(None, None, 30);
        assert!(unfiltered.contains("Location: All locations"));
        assert!(unfiltered.contains("Drug: All drugs"));
    }

    #[test]
    fn chat_prompt_carries_message_and_language() {
        let prompt = chat_prompt("Which batches expire soon?", "th");
        assert!(prompt.contains("User question: Which batches expire soon?"));
        assert!(prompt.contains("Response language: th"));
    }
}
