//! Advisory text types: demand predictions, chat input, and the
//! best-effort JSON extraction applied to free-form model output.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single drug demand prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPrediction {
    pub drug: String,
    pub predicted_demand: i64,
    pub confidence: f64,
    pub trend: String,
}

/// Payload shape expected inside generated prediction text.
#[derive(Debug, Deserialize)]
pub struct PredictionPayload {
    pub predictions: Vec<DemandPrediction>,
}

/// Chat request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatMessage {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Slice out the first balanced-looking JSON object from free-form text:
/// everything from the first `{` to the last `}`. This is a best-effort
/// scan, not a parser; callers must treat the result as untrusted.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Best-effort structured extraction of predictions from generated text.
/// Returns `None` on any shape mismatch instead of failing.
pub fn parse_predictions(text: &str) -> Option<Vec<DemandPrediction>> {
    let raw = extract_json_object(text)?;
    serde_json::from_str::<PredictionPayload>(raw)
        .ok()
        .map(|payload| payload.predictions)
}

/// Static prediction table used whenever the external service cannot
/// answer, optionally filtered by a case-insensitive drug substring.
pub fn fallback_predictions(drug_filter: Option<&str>) -> Vec<DemandPrediction> {
    let table = [
        ("Paracetamol 500mg", 2400, 0.92, "increasing"),
        ("Amoxicillin 250mg", 1800, 0.87, "stable"),
        ("Aspirin 325mg", 900, 0.95, "decreasing"),
        ("Metformin 500mg", 1200, 0.89, "increasing"),
        ("Ibuprofen 400mg", 600, 0.84, "stable"),
    ];

    let filter = drug_filter.map(|f| f.to_lowercase());
    table
        .iter()
        .filter(|(drug, ..)| match &filter {
            Some(f) => drug.to_lowercase().contains(f.as_str()),
            None => true,
        })
        .map(|(drug, demand, confidence, trend)| DemandPrediction {
            drug: (*drug).to_string(),
            predicted_demand: *demand,
            confidence: *confidence,
            trend: (*trend).to_string(),
        })
        .collect()
}
