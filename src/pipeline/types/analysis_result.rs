use serde::{Deserialize, Serialize};

pub const DEFAULT_PREDICTION: &str = "Uncertain market direction";

/// Pattern name to canned prediction.
const PREDICTIONS: &[(&str, &str)] = &[
    ("Double Top", "Potential reversal from uptrend"),
    ("Double Bottom", "Potential reversal from downtrend"),
    ("Head and Shoulders", "Possible trend reversal"),
    (
        "Triangle",
        "Continuation or reversal depending on breakout direction",
    ),
    ("Channel", "Continued trend within boundaries"),
];

/// Output of one chart analysis. Built in one piece and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub pattern: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
    pub trend: String,
    pub volume: String,
    pub prediction: String,
}

impl AnalysisResult {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn prediction_for(pattern: &str) -> &'static str {
    lookup_prediction(PREDICTIONS, pattern)
}

fn lookup_prediction(table: &[(&str, &'static str)], pattern: &str) -> &'static str {
    table
        .iter()
        .find(|(name, _)| *name == pattern)
        .map(|(_, prediction)| *prediction)
        .unwrap_or(DEFAULT_PREDICTION)
}
