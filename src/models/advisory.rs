//! Response shapes returned by the text-completion advisor.
//!
//! Field names follow the JSON the completion endpoint is asked to produce.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_bool(&self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecommendations {
    pub outdoor: String,
    pub mask: String,
    pub breathing: String,
    pub indoor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthGuide {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommendations: HealthRecommendations,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAdvice {
    pub go_outside: YesNo,
    pub mask_required: YesNo,
    pub best_time: String,
    #[serde(default)]
    pub indoor_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionShare {
    pub name: String,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChemicalFingerprint {
    #[serde(rename = "type")]
    pub source_type: String,
    pub description: String,
    #[serde(default)]
    pub composition: Vec<CompositionShare>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarbonVerdict {
    pub verdict: String,
    #[serde(default)]
    pub swaps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphericPattern {
    pub summary: String,
    pub weather_influence: String,
    pub pattern_detected: String,
    pub inferred_sources: String,
    pub dominant_pollutant: String,
}
