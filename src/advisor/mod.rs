//! Boundary to the text-completion service that writes advisory copy.
//!
//! The service is asked for JSON of a fixed shape per advisory kind. We only
//! check that the reply parses into that shape, not that it is sensible.

use std::future::Future;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::air::impact::CarbonProfile;
use crate::models::advisory::{
    AtmosphericPattern, CarbonVerdict, ChemicalFingerprint, DecisionAdvice, HealthGuide,
};
use crate::models::Pollutants;

mod requests;

pub use requests::{AtmosphericSummary, ConditionsSummary, HealthProfileSummary, LocationType};

const SYSTEM_PROMPT: &str =
    "You are a specialized environmental AI assistant. Return only valid JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryKind {
    HealthGuide,
    DecisionAdvice,
    ChemicalFingerprint,
    CarbonVerdict,
    AtmosphericPattern,
}

impl AdvisoryKind {
    /// JSON skeleton the reply must follow.
    fn response_shape(&self) -> &'static str {
        match self {
            AdvisoryKind::HealthGuide => {
                r#"{"riskLevel":"LOW|MEDIUM|HIGH","summary":"","recommendations":{"outdoor":"","mask":"","breathing":"","indoor":""}}"#
            }
            AdvisoryKind::DecisionAdvice => {
                r#"{"goOutside":"YES|NO","maskRequired":"YES|NO","bestTime":"","indoorActions":[""]}"#
            }
            AdvisoryKind::ChemicalFingerprint => {
                r##"{"type":"","description":"","composition":[{"name":"","percentage":0,"color":"#hex"}],"confidence":0}"##
            }
            AdvisoryKind::CarbonVerdict => r#"{"verdict":"","swaps":[""]}"#,
            AdvisoryKind::AtmosphericPattern => {
                r#"{"summary":"","weatherInfluence":"","patternDetected":"","inferredSources":"","dominantPollutant":""}"#
            }
        }
    }
}

/// Sends one system + user message pair and returns the raw completion text.
pub trait AdvisoryTransport: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

pub struct AdvisorClient<T> {
    transport: T,
}

impl<T: AdvisoryTransport> AdvisorClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn health_guide(
        &self,
        conditions: &ConditionsSummary,
        profile: &HealthProfileSummary,
    ) -> Result<HealthGuide> {
        let payload = serde_json::json!({ "conditions": conditions, "profile": profile });
        self.request(AdvisoryKind::HealthGuide, &payload).await
    }

    pub async fn decision_advice(
        &self,
        conditions: &ConditionsSummary,
        profile: &HealthProfileSummary,
    ) -> Result<DecisionAdvice> {
        let payload = serde_json::json!({ "conditions": conditions, "profile": profile });
        self.request(AdvisoryKind::DecisionAdvice, &payload).await
    }

    pub async fn chemical_fingerprint(&self, pollutants: &Pollutants) -> Result<ChemicalFingerprint> {
        self.request(AdvisoryKind::ChemicalFingerprint, pollutants).await
    }

    pub async fn carbon_verdict(&self, profile: &CarbonProfile) -> Result<CarbonVerdict> {
        let payload = serde_json::json!({
            "profile": profile,
            "totalTonnes": profile.total_tonnes(),
        });
        self.request(AdvisoryKind::CarbonVerdict, &payload).await
    }

    pub async fn atmospheric_pattern(&self, summary: &AtmosphericSummary) -> Result<AtmosphericPattern> {
        self.request(AdvisoryKind::AtmosphericPattern, summary).await
    }

    pub async fn request<R, P>(&self, kind: AdvisoryKind, payload: &P) -> Result<R>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let prompt = build_prompt(kind, payload)?;
        log::debug!("advisor request {:?}: {}", kind, prompt);

        let raw = self
            .transport
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .with_context(|| format!("advisor request {kind:?} failed"))?;

        parse_advisory(&raw).with_context(|| format!("advisor reply for {kind:?} was not usable"))
    }
}

fn build_prompt<P: Serialize + ?Sized>(kind: AdvisoryKind, payload: &P) -> Result<String> {
    let data = serde_json::to_string(payload).context("failed to serialize advisory input")?;
    Ok(format!(
        "Task: {}\nInput: {}\nReturn JSON: {}",
        serde_json::to_string(&kind)?,
        data,
        kind.response_shape()
    ))
}

/// Strip Markdown code fences and parse the remaining JSON.
pub fn parse_advisory<R: DeserializeOwned>(raw: &str) -> Result<R> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).with_context(|| {
        let preview: String = cleaned.chars().take(120).collect();
        format!("invalid advisory JSON: {preview}")
    })
}

fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json").or_else(|| text.strip_prefix("```")) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
