//! Response shapes for the two callers.
//!
//! Both shapes are built from the same `Result<PredictionOutcome>`; no
//! business logic lives here.

use crate::domain::model::{PredictionOutcome, Verdict};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Short label used in API responses.
    pub fn result_label(self, verdict: Verdict) -> &'static str {
        match (self, verdict) {
            (Locale::En, Verdict::Survived) => "survived",
            (Locale::En, Verdict::DidNotSurvive) => "did not survive",
            (Locale::Es, Verdict::Survived) => "Sobrevivió",
            (Locale::Es, Verdict::DidNotSurvive) => "No sobrevivió",
        }
    }

    /// Sentence shown on the form page.
    pub fn result_phrase(self, verdict: Verdict) -> &'static str {
        match (self, verdict) {
            (Locale::En, Verdict::Survived) => "Survived! 🎉",
            (Locale::En, Verdict::DidNotSurvive) => "Did not survive. 😢",
            (Locale::Es, Verdict::Survived) => "¡Sobrevivió! 🎉",
            (Locale::Es, Verdict::DidNotSurvive) => "No sobrevivió. 😢",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Prediction {
        prediction: String,
        explanation: String,
    },
    Error {
        error: String,
    },
}

pub fn api_response(result: &Result<PredictionOutcome>, locale: Locale) -> ApiResponse {
    match result {
        Ok(outcome) => ApiResponse::Prediction {
            prediction: locale.result_label(outcome.verdict).to_string(),
            explanation: outcome.explanation.text().to_string(),
        },
        Err(e) => ApiResponse::Error {
            error: e.to_string(),
        },
    }
}

/// Values handed to the page renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub result: Option<String>,
    pub explanation: Option<String>,
}

pub fn form_view(result: &Result<PredictionOutcome>, locale: Locale) -> FormView {
    match result {
        Ok(outcome) => FormView {
            result: Some(locale.result_phrase(outcome.verdict).to_string()),
            explanation: outcome
                .explanation
                .is_available()
                .then(|| outcome.explanation.text().to_string()),
        },
        Err(e) => FormView {
            result: Some(format!("Error: {}", e)),
            explanation: None,
        },
    }
}
