use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Fallback text returned in place of a generated rationale.
pub const EXPLANATION_UNAVAILABLE: &str = "explanation unavailable";

/// Loosely-typed passenger fields exactly as received from a caller.
///
/// Form submissions only ever carry strings; JSON bodies may carry any value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPassenger {
    #[serde(rename = "Pclass", default)]
    pub pclass: Option<Value>,
    #[serde(rename = "Sex", default)]
    pub sex: Option<Value>,
    #[serde(rename = "Age", default)]
    pub age: Option<Value>,
}

impl RawPassenger {
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let field = |name: &str| fields.get(name).map(|v| Value::String(v.clone()));
        Self {
            pclass: field("Pclass"),
            sex: field("Sex"),
            age: field("Age"),
        }
    }

    /// Accepts only a JSON object; other keys are ignored.
    pub fn from_json(body: Value) -> Result<Self> {
        if !body.is_object() {
            return Err(PredictorError::validation(
                "body",
                "expected a JSON object with Pclass, Sex and Age",
            ));
        }
        Ok(serde_json::from_value(body)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    /// Everything that is not "female", including unknown or empty strings.
    MaleOrOther,
}

impl Sex {
    pub fn indicator(self) -> u8 {
        match self {
            Sex::Female => 1,
            Sex::MaleOrOther => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::MaleOrOther => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassengerAttributes {
    pub pclass: i64,
    pub sex: Sex,
    pub age: f64,
}

/// Model input in training order: `[pclass, sex_indicator, age]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; 3]);

impl FeatureVector {
    pub const LEN: usize = 3;

    pub fn as_array(&self) -> &[f64; 3] {
        &self.0
    }
}

impl From<&PassengerAttributes> for FeatureVector {
    fn from(attrs: &PassengerAttributes) -> Self {
        Self([
            attrs.pclass as f64,
            f64::from(attrs.sex.indicator()),
            attrs.age,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    DidNotSurvive,
    Survived,
}

impl Verdict {
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Verdict::DidNotSurvive),
            1 => Some(Verdict::Survived),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Verdict::DidNotSurvive => 0,
            Verdict::Survived => 1,
        }
    }

    /// Plain wording used inside explanation prompts.
    pub fn describe(self) -> &'static str {
        match self {
            Verdict::Survived => "survived",
            Verdict::DidNotSurvive => "did not survive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Generated(String),
    Unavailable,
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Generated(text) => text,
            Explanation::Unavailable => EXPLANATION_UNAVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Explanation::Generated(_))
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub attributes: PassengerAttributes,
    pub verdict: Verdict,
    pub explanation: Explanation,
}
