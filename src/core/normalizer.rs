//! Turns loosely-typed passenger fields into [`PassengerAttributes`].
//!
//! Parsing follows the conversions the model was originally served with:
//! `Pclass` behaves like an integer cast, `Age` like a float cast, and `Sex`
//! collapses into a two-way indicator where only "female" (any case) counts
//! as female. That collapse is part of the feature contract the classifier
//! was trained against and must not grow a third bucket.

use crate::domain::model::{PassengerAttributes, RawPassenger, Sex};
use crate::utils::error::{PredictorError, Result};
use serde_json::Value;

const PCLASS: &str = "Pclass";
const SEX: &str = "Sex";
const AGE: &str = "Age";

pub fn normalize(raw: &RawPassenger) -> Result<PassengerAttributes> {
    let pclass = parse_pclass(raw.pclass.as_ref())?;
    let sex = parse_sex(raw.sex.as_ref())?;
    let age = parse_age(raw.age.as_ref())?;

    tracing::debug!(pclass, sex = sex.label(), age, "Normalized passenger attributes");

    Ok(PassengerAttributes { pclass, sex, age })
}

fn parse_pclass(value: Option<&Value>) -> Result<i64> {
    match required(PCLASS, value)? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            // Fractional numbers truncate toward zero like an integer cast.
            match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(PredictorError::validation(
                    PCLASS,
                    format!("{} is out of range for an integer", n),
                )),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|e| {
            PredictorError::validation(PCLASS, format!("'{}' is not an integer ({})", s, e))
        }),
        other => Err(PredictorError::validation(
            PCLASS,
            format!("expected an integer, got {}", json_type(other)),
        )),
    }
}

fn parse_sex(value: Option<&Value>) -> Result<Sex> {
    match required(SEX, value)? {
        Value::String(s) if s.to_lowercase() == "female" => Ok(Sex::Female),
        Value::String(_) => Ok(Sex::MaleOrOther),
        other => Err(PredictorError::validation(
            SEX,
            format!("expected a string, got {}", json_type(other)),
        )),
    }
}

fn parse_age(value: Option<&Value>) -> Result<f64> {
    let age = match required(AGE, value)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            PredictorError::validation(AGE, format!("{} is not representable as a float", n))
        })?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|e| {
            PredictorError::validation(AGE, format!("'{}' is not a number ({})", s, e))
        })?,
        other => {
            return Err(PredictorError::validation(
                AGE,
                format!("expected a number, got {}", json_type(other)),
            ))
        }
    };

    if !age.is_finite() {
        return Err(PredictorError::validation(AGE, "age must be a finite number"));
    }
    if age < 0.0 {
        return Err(PredictorError::validation(
            AGE,
            format!("age cannot be negative (got {})", age),
        ));
    }
    Ok(age)
}

fn required<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Value> {
    match value {
        None | Some(Value::Null) => Err(PredictorError::validation(field, "field is required")),
        Some(v) => Ok(v),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
