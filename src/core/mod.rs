pub mod classifier;
pub mod explanation;
pub mod normalizer;
pub mod prediction;

pub use crate::domain::model::{
    Explanation, FeatureVector, PassengerAttributes, PredictionOutcome, RawPassenger, Sex, Verdict,
};
pub use crate::domain::ports::{Classifier, TextGenerator};
pub use crate::utils::error::Result;
