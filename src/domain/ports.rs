use crate::domain::model::{FeatureVector, Verdict};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Pre-trained survival model. Loaded once and shared read-only across requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<Verdict>;
}

/// External generative-text service.
///
/// `Ok(None)` means the service answered successfully but returned no text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Option<String>>;
}
