use crate::core::explanation::ExplanationOrchestrator;
use crate::core::normalizer::normalize;
use crate::domain::model::{FeatureVector, PredictionOutcome, RawPassenger};
use crate::domain::ports::Classifier;
use crate::utils::error::Result;
use std::sync::Arc;

/// Per-request pipeline: normalize, classify, then explain.
///
/// Validation and inference errors stop the request before any explanation
/// is attempted. Explanation problems never surface as errors.
#[derive(Clone)]
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    explainer: ExplanationOrchestrator,
}

impl PredictionService {
    pub fn new(classifier: Arc<dyn Classifier>, explainer: ExplanationOrchestrator) -> Self {
        Self {
            classifier,
            explainer,
        }
    }

    pub fn explanations_enabled(&self) -> bool {
        self.explainer.is_enabled()
    }

    pub async fn predict(&self, raw: &RawPassenger) -> Result<PredictionOutcome> {
        let attributes = normalize(raw)?;
        let features = FeatureVector::from(&attributes);

        let verdict = self.classifier.predict(&features)?;
        tracing::debug!(verdict = verdict.describe(), "Classifier verdict");

        let explanation = self.explainer.explain(&attributes, verdict).await;

        Ok(PredictionOutcome {
            attributes,
            verdict,
            explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Explanation, Verdict};
    use crate::domain::ports::TextGenerator;
    use crate::utils::error::PredictorError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FixedClassifier {
        verdict: Option<Verdict>,
        calls: AtomicUsize,
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
                .ok_or_else(|| PredictorError::inference("model rejected input"))
        }
    }

    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some("Because of the evacuation order.".to_string()))
        }
    }

    fn service(
        verdict: Option<Verdict>,
    ) -> (PredictionService, Arc<FixedClassifier>, Arc<CountingGenerator>) {
        let classifier = Arc::new(FixedClassifier {
            verdict,
            calls: AtomicUsize::new(0),
        });
        let generator = Arc::new(CountingGenerator {
            calls: AtomicUsize::new(0),
        });
        let explainer = ExplanationOrchestrator::new(generator.clone(), 100, Duration::from_secs(5));
        (
            PredictionService::new(classifier.clone(), explainer),
            classifier,
            generator,
        )
    }

    fn raw(pclass: serde_json::Value, sex: &str, age: serde_json::Value) -> RawPassenger {
        RawPassenger {
            pclass: Some(pclass),
            sex: Some(json!(sex)),
            age: Some(age),
        }
    }

    #[tokio::test]
    async fn test_predict_runs_all_stages() {
        let (service, classifier, generator) = service(Some(Verdict::Survived));

        let outcome = service.predict(&raw(json!(1), "female", json!(29))).await.unwrap();

        assert_eq!(outcome.verdict, Verdict::Survived);
        assert_eq!(
            outcome.explanation,
            Explanation::Generated("Because of the evacuation order.".to_string())
        );
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_skips_classifier_and_explanation() {
        let (service, classifier, generator) = service(Some(Verdict::Survived));

        let err = service
            .predict(&raw(json!("abc"), "female", json!(30)))
            .await
            .unwrap_err();

        assert!(matches!(err, PredictorError::ValidationError { .. }));
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_inference_error_skips_explanation() {
        let (service, _, generator) = service(None);

        let err = service.predict(&raw(json!(2), "male", json!(40))).await.unwrap_err();

        assert!(matches!(err, PredictorError::InferenceError { .. }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_explanations_still_predict() {
        let classifier = Arc::new(FixedClassifier {
            verdict: Some(Verdict::DidNotSurvive),
            calls: AtomicUsize::new(0),
        });
        let service = PredictionService::new(classifier, ExplanationOrchestrator::disabled());

        let outcome = service.predict(&raw(json!(3), "male", json!(22))).await.unwrap();

        assert!(!service.explanations_enabled());
        assert_eq!(outcome.verdict, Verdict::DidNotSurvive);
        assert_eq!(outcome.explanation, Explanation::Unavailable);
    }
}
