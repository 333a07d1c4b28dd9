use crate::domain::model::{Explanation, PassengerAttributes, Verdict};
use crate::domain::ports::TextGenerator;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Builds the prompt sent to the text generator. Pure templating.
pub fn render_prompt(attributes: &PassengerAttributes, verdict: Verdict) -> String {
    format!(
        "A Titanic passenger travelled in class {}, was {} and was {} years old. \
         A survival model predicted that this passenger {}. \
         In two or three sentences, explain why this outcome is plausible given \
         what is known about who survived the sinking.",
        attributes.pclass,
        attributes.sex.label(),
        attributes.age,
        verdict.describe()
    )
}

/// Best-effort rationale for a verdict. Never fails: every problem with the
/// generator degrades to [`Explanation::Unavailable`].
#[derive(Clone)]
pub struct ExplanationOrchestrator {
    generator: Option<Arc<dyn TextGenerator>>,
    max_tokens: u32,
    timeout: Duration,
}

impl ExplanationOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            max_tokens,
            timeout,
        }
    }

    /// An orchestrator that never calls out, used when explanations are
    /// turned off or no credential is configured.
    pub fn disabled() -> Self {
        Self {
            generator: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn explain(&self, attributes: &PassengerAttributes, verdict: Verdict) -> Explanation {
        let Some(generator) = &self.generator else {
            tracing::debug!("Explanations disabled, skipping generator call");
            return Explanation::Unavailable;
        };

        let prompt = render_prompt(attributes, verdict);
        tracing::debug!(max_tokens = self.max_tokens, "Requesting explanation");

        match tokio::time::timeout(self.timeout, generator.generate(&prompt, self.max_tokens)).await {
            Ok(Ok(Some(text))) if !text.trim().is_empty() => Explanation::Generated(text),
            Ok(Ok(_)) => {
                tracing::warn!("Explanation service returned no text");
                Explanation::Unavailable
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Explanation service call failed");
                Explanation::Unavailable
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "Explanation service timed out");
                Explanation::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Sex, EXPLANATION_UNAVAILABLE};
    use crate::utils::error::{PredictorError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
        Hang,
    }

    struct ScriptedGenerator {
        reply: Reply,
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, u32)>>,
    }

    impl ScriptedGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((prompt.to_string(), max_tokens));
            match self.reply {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail => Err(PredictorError::explanation("HTTP 503")),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(Some("too late".to_string()))
                }
            }
        }
    }

    fn passenger() -> PassengerAttributes {
        PassengerAttributes {
            pclass: 1,
            sex: Sex::Female,
            age: 29.0,
        }
    }

    #[test]
    fn test_render_prompt_uses_labels() {
        let prompt = render_prompt(&passenger(), Verdict::Survived);
        assert!(prompt.contains("class 1"));
        assert!(prompt.contains("was female"));
        assert!(prompt.contains("29 years old"));
        assert!(prompt.contains("this passenger survived."));

        let male = PassengerAttributes {
            pclass: 3,
            sex: Sex::MaleOrOther,
            age: 22.5,
        };
        let prompt = render_prompt(&male, Verdict::DidNotSurvive);
        assert!(prompt.contains("was male"));
        assert!(prompt.contains("22.5 years old"));
        assert!(prompt.contains("did not survive"));
    }

    #[test]
    fn test_render_prompt_is_deterministic() {
        assert_eq!(
            render_prompt(&passenger(), Verdict::Survived),
            render_prompt(&passenger(), Verdict::Survived)
        );
    }

    #[tokio::test]
    async fn test_generated_text_is_returned_verbatim() {
        let generator = ScriptedGenerator::new(Reply::Text("  Women in first class were saved first.\n"));
        let orchestrator = ExplanationOrchestrator::new(generator.clone(), 80, Duration::from_secs(5));

        let explanation = orchestrator.explain(&passenger(), Verdict::Survived).await;

        assert_eq!(
            explanation,
            Explanation::Generated("  Women in first class were saved first.\n".to_string())
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        let (prompt, max_tokens) = generator.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(max_tokens, 80);
        assert_eq!(prompt, render_prompt(&passenger(), Verdict::Survived));
    }

    #[tokio::test]
    async fn test_missing_or_blank_text_degrades() {
        for reply in [Reply::Empty, Reply::Text("   ")] {
            let generator = ScriptedGenerator::new(reply);
            let orchestrator = ExplanationOrchestrator::new(generator, 80, Duration::from_secs(5));
            let explanation = orchestrator.explain(&passenger(), Verdict::Survived).await;
            assert_eq!(explanation, Explanation::Unavailable);
        }
    }

    #[tokio::test]
    async fn test_generator_error_degrades_without_retry() {
        let generator = ScriptedGenerator::new(Reply::Fail);
        let orchestrator = ExplanationOrchestrator::new(generator.clone(), 80, Duration::from_secs(5));

        let explanation = orchestrator.explain(&passenger(), Verdict::DidNotSurvive).await;

        assert_eq!(explanation.text(), EXPLANATION_UNAVAILABLE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generator_is_cut_off() {
        let generator = ScriptedGenerator::new(Reply::Hang);
        let orchestrator = ExplanationOrchestrator::new(generator, 80, Duration::from_secs(2));

        let explanation = orchestrator.explain(&passenger(), Verdict::Survived).await;

        assert_eq!(explanation, Explanation::Unavailable);
    }

    #[tokio::test]
    async fn test_disabled_orchestrator_never_calls_out() {
        let orchestrator = ExplanationOrchestrator::disabled();
        assert!(!orchestrator.is_enabled());
        assert_eq!(
            orchestrator.explain(&passenger(), Verdict::Survived).await,
            Explanation::Unavailable
        );
    }
}
