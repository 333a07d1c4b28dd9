//! HTTP surface: the form page, the form handler, the JSON API and a health
//! probe.
//!
//! Every prediction outcome, including validation and inference failures, is
//! answered with `200 OK` and the error carried in the body.

use crate::adapters::openai::OpenAiTextGenerator;
use crate::app::page::render_page;
use crate::app::response::{api_response, form_view, ApiResponse, FormView, Locale};
use crate::config::AppConfig;
use crate::core::classifier::ModelArtifact;
use crate::core::explanation::ExplanationOrchestrator;
use crate::core::prediction::PredictionService;
use crate::domain::model::{PredictionOutcome, RawPassenger};
use crate::domain::ports::Classifier;
use crate::utils::error::Result;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub service: PredictionService,
    pub locale: Locale,
}

/// Build the request-handling state from configuration: load the model
/// artifact once and wire the explanation client if it is configured.
pub fn build_app_state(config: &AppConfig) -> Result<Arc<AppState>> {
    tracing::info!(path = %config.model.path, "Loading model artifact");
    let classifier = Arc::new(ModelArtifact::from_file(&config.model.path)?) as Arc<dyn Classifier>;
    build_app_state_with(config, classifier)
}

/// Same as [`build_app_state`] with an already constructed classifier.
pub fn build_app_state_with(config: &AppConfig, classifier: Arc<dyn Classifier>) -> Result<Arc<AppState>> {
    let settings = &config.explanation;
    let explainer = match settings.api_key() {
        Some(api_key) if settings.enabled => {
            let generator = OpenAiTextGenerator::new(
                settings.endpoint.clone(),
                api_key.to_string(),
                settings.model.clone(),
                settings.connect_timeout(),
                settings.timeout(),
            )?;
            tracing::info!(endpoint = %settings.endpoint, model = %settings.model, "Explanations enabled");
            ExplanationOrchestrator::new(Arc::new(generator), settings.max_tokens, settings.timeout())
        }
        _ => {
            tracing::warn!("Explanations disabled: turned off or no API key configured");
            ExplanationOrchestrator::disabled()
        }
    };

    Ok(Arc::new(AppState {
        service: PredictionService::new(classifier, explainer),
        locale: config.server.locale,
    }))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict_form", post(predict_form))
        .route("/predict", post(predict_api))
        .route("/health", get(health))
        .with_state(state)
}

async fn home() -> Html<String> {
    Html(render_page(&FormView::default()))
}

async fn predict_form(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> Html<String> {
    let view = match form {
        Ok(Form(fields)) => {
            let result = state.service.predict(&RawPassenger::from_form(&fields)).await;
            log_outcome("form", &result);
            form_view(&result, state.locale)
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected form submission");
            FormView {
                result: Some(format!("Error: {}", rejection.body_text())),
                explanation: None,
            }
        }
    };
    Html(render_page(&view))
}

async fn predict_api(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected JSON submission");
            return Json(ApiResponse::Error {
                error: rejection.body_text(),
            });
        }
    };

    let result = match RawPassenger::from_json(body) {
        Ok(raw) => state.service.predict(&raw).await,
        Err(e) => Err(e),
    };
    log_outcome("api", &result);
    Json(api_response(&result, state.locale))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "explanations_enabled": state.service.explanations_enabled(),
    }))
}

fn log_outcome(mode: &str, result: &Result<PredictionOutcome>) {
    match result {
        Ok(outcome) => tracing::info!(
            mode,
            verdict = outcome.verdict.describe(),
            explained = outcome.explanation.is_available(),
            "Prediction served"
        ),
        Err(e) if e.is_request_error() => tracing::warn!(
            mode,
            category = ?e.category(),
            error = %e,
            "Prediction request failed"
        ),
        Err(e) => tracing::error!(
            mode,
            category = ?e.category(),
            error = %e,
            "Unexpected error while serving prediction"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FeatureVector, Verdict};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct AlwaysSurvives;

    impl Classifier for AlwaysSurvives {
        fn predict(&self, _features: &FeatureVector) -> Result<Verdict> {
            Ok(Verdict::Survived)
        }
    }

    fn test_app() -> Router {
        let state = build_app_state_with(&AppConfig::default(), Arc::new(AlwaysSurvives)).unwrap();
        build_router(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_home_serves_form() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("name=\"Pclass\""));
    }

    #[tokio::test]
    async fn test_health_reports_disabled_explanations() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["explanations_enabled"], false);
    }

    #[tokio::test]
    async fn test_api_without_content_type_returns_error_payload() {
        let request = Request::post("/predict")
            .body(Body::from(r#"{"Pclass": 1, "Sex": "female", "Age": 29}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn test_form_without_explanation_service() {
        let request = Request::post("/predict_form")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("Pclass=1&Sex=female&Age=29"))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Survived! 🎉"));
        assert!(!html.contains("id=\"explanation\""));
    }
}
