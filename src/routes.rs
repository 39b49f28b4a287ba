use axum::{
    extract::State,
    response::Redirect,
    routing::{any, get, post, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::TranslateError;
use crate::state::AppState;
use crate::translate::interface::{
    AvailableLanguages, AvailableModels, BatchRequest, BatchResponse, InvokeRequest,
    InvokeResponse, LanguageTextRequest, TranslateResponse, UpdateModelRequest,
    UpdateModelResponse,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/available_models/", get(available_models))
        .route("/available_languages/", get(available_languages))
        .route("/update_model/", post(update_model))
        .route("/update_language_txt/", post(update_language_txt))

        // Slashless paths redirect, keeping method and body (307)
        .route("/available_models", redirect_to("/available_models/"))
        .route("/available_languages", redirect_to("/available_languages/"))
        .route("/update_model", redirect_to("/update_model/"))
        .route("/update_language_txt", redirect_to("/update_language_txt/"))

        // Runnable translation chain; the language is chosen per request
        .route("/chain/invoke", post(chain_invoke))
        .route("/chain/batch", post(chain_batch))

        .route("/health", get(health_check))
}

fn redirect_to(path: &'static str) -> MethodRouter<AppState> {
    any(move || async move { Redirect::temporary(path) })
}

/// Full application: routes, state, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn available_models(State(state): State<AppState>) -> Json<AvailableModels> {
    Json(AvailableModels {
        available_models: state.translator.list_models(),
    })
}

async fn available_languages(State(state): State<AppState>) -> Json<AvailableLanguages> {
    Json(AvailableLanguages {
        available_languages: state.translator.list_languages(),
    })
}

async fn update_model(
    State(state): State<AppState>,
    Json(request): Json<UpdateModelRequest>,
) -> Result<Json<UpdateModelResponse>, TranslateError> {
    let message = state.translator.set_model(&request.new_model).await?;
    Ok(Json(UpdateModelResponse { message }))
}

async fn update_language_txt(
    State(state): State<AppState>,
    Json(request): Json<LanguageTextRequest>,
) -> Result<Json<TranslateResponse>, TranslateError> {
    let translated_text = state
        .translator
        .set_language_and_translate(&request.new_language, &request.input_text)
        .await?;
    Ok(Json(TranslateResponse { translated_text }))
}

async fn chain_invoke(
    State(state): State<AppState>,
    Json(request): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, TranslateError> {
    let output = state.translator.invoke_chain(&request.input).await?;
    Ok(Json(InvokeResponse { output }))
}

async fn chain_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, TranslateError> {
    let output = state.translator.batch_chain(&request.inputs).await?;
    Ok(Json(BatchResponse { output }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let selection = state.translator.current_selection().await;
    Json(json!({
        "status": "ok",
        "model": selection.model,
        "language": selection.language
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::agent::stateless_llm::testing::StubFactory;
    use crate::config::Config;

    fn test_app(factory: &Arc<StubFactory>) -> Router {
        app(AppState::new(Config::default(), factory.clone()).unwrap())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn lists_catalogs() {
        let app = test_app(&StubFactory::echo());

        let (status, body) = send(&app, "GET", "/available_models/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"available_models": ["Llama-3.1-8b-Instant", "Mixtral-8x7b-32768", "Gemma2-9b-It", "Gemma-7b-It"]})
        );

        let (status, body) = send(&app, "GET", "/available_languages/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"available_languages": ["French", "German", "Spanish", "Hindi"]})
        );
    }

    #[tokio::test]
    async fn end_to_end_update_then_translate() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);

        let (status, body) = send(
            &app,
            "POST",
            "/update_model/",
            Some(json!({"new_model": "Gemma-7b-It"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Model updated to Gemma-7b-It"}));

        let (status, body) = send(
            &app,
            "POST",
            "/update_language_txt/",
            Some(json!({"new_language": "Spanish", "input_text": "Good morning"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"translated_text": "Spanish:Good morning"}));
        assert_eq!(factory.log.calls()[0].model, "Gemma-7b-It");

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(
            body,
            json!({"status": "ok", "model": "Gemma-7b-It", "language": "Spanish"})
        );
    }

    #[tokio::test]
    async fn invalid_model_is_400_with_catalog() {
        let app = test_app(&StubFactory::echo());

        let (status, body) = send(
            &app,
            "POST",
            "/update_model/",
            Some(json!({"new_model": "gpt-4o"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Invalid model name. Available models are: Llama-3.1-8b-Instant, Mixtral-8x7b-32768, Gemma2-9b-It, Gemma-7b-It"
        );
    }

    #[tokio::test]
    async fn invalid_language_is_400_and_skips_provider() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);

        let (status, body) = send(
            &app,
            "POST",
            "/update_language_txt/",
            Some(json!({"new_language": "Latin", "input_text": "Salve"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Invalid language. Available languages are: French, German, Spanish, Hindi"
        );
        assert_eq!(factory.log.count(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_500_with_message() {
        let factory = StubFactory::failing();
        let app = test_app(&factory);

        let (status, body) = send(
            &app,
            "POST",
            "/update_language_txt/",
            Some(json!({"new_language": "Hindi", "input_text": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Error updating language: "), "{}", detail);
        assert!(detail.contains("503"), "{}", detail);
    }

    #[tokio::test]
    async fn model_construction_failure_is_500() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);
        factory.revoke_credentials();

        let (status, body) = send(
            &app,
            "POST",
            "/update_model/",
            Some(json!({"new_model": "Gemma-7b-It"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Error updating model: no API key configured");
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_before_handler() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);

        let (status, _) = send(
            &app,
            "POST",
            "/update_language_txt/",
            Some(json!({"new_language": "German"})),
        )
        .await;
        assert!(status.is_client_error());
        assert_eq!(factory.log.count(), 0);

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["language"], "French");
    }

    #[tokio::test]
    async fn chain_invoke_takes_language_and_text() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);

        let (status, body) = send(
            &app,
            "POST",
            "/chain/invoke",
            Some(json!({"input": {"language": "German", "text": "Hi"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"output": "German:Hi"}));

        let (status, body) = send(
            &app,
            "POST",
            "/chain/batch",
            Some(json!({"inputs": [
                {"language": "Hindi", "text": "a"},
                {"language": "Spanish", "text": "b"}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"output": ["Hindi:a", "Spanish:b"]}));

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["language"], "French");
    }

    #[tokio::test]
    async fn chain_unknown_language_is_400() {
        let factory = StubFactory::echo();
        let app = test_app(&factory);

        let (status, body) = send(
            &app,
            "POST",
            "/chain/invoke",
            Some(json!({"input": {"language": "Latin", "text": "Salve"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Invalid language. Available languages are: French, German, Spanish, Hindi"
        );

        let (status, _) = send(
            &app,
            "POST",
            "/chain/batch",
            Some(json!({"inputs": [{"language": "Klingon", "text": "b"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(factory.log.count(), 0);
    }

    #[tokio::test]
    async fn slashless_paths_redirect() {
        let app = test_app(&StubFactory::echo());

        for (method, path) in [
            ("GET", "/available_models"),
            ("GET", "/available_languages"),
            ("POST", "/update_model"),
            ("POST", "/update_language_txt"),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(path)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(
                response.headers()["location"],
                format!("{}/", path).as_str()
            );
        }
    }
}
