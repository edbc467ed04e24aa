//! HTTP surface: the study page plus a small JSON API over `SessionController`.

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::controller::{
    RunReport, SessionController, SessionState, Tab, UNEXPECTED_ERROR_MESSAGE,
};
use crate::error::StudyError;
use crate::theme::Theme;
use crate::views::{ContentView, content_view};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Serialize)]
pub struct TabInfo {
    pub id: Tab,
    pub label: &'static str,
}

/// Everything the page needs to draw itself
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub input_text: String,
    pub file_name: Option<String>,
    pub active_tab: Tab,
    pub tabs: Vec<TabInfo>,
    pub loading: bool,
    pub loading_message: &'static str,
    /// Hidden while a run is in flight
    pub error: Option<String>,
    pub can_analyze: bool,
    pub theme: Theme,
    pub content: ContentView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RunReport>,
}

impl SessionPayload {
    fn from_state(state: &SessionState) -> Self {
        Self {
            input_text: state.input_text.clone(),
            file_name: state.file_name.clone(),
            active_tab: state.active_tab,
            tabs: Tab::ALL
                .iter()
                .map(|t| TabInfo {
                    id: *t,
                    label: t.label(),
                })
                .collect(),
            loading: state.loading,
            loading_message: state.loading_message(),
            error: state.error.clone().filter(|_| !state.loading),
            can_analyze: state.can_analyze(),
            theme: state.theme,
            content: content_view(state),
            report: None,
        }
    }
}

/// Error response; only user-facing messages leave the server verbatim
pub struct ApiError(StudyError);

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            StudyError::InputValidation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StudyError::Busy => (StatusCode::CONFLICT, self.0.to_string()),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE.to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult = std::result::Result<Json<SessionPayload>, ApiError>;

async fn payload(controller: &SessionController) -> Json<SessionPayload> {
    Json(SessionPayload::from_state(&controller.snapshot().await))
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FileParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TabBody {
    pub tab: Tab,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_state(State(controller): State<Arc<SessionController>>) -> Json<SessionPayload> {
    payload(&controller).await
}

async fn set_text(
    State(controller): State<Arc<SessionController>>,
    Json(body): Json<TextBody>,
) -> Json<SessionPayload> {
    controller.set_input_text(body.text).await;
    payload(&controller).await
}

async fn upload_file(
    State(controller): State<Arc<SessionController>>,
    Query(params): Query<FileParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    controller
        .load_file(&params.name, content_type, &body)
        .await?;
    Ok(payload(&controller).await)
}

async fn clear_file(State(controller): State<Arc<SessionController>>) -> Json<SessionPayload> {
    controller.clear_file().await;
    payload(&controller).await
}

async fn analyze(State(controller): State<Arc<SessionController>>) -> ApiResult {
    let report = controller.run().await?;
    let mut body = SessionPayload::from_state(&controller.snapshot().await);
    body.report = Some(report);
    Ok(Json(body))
}

async fn select_tab(
    State(controller): State<Arc<SessionController>>,
    Json(body): Json<TabBody>,
) -> Json<SessionPayload> {
    controller.select_tab(body.tab).await;
    payload(&controller).await
}

async fn toggle_answer(
    State(controller): State<Arc<SessionController>>,
    Path(index): Path<usize>,
) -> ApiResult {
    controller.toggle_answer(index).await?;
    Ok(payload(&controller).await)
}

async fn toggle_theme(State(controller): State<Arc<SessionController>>) -> ApiResult {
    controller.toggle_theme().await?;
    Ok(payload(&controller).await)
}

async fn next_loading_message(
    State(controller): State<Arc<SessionController>>,
) -> Json<serde_json::Value> {
    let message = controller.next_loading_message().await;
    Json(json!({ "message": message }))
}

async fn require_bearer(
    State(expected): State<Arc<String>>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    if req.uri().path().eq("/health") {
        return next.run(req).await;
    }
    let header_ok = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", expected.as_str()));
    // Fallback for browsers opening the page directly: ?token=... or ?access_token=...
    let query_ok = req.uri().query().is_some_and(|q| {
        q.split('&').any(|pair| {
            pair.split_once('=').is_some_and(|(k, v)| {
                (k == "access_token" || k == "token") && v == expected.as_str()
            })
        })
    });
    if !(header_ok || query_ok) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}

pub fn router(controller: Arc<SessionController>, bearer_token: Option<String>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/api/state", get(get_state))
        .route("/api/text", put(set_text))
        .route("/api/file", post(upload_file).delete(clear_file))
        .route("/api/analyze", post(analyze))
        .route("/api/tab", put(select_tab))
        .route("/api/questions/:index/toggle", post(toggle_answer))
        .route("/api/theme/toggle", post(toggle_theme))
        .route("/api/loading/next", post(next_loading_message))
        .with_state(controller);

    if let Some(expected) = bearer_token {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(expected),
            require_bearer,
        ));
    }

    router.route("/health", get(health))
}
