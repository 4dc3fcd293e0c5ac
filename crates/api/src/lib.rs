mod config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use careermate_agents::{AgentError, CareerAgent};
use careermate_core::{
    ChatInput, ChatReply, KeywordSet, Language, ResumeAnalysis, ResumeUploadError,
};
use careermate_observability::{AppMetrics, MetricsSnapshot};
use careermate_speech::Speech;
use careermate_storage::{ChatLogRepository, Store};
use careermate_translation::{ChunkedTranslator, MyMemoryBackend};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ApiConfig;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const RESUME_FIELD: &str = "resume";
const WEB_CANDIDATES: [&str; 4] = [
    "templates/index.html",
    "index.html",
    "static/index.html",
    "web/index.html",
];

pub type ApiAgent = CareerAgent<MyMemoryBackend, Speech, Store>;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<ApiAgent>,
    pub metrics: Arc<AppMetrics>,
    pub web_root: Arc<PathBuf>,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    database: &'static str,
    storage_backend: &'static str,
    languages_supported: Vec<&'static str>,
    features: [&'static str; 4],
    openai_voices: BTreeMap<&'static str, &'static str>,
    speech_enabled: bool,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    success: bool,
    #[serde(flatten)]
    reply: ChatReply,
}

#[derive(Debug, Deserialize)]
struct SpeakRequest {
    #[serde(default)]
    text: String,
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    success: bool,
    #[serde(flatten)]
    analysis: ResumeAnalysis,
}

pub async fn build_app(config: ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let store = match config.database_url.as_deref() {
        Some(database_url) => Store::sqlite(database_url).await?,
        None => Store::memory(),
    };

    let backend = MyMemoryBackend::new(&config.translate_endpoint, config.translate_timeout)
        .context("failed to initialize translation backend")?;
    let speech = Speech::from_api_key(
        config.openai_api_key.clone(),
        &config.tts_model,
        &config.openai_url,
    )
    .context("failed to initialize speech backend")?;

    let agent = Arc::new(CareerAgent::new(
        Arc::new(KeywordSet::builtin()),
        ChunkedTranslator::new(backend),
        speech,
        Arc::new(store),
        metrics.clone(),
    ));

    let state = ApiState {
        agent,
        metrics,
        web_root: Arc::new(config.web_root),
        allowed_origins: Arc::new(config.allowed_origins),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/web", get(web_interface))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/speak", post(speak))
        .route("/api/upload-resume", post(upload_resume))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .with_state(state)
}

fn error_response(status: StatusCode, error: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": error,
            "message": message.into(),
        })),
    )
        .into_response()
}

async fn home() -> impl IntoResponse {
    Json(json!({
        "message": "🚀 CareerMate AI Job Assistant - Backend Running!",
        "service": "careermate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "features": ["OpenAI Natural Voice TTS", "Multilingual Support", "Smart Intent Detection"],
        "endpoints": ["/api/chat", "/api/speak", "/api/upload-resume", "/api/health", "/web"],
    }))
}

async fn web_interface(State(state): State<ApiState>) -> Html<String> {
    match find_web_page(&state.web_root).await {
        Some(page) => Html(page),
        None => Html(FALLBACK_PAGE.to_string()),
    }
}

async fn find_web_page(root: &Path) -> Option<String> {
    for candidate in WEB_CANDIDATES {
        let path = root.join(candidate);
        match tokio::fs::read_to_string(&path).await {
            Ok(page) => return Some(page),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "failed to read web page");
            }
        }
    }
    None
}

const FALLBACK_PAGE: &str = r#"<html><head><title>CareerMate</title></head>
<body>
<h1>🚀 CareerMate AI Backend is Running!</h1>
<p>Place your HTML file in one of these locations:</p>
<ul>
    <li>templates/index.html</li>
    <li>index.html</li>
    <li>static/index.html</li>
    <li>web/index.html</li>
</ul>
<p><strong>API Endpoints:</strong></p>
<ul>
    <li>POST /api/chat - Chat with AI</li>
    <li>POST /api/speak - OpenAI Text to Speech</li>
    <li>POST /api/upload-resume - Upload Resume</li>
    <li>GET /api/health - Health check</li>
</ul>
</body></html>
"#;

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let store = state.agent.store();
    let database = match store {
        Store::Memory(_) => "in_memory",
        Store::Sqlite(_) => match store.ping().await {
            Ok(()) => "connected",
            Err(error) => {
                warn!(error = %error, "database ping failed");
                "disconnected"
            }
        },
    };

    let payload = HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
        storage_backend: store.backend_name(),
        languages_supported: Language::ALL.iter().map(|lang| lang.as_code()).collect(),
        features: ["OpenAI TTS", "Translation", "Intent Detection", "Resume Analysis"],
        openai_voices: Language::ALL
            .iter()
            .map(|lang| (lang.as_code(), lang.voice()))
            .collect(),
        speech_enabled: state.agent.speech().is_enabled(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(
    State(state): State<ApiState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
        }
    };

    let input = ChatInput {
        message: request.message,
        language: request.language,
    };

    match state.agent.handle_chat(input).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ChatResponse {
                success: true,
                reply,
            }),
        )
            .into_response(),
        Err(AgentError::EmptyMessage) => error_response(
            StatusCode::BAD_REQUEST,
            "empty_message",
            AgentError::EmptyMessage.to_string(),
        ),
        Err(error) => {
            warn!(error = %error, "chat failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "chat_failed",
                error.to_string(),
            )
        }
    }
}

async fn speak(
    State(state): State<ApiState>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
        }
    };
    let language = Language::from_optional_str(request.language.as_deref());

    match state.agent.speak(&request.text, language).await {
        Ok(audio) => {
            let disposition = format!("inline; filename=\"{}\"", audio.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, audio.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                audio.bytes,
            )
                .into_response()
        }
        Err(AgentError::EmptyText) => error_response(
            StatusCode::BAD_REQUEST,
            "empty_text",
            AgentError::EmptyText.to_string(),
        ),
        Err(error) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "tts_failed",
            error.to_string(),
        ),
    }
}

async fn upload_resume(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, "no_file", rejection.body_text())
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return error_response(StatusCode::BAD_REQUEST, "no_file", "No file uploaded")
            }
            Err(error) => {
                return error_response(error.status(), "upload_failed", error.body_text())
            }
        };
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let size = match field.bytes().await {
            Ok(bytes) => bytes.len(),
            Err(error) => {
                return error_response(error.status(), "upload_failed", error.body_text())
            }
        };

        return match state.agent.analyze_resume(&file_name) {
            Ok(analysis) => {
                info!(file_name = %file_name, bytes = size, "resume analyzed");
                (
                    StatusCode::OK,
                    Json(UploadResponse {
                        success: true,
                        analysis,
                    }),
                )
                    .into_response()
            }
            Err(AgentError::ResumeUpload(error)) => {
                let code = match &error {
                    ResumeUploadError::NoFileSelected => "no_file_selected",
                    ResumeUploadError::InvalidFileType { .. } => "invalid_file_type",
                };
                error_response(StatusCode::BAD_REQUEST, code, error.to_string())
            }
            Err(error) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "upload_failed",
                error.to_string(),
            ),
        };
    }
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // An empty list keeps the open policy the browser page relies on.
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
