use std::collections::HashMap;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::Query;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use careermate_api::{build_app, ApiConfig};
use careermate_core::{Intent, ResponseCatalog};
use careermate_translation::{chunk_for_translation, MAX_CHUNK_CHARS};
use serde_json::{json, Value};
use tower::ServiceExt;

const OFFLINE_TRANSLATOR: &str = "http://127.0.0.1:9/get";
const BOUNDARY: &str = "careermate-test-boundary";

fn offline_config() -> ApiConfig {
    ApiConfig {
        translate_endpoint: OFFLINE_TRANSLATOR.to_string(),
        translate_timeout: Duration::from_secs(3),
        web_root: std::env::temp_dir().join("careermate-tests-no-web"),
        ..ApiConfig::default()
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local stub");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// Stand-in for the MyMemory `get` endpoint: tags each text with its language pair.
async fn stub_translator() -> String {
    async fn translate(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let text = params.get("q").cloned().unwrap_or_default();
        let pair = params.get("langpair").cloned().unwrap_or_default();
        Json(json!({
            "responseData": { "translatedText": format!("[{pair}] {text}") },
            "responseStatus": 200
        }))
    }

    let base = serve(Router::new().route("/get", get(translate))).await;
    format!("{base}/get")
}

async fn stub_speech() -> String {
    async fn speech(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer sk-test");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        let voice = body["voice"].as_str().unwrap_or_default().to_string();
        (StatusCode::OK, format!("ID3-{voice}")).into_response()
    }

    let base = serve(Router::new().route("/v1/audio/speech", post(speech))).await;
    format!("{base}/v1/audio/speech")
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(field: &str, file_name: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         Jane Doe, Python, SQL\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload-resume")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_languages_and_in_memory_store() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["status"], "healthy");
    assert_eq!(parsed["database"], "in_memory");
    assert_eq!(parsed["languages_supported"], json!(["en", "hi", "pa", "kn"]));
    assert_eq!(parsed["openai_voices"]["hi"], "nova");
    assert_eq!(parsed["speech_enabled"], false);
}

#[tokio::test]
async fn health_pings_sqlite() {
    let config = ApiConfig {
        database_url: Some("sqlite::memory:".to_string()),
        ..offline_config()
    };
    let app = build_app(config).await.expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let parsed = body_json(response).await;
    assert_eq!(parsed["database"], "connected");
    assert_eq!(parsed["storage_backend"], "sqlite");
}

#[tokio::test]
async fn english_salary_chat_returns_template_and_suggestions() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(json_request(
            "/api/chat",
            json!({ "message": "What salary should I expect?", "language": "en" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["intent"], "salary");
    assert_eq!(parsed["language"], "en");
    assert!(parsed["response"]
        .as_str()
        .unwrap()
        .contains("Tech Salaries 2024-2025"));
    assert_eq!(parsed["suggestions"].as_array().unwrap().len(), 4);
    assert!(parsed.get("translation").is_none());
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(json_request("/api/chat", json!({ "message": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = body_json(response).await;
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["error"], "empty_message");
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = build_app(offline_config()).await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{\"message\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_json");
}

#[tokio::test]
async fn unreachable_translator_falls_back_to_english_chunks() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(json_request(
            "/api/chat",
            json!({ "message": "नमस्ते", "language": "hi" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["intent"], "greeting");
    assert_eq!(parsed["language"], "hi");

    let english = ResponseCatalog::new().lookup(Intent::Greeting, "नमस्ते");
    let expected = if english.chars().count() <= MAX_CHUNK_CHARS {
        english
    } else {
        chunk_for_translation(&english, MAX_CHUNK_CHARS).join("\n\n")
    };
    assert_eq!(parsed["response"], expected.as_str());

    let chunks = parsed["translation"]["chunks"].as_u64().unwrap();
    assert!(chunks > 0);
    assert_eq!(parsed["translation"]["fallbacks"].as_u64().unwrap(), chunks);
}

#[tokio::test]
async fn reachable_translator_translates_every_chunk() {
    let config = ApiConfig {
        translate_endpoint: stub_translator().await,
        ..offline_config()
    };
    let app = build_app(config).await.expect("app should build");

    let response = app
        .oneshot(json_request(
            "/api/chat",
            json!({ "message": "interview tips please", "language": "kn" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["intent"], "interview");
    assert_eq!(parsed["translation"]["fallbacks"], 0);

    let text = parsed["response"].as_str().unwrap();
    let chunks = parsed["translation"]["chunks"].as_u64().unwrap() as usize;
    assert_eq!(text.matches("[en|kn]").count(), chunks);
    assert!(text.starts_with("[en|kn] "));
}

#[tokio::test]
async fn speak_without_api_key_fails() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(json_request(
            "/api/speak",
            json!({ "text": "Hello there", "language": "en" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "tts_failed");
}

#[tokio::test]
async fn speak_rejects_blank_text() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(json_request("/api/speak", json!({ "text": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "empty_text");
}

#[tokio::test]
async fn speak_streams_mp3_with_language_voice() {
    let config = ApiConfig {
        openai_api_key: Some("sk-test".to_string()),
        openai_url: stub_speech().await,
        ..offline_config()
    };
    let app = build_app(config).await.expect("app should build");

    let response = app
        .oneshot(json_request(
            "/api/speak",
            json!({ "text": "ನಮಸ್ಕಾರ", "language": "kn" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"careermate_speech_kn.mp3\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ID3-shimmer");
}

#[tokio::test]
async fn resume_upload_accepts_pdf() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(upload_request("resume", "jane_doe.PDF"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = body_json(response).await;
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["file_type"], "PDF");
    assert_eq!(parsed["job_suggestions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn resume_upload_rejects_bad_input() {
    let app = build_app(offline_config()).await.expect("app should build");

    let cases = [
        (upload_request("resume", "setup.exe"), "invalid_file_type"),
        (upload_request("resume", ""), "no_file_selected"),
        (upload_request("attachment", "cv.pdf"), "no_file"),
    ];

    for (request, expected) in cases {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{expected}");
        assert_eq!(body_json(response).await["error"], expected);
    }
}

#[tokio::test]
async fn root_banner_and_web_fallback() {
    let app = build_app(offline_config()).await.expect("app should build");

    let banner = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(banner.status(), StatusCode::OK);
    let parsed = body_json(banner).await;
    assert!(parsed["endpoints"]
        .as_array()
        .unwrap()
        .contains(&json!("/api/chat")));

    let web = app
        .oneshot(Request::builder().uri("/web").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(web.status(), StatusCode::OK);
    let body = to_bytes(web.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("CareerMate AI Backend is Running!"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let app = build_app(offline_config()).await.expect("app should build");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-42");
}
