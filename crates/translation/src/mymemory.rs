use std::time::Duration;

use anyhow::{Context, Result};
use careermate_core::Language;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::{TranslationBackend, TranslationError};

pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

/// GET `?q=<text>&langpair=<source>|<target>` against the MyMemory API, or any
/// service answering with the same `{responseData: {translatedText}}` body.
#[derive(Debug, Clone)]
pub struct MyMemoryBackend {
    client: Client,
    endpoint: Url,
}

impl MyMemoryBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid translation endpoint {}", endpoint))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build translation HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn request_url(&self, text: &str, source: Language, target: Language) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", text)
            .append_pair(
                "langpair",
                &format!("{}|{}", source.as_code(), target.as_code()),
            );
        url
    }
}

impl TranslationBackend for MyMemoryBackend {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let response = self
            .client
            .get(self.request_url(text, source, target))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TranslationError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: MyMemoryResponse = serde_json::from_str(&body)?;

        parsed
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(TranslationError::MissingText)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::ChunkedTranslator;

    #[test]
    fn builds_language_pair_query() {
        let backend = MyMemoryBackend::with_defaults().unwrap();
        let url = backend.request_url("Tech & skills", Language::En, Language::Kn);
        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

        assert_eq!(url.path(), "/get");
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "Tech & skills".to_string()),
                ("langpair".to_string(), "en|kn".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(MyMemoryBackend::new("not a url", DEFAULT_TIMEOUT).is_err());
    }

    /// Local stand-in for the service, one route per kind of answer.
    async fn stub_service() -> String {
        let router = Router::new()
            .route(
                "/ok",
                get(|| async {
                    Json(json!({ "responseData": { "translatedText": "  नमस्ते   दुनिया " } }))
                }),
            )
            .route(
                "/unavailable",
                get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "quota exceeded") }),
            )
            .route("/garbage", get(|| async { "not json" }))
            .route("/no-data", get(|| async { Json(json!({ "responseData": {} })) }))
            .route(
                "/blank",
                get(|| async { Json(json!({ "responseData": { "translatedText": "   " } })) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn backend(base: &str, path: &str) -> MyMemoryBackend {
        MyMemoryBackend::new(&format!("{base}{path}"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn returns_translated_text() {
        let base = stub_service().await;
        let text = backend(&base, "/ok")
            .translate("Hello world", Language::En, Language::Hi)
            .await
            .unwrap();
        assert_eq!(text, "  नमस्ते   दुनिया ");
    }

    #[tokio::test]
    async fn non_ok_status_is_an_error() {
        let base = stub_service().await;
        let result = backend(&base, "/unavailable")
            .translate("Hello", Language::En, Language::Pa)
            .await;
        assert!(matches!(result, Err(TranslationError::Status(503))));
    }

    #[tokio::test]
    async fn unparseable_body_is_an_error() {
        let base = stub_service().await;
        let result = backend(&base, "/garbage")
            .translate("Hello", Language::En, Language::Pa)
            .await;
        assert!(matches!(result, Err(TranslationError::MalformedBody(_))));
    }

    #[tokio::test]
    async fn missing_translated_text_is_an_error() {
        let base = stub_service().await;
        let result = backend(&base, "/no-data")
            .translate("Hello", Language::En, Language::Kn)
            .await;
        assert!(matches!(result, Err(TranslationError::MissingText)));
    }

    #[tokio::test]
    async fn blank_translated_text_counts_as_missing() {
        let base = stub_service().await;
        let result = backend(&base, "/blank")
            .translate("Hello", Language::En, Language::Kn)
            .await;
        assert!(matches!(result, Err(TranslationError::MissingText)));
    }

    #[tokio::test]
    async fn every_service_failure_degrades_to_source_chunk() {
        let base = stub_service().await;

        for path in ["/unavailable", "/garbage", "/no-data", "/blank"] {
            let translator = ChunkedTranslator::new(backend(&base, path));
            let outcome = translator
                .translate_one("Update your  resume\nregularly.", Language::Hi)
                .await;

            assert!(outcome.is_fallback(), "{path}");
            assert_eq!(outcome.text(), "Update your  resume\nregularly.", "{path}");
        }

        let translator = ChunkedTranslator::new(backend(&base, "/ok"));
        let outcome = translator.translate_one("Hello world", Language::Hi).await;
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.text(), "नमस्ते दुनिया");
    }
}
