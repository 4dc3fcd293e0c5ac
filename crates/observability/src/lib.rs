use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    chat_requests_total: AtomicU64,
    translation_chunks_total: AtomicU64,
    translation_fallbacks_total: AtomicU64,
    speech_requests_total: AtomicU64,
    speech_failures_total: AtomicU64,
    resume_uploads_total: AtomicU64,
    total_chat_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub chat_requests_total: u64,
    pub translation_chunks_total: u64,
    pub translation_fallbacks_total: u64,
    pub speech_requests_total: u64,
    pub speech_failures_total: u64,
    pub resume_uploads_total: u64,
    pub avg_chat_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_chat_request(&self) {
        self.chat_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_translation(&self, chunks: usize, fallbacks: usize) {
        self.translation_chunks_total
            .fetch_add(chunks as u64, Ordering::Relaxed);
        self.translation_fallbacks_total
            .fetch_add(fallbacks as u64, Ordering::Relaxed);
    }

    pub fn inc_speech_request(&self) {
        self.speech_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_speech_failure(&self) {
        self.speech_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_resume_upload(&self) {
        self.resume_uploads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_chat_latency(&self, duration: Duration) {
        self.total_chat_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.chat_requests_total.load(Ordering::Relaxed);
        let latency = self.total_chat_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            chat_requests_total: requests,
            translation_chunks_total: self.translation_chunks_total.load(Ordering::Relaxed),
            translation_fallbacks_total: self.translation_fallbacks_total.load(Ordering::Relaxed),
            speech_requests_total: self.speech_requests_total.load(Ordering::Relaxed),
            speech_failures_total: self.speech_failures_total.load(Ordering::Relaxed),
            resume_uploads_total: self.resume_uploads_total.load(Ordering::Relaxed),
            avg_chat_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,careermate_agents=info,careermate_translation=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
