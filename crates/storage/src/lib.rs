use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{Context, Result};
use careermate_core::{Intent, Language};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::warn;

/// Records kept per log by [`MemoryStore`]; older ones are dropped first.
pub const MAX_RETAINED: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: Option<i64>,
    pub user_message: String,
    pub bot_response: String,
    pub language: Language,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    OpenaiTts,
    OpenaiTtsFailed,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenaiTts => "openai_tts",
            Self::OpenaiTtsFailed => "openai_tts_failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "openai_tts" => Some(Self::OpenaiTts),
            "openai_tts_failed" => Some(Self::OpenaiTtsFailed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInteraction {
    pub interaction_type: InteractionKind,
    pub language: Language,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

pub trait ChatLogRepository: Send + Sync {
    async fn record_chat(&self, record: &ChatRecord) -> Result<i64>;
    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>>;
    async fn record_voice_interaction(&self, interaction: &VoiceInteraction) -> Result<()>;
    async fn recent_voice_interactions(&self, limit: usize) -> Result<Vec<VoiceInteraction>>;
    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct MemoryStore {
    chats: Arc<RwLock<VecDeque<ChatRecord>>>,
    voice: Arc<RwLock<VecDeque<VoiceInteraction>>>,
    retention: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_retention(MAX_RETAINED)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            chats: Arc::new(RwLock::new(VecDeque::new())),
            voice: Arc::new(RwLock::new(VecDeque::new())),
            retention: retention.max(1),
        }
    }
}

fn push_bounded<T>(log: &mut VecDeque<T>, item: T, retention: usize) {
    while log.len() >= retention {
        log.pop_front();
    }
    log.push_back(item);
}

impl ChatLogRepository for MemoryStore {
    async fn record_chat(&self, record: &ChatRecord) -> Result<i64> {
        let mut chats = self.chats.write();
        // ids keep counting across evictions
        let id = chats.back().and_then(|last| last.id).unwrap_or(0) + 1;
        push_bounded(
            &mut *chats,
            ChatRecord {
                id: Some(id),
                ..record.clone()
            },
            self.retention,
        );
        Ok(id)
    }

    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        Ok(self.chats.read().iter().rev().take(limit).cloned().collect())
    }

    async fn record_voice_interaction(&self, interaction: &VoiceInteraction) -> Result<()> {
        let mut voice = self.voice.write();
        push_bounded(&mut *voice, interaction.clone(), self.retention);
        Ok(())
    }

    async fn recent_voice_interactions(&self, limit: usize) -> Result<Vec<VoiceInteraction>> {
        Ok(self.voice.read().iter().rev().take(limit).cloned().collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chats (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              user_message TEXT NOT NULL,
              bot_response TEXT NOT NULL,
              language TEXT DEFAULT 'en',
              intent TEXT,
              timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS voice_interactions (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              interaction_type TEXT NOT NULL,
              language TEXT NOT NULL,
              success BOOLEAN DEFAULT TRUE,
              timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_timestamp(table: &str, value: &str) -> Option<DateTime<Utc>> {
    match value.parse::<DateTime<Utc>>() {
        Ok(timestamp) => Some(timestamp),
        Err(error) => {
            warn!(table, value, error = %error, "skipping row with unreadable timestamp");
            None
        }
    }
}

impl ChatLogRepository for SqliteStore {
    async fn record_chat(&self, record: &ChatRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO chats (user_message, bot_response, language, intent, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.user_message)
        .bind(&record.bot_response)
        .bind(record.language.as_code())
        .bind(record.intent.as_str())
        .bind(record.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("failed inserting chat log")?;

        Ok(result.last_insert_rowid())
    }

    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_message, bot_response, language, intent, timestamp
            FROM chats
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .filter_map(|row| {
                let timestamp =
                    parse_timestamp("chats", row.get::<String, _>("timestamp").as_str())?;
                let language: Option<String> = row.get("language");
                let intent: Option<String> = row.get("intent");
                Some(ChatRecord {
                    id: Some(row.get("id")),
                    user_message: row.get("user_message"),
                    bot_response: row.get("bot_response"),
                    language: Language::from_optional_str(language.as_deref()),
                    intent: intent
                        .as_deref()
                        .and_then(Intent::parse)
                        .unwrap_or(Intent::Default),
                    timestamp,
                })
            })
            .collect();

        Ok(records)
    }

    async fn record_voice_interaction(&self, interaction: &VoiceInteraction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO voice_interactions (interaction_type, language, success, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(interaction.interaction_type.as_str())
        .bind(interaction.language.as_code())
        .bind(interaction.success)
        .bind(interaction.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("failed inserting voice interaction")?;

        Ok(())
    }

    async fn recent_voice_interactions(&self, limit: usize) -> Result<Vec<VoiceInteraction>> {
        let rows = sqlx::query(
            r#"
            SELECT interaction_type, language, success, timestamp
            FROM voice_interactions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let interactions = rows
            .into_iter()
            .filter_map(|row| {
                let kind = InteractionKind::parse(row.get::<String, _>("interaction_type").as_str())?;
                let timestamp = parse_timestamp(
                    "voice_interactions",
                    row.get::<String, _>("timestamp").as_str(),
                )?;
                Some(VoiceInteraction {
                    interaction_type: kind,
                    language: Language::from_optional_str(Some(
                        row.get::<String, _>("language").as_str(),
                    )),
                    success: row.get("success"),
                    timestamp,
                })
            })
            .collect();

        Ok(interactions)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Sqlite(_) => "sqlite",
        }
    }
}

impl ChatLogRepository for Store {
    async fn record_chat(&self, record: &ChatRecord) -> Result<i64> {
        match self {
            Store::Memory(store) => store.record_chat(record).await,
            Store::Sqlite(store) => store.record_chat(record).await,
        }
    }

    async fn recent_chats(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        match self {
            Store::Memory(store) => store.recent_chats(limit).await,
            Store::Sqlite(store) => store.recent_chats(limit).await,
        }
    }

    async fn record_voice_interaction(&self, interaction: &VoiceInteraction) -> Result<()> {
        match self {
            Store::Memory(store) => store.record_voice_interaction(interaction).await,
            Store::Sqlite(store) => store.record_voice_interaction(interaction).await,
        }
    }

    async fn recent_voice_interactions(&self, limit: usize) -> Result<Vec<VoiceInteraction>> {
        match self {
            Store::Memory(store) => store.recent_voice_interactions(limit).await,
            Store::Sqlite(store) => store.recent_voice_interactions(limit).await,
        }
    }

    async fn ping(&self) -> Result<()> {
        match self {
            Store::Memory(store) => store.ping().await,
            Store::Sqlite(store) => store.ping().await,
        }
    }
}
