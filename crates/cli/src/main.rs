use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use careermate_agents::CareerAgent;
use careermate_core::{ChatInput, KeywordSet, Language};
use careermate_observability::{init_tracing, AppMetrics};
use careermate_speech::{Speech, DEFAULT_OPENAI_SPEECH_URL, DEFAULT_TTS_MODEL};
use careermate_storage::{ChatLogRepository, Store};
use careermate_translation::{
    chunk_for_translation, ChunkedTranslator, MyMemoryBackend, DEFAULT_ENDPOINT, MAX_CHUNK_CHARS,
};
use clap::{Parser, Subcommand};

type Agent = CareerAgent<MyMemoryBackend, Speech, Store>;

#[derive(Debug, Parser)]
#[command(name = "careermate")]
#[command(about = "CareerMate multilingual job assistant CLI")]
struct Cli {
    /// SQLite URL for chat logs; logs stay in memory when unset.
    #[arg(long, env = "CAREERMATE_DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "CAREERMATE_TRANSLATE_URL", default_value = DEFAULT_ENDPOINT)]
    translate_url: String,

    #[arg(long, env = "CAREERMATE_TRANSLATE_TIMEOUT_SECONDS", default_value_t = 15)]
    translate_timeout_seconds: u64,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, env = "CAREERMATE_TTS_MODEL", default_value = DEFAULT_TTS_MODEL)]
    tts_model: String,

    #[arg(long, env = "CAREERMATE_OPENAI_URL", default_value = DEFAULT_OPENAI_SPEECH_URL)]
    openai_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat; type `exit` or `quit` to leave.
    Chat {
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// One question, reply printed as JSON.
    Ask {
        message: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    Classify {
        message: String,
    },
    /// Show how a text would be split before translation.
    Chunks {
        text: String,
        #[arg(long, default_value_t = MAX_CHUNK_CHARS)]
        max_chars: usize,
    },
    /// Synthesize speech into an mp3 file.
    Speak {
        text: String,
        #[arg(long, default_value = "en")]
        language: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("careermate_cli");
    let cli = Cli::parse();

    let agent = build_agent(&cli).await?;

    match cli.command {
        Command::Chat { language } => run_chat(agent, &language).await?,
        Command::Ask { message, language } => {
            let reply = agent
                .handle_chat(ChatInput {
                    message,
                    language: Some(language),
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Classify { message } => {
            println!("{}", agent.classify(&message).as_str());
        }
        Command::Chunks { text, max_chars } => {
            let chunks = chunk_for_translation(&text, max_chars);
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        Command::Speak {
            text,
            language,
            out,
        } => {
            let language = Language::from_optional_str(Some(&language));
            let audio = agent.speak(&text, language).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&audio.file_name));
            tokio::fs::write(&path, &audio.bytes)
                .await
                .with_context(|| format!("failed writing audio to {}", path.display()))?;
            println!(
                "wrote {} bytes ({} voice) to {}",
                audio.bytes.len(),
                audio.voice,
                path.display()
            );
        }
        Command::History { limit } => {
            let chats = agent.store().recent_chats(limit).await?;
            println!("{}", serde_json::to_string_pretty(&chats)?);
        }
    }

    Ok(())
}

async fn run_chat(agent: Agent, language: &str) -> Result<()> {
    let language = Language::from_optional_str(Some(language));

    println!(
        "CareerMate chat mode ({}). type 'exit' to quit.",
        language.display_name()
    );

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let reply = agent
            .handle_chat(ChatInput {
                message: message.to_string(),
                language: Some(language.as_code().to_string()),
            })
            .await?;

        println!("\n{}\n", reply.response);

        if let Some(stats) = reply.translation.filter(|stats| stats.fallbacks > 0) {
            println!(
                "({} of {} parts could not be translated and are shown in English)\n",
                stats.fallbacks, stats.chunks
            );
        }

        println!("Try asking:");
        for suggestion in reply.suggestions {
            println!("- {suggestion}");
        }
        println!();
    }

    Ok(())
}

async fn build_agent(cli: &Cli) -> Result<Agent> {
    let metrics = AppMetrics::shared();

    let store = match cli.database_url.as_deref() {
        Some(database_url) => Store::sqlite(database_url).await?,
        None => Store::memory(),
    };

    let backend = MyMemoryBackend::new(
        &cli.translate_url,
        Duration::from_secs(cli.translate_timeout_seconds),
    )
    .with_context(|| format!("invalid translation endpoint {}", cli.translate_url))?;
    let speech = Speech::from_api_key(cli.openai_api_key.clone(), &cli.tts_model, &cli.openai_url)?;

    Ok(CareerAgent::new(
        Arc::new(KeywordSet::builtin()),
        ChunkedTranslator::new(backend),
        speech,
        Arc::new(store),
        metrics,
    ))
}
