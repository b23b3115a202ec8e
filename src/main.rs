use anyhow::{Context, Result};
use clap::Parser;
use interview_coach::ai::{AiQuestionSource, ChatCompletionsClient, InterviewAi, QuestionBank};
use interview_coach::config::QuestionSourceKind;
use interview_coach::{
    create_router, AppState, Config, FeedbackAggregator, InterviewCoach, NatsRecognizerFactory,
    QuestionSource,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "interview-coach", version, about = "Mock interview practice service")]
struct Cli {
    /// Config file, with or without the .toml extension
    #[arg(short, long, default_value = "config/interview-coach")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("Interview Coach v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let ai: Arc<dyn InterviewAi> = Arc::new(
        ChatCompletionsClient::new(cfg.ai.client_config()?)
            .context("Failed to build AI client")?,
    );
    info!("AI collaborator: {} at {}", cfg.ai.model, cfg.ai.base_url);

    let questions: Arc<dyn QuestionSource> = match cfg.questions.source {
        QuestionSourceKind::Ai => Arc::new(AiQuestionSource::new(Arc::clone(&ai))),
        QuestionSourceKind::Bank => {
            let bank = QuestionBank::default();
            info!("Using question bank for roles: {}", bank.roles().join(", "));
            Arc::new(bank)
        }
    };

    if cfg.capture.audio && cfg.capture.audio_file.is_none() {
        warn!("No audio file configured; microphone requests will be refused");
    }

    let capture = cfg.capture.capture_config();
    let coach = InterviewCoach::new(
        questions,
        FeedbackAggregator::new(ai),
        Arc::new(cfg.capture.file_devices()),
        Arc::new(NatsRecognizerFactory::new(cfg.capture.nats_url.clone())),
    )
    .with_drain_timeout(capture.drain_timeout);

    let app = create_router(AppState::new(coach, capture.devices));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
