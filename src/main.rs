// Setlist agent service - main entry point

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epicset_agent::ai::OpenAiClient;
use epicset_agent::library_client::LibraryClient;
use epicset_agent::server::{create_router, AppState, LibraryEndpoint};
use epicset_agent::youtube::YoutubeClient;
use epicset_agent::SetlistAgent;

/// Command-line arguments for the agent service
#[derive(Parser, Debug)]
#[command(name = "epicset-agent")]
#[command(about = "Conversational setlist-generation agent")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "4000", env = "EPICSET_AGENT_PORT")]
    port: u16,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Override the chat model
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Base URL of the user-library endpoint (e.g. http://localhost:5000/songs)
    #[arg(long, env = "EPICSET_LIBRARY_URL")]
    library_url: Option<String>,

    /// Bearer token forwarded to the library endpoint
    #[arg(long, env = "EPICSET_LIBRARY_TOKEN", hide_env_values = true)]
    library_token: Option<String>,

    /// YouTube Data API key; enables per-track video links
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    /// When set, API requests must present this bearer token
    #[arg(long, env = "EPICSET_AGENT_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epicset_agent=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let model = match args.model.as_deref() {
        Some(model) => OpenAiClient::with_model(args.openai_api_key, model),
        None => OpenAiClient::new(args.openai_api_key),
    };

    let mut agent = SetlistAgent::new(Arc::new(model));
    if let Some(key) = args.youtube_api_key {
        info!("YouTube video lookup enabled");
        agent = agent.with_video_search(Arc::new(YoutubeClient::new(key)));
    }

    let library = args.library_url.map(|url| {
        info!(url = %url, "library fetch enabled");
        LibraryEndpoint {
            client: LibraryClient::new(url),
            auth_token: args.library_token,
        }
    });

    let state = Arc::new(AppState {
        agent,
        library,
        auth_token: args.auth_token,
    });

    let app = create_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("EpicSet agent running on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
