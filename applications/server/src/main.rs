/// Mixtape Server - share cassette-style playlists
use clap::{Parser, Subcommand};
use mixtape_core::MixtapeStorage;
use mixtape_server::{
    config::ServerConfig,
    create_router,
    services::{GoogleIdentityProvider, LoginRedirects, RecordingStorage, SearchProxy, SessionService},
    state::AppState,
};
use mixtape_storage::LocalStorageContext;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mixtape-server")]
#[command(about = "Mixtape sharing server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "MIXTAPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// List all users
    ListUsers,
    /// List stored mixtapes
    ListPlaylists {
        /// Only public mixtapes
        #[arg(long)]
        public: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::ListPlaylists { public } => list_playlists(&config, public).await?,
    }

    Ok(())
}

async fn open_storage(config: &ServerConfig) -> anyhow::Result<LocalStorageContext> {
    ensure_database_dir(&config.storage.database_url)?;
    let pool = mixtape_storage::connect(&config.storage.database_url).await?;
    Ok(LocalStorageContext::new(pool))
}

/// SQLite creates the database file but not its directory
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .map(|rest| rest.split('?').next().unwrap_or(rest));

    if let Some(parent) = path
        .filter(|p| !p.is_empty() && *p != ":memory:")
        .and_then(|p| Path::new(p).parent())
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Mixtape Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = Arc::new(open_storage(&config).await?);
    tracing::info!("Database connected");

    let recordings = RecordingStorage::new(
        config.storage.audio_path.clone(),
        config.storage.sound_path.clone(),
    );
    recordings.initialize().await?;
    tracing::info!("Recording storage initialized");

    let sessions = SessionService::new(
        config.auth.session_secret.clone(),
        config.auth.session_expiration_hours,
        config.auth.secure_cookies,
    );
    let identity = GoogleIdentityProvider::new(&config.auth)?;
    let login = LoginRedirects {
        success: config.auth.success_redirect.clone(),
        failure: config.auth.failure_redirect.clone(),
    };
    tracing::info!("Auth services initialized");

    let app_state = AppState::new(
        db,
        Arc::new(sessions),
        Arc::new(identity),
        Arc::new(recordings),
        Arc::new(SearchProxy::new(&config.search)),
        Arc::new(login),
        config.server.web_dir.clone(),
    );

    let app = create_router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;
    let users = storage.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.display_name, user.external_id);
    }

    Ok(())
}

async fn list_playlists(config: &ServerConfig, public_only: bool) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;

    let playlists = if public_only {
        storage.list_public_playlists().await?
    } else {
        storage.list_all_playlists().await?
    };

    println!("Mixtapes:");
    for playlist in playlists {
        println!(
            "  {} - {:?} by {} ({} views, {})",
            playlist.id,
            playlist.tape_label,
            playlist.user_id,
            playlist.views,
            if playlist.is_public { "public" } else { "private" }
        );
    }

    Ok(())
}
