//! meteovoz HTTP Server
//!
//! Main entry point for the voice bulletin server.

use std::{sync::Arc, time::Duration};

use application::{BulletinCache, BulletinService};
use infrastructure::{
    AppConfig, ConfigValidator, RefreshScheduler, VoiceDocumentRenderer, WeatherAdapter,
    create_bulletin_refresh_task, init_telemetry,
};
use presentation_http::{routes, server, state::AppState};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first so the log filter and format apply from the start
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_telemetry(&config.telemetry)?;

    info!("🌦️ meteovoz v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }
    info!(
        host = %config.server.host,
        port = %config.server.port,
        provider = %config.weather.provider,
        timezone = %config.weather.timezone,
        "Configuration loaded"
    );

    let warnings = ConfigValidator::validate(&config);
    ConfigValidator::log_warnings(&warnings);
    if ConfigValidator::has_critical(&warnings) {
        anyhow::bail!("Refusing to start with invalid configuration");
    }

    // Bulletin pipeline
    let timezone = config.weather.timezone()?;
    let adapter = WeatherAdapter::from_config(&config)?;
    let service = BulletinService::new(Arc::new(adapter), config.bulletin.to_settings(timezone));
    let renderer = Arc::new(VoiceDocumentRenderer::new(config.bulletin.language.clone()));
    let cache = Arc::new(BulletinCache::new(
        service,
        renderer,
        config.bulletin.cache_ttl(),
    ));

    // Warm-up refresh so the first caller normally finds a fresh entry
    let warm_cache = Arc::clone(&cache);
    tokio::spawn(async move {
        match warm_cache.refresh().await {
            Ok(_) => info!("Warm-up refresh succeeded"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Warm-up refresh failed"),
        }
    });

    // Background refresh
    let scheduler = Arc::new(
        RefreshScheduler::new(
            &config.bulletin.refresh_cron,
            create_bulletin_refresh_task(Arc::clone(&cache)),
        )
        .await?,
    );
    scheduler.start().await?;

    let state =
        AppState::new(Arc::clone(&cache), Arc::new(config.clone())).with_scheduler(Arc::clone(&scheduler));
    let app = routes::create_router(state);

    // Start server
    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    info!("📞 Voice document: http://{}/voice", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    server::serve(listener, app, shutdown_signal(), shutdown_timeout).await?;

    if let Err(e) = scheduler.stop().await {
        error!(error = %e, "Failed to stop scheduler");
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
