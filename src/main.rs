//! Countdown Timer - A countdown timer service with scrolling duration pickers
//!
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    display::Labels,
    state::{AppState, SelectionPickers},
    api::create_router,
    tasks::spawn_countdown,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, initial_offset={}",
          config.host, config.port, config.tick_ms, config.initial_offset);

    // The countdown task owns all timer state; everything else talks to it through the handle
    let engine = spawn_countdown(config.tick_interval());

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        engine,
        SelectionPickers::new(config.initial_offset),
        Labels::default(),
    ));

    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /picker                - Show the duration pickers");
    info!("  POST /picker/:field/settle  - Settle a picker after scrolling");
    info!("  POST /picker/:field/select  - Set a picker value directly");
    info!("  POST /timer/start           - Start a countdown");
    info!("  POST /timer/pause|resume    - Pause or resume the countdown");
    info!("  POST /timer/toggle          - Toggle pause/resume");
    info!("  POST /timer/stop            - Stop and return to the pickers");
    info!("  GET  /timer                 - Show the countdown");
    info!("  GET  /status                - Check current status");
    info!("  GET  /health                - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
