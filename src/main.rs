//! Countdown Wheel - a single countdown timer with digit-wheel controls
//! 
//! This is the main entry point for the countdown-wheel server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_wheel::{
    config::Config,
    state::{AppState, CountdownController},
    api::create_router,
    tasks::finish_notifier_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_wheel={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-wheel server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, edits_while_running={}",
          config.host, config.port, config.tick_ms, config.allow_edits_while_running);

    let controller = Arc::new(CountdownController::new(
        config.tick_period(),
        config.edit_policy(),
    ));

    // Surface the one-shot finished notification on the terminal
    tokio::spawn(finish_notifier_task(Arc::clone(&controller), |message| {
        println!("\x07{}", message);
    }));

    let state = Arc::new(AppState::new(config.port, config.host.clone(), controller));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;
    
    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /clock/:field      - Set hours, minutes or seconds");
    info!("  POST /clock/:field/up   - Scroll a wheel up");
    info!("  POST /clock/:field/down - Scroll a wheel down");
    info!("  POST /start             - Start or resume the countdown");
    info!("  POST /pause             - Pause the countdown");
    info!("  POST /stop              - Cancel and reset the countdown");
    info!("  GET  /status            - Current clock and status");
    info!("  GET  /events            - Server-sent state updates");
    info!("  GET  /health            - Health check");

    let server = axum::serve(listener, app);
    
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
