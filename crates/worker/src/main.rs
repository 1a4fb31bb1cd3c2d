use std::sync::Arc;
use std::time::Duration;

use galaxy_engine::{EngineConfig, TickEngine};
use galaxy_events::{EventBus, PushDelivery, PushFanout};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "galaxy_worker=debug,galaxy_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env().expect("Invalid engine configuration");
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    // --- Database ---
    let pool = galaxy_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    galaxy_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database connection established");

    galaxy_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event services ---
    let event_bus = Arc::new(EventBus::default());
    let cancel = CancellationToken::new();

    let push_handle = match std::env::var("PUSH_WEBHOOK_URL").ok().filter(|u| !u.is_empty()) {
        Some(url) => match PushDelivery::new(url) {
            Ok(delivery) => Some(tokio::spawn(PushFanout::run(
                delivery,
                event_bus.subscribe(),
                cancel.clone(),
            ))),
            Err(e) => {
                tracing::error!(error = %e, "Push fan-out disabled: client setup failed");
                None
            }
        },
        None => {
            tracing::info!("PUSH_WEBHOOK_URL not set, push fan-out disabled");
            None
        }
    };

    // --- Shutdown ---
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });

    // --- Tick loop ---
    let tick_interval = config.tick_interval;
    let engine = TickEngine::new(pool, config).with_event_bus(Arc::clone(&event_bus));
    tracing::info!(
        tick_interval_secs = tick_interval.as_secs(),
        "Tick worker started"
    );

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Tick worker stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = engine.run_tick().await {
                    tracing::error!(error = %e, "Tick failed, will retry on the next interval");
                }
            }
        }
    }

    if let Some(handle) = push_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Push fan-out stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
