use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bizhub_core::qa::{CommandTestRunner, ExecutionTracker};
use bizhub_db::Stores;
use bizhub_integrations::{
    EmailConfig, HttpShippingProvider, MailTransport, ScheduledEmailDispatcher, ShippingConfig,
    SmtpMailer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bizhub_api::config::ServerConfig;
use bizhub_api::router::build_app_router;
use bizhub_api::services::message;
use bizhub_api::state::{AppState, Services};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bizhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = bizhub_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            bizhub_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            bizhub_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");
            Some(pool)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores; data is lost on exit");
            None
        }
    };
    let stores = match &pool {
        Some(pool) => Stores::postgres(pool.clone()),
        None => Stores::in_memory(),
    };

    // --- Outbound integrations ---
    let mailer: Option<Arc<dyn MailTransport>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer = SmtpMailer::new(email_config).expect("Invalid SMTP configuration");
            tracing::info!("SMTP delivery enabled");
            Some(Arc::new(mailer))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, message emails will be logged and dropped");
            None
        }
    };
    let email = ScheduledEmailDispatcher::new(mailer);

    let shipping_config = ShippingConfig::from_env();
    if shipping_config.is_none() {
        tracing::warn!("SHIPPING_API_URL not set, pickup registration will be rejected");
    }
    let shipping =
        HttpShippingProvider::new(shipping_config).expect("Failed to build shipping client");

    // --- QA test runner ---
    let qa_runner = CommandTestRunner::from_command_line(
        &config.qa.test_command,
        config.qa.working_directory.clone(),
        config.qa.timeout,
    )
    .expect("QA_TEST_COMMAND must not be empty");

    // --- App state ---
    let state = AppState {
        services: Services {
            stores,
            email: Arc::new(email.clone()),
            shipping: Arc::new(shipping),
        },
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        qa_tracker: ExecutionTracker::with_retention(chrono::Duration::minutes(
            config.qa.retention_minutes,
        )),
        qa_runner: Arc::new(qa_runner),
    };

    // --- Re-arm scheduled emails lost with the previous process ---
    match message::reschedule_pending(&state.services).await {
        Ok(0) => {}
        Ok(count) => tracing::info!(count, "Re-armed scheduled message emails"),
        Err(e) => tracing::error!(error = %e, "Failed to re-arm scheduled message emails"),
    }

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    // In-flight requests get `drain` to finish once the signal arrives.
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(drain_secs = drain.as_secs(), "Drain timeout reached, forcing shutdown");
        }
    }

    // --- Post-shutdown cleanup ---
    let pending = email.pending_batches().await;
    if pending > 0 {
        tracing::warn!(pending, "Scheduled message emails dropped at shutdown");
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
