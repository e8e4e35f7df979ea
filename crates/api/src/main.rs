use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use marquee_api::config::{BootstrapAdmin, ServerConfig};
use marquee_api::notifications::email::{EmailConfig, LogMailer, Mailer, SmtpMailer};
use marquee_api::router::build_app_router;
use marquee_api::state::AppState;
use marquee_db::repositories::UserRepo;
use marquee_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "marquee_api=debug,tower_http=debug";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify and migrate. Any failure here aborts startup.
async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = marquee_db::create_pool(&url)
        .await
        .expect("Could not open the database pool");

    marquee_db::health_check(&pool)
        .await
        .expect("Database is not answering");
    marquee_db::run_migrations(&pool)
        .await
        .expect("Migrations failed");
    tracing::info!("Database ready");

    pool
}

async fn ensure_bootstrap_admin(pool: &DbPool, admin: &BootstrapAdmin) {
    let user = UserRepo::ensure_superuser(pool, &admin.username, &admin.email)
        .await
        .expect("Could not create the bootstrap admin");
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin present");
}

/// SMTP when configured, otherwise codes go to the log.
fn select_mailer() -> Arc<dyn Mailer> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::warn!("SMTP_HOST is not set; confirmation emails will only be logged");
        return Arc::new(LogMailer);
    };
    tracing::info!(smtp_host = %email_config.smtp_host, "Sending mail over SMTP");
    Arc::new(SmtpMailer::new(&email_config).expect("SMTP settings are invalid"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = prepare_database().await;
    if let Some(admin) = BootstrapAdmin::from_env() {
        ensure_bootstrap_admin(&pool, &admin).await;
    }

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not an IP address"),
        config.port,
    );
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: select_mailer(),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind the listen address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server terminated with an error");

    tracing::info!("Stopped");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("Cannot listen for SIGTERM");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("SIGINT received, draining"),
            _ = sigterm.recv() => tracing::info!("SIGTERM received, draining"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Ctrl-C received, draining");
    }
}
