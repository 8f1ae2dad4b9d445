use anyhow::Result;
use std::sync::Arc;

use linkbio_client::{
    auth::{AuthSession, AuthStatus, MemoryStorage},
    config,
    http_client::AuthClient,
    navigation::{Navigator, RouteState},
    transport::ReqwestTransport,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("🚀 Link-in-bio client starting...");
    tracing::info!("Backend: {}", config.client.api_url);

    let transport = Arc::new(ReqwestTransport::new(
        config.http_max_connections,
        config.http_connect_timeout,
        config.http_request_timeout,
    )?);
    let routes = Arc::new(RouteState::new(config.start_route.clone()));
    let client = Arc::new(AuthClient::new(
        &config.client,
        transport,
        routes.clone(),
        Arc::new(MemoryStorage::new()),
    ));
    let session = AuthSession::new(client.clone());

    // Check the session before touching anything else
    match session.check_auth().await {
        Ok(AuthStatus::Authenticated { user }) => {
            tracing::info!("✅ Authenticated");
            if let Some(user) = user {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
        }
        Ok(AuthStatus::Unauthenticated) => {
            tracing::warn!("Not authenticated, log in at {}", session.login_url());
        }
        Err(e) => {
            tracing::error!("❌ Session check failed: {}", e);
            anyhow::bail!("Unable to reach backend at {}", config.client.api_url);
        }
    }

    if let Some(endpoint) = config.endpoint.as_deref() {
        let response = client.get(endpoint).await?;
        println!("{} {}", response.status(), endpoint);
        println!("{}", response.text());
    }

    if client.is_redirecting() {
        tracing::warn!(
            "Session ended, redirected to {}",
            routes.current_path()
        );
    }

    Ok(())
}
