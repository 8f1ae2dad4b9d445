// Session helpers: check, login, logout

use reqwest::Method;
use std::sync::Arc;

use super::types::{AuthStatus, ProtectedResponse};
use crate::error::Result;
use crate::http_client::AuthClient;
use crate::transport::{HttpRequest, RequestOptions};

/// Session-level operations on top of the authenticated client
pub struct AuthSession {
    client: Arc<AuthClient>,
}

impl AuthSession {
    pub fn new(client: Arc<AuthClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<AuthClient> {
        &self.client
    }

    /// Ask the backend whether the session cookie is still valid.
    ///
    /// The session check is an auth check, so it still reaches the network while a
    /// login redirect is pending. A successful check clears the redirect guard.
    pub async fn check_auth(&self) -> Result<AuthStatus> {
        let config = self.client.config();
        let response = self
            .client
            .request(&config.session_check_path, RequestOptions::get())
            .await?;

        if !response.is_success() {
            tracing::debug!(status = %response.status(), "Session check rejected");
            return Ok(AuthStatus::Unauthenticated);
        }

        let body: ProtectedResponse = if response.body.is_empty() {
            ProtectedResponse::default()
        } else {
            response.json()?
        };

        self.client.clear_redirect_flag();
        tracing::info!("✅ Session is authenticated");

        Ok(AuthStatus::Authenticated { user: body.user })
    }

    /// Backend URL that starts the login flow
    pub fn login_url(&self) -> String {
        let config = self.client.config();
        config.url(&config.login_endpoint)
    }

    pub fn begin_login(&self) {
        let url = self.login_url();
        tracing::info!(url = %url, "Starting login");
        self.client.navigator().navigate(&url);
    }

    /// End the session on the backend and return to the login route.
    ///
    /// Sent straight on the transport: an expired session must not trigger a
    /// refresh just to log out.
    pub async fn logout(&self) -> Result<()> {
        let config = self.client.config();
        let request = HttpRequest::new(Method::DELETE, config.url(&config.logout_path));
        let result = self.client.transport().send(request).await;

        self.client.navigator().navigate(&config.login_path);

        let response = result?;
        tracing::info!(status = %response.status(), "Logged out");
        Ok(())
    }
}
