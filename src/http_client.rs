use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{LoginRedirect, RedirectGuard, RefreshCoordinator, SessionStorage};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::navigation::Navigator;
use crate::transport::{FormData, HttpRequest, HttpResponse, RequestOptions, Transport};

/// HTTP client that rides on the session cookie and recovers from expired
/// sessions.
///
/// Only 401 is intercepted:
/// - the token is refreshed once (shared with every concurrent 401) and the
///   request replayed once
/// - when recovery is impossible the user is sent to the login route, and
///   every later ordinary request short-circuits until the guard is cleared
pub struct AuthClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    redirect: Arc<LoginRedirect>,
    refresh: RefreshCoordinator,
}

impl AuthClient {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let guard = RedirectGuard::new(storage);
        let redirect = Arc::new(LoginRedirect::new(guard, navigator, config.login_path.clone()));
        let refresh = RefreshCoordinator::new(
            transport.clone(),
            config.url(&config.refresh_path),
            redirect.clone(),
            config.refresh_timeout,
        );

        Self {
            config: config.clone(),
            transport,
            redirect,
            refresh,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        self.redirect.navigator()
    }

    pub fn redirect_guard(&self) -> &RedirectGuard {
        self.redirect.guard()
    }

    pub fn is_redirecting(&self) -> bool {
        self.redirect.guard().is_set()
    }

    /// Called once a fresh session is established (e.g. by the login page)
    pub fn clear_redirect_flag(&self) {
        self.redirect.guard().clear();
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    pub async fn ensure_fresh_token(&self) -> bool {
        self.refresh.ensure_fresh_token().await
    }

    /// Auth checks hit the session endpoint and are never short-circuited
    pub fn is_auth_check(&self, endpoint: &str) -> bool {
        endpoint.contains(self.config.auth_check_marker.as_str())
    }

    /// Absolute URLs pass through; anything else is joined onto the API URL
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            self.config.url(endpoint)
        }
    }

    fn prepare(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        // Multipart bodies get their boundary header from the transport
        if !body.is_form() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        HttpRequest {
            method,
            url: self.resolve_url(endpoint),
            headers,
            body,
        }
    }

    /// Send a request, transparently refreshing an expired session once.
    ///
    /// Returns the response for any HTTP status. Transport failures are
    /// returned as errors and never retried.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<HttpResponse> {
        let request_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

        if !self.is_auth_check(endpoint) && self.redirect.is_suppressed() {
            tracing::debug!(
                request_id = %request_id,
                endpoint = %endpoint,
                "Login redirect pending, short-circuiting request"
            );
            return Ok(HttpResponse::unauthorized());
        }

        let request = self.prepare(endpoint, options);
        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            url = %request.url,
            "Sending HTTP request"
        );

        let response = self.transport.send(request.clone()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        tracing::debug!(request_id = %request_id, "Received 401, refreshing token");
        if !self.refresh.ensure_fresh_token().await || self.redirect.guard().is_set() {
            return Ok(response);
        }

        tracing::debug!(request_id = %request_id, url = %request.url, "Replaying request after refresh");
        let replay = self.transport.send(request).await?;

        if replay.is_unauthorized() {
            self.redirect.trigger("request still unauthorized after token refresh");
        }

        Ok(replay)
    }

    pub async fn get(&self, endpoint: &str) -> Result<HttpResponse> {
        self.request(endpoint, RequestOptions::get()).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<HttpResponse> {
        self.request(endpoint, RequestOptions::delete()).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<HttpResponse> {
        self.request(endpoint, RequestOptions::post().json(body)?).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<HttpResponse> {
        self.request(endpoint, RequestOptions::put().json(body)?).await
    }

    pub async fn post_form(&self, endpoint: &str, form: FormData) -> Result<HttpResponse> {
        self.request(endpoint, RequestOptions::post().form(form)).await
    }

    /// GET and decode a JSON body; non-success statuses become errors
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get(endpoint).await?;
        if !response.is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                message: crate::auth::ErrorDetail::from_body(
                    &response.body,
                    response.status().canonical_reason().unwrap_or("Request failed"),
                ),
            });
        }
        Ok(response.json()?)
    }
}
