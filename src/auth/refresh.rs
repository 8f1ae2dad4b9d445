// Token refresh logic
// Single-flight coordinator: at most one refresh call is outstanding at a time

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Method;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::redirect::LoginRedirect;
use super::types::ErrorDetail;
use crate::error::RefreshError;
use crate::transport::{HttpRequest, Transport};

type PendingRefresh = Shared<BoxFuture<'static, bool>>;

/// Shares one in-flight refresh between every caller that needs it.
///
/// The slot is cleared as soon as the refresh settles, so a later 401 starts
/// a fresh cycle. On failure the redirect guard is latched inside the same
/// critical section that clears the slot.
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    refresh_url: String,
    redirect: Arc<LoginRedirect>,
    timeout: Option<Duration>,
    in_flight: Mutex<Option<PendingRefresh>>,
}

impl RefreshCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        refresh_url: impl Into<String>,
        redirect: Arc<LoginRedirect>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                refresh_url: refresh_url.into(),
                redirect,
                timeout,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Make sure the session token is fresh.
    ///
    /// Joins the refresh already in flight if there is one. Returns false
    /// without a network call while a redirect is pending or on the login page.
    pub async fn ensure_fresh_token(&self) -> bool {
        let pending = {
            let mut slot = self.inner.slot();
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("Token refresh already in flight, joining it");
                    pending.clone()
                }
                None => {
                    if self.inner.redirect.is_suppressed() {
                        tracing::debug!("Skipping token refresh: login redirect pending or on login page");
                        return false;
                    }
                    let pending = Inner::spawn(self.inner.clone());
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.slot().is_some()
    }
}

impl Inner {
    fn slot(&self) -> MutexGuard<'_, Option<PendingRefresh>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the refresh as its own task so it settles even if every caller
    /// awaiting it is dropped.
    fn spawn(inner: Arc<Self>) -> PendingRefresh {
        let owner = Arc::downgrade(&inner);
        let handle = tokio::spawn(Self::run(inner));
        handle
            .map(move |joined| match joined {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    tracing::error!("❌ Token refresh task failed: {}", e);
                    if let Some(inner) = owner.upgrade() {
                        inner.slot().take();
                    }
                    false
                }
            })
            .boxed()
            .shared()
    }

    async fn run(self: Arc<Self>) -> bool {
        tracing::info!("🔄 Attempting to refresh token...");

        let result = self.send_refresh().await;

        let (refreshed, redirect) = {
            let mut slot = self.slot();
            let outcome = match &result {
                Ok(()) => (true, false),
                Err(_) => (false, self.redirect.latch()),
            };
            *slot = None;
            outcome
        };

        match result {
            Ok(()) => tracing::info!("✅ Token refresh successful"),
            Err(e) => tracing::error!("❌ {}", e),
        }

        if redirect {
            tracing::warn!(
                login_path = %self.redirect.login_path(),
                "Redirecting to login page after failed token refresh"
            );
            self.redirect.navigate();
        }

        refreshed
    }

    async fn send_refresh(&self) -> Result<(), RefreshError> {
        let request = HttpRequest::new(Method::POST, self.refresh_url.clone());
        let call = self.transport.send(request);

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| RefreshError::TimedOut(limit))??,
            None => call.await?,
        };

        if response.is_success() {
            return Ok(());
        }

        Err(RefreshError::Rejected {
            status: response.status().as_u16(),
            detail: ErrorDetail::from_body(&response.body, "Token refresh failed"),
        })
    }
}
