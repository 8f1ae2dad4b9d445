// Login redirect: guard + navigation

use std::sync::Arc;

use super::guard::RedirectGuard;
use crate::navigation::Navigator;

/// Decides when a request or refresh must be suppressed and performs the
/// one-time redirect to the login route.
pub struct LoginRedirect {
    guard: RedirectGuard,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl LoginRedirect {
    pub fn new(guard: RedirectGuard, navigator: Arc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self {
            guard,
            navigator,
            login_path: login_path.into(),
        }
    }

    pub fn guard(&self) -> &RedirectGuard {
        &self.guard
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn on_login_page(&self) -> bool {
        self.navigator.current_path() == self.login_path
    }

    /// A redirect is pending or the user is already on the login page
    pub fn is_suppressed(&self) -> bool {
        self.guard.is_set() || self.on_login_page()
    }

    /// Latch the guard without navigating. Returns true if this caller owns
    /// the redirect and must call [`LoginRedirect::navigate`].
    pub(crate) fn latch(&self) -> bool {
        if self.on_login_page() {
            return false;
        }
        self.guard.try_set()
    }

    pub(crate) fn navigate(&self) {
        self.navigator.navigate(&self.login_path);
    }

    /// Latch and redirect to the login page, at most once until the guard is
    /// cleared. Returns true if the redirect was performed.
    pub fn trigger(&self, reason: &str) -> bool {
        if !self.latch() {
            return false;
        }
        tracing::warn!(reason = %reason, login_path = %self.login_path, "Redirecting to login page");
        self.navigate();
        true
    }
}
