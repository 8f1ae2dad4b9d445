// Navigation capability
// Current route lookup and redirect side effect, injected into the client

use tokio::sync::watch;

/// Host navigation: where the user currently is, and how to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Path of the current page, e.g. `/login`
    fn current_path(&self) -> String;

    /// Leave the current page for `location` (a route path or absolute URL)
    fn navigate(&self, location: &str);
}

/// Route state for hosts without a real page location.
///
/// Every navigation is published on a watch channel so the embedding
/// application can react to redirects.
pub struct RouteState {
    tx: watch::Sender<String>,
}

impl RouteState {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(initial.into());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    /// Last location navigated to, as given (may be an absolute URL)
    pub fn location(&self) -> String {
        self.tx.borrow().clone()
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteState {
    fn current_path(&self) -> String {
        path_of(&self.tx.borrow())
    }

    fn navigate(&self, location: &str) {
        tracing::debug!(location = %location, "Navigating");
        self.tx.send_replace(location.to_string());
    }
}

/// Path component of a location; absolute URLs are reduced to their path
pub(crate) fn path_of(location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        if let Ok(url) = reqwest::Url::parse(location) {
            return url.path().to_string();
        }
    }

    match location.find(['?', '#']) {
        Some(idx) => location[..idx].to_string(),
        None => location.to_string(),
    }
}
