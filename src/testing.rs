// Test doubles shared by the unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use reqwest::StatusCode;
use tokio::sync::Semaphore;

use crate::auth::MemoryStorage;
use crate::config::ClientConfig;
use crate::error::{TransportError, TransportErrorKind};
use crate::http_client::AuthClient;
use crate::navigation::Navigator;
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub(crate) const BASE: &str = "http://api.test";
pub(crate) const REFRESH: &str = "/auth/refresh";

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status(u16),
    Body(u16, &'static str),
    Fail(TransportErrorKind),
    Hang,
}

/// Transport answering from per-path reply queues. The last reply in a
/// queue repeats. Refresh calls can be held behind a gate.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<HttpRequest>>,
    refresh_gate: Option<Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Refresh calls wait for a permit on the returned semaphore
    pub(crate) fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Self {
            refresh_gate: Some(gate.clone()),
            ..Self::default()
        };
        (transport, gate)
    }

    pub(crate) fn reply(&self, path: &str, replies: impl IntoIterator<Item = Reply>) {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), replies.into_iter().collect());
    }

    pub(crate) fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        let url = format!("{}{}", BASE, path);
        self.calls.lock().unwrap().iter().filter(|r| r.url == url).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_reply(&self, path: &str) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>> {
        let path = request
            .url
            .strip_prefix(BASE)
            .unwrap_or(&request.url)
            .to_string();
        self.calls.lock().unwrap().push(request);

        let reply = self.next_reply(&path);
        let gate = if path == REFRESH {
            self.refresh_gate.clone()
        } else {
            None
        };

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.acquire().await.unwrap().forget();
            }
            match reply {
                Reply::Status(code) => Ok(HttpResponse::new(StatusCode::from_u16(code).unwrap(), "")),
                Reply::Body(code, body) => Ok(HttpResponse::new(StatusCode::from_u16(code).unwrap(), body)),
                Reply::Fail(kind) => Err(TransportError::new(kind, "scripted failure")),
                Reply::Hang => std::future::pending().await,
            }
        })
    }
}

/// Navigator that records every navigation
pub(crate) struct RecordingNavigator {
    path: Mutex<String>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn at(path: &str) -> Self {
        Self {
            path: Mutex::new(path.to_string()),
            visits: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn navigate(&self, location: &str) {
        self.visits.lock().unwrap().push(location.to_string());
        *self.path.lock().unwrap() = location.to_string();
    }
}

pub(crate) fn test_config() -> ClientConfig {
    ClientConfig {
        api_url: BASE.to_string(),
        refresh_timeout: None,
        ..ClientConfig::default()
    }
}

pub(crate) fn test_client(
    transport: Arc<ScriptedTransport>,
    navigator: Arc<RecordingNavigator>,
) -> AuthClient {
    AuthClient::new(
        &test_config(),
        transport,
        navigator,
        Arc::new(MemoryStorage::new()),
    )
}
