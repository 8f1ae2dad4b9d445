// Link-in-bio client - library root

pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod navigation;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthSession, AuthStatus, MemoryStorage, SessionStorage};
pub use config::ClientConfig;
pub use error::{ClientError, TransportError};
pub use http_client::AuthClient;
pub use navigation::{Navigator, RouteState};
pub use transport::{FormData, HttpRequest, HttpResponse, RequestOptions, ReqwestTransport, Transport};
