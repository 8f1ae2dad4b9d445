// Authentication module
// Redirect guard, single-flight token refresh and session helpers

mod guard;
mod redirect;
mod refresh;
mod session;
mod storage;
mod types;

pub use guard::{RedirectGuard, REDIRECT_KEY};
pub use redirect::LoginRedirect;
pub use refresh::RefreshCoordinator;
pub use session::AuthSession;
pub use storage::{MemoryStorage, SessionStorage};
pub use types::{AuthStatus, ErrorDetail};
