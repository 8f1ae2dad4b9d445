// Redirect guard
// Latched flag that stops retries and repeated redirects once login is required

use std::sync::{Arc, Mutex, PoisonError};

use super::storage::SessionStorage;

/// Session storage key holding the flag
pub const REDIRECT_KEY: &str = "auth_redirecting";

pub struct RedirectGuard {
    storage: Arc<dyn SessionStorage>,
    /// Serializes check-then-set so exactly one caller wins the latch
    latch: Mutex<()>,
}

impl RedirectGuard {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            latch: Mutex::new(()),
        }
    }

    pub fn is_set(&self) -> bool {
        self.storage.get_item(REDIRECT_KEY).as_deref() == Some("true")
    }

    pub fn set(&self) {
        let _latch = self.latch.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.set_item(REDIRECT_KEY, "true");
    }

    pub fn clear(&self) {
        let _latch = self.latch.lock().unwrap_or_else(PoisonError::into_inner);
        self.storage.remove_item(REDIRECT_KEY);
    }

    /// Set the flag if it is not already set. Returns true only for the
    /// caller that flipped it.
    pub fn try_set(&self) -> bool {
        let _latch = self.latch.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_set() {
            return false;
        }
        self.storage.set_item(REDIRECT_KEY, "true");
        true
    }
}
