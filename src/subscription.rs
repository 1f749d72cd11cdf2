//! Scoped collection observation.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Delivery state shared between a subscription handle and its listener.
#[derive(Debug, Default)]
pub(crate) struct Delivery {
    pub(crate) active: bool,
    pub(crate) last_revision: Option<u64>,
}

impl Delivery {
    pub(crate) fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Delivery {
            active: true,
            last_revision: None,
        }))
    }
}

/// An active observation of the exercise collection.
///
/// Released by `unsubscribe` or by dropping the handle. Once release
/// returns, the listener will not run again.
#[must_use = "dropping a Subscription ends it immediately"]
pub struct Subscription {
    delivery: Arc<Mutex<Delivery>>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(delivery: Arc<Mutex<Delivery>>, release: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            delivery,
            release: Some(release),
        }
    }

    /// End the observation.
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        self.delivery
            .lock()
            .map(|delivery| delivery.active)
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Waits out any delivery in progress.
        match self.delivery.lock() {
            Ok(mut delivery) => delivery.active = false,
            Err(poisoned) => poisoned.into_inner().active = false,
        }
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
