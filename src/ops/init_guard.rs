use std::sync::Mutex;

/// One-time latch: the registration it guards runs once per background,
/// however many pages ask for it.
#[derive(Debug, Default)]
pub struct InitGuard {
    initialized: Mutex<bool>,
}

impl InitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.lock().map(|g| *g).unwrap_or(true)
    }

    /// Run `register` if nothing has been registered yet.
    ///
    /// Returns `Ok(true)` when `register` ran and succeeded, `Ok(false)` when
    /// the latch was already set. Concurrent callers wait for the first one;
    /// a failed `register` leaves the latch unset so a later call can retry.
    pub fn ensure_initialized<E, F>(&self, register: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        // A poisoned latch means a registration panicked midway; keep the
        // stored value rather than registering twice.
        let mut initialized = match self.initialized.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *initialized {
            return Ok(false);
        }
        register()?;
        *initialized = true;
        Ok(true)
    }
}
