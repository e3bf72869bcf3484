//! Per-user forecast generation locks
//!
//! The deactivate-then-insert sequence in forecast persistence assumes a
//! single writer per user. A scheduled run racing a manual "sync now"
//! could otherwise leave zero or two active forecasts. Callers take the
//! user's handle for the duration of a run to serialize writers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Single-flight locks keyed by user id. Cheap to clone and share.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock handle for a user, creating it on first use.
    ///
    /// The returned Arc is locked by the caller; handles are never removed,
    /// which is fine for the expected user counts.
    pub fn handle(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(user_id).or_default().clone()
    }
}

/// Lock a handle, recovering from poisoning (a panicked holder leaves the
/// guarded sequence unfinished but the lock itself still serializes).
pub(crate) fn lock_recovering(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
    handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_user_gets_same_handle() {
        let locks = UserLocks::new();
        let a = locks.handle(1);
        let b = locks.handle(1);
        assert!(Arc::ptr_eq(&a, &b));

        let other = locks.handle(2);
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_serializes_critical_sections() {
        let locks = UserLocks::new();
        let counter = Arc::new(Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(thread::spawn(move || {
                let handle = locks.handle(7);
                let _guard = lock_recovering(&handle);
                let mut count = counter.lock().unwrap();
                *count += 1;
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(*counter.lock().unwrap(), 8);
    }
}
