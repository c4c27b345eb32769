use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(super) fn state_read<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                target: "quire::client::store",
                store,
                op,
                lock_kind = "rwlock.read",
                result = "poisoned_recovered",
                "Recovered from poisoned store lock"
            );
            poisoned.into_inner()
        }
    }
}

pub(super) fn state_write<'a, T>(
    lock: &'a RwLock<T>,
    store: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                target: "quire::client::store",
                store,
                op,
                lock_kind = "rwlock.write",
                result = "poisoned_recovered",
                "Recovered from poisoned store lock"
            );
            poisoned.into_inner()
        }
    }
}
