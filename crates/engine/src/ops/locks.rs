//! Per-group exclusive locks.
//!
//! `finalize`, `reopen` and every ledger mutation of a group run while
//! holding that group's lock, so a finalize always sees a snapshot no
//! mutation is concurrently changing and two finalizes are strictly ordered.
//! Groups never share a lock and a lock is never taken twice in the same
//! call chain.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(super) struct GroupLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl GroupLocks {
    /// Wait for exclusive access to `group_id`.
    ///
    /// The registry mutex is only held while looking up the group entry, never
    /// across an await point.
    pub(super) async fn acquire(&self, group_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(group_id).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_group_is_exclusive() {
        let locks = Arc::new(GroupLocks::default());
        let guard = locks.acquire(1).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_groups_do_not_block() {
        let locks = GroupLocks::default();
        let _first = locks.acquire(1).await;
        tokio::time::timeout(Duration::from_secs(1), locks.acquire(2))
            .await
            .unwrap();
    }
}
