// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detached side effects (notifications, rating recalculation).
//!
//! An effect is spawned onto a [`TaskTracker`] and never awaited by the
//! operation that triggered it. The only way an effect can report failure
//! is its `Result`, which is logged here and goes nowhere else.

use std::future::Future;
use std::sync::Arc;

use deskflow_core::DeskflowError;
use tokio::sync::Mutex;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct SideEffects {
    tracker: TaskTracker,
    /// Held across close/wait/reopen so one drain cannot reopen the
    /// tracker under another.
    draining: Arc<Mutex<()>>,
}

impl SideEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `effect` in the background. Must be called within a Tokio runtime.
    pub fn spawn<F>(&self, name: &'static str, effect: F)
    where
        F: Future<Output = Result<(), DeskflowError>> + Send + 'static,
    {
        self.tracker.spawn(async move {
            match effect.await {
                Ok(()) => debug!(effect = name, "side effect completed"),
                Err(e) => warn!(effect = name, error = %e, "side effect failed (non-fatal)"),
            }
        });
    }

    /// Number of effects still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every effect spawned so far has finished.
    /// New effects may be spawned again afterwards. Concurrent drains
    /// run one after another.
    pub async fn drain(&self) {
        let _guard = self.draining.lock().await;
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn drain_waits_for_spawned_effects() {
        let effects = SideEffects::new();
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let done = done.clone();
            effects.spawn("count", async move {
                tokio::task::yield_now().await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        effects.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(effects.pending(), 0);
    }

    #[tokio::test]
    async fn failing_effect_is_contained() {
        let effects = SideEffects::new();
        effects.spawn("broken", async {
            Err(DeskflowError::Internal("smtp down".into()))
        });
        effects.drain().await;

        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        effects.spawn("after", async move {
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        effects.drain().await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_drains_all_return() {
        let effects = SideEffects::new();
        for _ in 0..2 {
            effects.spawn("slow", async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(())
            });
        }

        let drains = futures::future::join_all((0..4).map(|_| {
            let effects = effects.clone();
            async move { effects.drain().await }
        }));
        tokio::time::timeout(Duration::from_secs(5), drains)
            .await
            .expect("every drain returns");
        assert_eq!(effects.pending(), 0);

        effects.spawn("after", async { Ok(()) });
        effects.drain().await;
        assert_eq!(effects.pending(), 0);
    }
}
