// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background classifier retraining.
//!
//! [`RetrainScheduler`] owns one worker task that retrains the classifier
//! on a fixed interval and on demand. On-demand requests are queued with a
//! capacity of one: while a request is pending, further requests collapse
//! into it, and every request waits out a debounce period first so a burst
//! of help-topic edits produces a single training run.

use std::sync::Arc;
use std::time::Duration;

use deskflow_config::model::RetrainConfig;
use deskflow_core::{Classifier, DeskflowError, HelpTopicId, TrainingReport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::training::TrainingSource;

/// What happened to a retrain request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrainRequest {
    /// A new run was queued.
    Queued,
    /// A run was already pending; this request folds into it.
    Coalesced,
    /// The worker has stopped.
    Stopped,
    /// Retraining was never started.
    Disabled,
}

/// A change to the data the classifier is trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingEvent {
    HelpTopicCreated(HelpTopicId),
    HelpTopicUpdated(HelpTopicId),
    HelpTopicRemoved(HelpTopicId),
}

impl TrainingEvent {
    pub fn help_topic(&self) -> &HelpTopicId {
        match self {
            TrainingEvent::HelpTopicCreated(id)
            | TrainingEvent::HelpTopicUpdated(id)
            | TrainingEvent::HelpTopicRemoved(id) => id,
        }
    }
}

/// Cloneable request side of a [`RetrainScheduler`].
#[derive(Clone)]
pub struct RetrainHandle {
    tx: mpsc::Sender<()>,
}

impl RetrainHandle {
    /// Ask for a retraining run. Never blocks.
    pub fn request(&self) -> RetrainRequest {
        match self.tx.try_send(()) {
            Ok(()) => {
                debug!("retrain queued");
                RetrainRequest::Queued
            }
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("retrain already pending");
                RetrainRequest::Coalesced
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                warn!("retrain requested after the scheduler stopped");
                RetrainRequest::Stopped
            }
        }
    }

    /// Requests a run on behalf of `event`.
    pub fn notify(&self, event: &TrainingEvent) -> RetrainRequest {
        let outcome = self.request();
        info!(help_topic = %event.help_topic(), ?event, ?outcome, "training data changed");
        outcome
    }
}

/// Collect training data and send it to the classifier once.
pub async fn retrain_once(
    classifier: &dyn Classifier,
    source: &dyn TrainingSource,
) -> Result<TrainingReport, DeskflowError> {
    let examples = source.training_examples().await?;
    debug!(examples = examples.len(), "training data collected");
    classifier.train(&examples).await
}

/// Handle to the retraining worker.
pub struct RetrainScheduler {
    handle: RetrainHandle,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RetrainScheduler {
    /// Spawn the worker when `config.enabled` is set.
    pub fn from_config(
        classifier: Arc<dyn Classifier>,
        source: Arc<dyn TrainingSource>,
        config: &RetrainConfig,
        cancel: CancellationToken,
    ) -> Option<Self> {
        if !config.enabled {
            info!("classifier retraining disabled");
            return None;
        }
        Some(Self::spawn(classifier, source, config, cancel))
    }

    /// Spawn the worker on the current runtime.
    ///
    /// The worker stops when `cancel` is cancelled or [`shutdown`](Self::shutdown) is called.
    pub fn spawn(
        classifier: Arc<dyn Classifier>,
        source: Arc<dyn TrainingSource>,
        config: &RetrainConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let worker = Worker {
            classifier,
            source,
            interval: Duration::from_secs(config.interval_secs.max(1)),
            debounce: Duration::from_secs(config.debounce_secs),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(worker.run(rx));
        info!(
            interval_secs = config.interval_secs,
            debounce_secs = config.debounce_secs,
            "retrain scheduler started"
        );
        Self {
            handle: RetrainHandle { tx },
            cancel,
            task,
        }
    }

    pub fn handle(&self) -> RetrainHandle {
        self.handle.clone()
    }

    /// Ask for a retraining run. Never blocks.
    pub fn request(&self) -> RetrainRequest {
        self.handle.request()
    }

    /// Stop the worker and wait for it to exit. A run in progress is abandoned.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "retrain worker panicked");
        }
    }
}

struct Worker {
    classifier: Arc<dyn Classifier>,
    source: Arc<dyn TrainingSource>,
    interval: Duration,
    debounce: Duration,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self, mut rx: mpsc::Receiver<()>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("retrain worker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.retrain("scheduled").await;
                }
                request = rx.recv() => {
                    if request.is_none() {
                        break;
                    }
                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            info!("retrain worker shutting down");
                            break;
                        }
                        _ = tokio::time::sleep(self.debounce) => {}
                    }
                    while rx.try_recv().is_ok() {}
                    self.retrain("requested").await;
                    ticker.reset();
                }
            }
        }
    }

    async fn retrain(&self, trigger: &'static str) {
        let run = retrain_once(self.classifier.as_ref(), self.source.as_ref());
        tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(trigger, "retrain abandoned on shutdown");
            }
            result = run => match result {
                Ok(report) => info!(trigger, examples = report.examples, "retrain finished"),
                Err(e) => warn!(trigger, error = %e, "retrain failed (non-fatal)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use deskflow_core::{Classification, TrainingExample};

    struct CountingClassifier {
        trains: AtomicUsize,
        fail: bool,
    }

    impl CountingClassifier {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                trains: AtomicUsize::new(0),
                fail,
            })
        }

        fn trains(&self) -> usize {
            self.trains.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Classifier for CountingClassifier {
        async fn classify(&self, _text: &str) -> Result<Classification, DeskflowError> {
            Err(DeskflowError::Internal("not used".into()))
        }

        async fn train(
            &self,
            examples: &[TrainingExample],
        ) -> Result<TrainingReport, DeskflowError> {
            self.trains.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DeskflowError::Classifier {
                    message: "model busy".into(),
                    source: None,
                });
            }
            Ok(TrainingReport {
                message: "ok".into(),
                examples: examples.len(),
            })
        }
    }

    struct OneExample;

    #[async_trait]
    impl TrainingSource for OneExample {
        async fn training_examples(&self) -> Result<Vec<TrainingExample>, DeskflowError> {
            Ok(vec![TrainingExample {
                description: "printer jammed".into(),
                label: 3,
            }])
        }
    }

    fn config() -> RetrainConfig {
        RetrainConfig {
            enabled: true,
            interval_secs: 3600,
            debounce_secs: 30,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_requests_runs_once() {
        let classifier = CountingClassifier::new(false);
        let scheduler = RetrainScheduler::spawn(
            classifier.clone(),
            Arc::new(OneExample),
            &config(),
            CancellationToken::new(),
        );

        assert_eq!(scheduler.request(), RetrainRequest::Queued);
        for _ in 0..10 {
            scheduler.request();
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(classifier.trains(), 1);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn interval_triggers_periodic_runs() {
        let classifier = CountingClassifier::new(false);
        let scheduler = RetrainScheduler::spawn(
            classifier.clone(),
            Arc::new(OneExample),
            &config(),
            CancellationToken::new(),
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(classifier.trains(), 0);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(classifier.trains(), 1);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(classifier.trains(), 2);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_worker() {
        let classifier = CountingClassifier::new(true);
        let scheduler = RetrainScheduler::spawn(
            classifier.clone(),
            Arc::new(OneExample),
            &config(),
            CancellationToken::new(),
        );

        scheduler.request();
        tokio::time::sleep(Duration::from_secs(60)).await;
        scheduler.request();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(classifier.trains(), 2);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn events_through_a_handle_coalesce() {
        let classifier = CountingClassifier::new(false);
        let scheduler = RetrainScheduler::from_config(
            classifier.clone(),
            Arc::new(OneExample),
            &config(),
            CancellationToken::new(),
        )
        .unwrap();
        let handle = scheduler.handle();
        let topic = HelpTopicId::from("printers");

        assert_eq!(
            handle.notify(&TrainingEvent::HelpTopicCreated(topic.clone())),
            RetrainRequest::Queued
        );
        assert_eq!(
            handle.notify(&TrainingEvent::HelpTopicUpdated(topic.clone())),
            RetrainRequest::Coalesced
        );
        assert_eq!(scheduler.request(), RetrainRequest::Coalesced);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(classifier.trains(), 1);

        scheduler.shutdown().await;
        assert_eq!(
            handle.notify(&TrainingEvent::HelpTopicRemoved(topic)),
            RetrainRequest::Stopped
        );
    }

    #[tokio::test]
    async fn disabled_config_spawns_nothing() {
        let config = RetrainConfig {
            enabled: false,
            ..config()
        };
        let scheduler = RetrainScheduler::from_config(
            CountingClassifier::new(false),
            Arc::new(OneExample),
            &config,
            CancellationToken::new(),
        );
        assert!(scheduler.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_worker_reports_stopped() {
        let cancel = CancellationToken::new();
        let scheduler = RetrainScheduler::spawn(
            CountingClassifier::new(false),
            Arc::new(OneExample),
            &config(),
            cancel.clone(),
        );

        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(scheduler.request(), RetrainRequest::Stopped);
    }
}
