//! Per-device worker lifecycle.
//!
//! [`WorkerManager`] owns one background task per active device. A worker
//! loops: sleep a random interval, pick a user and an event for its device
//! category, build a payload and record the transaction. Failures to record
//! are logged and the loop continues.
//!
//! # Registry
//!
//! The registry sits behind a single async mutex and tracks two sets:
//! running workers, and workers that have been told to stop but whose tasks
//! have not finished. The lock is held only for the check-then-act step and
//! never across the wait for a stopping worker, so status queries and
//! lifecycle calls for other devices are not blocked by a slow stop. A
//! device counts as active until its task is gone; `start` for a device that
//! is still stopping returns `false`. Worker tasks never touch the registry.
//!
//! # Stopping
//!
//! A worker is stopped by cancelling its token. The worker observes the
//! token only while sleeping; an emission already in progress is allowed to
//! finish, so a transaction is either fully recorded or not at all. If the
//! worker does not finish within [`WorkerConfig::stop_timeout`] the task is
//! aborted. Either way, once `stop` returns the worker will record nothing
//! further.
//!
//! The wait runs in its own task, so a caller that gives up on `stop` still
//! leaves the registry consistent. Dropping the last manager clone cancels
//! every worker it still holds.

use crate::config::WorkerConfig;
use crate::emitter::TransactionEmitter;
use crate::payload::{EventContentProducer, SyntheticPayloadProducer};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use elid_core::DeviceCategory;
use elid_core::constants::SAMPLE_USERNAMES;
use elid_core::event_labels_for;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Registry entry of a running worker.
///
/// Dropping the handle cancels the worker.
#[derive(Debug)]
struct WorkerHandle {
    device_name: String,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Cancel the worker and wait for it to finish, aborting after `timeout`.
    async fn shutdown(mut self, device_id: Uuid, timeout: Duration) -> TaskTermination {
        self.cancel.cancel();

        let abort_handle = self.task.abort_handle();

        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(result) => classify_task_result(result),
            Err(_) => {
                warn!(
                    device_id = %device_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Worker did not stop in time, aborting"
                );
                abort_handle.abort();
                classify_task_result((&mut self.task).await)
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[derive(Debug, Default)]
struct Registry {
    running: HashMap<Uuid, WorkerHandle>,
    /// Cancelled once the device's task has terminated
    stopping: HashMap<Uuid, CancellationToken>,
}

impl Registry {
    fn contains(&self, device_id: &Uuid) -> bool {
        self.running.contains_key(device_id) || self.stopping.contains_key(device_id)
    }

    fn len(&self) -> usize {
        self.running.len() + self.stopping.len()
    }

    /// Move a running worker to the stopping set and shut it down in the
    /// background. The returned task resolves once the worker is gone and
    /// its stopping entry has been cleared.
    fn begin_stop(
        &mut self,
        registry: &Arc<Mutex<Registry>>,
        device_id: Uuid,
        timeout: Duration,
    ) -> Option<JoinHandle<TaskTermination>> {
        let handle = self.running.remove(&device_id)?;
        handle.cancel.cancel();

        let done = CancellationToken::new();
        self.stopping.insert(device_id, done.clone());

        let registry = Arc::clone(registry);
        Some(tokio::spawn(async move {
            let device_name = handle.device_name.clone();
            let termination = handle.shutdown(device_id, timeout).await;
            log_termination(device_id, &device_name, termination);

            registry.lock().await.stopping.remove(&device_id);
            done.cancel();

            info!(device_id = %device_id, device = %device_name, "Worker stopped");
            termination
        }))
    }
}

/// Task termination classification for shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    /// Worker left its loop after observing cancellation.
    Stopped,
    /// Worker was aborted.
    Aborted,
    /// Worker panicked.
    Panic,
}

fn classify_task_result(result: Result<(), JoinError>) -> TaskTermination {
    match result {
        Ok(()) => TaskTermination::Stopped,
        Err(e) if e.is_cancelled() => TaskTermination::Aborted,
        Err(_) => TaskTermination::Panic,
    }
}

fn log_termination(device_id: Uuid, device_name: &str, termination: TaskTermination) {
    match termination {
        TaskTermination::Stopped => {}
        TaskTermination::Aborted => {
            warn!(device_id = %device_id, device = %device_name, "Worker aborted")
        }
        TaskTermination::Panic => {
            error!(device_id = %device_id, device = %device_name, "Worker panicked")
        }
    }
}

/// Snapshot of a running worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerInfo {
    pub device_id: Uuid,
    pub device_name: String,
    pub started_at: DateTime<Utc>,
}

/// Starts, stops and tracks device workers.
///
/// Cloning is cheap; clones share the same registry.
///
/// # Examples
///
/// ```
/// use elid_workers::{WorkerConfig, WorkerManager};
/// use elid_workers::mock::MemoryStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let store = Arc::new(MemoryStore::new());
///     let gate = store.add_device("Gate", "access_controller", true);
///     let manager = WorkerManager::new(store, WorkerConfig::default());
///
///     assert!(manager.start(gate, "Gate", "access_controller").await);
///     assert!(!manager.start(gate, "Gate", "access_controller").await);
///     assert_eq!(manager.active_count().await, 1);
///
///     manager.stop_all().await;
///     assert_eq!(manager.active_count().await, 0);
/// }
/// ```
pub struct WorkerManager<S> {
    emitter: TransactionEmitter<S>,
    producer: Arc<dyn EventContentProducer>,
    config: WorkerConfig,
    registry: Arc<Mutex<Registry>>,
}

impl<S> Clone for WorkerManager<S> {
    fn clone(&self) -> Self {
        Self {
            emitter: self.emitter.clone(),
            producer: Arc::clone(&self.producer),
            config: self.config.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S> std::fmt::Debug for WorkerManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: RecordStore> WorkerManager<S> {
    /// Create a manager whose workers generate synthetic payloads
    pub fn new(store: Arc<S>, config: WorkerConfig) -> Self {
        Self {
            emitter: TransactionEmitter::new(store),
            producer: Arc::new(SyntheticPayloadProducer),
            config,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Replace the payload producer used by workers started afterwards
    pub fn with_producer(mut self, producer: impl EventContentProducer) -> Self {
        self.producer = Arc::new(producer);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Start a worker for a device.
    ///
    /// `category` is the device's stored category name. Unknown names are
    /// accepted; such a worker emits generic events with a base payload.
    ///
    /// Returns `false` without side effects if a worker for this device is
    /// already running or still stopping.
    pub async fn start(&self, device_id: Uuid, device_name: &str, category: &str) -> bool {
        let mut registry = self.registry.lock().await;

        if registry.contains(&device_id) {
            warn!(device_id = %device_id, device = %device_name, "Worker already running");
            return false;
        }

        let parsed = category.parse::<DeviceCategory>().ok();
        if parsed.is_none() {
            warn!(
                device_id = %device_id,
                category = %category,
                "Unrecognized device category, worker will emit generic events"
            );
        }

        let cancel = CancellationToken::new();
        let worker = DeviceWorker {
            device_id,
            device_name: device_name.to_string(),
            category: parsed,
            emitter: self.emitter.clone(),
            producer: Arc::clone(&self.producer),
            min_interval: self.config.min_interval,
            max_interval: self.config.max_interval,
            rng: StdRng::from_entropy(),
        };
        let task = tokio::spawn(worker.run(cancel.clone()));

        registry.running.insert(
            device_id,
            WorkerHandle {
                device_name: device_name.to_string(),
                started_at: Utc::now(),
                cancel,
                task,
            },
        );

        info!(device_id = %device_id, device = %device_name, category = %category, "Worker started");
        true
    }

    /// Stop a device's worker and wait for it to terminate.
    ///
    /// Returns `false` if no worker was running for this device. A call that
    /// finds the worker already stopping waits for that stop to finish and
    /// then returns `false`.
    pub async fn stop(&self, device_id: Uuid) -> bool {
        let mut registry = self.registry.lock().await;

        let waiter = registry.begin_stop(&self.registry, device_id, self.config.stop_timeout);
        let Some(waiter) = waiter else {
            let pending = registry.stopping.get(&device_id).cloned();
            drop(registry);

            match pending {
                Some(done) => {
                    debug!(device_id = %device_id, "Worker already stopping, waiting");
                    done.cancelled().await;
                }
                None => warn!(device_id = %device_id, "No running worker to stop"),
            }
            return false;
        };
        drop(registry);

        if waiter.await.is_err() {
            error!(device_id = %device_id, "Worker shutdown task failed");
        }
        true
    }

    /// Stop every running worker.
    ///
    /// All workers are signalled before any is awaited, so shutdown takes
    /// roughly as long as the slowest worker rather than the sum of all.
    /// Stops already in progress are awaited too.
    pub async fn stop_all(&self) {
        let mut registry = self.registry.lock().await;

        let ids: Vec<Uuid> = registry.running.keys().copied().collect();
        let pending: Vec<CancellationToken> = registry.stopping.values().cloned().collect();

        if ids.is_empty() && pending.is_empty() {
            debug!("No workers to stop");
            return;
        }

        let count = ids.len();
        info!(count, "Stopping all workers");

        let timeout = self.config.stop_timeout;
        let waiters: Vec<JoinHandle<TaskTermination>> = ids
            .into_iter()
            .filter_map(|device_id| registry.begin_stop(&self.registry, device_id, timeout))
            .collect();
        drop(registry);

        let results = join_all(waiters).await;
        for done in &pending {
            done.cancelled().await;
        }

        let abnormal = results
            .iter()
            .filter(|result| !matches!(result, Ok(TaskTermination::Stopped)))
            .count();

        info!(count, abnormal, "All workers stopped");
    }

    /// Number of workers that are running or still stopping
    pub async fn active_count(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Whether a worker is running or still stopping for this device
    pub async fn is_active(&self, device_id: Uuid) -> bool {
        self.registry.lock().await.contains(&device_id)
    }

    /// Snapshot of the running workers, ordered by start time.
    ///
    /// Workers that are stopping are not listed.
    pub async fn workers(&self) -> Vec<WorkerInfo> {
        let mut infos: Vec<WorkerInfo> = self
            .registry
            .lock()
            .await
            .running
            .iter()
            .map(|(device_id, handle)| WorkerInfo {
                device_id: *device_id,
                device_name: handle.device_name.clone(),
                started_at: handle.started_at,
            })
            .collect();
        infos.sort_by_key(|info| info.started_at);
        infos
    }
}

/// State owned by one worker task.
struct DeviceWorker<S> {
    device_id: Uuid,
    device_name: String,
    category: Option<DeviceCategory>,
    emitter: TransactionEmitter<S>,
    producer: Arc<dyn EventContentProducer>,
    min_interval: Duration,
    max_interval: Duration,
    rng: StdRng,
}

impl<S: RecordStore> DeviceWorker<S> {
    async fn run(mut self, cancel: CancellationToken) {
        debug!(device_id = %self.device_id, device = %self.device_name, "Worker loop entered");

        loop {
            let delay = self.next_delay();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            self.emit_one().await;
        }

        debug!(device_id = %self.device_id, device = %self.device_name, "Worker loop exited");
    }

    async fn emit_one(&mut self) {
        let username = SAMPLE_USERNAMES[self.rng.gen_range(0..SAMPLE_USERNAMES.len())];
        let labels = event_labels_for(self.category);
        let event_label = labels[self.rng.gen_range(0..labels.len())];
        let payload = self.producer.produce(&mut self.rng, self.category, event_label);

        if let Err(e) = self
            .emitter
            .emit(self.device_id, username, event_label, Some(payload), Utc::now())
            .await
        {
            error!(
                device_id = %self.device_id,
                device = %self.device_name,
                error = %e,
                "Failed to record transaction"
            );
        }
    }

    fn next_delay(&mut self) -> Duration {
        if self.max_interval <= self.min_interval {
            return self.min_interval;
        }
        self.rng.gen_range(self.min_interval..=self.max_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;
    use elid_core::constants::{ACCESS_CONTROLLER_EVENTS, FACE_READER_EVENTS, GENERIC_EVENTS};
    use elid_storage::Payload;
    use rand::RngCore;
    use rstest::rstest;
    use tokio::time::Instant;

    fn setup() -> (Arc<MemoryStore>, WorkerManager<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let manager = WorkerManager::new(Arc::clone(&store), WorkerConfig::default());
        (store, manager)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_keeps_one_worker() {
        let (store, manager) = setup();
        let device = store.add_device("Gate", "access_controller", true);

        assert!(manager.start(device, "Gate", "access_controller").await);
        assert!(!manager.start(device, "Gate", "access_controller").await);
        assert_eq!(manager.active_count().await, 1);
        assert!(manager.is_active(device).await);

        manager.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_unknown_device() {
        let (_, manager) = setup();
        assert!(!manager.stop(Uuid::new_v4()).await);
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_immediate_stop_records_nothing() {
        let (store, manager) = setup();
        let device = store.add_device("Lobby", "face_reader", true);

        assert!(manager.start(device, "Lobby", "face_reader").await);
        assert!(manager.stop(device).await);
        assert!(!manager.is_active(device).await);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(store.transactions().is_empty());
        assert_eq!(store.insert_attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_interrupts_sleep_promptly() {
        let (store, manager) = setup();
        let device = store.add_device("Gate", "access_controller", true);
        manager.start(device, "Gate", "access_controller").await;

        tokio::time::sleep(Duration::from_millis(500)).await;

        let before = Instant::now();
        assert!(manager.stop(device).await);
        assert!(before.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_face_reader_emits_within_max_interval() {
        let (store, manager) = setup();
        let device = store.add_device("Lobby", "face_reader", true);
        manager.start(device, "Lobby", "face_reader").await;

        tokio::time::sleep(Duration::from_secs(11)).await;
        manager.stop(device).await;

        let records = store.transactions_for(device);
        assert!(!records.is_empty());
        for record in &records {
            assert!(SAMPLE_USERNAMES.contains(&record.username.as_str()));
            assert!(FACE_READER_EVENTS.contains(&record.event_type.as_str()));
            let payload = record.payload().unwrap();
            assert!(payload.contains_key("face_id"));
            assert!(payload.contains_key("image_quality"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_category_emits_generic_events() {
        let (store, manager) = setup();
        let device = store.add_device("Legacy", "turnstile", true);
        manager.start(device, "Legacy", "turnstile").await;

        tokio::time::sleep(Duration::from_secs(25)).await;
        manager.stop(device).await;

        let records = store.transactions_for(device);
        assert!(!records.is_empty());
        for record in &records {
            assert_eq!(record.event_type, GENERIC_EVENTS[0]);
            let payload = record.payload().unwrap();
            assert_eq!(payload.len(), 2);
            assert!(payload.contains_key("confidence"));
            assert!(payload.contains_key("processing_time_ms"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_emission_failures_do_not_end_worker() {
        let (store, manager) = setup();
        let device = Uuid::new_v4();

        manager.start(device, "Ghost", "anpr").await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(manager.is_active(device).await);
        assert!(store.transactions().is_empty());

        store.insert_device(device, "Ghost", "anpr", true);
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(!store.transactions_for(device).is_empty());

        manager.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_waits_for_in_flight_emission() {
        let store = Arc::new(MemoryStore::new().with_insert_delay(Duration::from_secs(3)));
        let config = WorkerConfig::new()
            .interval(Duration::from_secs(2), Duration::from_secs(2))
            .stop_timeout(Duration::from_secs(5));
        let manager = WorkerManager::new(Arc::clone(&store), config);
        let device = store.add_device("Gate", "access_controller", true);

        manager.start(device, "Gate", "access_controller").await;

        // Worker wakes at 2s and is inside the 3s insert at 3s.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.insert_attempts(), 1);

        let before = Instant::now();
        assert!(manager.stop(device).await);
        assert!(before.elapsed() >= Duration::from_secs(2));
        assert_eq!(store.transactions_for(device).len(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.transactions_for(device).len(), 1);
        assert_eq!(store.insert_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_aborts_after_timeout() {
        let store = Arc::new(MemoryStore::new().with_insert_delay(Duration::from_secs(60)));
        let config = WorkerConfig::new()
            .interval(Duration::from_secs(2), Duration::from_secs(2))
            .stop_timeout(Duration::from_secs(1));
        let manager = WorkerManager::new(Arc::clone(&store), config);
        let device = store.add_device("Gate", "access_controller", true);

        manager.start(device, "Gate", "access_controller").await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let before = Instant::now();
        assert!(manager.stop(device).await);
        assert!(before.elapsed() < Duration::from_secs(2));
        assert!(!manager.is_active(device).await);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(store.transactions().is_empty());
    }

    fn slow_insert_setup() -> (Arc<MemoryStore>, WorkerManager<MemoryStore>) {
        let store = Arc::new(MemoryStore::new().with_insert_delay(Duration::from_secs(3)));
        let config = WorkerConfig::new()
            .interval(Duration::from_secs(2), Duration::from_secs(2))
            .stop_timeout(Duration::from_secs(5));
        let manager = WorkerManager::new(Arc::clone(&store), config);
        (store, manager)
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopping_worker_does_not_block_registry() {
        let (store, manager) = slow_insert_setup();
        let slow = store.add_device("Slow", "access_controller", true);
        let other = store.add_device("Other", "anpr", true);
        manager.start(slow, "Slow", "access_controller").await;

        // Inside the 3s insert that started at 2s.
        tokio::time::sleep(Duration::from_secs(3)).await;
        let stopping = tokio::spawn({
            let manager = manager.clone();
            async move { manager.stop(slow).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let before = Instant::now();
        assert!(manager.is_active(slow).await);
        assert_eq!(manager.active_count().await, 1);
        assert!(!manager.start(slow, "Slow", "access_controller").await);
        assert!(manager.start(other, "Other", "anpr").await);
        assert_eq!(manager.active_count().await, 2);
        assert_eq!(manager.workers().await.len(), 1);
        assert!(before.elapsed() < Duration::from_millis(100));

        assert!(stopping.await.unwrap());
        assert!(!manager.is_active(slow).await);
        assert_eq!(store.transactions_for(slow).len(), 1);
        assert!(manager.start(slow, "Slow", "access_controller").await);

        manager.stop_all().await;
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_stop_waits_for_first() {
        let (store, manager) = slow_insert_setup();
        let device = store.add_device("Gate", "access_controller", true);
        manager.start(device, "Gate", "access_controller").await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        let first = tokio::spawn({
            let manager = manager.clone();
            async move { manager.stop(device).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let before = Instant::now();
        assert!(!manager.stop(device).await);
        assert!(before.elapsed() >= Duration::from_secs(1));
        assert!(!manager.is_active(device).await);
        assert!(first.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_waits_for_stop_in_progress() {
        let (store, manager) = slow_insert_setup();
        let device = store.add_device("Gate", "access_controller", true);
        manager.start(device, "Gate", "access_controller").await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        let stopping = tokio::spawn({
            let manager = manager.clone();
            async move { manager.stop(device).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        manager.stop_all().await;
        assert_eq!(manager.active_count().await, 0);
        assert_eq!(store.transactions_for(device).len(), 1);
        assert!(stopping.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_manager_cancels_workers() {
        let (store, manager) = setup();
        let device = store.add_device("Gate", "access_controller", true);
        assert!(manager.start(device, "Gate", "access_controller").await);

        drop(manager);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(store.transactions().is_empty());
        assert_eq!(store.insert_attempts(), 0);
        assert_eq!(Arc::strong_count(&store), 1);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[tokio::test(start_paused = true)]
    async fn test_stop_all(#[case] count: usize) {
        let (store, manager) = setup();
        for i in 0..count {
            let name = format!("Gate {i}");
            let id = store.add_device(&name, "access_controller", true);
            assert!(manager.start(id, &name, "access_controller").await);
        }
        assert_eq!(manager.active_count().await, count);

        manager.stop_all().await;
        assert_eq!(manager.active_count().await, 0);

        let recorded = store.transactions().len();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.transactions().len(), recorded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let (store, manager) = setup();
        let device = store.add_device("Gate", "access_controller", true);

        assert!(manager.start(device, "Gate", "access_controller").await);
        assert!(manager.stop(device).await);
        assert!(manager.start(device, "Gate", "access_controller").await);
        assert_eq!(manager.active_count().await, 1);

        manager.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_starts_yield_one_worker() {
        let (store, manager) = setup();
        let device = store.add_device("Gate", "access_controller", true);

        let attempts = (0..8).map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.start(device, "Gate", "access_controller").await })
        });
        let started = join_all(attempts)
            .await
            .into_iter()
            .filter(|r| *r.as_ref().unwrap())
            .count();

        assert_eq!(started, 1);
        assert_eq!(manager.active_count().await, 1);
        manager.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_workers_snapshot() {
        let (store, manager) = setup();
        let first = store.add_device("First", "anpr", true);
        manager.start(first, "First", "anpr").await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = store.add_device("Second", "anpr", true);
        manager.start(second, "Second", "anpr").await;

        let infos = manager.workers().await;
        assert_eq!(infos.len(), 2);
        assert!(infos.iter().any(|i| i.device_id == first && i.device_name == "First"));
        assert!(infos.iter().any(|i| i.device_id == second && i.device_name == "Second"));
        assert!(infos[0].started_at <= infos[1].started_at);

        manager.stop_all().await;
    }

    struct FixedProducer;

    impl EventContentProducer for FixedProducer {
        fn produce(
            &self,
            _rng: &mut dyn RngCore,
            _category: Option<DeviceCategory>,
            event_label: &str,
        ) -> Payload {
            let mut payload = Payload::new();
            payload.insert("label".into(), event_label.into());
            payload
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_producer() {
        let store = Arc::new(MemoryStore::new());
        let manager = WorkerManager::new(Arc::clone(&store), WorkerConfig::default())
            .with_producer(FixedProducer);
        let device = store.add_device("Gate", "access_controller", true);

        manager.start(device, "Gate", "access_controller").await;
        tokio::time::sleep(Duration::from_secs(11)).await;
        manager.stop(device).await;

        let records = store.transactions_for(device);
        assert!(!records.is_empty());
        for record in records {
            assert!(ACCESS_CONTROLLER_EVENTS.contains(&record.event_type.as_str()));
            assert_eq!(record.payload().unwrap()["label"], record.event_type.as_str());
        }
    }
}
