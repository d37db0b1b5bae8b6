//! Bounded-concurrency FIFO task queue.
//!
//! A [`TaskQueue`] buffers submitted tasks and runs them on at most
//! `concurrency` worker slots. Each slot pulls entries from the head of the
//! buffer and runs them one after another until the buffer drains or the
//! queue is paused, then exits. New slots are activated on demand by
//! `submit` and `start`.
//!
//! All bookkeeping (`pending`, `active_workers`, `running`) lives behind one
//! `parking_lot::Mutex`. Every decision that reads and then mutates it
//! happens inside a single critical section, and listeners are notified only
//! after the lock is released.
//!
//! ```rust,ignore
//! use prometheus_promise_queue::config::QueueConfig;
//! use prometheus_promise_queue::core::{QueueEvent, TaskQueue};
//!
//! let queue = TaskQueue::new(QueueConfig::new().with_concurrency(4))?;
//! queue.on(QueueEvent::Done, || tracing::info!("batch finished"));
//!
//! let handle = queue.submit(|| async { Ok::<_, std::io::Error>(42) });
//! assert_eq!(handle.await?, 42);
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::channel::oneshot;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{AdmissionPolicy, QueueConfig};
use crate::core::events::{EventBus, ListenerId, QueueEvent};
use crate::core::spawn::Spawn;
use crate::core::stats::{QueueCounters, QueueStats};
use crate::core::task::{TaskEntry, TaskHandle, TaskId, TaskOutcome};
use crate::core::QueueError;

#[cfg(feature = "tokio-runtime")]
use crate::runtime::TokioSpawner;

/// Mutable scheduling state. Only touched with the lock held.
#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<TaskEntry>,
    active_workers: usize,
    running: bool,
    /// Never reset; minted under the lock so ids follow buffer order.
    next_id: TaskId,
    /// Parked `wait_until_idle` callers. Taken in the same critical section
    /// that decides `done`, so a `done` only wakes waiters registered before it.
    idle_waiters: Vec<oneshot::Sender<()>>,
}

struct Inner<S> {
    config: QueueConfig,
    state: Mutex<QueueState>,
    events: EventBus,
    counters: QueueCounters,
    worker_seq: AtomicU64,
    spawner: S,
}

/// What a worker does after consulting the buffer.
enum Step {
    Run { entry: TaskEntry, drained: bool },
    Exit {
        done: bool,
        idle_waiters: Vec<oneshot::Sender<()>>,
    },
}

/// Bounded-concurrency FIFO task queue.
///
/// Cheap to clone; clones share the same buffer, workers, and listeners, so
/// a running task can hold a clone and pause or feed its own queue.
pub struct TaskQueue<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for TaskQueue<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "tokio-runtime")]
impl TaskQueue<TokioSpawner> {
    /// Create a queue whose workers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// - `QueueError::InvalidConfig` if `config` fails validation
    /// - `QueueError::NoRuntime` if called outside a tokio runtime
    pub fn new(config: QueueConfig) -> Result<Self, QueueError> {
        // Checked before the runtime lookup so a bad config reports
        // `InvalidConfig` even outside a runtime.
        config.validate().map_err(QueueError::InvalidConfig)?;
        Self::with_spawner(config, TokioSpawner::current()?)
    }
}

impl<S> TaskQueue<S>
where
    S: Spawn + Send + Sync + 'static,
{
    /// Create a queue whose workers are hosted by `spawner`.
    ///
    /// Starts the queue immediately when `config.auto_start` is set.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidConfig` if `config` fails validation.
    pub fn with_spawner(config: QueueConfig, spawner: S) -> Result<Self, QueueError> {
        config.validate().map_err(QueueError::InvalidConfig)?;

        let auto_start = config.auto_start;
        debug!(
            concurrency = config.concurrency,
            auto_start,
            admission = ?config.admission,
            "task queue created"
        );

        let queue = Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(QueueState::default()),
                events: EventBus::default(),
                counters: QueueCounters::default(),
                worker_seq: AtomicU64::new(0),
                spawner,
            }),
        };
        if auto_start {
            queue.start();
        }
        Ok(queue)
    }

    /// Submit a task.
    ///
    /// The entry joins the back of the buffer; if the queue is running and
    /// below its concurrency limit a worker slot is activated for it. The
    /// returned handle resolves with the action's outcome whenever this entry
    /// eventually runs. The buffer is unbounded.
    pub fn submit<F, Fut, T, E>(&self, action: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (handle, spawn) = {
            let mut state = self.inner.state.lock();
            let id = state.next_id;
            state.next_id += 1;

            let (entry, handle) = TaskEntry::new(id, action);
            state.pending.push_back(entry);

            let spawn = state.running
                && state.active_workers < self.inner.config.concurrency
                && self.try_reserve_worker(&mut state);
            (handle, spawn)
        };

        self.inner.counters.submitted.fetch_add(1, Ordering::Relaxed);
        debug!(task_id = handle.id(), spawn_worker = spawn, "task submitted");

        if spawn {
            self.spawn_worker();
        }
        handle
    }

    /// Start (or resume) the queue.
    ///
    /// Activates up to `min(pending, concurrency)` worker slots to catch up on
    /// any backlog, then emits [`QueueEvent::Start`]. Calling it while already
    /// running only retries the catch-up.
    pub fn start(&self) {
        let spawned = {
            let mut state = self.inner.state.lock();
            state.running = true;

            let wanted = state.pending.len().min(self.inner.config.concurrency);
            let mut spawned = 0;
            for _ in 0..wanted {
                if self.try_reserve_worker(&mut state) {
                    spawned += 1;
                }
            }
            spawned
        };

        info!(spawned, "task queue started");
        for _ in 0..spawned {
            self.spawn_worker();
        }
        self.inner.events.emit(QueueEvent::Start);
    }

    /// Pause the queue.
    ///
    /// Emits [`QueueEvent::Pause`] and stops workers from pulling further
    /// entries. Tasks already pulled run to completion; nothing is preempted.
    pub fn pause(&self) {
        self.inner.events.emit(QueueEvent::Pause);
        self.inner.state.lock().running = false;
        info!("task queue paused");
    }

    /// Drop every pending entry and return how many were removed.
    ///
    /// Running tasks are unaffected. Handles of removed entries resolve with
    /// `TaskError::Discarded`. No event is emitted.
    pub fn clear(&self) -> usize {
        let removed: Vec<TaskEntry> = {
            let mut state = self.inner.state.lock();
            state.pending.drain(..).collect()
        };
        let count = removed.len();
        // Dropped outside the lock; this wakes the discarded handles.
        drop(removed);

        self.inner
            .counters
            .discarded
            .fetch_add(count as u64, Ordering::Relaxed);
        info!(discarded = count, "task queue cleared");
        count
    }

    /// Register `listener` for `event`. The same event may have many listeners.
    pub fn on<L>(&self, event: QueueEvent, listener: L) -> ListenerId
    where
        L: Fn() + Send + Sync + 'static,
    {
        self.inner.events.subscribe(event, Arc::new(listener))
    }

    /// Detach a listener previously returned by [`on`](Self::on).
    pub fn remove_listener(&self, event: QueueEvent, id: ListenerId) -> bool {
        self.inner.events.unsubscribe(event, id)
    }

    /// Number of listeners currently registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: QueueEvent) -> usize {
        self.inner.events.listener_count(event)
    }

    /// Wait for the next [`QueueEvent::Done`].
    ///
    /// The waiter is registered when this method is called, not when the
    /// future is first polled. It is one-shot: a queue that is already idle
    /// keeps the future pending until another busy period finishes.
    pub fn wait_until_idle(&self) -> impl Future<Output = ()> + Send + 'static {
        let (tx, waiter) = oneshot::channel();
        self.inner.state.lock().idle_waiters.push(tx);
        async move {
            // Canceled only when the queue itself is gone.
            let _ = waiter.await;
        }
    }

    /// Whether the queue is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// Outstanding work: pending entries plus active worker slots.
    #[must_use]
    pub fn len(&self) -> usize {
        let state = self.inner.state.lock();
        state.pending.len() + state.active_workers
    }

    /// True when nothing is pending and no worker is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries waiting in the buffer.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    /// Worker slots currently active.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.inner.state.lock().active_workers
    }

    /// Configuration this queue was built with.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Get current queue statistics.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let (running, pending, active_workers) = {
            let state = self.inner.state.lock();
            (state.running, state.pending.len(), state.active_workers)
        };
        self.inner.counters.snapshot(
            self.inner.config.concurrency,
            running,
            pending,
            active_workers,
        )
    }

    /// Reserve a worker slot if the admission policy allows it.
    fn try_reserve_worker(&self, state: &mut QueueState) -> bool {
        let limit = self.inner.config.concurrency;
        let full = match self.inner.config.admission {
            AdmissionPolicy::Strict => state.active_workers >= limit,
            AdmissionPolicy::Lenient => state.active_workers > limit,
        };
        if full {
            return false;
        }
        state.active_workers += 1;
        true
    }

    /// Hand a reserved slot to the spawner. The loop's first pull happens on a
    /// later scheduling turn.
    fn spawn_worker(&self) {
        let worker_id = self.inner.worker_seq.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        self.inner.spawner.spawn(run_worker(inner, worker_id));
    }
}

/// Worker slot loop: pull, run, repeat until drained or paused.
async fn run_worker<S>(inner: Arc<Inner<S>>, worker_id: u64) {
    debug!(worker_id, "worker slot started");

    loop {
        let step = {
            let mut state = inner.state.lock();
            let entry = if state.running {
                state.pending.pop_front()
            } else {
                None
            };
            match entry {
                Some(entry) => Step::Run {
                    entry,
                    drained: state.pending.is_empty(),
                },
                None => {
                    // Exit decision and release share one critical section so
                    // a concurrent submit never counts a slot that is leaving.
                    state.active_workers = state.active_workers.saturating_sub(1);
                    let done = state.running && state.active_workers == 0;
                    let idle_waiters = if done {
                        std::mem::take(&mut state.idle_waiters)
                    } else {
                        Vec::new()
                    };
                    Step::Exit { done, idle_waiters }
                }
            }
        };

        match step {
            Step::Run { entry, drained } => {
                if drained {
                    inner.events.emit(QueueEvent::Empty);
                }

                let task_id = entry.id();
                debug!(worker_id, task_id, "worker running task");
                let outcome = entry.run().await;
                inner.counters.record(outcome);

                match outcome {
                    TaskOutcome::Panicked => warn!(worker_id, task_id, "task panicked"),
                    _ => debug!(worker_id, task_id, ?outcome, "task settled"),
                }
            }
            Step::Exit { done, idle_waiters } => {
                debug!(worker_id, done, "worker slot exiting");
                if done {
                    inner.events.emit(QueueEvent::Done);
                    for waiter in idle_waiters {
                        let _ = waiter.send(());
                    }
                }
                return;
            }
        }
    }
}
