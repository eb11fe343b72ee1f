use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    All,
    Analytics,
}

impl Scope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Analytics => "analytics",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "analytics" => Some(Self::Analytics),
            _ => None,
        }
    }

    /// Whether a notice for `self` also invalidates `other`.
    pub fn covers(self, other: Scope) -> bool {
        self == Self::All || self == other
    }
}

/// Bundles built from snapshots up to and including `generation` are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationNotice {
    pub scope: Scope,
    pub generation: u64,
}

/// A cache that can be told its computed bundles are stale.
pub trait InvalidationSink: Send + Sync {
    fn name(&self) -> &str;

    fn mark_stale(&self, notice: &InvalidationNotice) -> ClientResult<()>;
}

/// In-process sink that remembers the newest stale generation per scope.
#[derive(Debug, Default)]
pub struct StaleMarker {
    latest: Mutex<BTreeMap<Scope, u64>>,
}

impl StaleMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest stale generation affecting `scope`, counting `all` notices.
    pub fn stale_generation(&self, scope: Scope) -> Option<u64> {
        let latest = self.latest.lock().ok()?;
        latest
            .iter()
            .filter(|(marked, _)| marked.covers(scope))
            .map(|(_, generation)| *generation)
            .max()
    }

    pub fn is_stale(&self, scope: Scope, generation: u64) -> bool {
        self.stale_generation(scope)
            .is_some_and(|stale| generation <= stale)
    }
}

impl InvalidationSink for StaleMarker {
    fn name(&self) -> &str {
        "stale_marker"
    }

    fn mark_stale(&self, notice: &InvalidationNotice) -> ClientResult<()> {
        let mut latest = self
            .latest
            .lock()
            .map_err(|_| ClientError::store_unavailable("The stale marker lock was poisoned."))?;
        let entry = latest.entry(notice.scope).or_insert(notice.generation);
        *entry = (*entry).max(notice.generation);
        Ok(())
    }
}

/// Bounded at-most-once queue drained by one worker thread.
pub struct InvalidationSignal {
    capacity: usize,
    sinks: Vec<Arc<dyn InvalidationSink>>,
    sender: Mutex<Option<SyncSender<InvalidationNotice>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl InvalidationSignal {
    /// Starts the worker. If the thread cannot be spawned every later signal
    /// is dropped with a warning.
    pub fn start(capacity: usize, sinks: Vec<Arc<dyn InvalidationSink>>) -> Self {
        let capacity = capacity.max(1);
        let (sender, worker) = spawn_worker(capacity, sinks.clone());
        Self {
            capacity,
            sinks,
            sender: Mutex::new(sender),
            worker: Mutex::new(worker),
        }
    }

    /// Queues a notice and returns immediately. Never fails the caller.
    pub fn invalidate(&self, scope: Scope, generation: u64) {
        let notice = InvalidationNotice { scope, generation };
        let Ok(sender) = self.sender.lock() else {
            warn!(scope = scope.as_str(), "invalidation sender lock poisoned; signal dropped");
            return;
        };
        let Some(sender) = sender.as_ref() else {
            warn!(scope = scope.as_str(), "invalidation signal closed; signal dropped");
            return;
        };

        match sender.try_send(notice) {
            Ok(()) => debug!(scope = scope.as_str(), generation, "queued invalidation"),
            Err(TrySendError::Full(_)) => {
                warn!(
                    scope = scope.as_str(),
                    generation,
                    "invalidation queue full; signal dropped"
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(
                    scope = scope.as_str(),
                    generation,
                    "invalidation worker gone; signal dropped"
                );
            }
        }
    }

    /// Waits for queued notices to reach the sinks, then keeps accepting
    /// new ones on a fresh worker. A closed signal stays closed.
    pub fn flush(&self) {
        let previous = {
            let Ok(mut sender) = self.sender.lock() else {
                warn!("invalidation sender lock poisoned; flush skipped");
                return;
            };
            if sender.is_none() {
                return;
            }
            let (next_sender, next_worker) = spawn_worker(self.capacity, self.sinks.clone());
            // Dropping the old sender lets the old worker finish its queue.
            *sender = next_sender;
            match self.worker.lock() {
                Ok(mut worker) => std::mem::replace(&mut *worker, next_worker),
                Err(_) => None,
            }
        };
        join_worker(previous);
    }

    /// Stops accepting notices and waits for queued ones to reach the sinks.
    pub fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        join_worker(self.worker.lock().ok().and_then(|mut worker| worker.take()));
    }
}

impl Drop for InvalidationSignal {
    fn drop(&mut self) {
        self.close();
    }
}

fn spawn_worker(
    capacity: usize,
    sinks: Vec<Arc<dyn InvalidationSink>>,
) -> (Option<SyncSender<InvalidationNotice>>, Option<JoinHandle<()>>) {
    let (sender, receiver) = sync_channel(capacity);
    let spawned = thread::Builder::new()
        .name("tallyboard-invalidation".to_string())
        .spawn(move || drain(receiver, sinks));
    match spawned {
        Ok(worker) => (Some(sender), Some(worker)),
        Err(error) => {
            warn!(%error, "could not start invalidation worker; signals will be dropped");
            (None, None)
        }
    }
}

fn join_worker(worker: Option<JoinHandle<()>>) {
    if let Some(handle) = worker
        && handle.join().is_err()
    {
        warn!("invalidation worker panicked");
    }
}

fn drain(receiver: Receiver<InvalidationNotice>, sinks: Vec<Arc<dyn InvalidationSink>>) {
    for notice in receiver {
        for sink in &sinks {
            if let Err(error) = sink.mark_stale(&notice) {
                warn!(
                    sink = sink.name(),
                    scope = notice.scope.as_str(),
                    code = %error.code,
                    "invalidation sink failed"
                );
            }
        }
    }
}

struct SharedSignal {
    marker: Arc<StaleMarker>,
    signal: InvalidationSignal,
}

fn shared_signal() -> &'static SharedSignal {
    static SHARED: OnceLock<SharedSignal> = OnceLock::new();
    SHARED.get_or_init(|| {
        let capacity = match EngineConfig::from_env() {
            Ok(config) => config.invalidation_queue,
            Err(error) => {
                warn!(
                    code = %error.code,
                    "invalid engine config; using default invalidation queue"
                );
                EngineConfig::default().invalidation_queue
            }
        };
        let marker = Arc::new(StaleMarker::new());
        let sink: Arc<dyn InvalidationSink> = marker.clone();
        SharedSignal {
            signal: InvalidationSignal::start(capacity, vec![sink]),
            marker,
        }
    })
}

/// Fires the process-wide signal for `scope` at `generation`.
pub fn invalidate(scope: Scope, generation: u64) {
    shared_signal().signal.invalidate(scope, generation);
}

/// The process-wide in-process sink.
pub fn shared_marker() -> Arc<StaleMarker> {
    Arc::clone(&shared_signal().marker)
}

/// Waits for queued process-wide notices to be delivered. The signal keeps
/// accepting notices afterwards.
pub fn flush_shared() {
    shared_signal().signal.flush();
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        InvalidationNotice, InvalidationSignal, InvalidationSink, Scope, StaleMarker,
        flush_shared, invalidate, shared_marker,
    };
    use crate::{ClientError, ClientResult};

    struct FailingSink;

    impl InvalidationSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn mark_stale(&self, _notice: &InvalidationNotice) -> ClientResult<()> {
            Err(ClientError::store_unavailable("cache offline"))
        }
    }

    struct BlockingSink {
        gate: Arc<Mutex<()>>,
    }

    impl InvalidationSink for BlockingSink {
        fn name(&self) -> &str {
            "blocking"
        }

        fn mark_stale(&self, _notice: &InvalidationNotice) -> ClientResult<()> {
            let _held = self.gate.lock();
            Ok(())
        }
    }

    #[test]
    fn scopes_parse_and_cover() {
        assert_eq!(Scope::parse(" Analytics "), Some(Scope::Analytics));
        assert_eq!(Scope::parse("everything"), None);
        assert!(Scope::All.covers(Scope::Analytics));
        assert!(!Scope::Analytics.covers(Scope::All));
    }

    #[test]
    fn delivered_notices_reach_every_sink_despite_failures() {
        let marker = Arc::new(StaleMarker::new());
        let sinks: Vec<Arc<dyn InvalidationSink>> = vec![Arc::new(FailingSink), marker.clone()];
        let signal = InvalidationSignal::start(4, sinks);

        signal.invalidate(Scope::Analytics, 3);
        signal.invalidate(Scope::All, 2);
        signal.close();

        assert_eq!(marker.stale_generation(Scope::Analytics), Some(3));
        assert_eq!(marker.stale_generation(Scope::All), Some(2));
        assert!(marker.is_stale(Scope::Analytics, 3));
        assert!(!marker.is_stale(Scope::Analytics, 4));
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let gate = Arc::new(Mutex::new(()));
        let marker = Arc::new(StaleMarker::new());
        let sinks: Vec<Arc<dyn InvalidationSink>> = vec![
            Arc::new(BlockingSink {
                gate: Arc::clone(&gate),
            }),
            marker.clone(),
        ];
        let signal = InvalidationSignal::start(1, sinks);

        let held = gate.lock();
        for generation in 1..=10 {
            signal.invalidate(Scope::All, generation);
        }
        drop(held);
        signal.close();

        // At most one notice in flight plus one queued survive.
        let delivered = marker.stale_generation(Scope::All);
        assert!(delivered.is_some());
        assert!(delivered <= Some(2));
    }

    #[test]
    fn closed_signal_drops_quietly() {
        let marker = Arc::new(StaleMarker::new());
        let sinks: Vec<Arc<dyn InvalidationSink>> = vec![marker.clone()];
        let signal = InvalidationSignal::start(2, sinks);
        signal.close();
        signal.invalidate(Scope::All, 9);
        assert_eq!(marker.stale_generation(Scope::All), None);
    }

    #[test]
    fn flush_delivers_queued_notices_and_keeps_the_signal_open() {
        let marker = Arc::new(StaleMarker::new());
        let sinks: Vec<Arc<dyn InvalidationSink>> = vec![marker.clone()];
        let signal = InvalidationSignal::start(2, sinks);

        signal.invalidate(Scope::All, 1);
        signal.flush();
        assert_eq!(marker.stale_generation(Scope::All), Some(1));

        signal.invalidate(Scope::Analytics, 2);
        signal.flush();
        assert_eq!(marker.stale_generation(Scope::Analytics), Some(2));

        signal.close();
        signal.flush();
        signal.invalidate(Scope::Analytics, 3);
        assert_eq!(marker.stale_generation(Scope::Analytics), Some(2));
    }

    #[test]
    fn shared_signal_survives_repeated_flushes() {
        invalidate(Scope::Analytics, 1_000_001);
        flush_shared();
        assert!(shared_marker().is_stale(Scope::Analytics, 1_000_001));

        invalidate(Scope::Analytics, 1_000_002);
        flush_shared();
        assert!(shared_marker().is_stale(Scope::Analytics, 1_000_002));
    }
}
