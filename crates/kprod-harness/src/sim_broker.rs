//! Scripted broker for simulation tests.
//!
//! `SimBroker` implements [`Broker`] without a network. Connect and publish
//! outcomes are scripted per call; unscripted calls succeed. Every call is
//! recorded so tests can assert on what reached the collaborator.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use kprod_client::{
    Broker, ConnectError, Delivery, PublishError, PublishRequest, Session, SessionHandle,
    partition,
};
use kprod_core::ConnectionSettings;

/// Partitions every simulated topic has.
pub const SIM_PARTITIONS: i32 = 3;

/// Scripted outcome of one call.
#[derive(Debug, Clone)]
pub struct Scripted<E> {
    /// Simulated latency before the outcome is returned.
    pub delay: Duration,
    /// `Err` makes the call fail.
    pub outcome: Result<(), E>,
}

impl<E> Scripted<E> {
    /// Succeed after `delay`.
    pub fn ok_after(delay: Duration) -> Self {
        Self { delay, outcome: Ok(()) }
    }

    /// Fail immediately.
    pub fn fail(err: E) -> Self {
        Self { delay: Duration::ZERO, outcome: Err(err) }
    }
}

#[derive(Default)]
struct BrokerState {
    connects: VecDeque<Scripted<ConnectError>>,
    publishes: VecDeque<Scripted<PublishError>>,
    opened: Vec<ConnectionSettings>,
    sessions: Vec<Arc<SimSession>>,
    published: Vec<PublishRequest>,
}

/// Broker double with scripted outcomes.
#[derive(Clone, Default)]
pub struct SimBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl SimBroker {
    /// Broker where every call succeeds immediately.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        lock(&self.state)
    }

    /// Script the next unscripted `open`.
    pub fn script_connect(&self, script: Scripted<ConnectError>) {
        self.lock().connects.push_back(script);
    }

    /// Script the next unscripted `publish`, on any session.
    pub fn script_publish(&self, script: Scripted<PublishError>) {
        self.lock().publishes.push_back(script);
    }

    /// Settings passed to every `open` call, in call order.
    pub fn opened(&self) -> Vec<ConnectionSettings> {
        self.lock().opened.clone()
    }

    /// Sessions handed out, in creation order.
    pub fn sessions(&self) -> Vec<Arc<SimSession>> {
        self.lock().sessions.clone()
    }

    /// Requests that reached any session, in call order.
    pub fn published(&self) -> Vec<PublishRequest> {
        self.lock().published.clone()
    }
}

#[async_trait]
impl Broker for SimBroker {
    async fn open(&self, settings: &ConnectionSettings) -> Result<SessionHandle, ConnectError> {
        settings.validate_for_connect()?;

        let script = {
            let mut state = self.lock();
            state.opened.push(settings.clone());
            state.connects.pop_front()
        };
        let script = script.unwrap_or_else(|| Scripted::ok_after(Duration::ZERO));

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.outcome?;

        let mut state = self.lock();
        let session = Arc::new(SimSession {
            id: state.sessions.len(),
            broker: Arc::clone(&self.state),
            closes: AtomicUsize::new(0),
            next_offset: Mutex::new(0),
        });
        state.sessions.push(Arc::clone(&session));
        tracing::debug!(session = session.id, brokers = %settings.brokers_field(), "sim session opened");
        Ok(session)
    }
}

/// Session handed out by [`SimBroker`].
pub struct SimSession {
    id: usize,
    broker: Arc<Mutex<BrokerState>>,
    closes: AtomicUsize,
    next_offset: Mutex<i64>,
}

impl SimSession {
    /// Creation index within the broker.
    pub fn id(&self) -> usize {
        self.id
    }

    /// How many times `close` was called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Whether `close` was called at least once.
    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

impl std::fmt::Debug for SimSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimSession").field("id", &self.id).finish_non_exhaustive()
    }
}

#[async_trait]
impl Session for SimSession {
    async fn publish(&self, request: PublishRequest) -> Result<Delivery, PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed);
        }

        let script = {
            let mut state = lock(&self.broker);
            state.published.push(request.clone());
            state.publishes.pop_front()
        };
        let script = script.unwrap_or_else(|| Scripted::ok_after(Duration::ZERO));

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.outcome?;

        let partition = request
            .key
            .as_deref()
            .and_then(|key| partition::for_key(key, SIM_PARTITIONS))
            .unwrap_or(0);
        let mut next = lock(&self.next_offset);
        let offset = *next;
        *next += 1;
        Ok(Delivery { partition, offset })
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
