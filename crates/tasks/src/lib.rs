#![warn(missing_debug_implementations, missing_docs, unreachable_pub)]
#![deny(unused_must_use)]

//! Async building blocks for single-result, multi-event operations.
//!
//! A [`PromiEvent`] is one object with two faces: a one-shot awaitable that
//! resolves exactly once, and a named-event bus that may fire any number of
//! times while the operation runs. Both are views over the same underlying
//! channels; the driver side holds the [`Completer`] and an [`EventBus`]
//! clone.
//!
//! Event delivery has no replay: a listener only receives events emitted
//! after it subscribed. Removing every listener stops delivery but never
//! affects the terminal resolution.

pub mod shutdown;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    hash::Hash,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};
use tokio::sync::oneshot;
use tracing::trace;

/// The subscriber side of one event kind: a stream of events emitted after
/// the subscription was created.
///
/// Dropping the stream unsubscribes; closed subscriptions are pruned on the
/// next emission.
#[derive(Debug)]
pub struct EventStream<E> {
    rx: UnboundedReceiver<E>,
}

impl<E> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<E>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

struct BusInner<K, E> {
    /// Listeners keyed by the event kind they subscribed to.
    listeners: HashMap<K, Vec<UnboundedSender<E>>>,
    /// Listeners receiving every event.
    all_listeners: Vec<UnboundedSender<E>>,
    /// Signals fired when every listener is removed at once.
    idle_signals: Vec<shutdown::Signal>,
}

impl<K, E> Default for BusInner<K, E> {
    fn default() -> Self {
        Self { listeners: HashMap::new(), all_listeners: Vec::new(), idle_signals: Vec::new() }
    }
}

/// A multi-subscriber event bus keyed by event kind.
pub struct EventBus<K, E> {
    inner: Arc<Mutex<BusInner<K, E>>>,
}

impl<K, E> Clone for EventBus<K, E> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<K, E> fmt::Debug for EventBus<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

impl<K, E> Default for EventBus<K, E> {
    fn default() -> Self {
        Self { inner: Arc::new(Mutex::new(BusInner::default())) }
    }
}

impl<K, E> EventBus<K, E>
where
    K: Eq + Hash + Copy,
    E: Clone,
{
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to one event kind. Events emitted before this call are
    /// not replayed.
    pub fn subscribe(&self, kind: K) -> EventStream<E> {
        let (tx, rx) = unbounded();
        self.inner.lock().expect("bus lock poisoned").listeners.entry(kind).or_default().push(tx);
        EventStream { rx }
    }

    /// Subscribes to every event kind.
    pub fn subscribe_all(&self) -> EventStream<E> {
        let (tx, rx) = unbounded();
        self.inner.lock().expect("bus lock poisoned").all_listeners.push(tx);
        EventStream { rx }
    }

    /// Delivers an event to the current subscribers of `kind` and to
    /// catch-all subscribers, pruning closed ones.
    pub fn emit(&self, kind: K, event: E) {
        let mut inner = self.inner.lock().expect("bus lock poisoned");
        if let Some(senders) = inner.listeners.get_mut(&kind) {
            senders.retain(|tx| tx.unbounded_send(event.clone()).is_ok());
            if senders.is_empty() {
                inner.listeners.remove(&kind);
            }
        }
        inner.all_listeners.retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    /// True if anyone is currently listening for `kind`, directly or via a
    /// catch-all subscription.
    pub fn has_listeners(&self, kind: K) -> bool {
        let mut inner = self.inner.lock().expect("bus lock poisoned");
        if let Some(senders) = inner.listeners.get_mut(&kind) {
            senders.retain(|tx| !tx.is_closed());
            if senders.is_empty() {
                inner.listeners.remove(&kind);
            }
        }
        inner.all_listeners.retain(|tx| !tx.is_closed());
        inner.listeners.contains_key(&kind) || !inner.all_listeners.is_empty()
    }

    /// Detaches every listener. In-flight terminal resolution is not
    /// affected; any registered idle signals fire so pollers can stop.
    pub fn remove_all_listeners(&self) {
        let signals = {
            let mut inner = self.inner.lock().expect("bus lock poisoned");
            inner.listeners.clear();
            inner.all_listeners.clear();
            std::mem::take(&mut inner.idle_signals)
        };
        if !signals.is_empty() {
            trace!(count = signals.len(), "firing idle signals after listener removal");
        }
        for signal in signals {
            signal.fire();
        }
    }

    /// Registers a signal to fire when [`Self::remove_all_listeners`] is
    /// called.
    pub fn on_remove_all(&self, signal: shutdown::Signal) {
        self.inner.lock().expect("bus lock poisoned").idle_signals.push(signal);
    }
}

/// The resolving side of a [`PromiEvent`]. Consumed by the single permitted
/// resolution.
#[derive(Debug)]
pub struct Completer<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Completer<T> {
    /// Resolves the paired [`PromiEvent`]. A dropped [`PromiEvent`] is not
    /// an error; the value is discarded in that case.
    pub fn complete(self, value: T) {
        let _ = self.tx.send(value);
    }
}

/// A one-shot awaitable paired with an event bus, both views over the same
/// asynchronous operation.
///
/// Awaiting yields the terminal value; subscriptions obtained through
/// [`PromiEvent::on`] / [`PromiEvent::on_any`] (or a bus handle cloned
/// before awaiting) keep receiving trailing events after resolution until
/// they are dropped.
#[derive(Debug)]
pub struct PromiEvent<T, K, E> {
    rx: oneshot::Receiver<T>,
    bus: EventBus<K, E>,
}

impl<T, K, E> PromiEvent<T, K, E>
where
    K: Eq + Hash + Copy,
    E: Clone,
{
    /// Subscribes to one event kind.
    pub fn on(&self, kind: K) -> EventStream<E> {
        self.bus.subscribe(kind)
    }

    /// Subscribes to every event kind.
    pub fn on_any(&self) -> EventStream<E> {
        self.bus.subscribe_all()
    }

    /// A bus handle that outlives the awaitable.
    pub fn event_bus(&self) -> EventBus<K, E> {
        self.bus.clone()
    }

    /// Detaches every listener without touching the terminal resolution.
    pub fn remove_all_listeners(&self) {
        self.bus.remove_all_listeners()
    }
}

impl<T, K, E> Future for PromiEvent<T, K, E> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.expect("promievent driver dropped without resolving"))
    }
}

/// Creates the linked driver and consumer halves of one operation.
pub fn promi_event<T, K, E>() -> (Completer<T>, EventBus<K, E>, PromiEvent<T, K, E>)
where
    K: Eq + Hash + Copy,
    E: Clone,
{
    let (tx, rx) = oneshot::channel();
    let bus = EventBus::new();
    (Completer { tx }, bus.clone(), PromiEvent { rx, bus })
}
