//! Package-lifecycle notifications bridged into an ordered [`ChangeEvent`] stream.
//!
//! Every [`ChangeEventBridge::subscribe`] call registers exactly one OS listener and records its
//! token in a shared registry. A token leaves the registry exactly once, either through its
//! [`SubscriptionHandle`] or through [`ChangeEventBridge::shutdown`], and only the caller that
//! removed it unregisters it with the OS.

use std::{
    collections::BTreeMap,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::{
    channel::mpsc::{self, UnboundedReceiver, UnboundedSender},
    FutureExt, Stream, StreamExt,
};
use launcher_contract::{ApplicationRecord, ChangeEvent};
use launcher_host::{HostError, ListenerToken, PackageEventSource, PackageListener};
use parking_lot::Mutex;
use thiserror::Error;

use crate::resolver::InventoryResolver;

/// Failure establishing a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The OS refused the package listener. No registration was kept.
    #[error("package listener registration failed: {0}")]
    Registration(#[source] HostError),
    /// The bridge was torn down and accepts no new subscriptions.
    #[error("change-event bridge has shut down")]
    ShutDown,
}

/// Stable identifier of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Subscription state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// No OS listener is registered.
    Unsubscribed,
    /// At least one OS listener is registered.
    Subscribed,
}

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    registrations: BTreeMap<SubscriptionId, ListenerToken>,
    shut_down: bool,
}

#[derive(Clone)]
struct ListenerRegistry {
    source: Arc<dyn PackageEventSource>,
    state: Arc<Mutex<RegistryState>>,
}

impl ListenerRegistry {
    fn release(&self, id: SubscriptionId) {
        let mut state = self.state.lock();
        if let Some(token) = state.registrations.remove(&id) {
            self.source.unregister(token);
            tracing::debug!(
                subscription = id.0,
                remaining = state.registrations.len(),
                "package listener released"
            );
        }
    }
}

/// Bridges OS package notifications to change-event subscribers.
///
/// Dropping the bridge performs [`ChangeEventBridge::shutdown`].
pub struct ChangeEventBridge {
    resolver: InventoryResolver,
    registry: ListenerRegistry,
}

impl ChangeEventBridge {
    /// Creates an unsubscribed bridge.
    pub fn new(resolver: InventoryResolver, source: Arc<dyn PackageEventSource>) -> Self {
        Self {
            resolver,
            registry: ListenerRegistry {
                source,
                state: Arc::new(Mutex::new(RegistryState::default())),
            },
        }
    }

    /// Registers one OS package listener and returns its event stream and cancel handle.
    ///
    /// A second call before cancelling registers an additional, independently tracked listener.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Registration`] when the OS refuses the listener and
    /// [`BridgeError::ShutDown`] after teardown.
    pub fn subscribe(&self) -> Result<(ChangeEventStream, SubscriptionHandle), BridgeError> {
        let mut state = self.registry.state.lock();
        if state.shut_down {
            return Err(BridgeError::ShutDown);
        }

        let id = SubscriptionId(state.next_id + 1);
        let (sender, receiver) = mpsc::unbounded();
        let listener = Arc::new(BridgeListener {
            subscription: id,
            resolver: self.resolver.clone(),
            sender,
        });
        let token = self
            .registry
            .source
            .register(listener)
            .map_err(BridgeError::Registration)?;
        state.next_id = id.0;
        state.registrations.insert(id, token);
        if state.registrations.len() > 1 {
            tracing::warn!(
                subscription = id.0,
                active = state.registrations.len(),
                "additional change-event subscription while another is active"
            );
        } else {
            tracing::debug!(subscription = id.0, "change-event subscription opened");
        }

        Ok((
            ChangeEventStream { receiver },
            SubscriptionHandle {
                id,
                registry: self.registry.clone(),
            },
        ))
    }

    /// Current subscription state.
    pub fn state(&self) -> BridgeState {
        if self.active_subscriptions() == 0 {
            BridgeState::Unsubscribed
        } else {
            BridgeState::Subscribed
        }
    }

    /// Number of OS listeners this bridge currently holds.
    pub fn active_subscriptions(&self) -> usize {
        self.registry.state.lock().registrations.len()
    }

    /// Unregisters every listener this bridge still holds and rejects later subscriptions.
    ///
    /// Outstanding handles become no-ops. Calling this more than once is harmless.
    pub fn shutdown(&self) {
        let mut state = self.registry.state.lock();
        state.shut_down = true;
        let registrations = std::mem::take(&mut state.registrations);
        for (id, token) in &registrations {
            self.registry.source.unregister(*token);
            tracing::debug!(subscription = id.0, "package listener released at teardown");
        }
    }
}

impl Drop for ChangeEventBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cancel handle for one subscription. Dropping it cancels the subscription.
#[must_use = "dropping a subscription handle cancels the subscription"]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    registry: ListenerRegistry,
}

impl SubscriptionHandle {
    /// Identifier of the subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unregisters the OS listener behind this subscription. Repeated calls are no-ops.
    pub fn cancel(&self) {
        self.registry.release(self.id);
    }

    /// Whether the listener behind this handle is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .state
            .lock()
            .registrations
            .contains_key(&self.id)
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .finish()
    }
}

/// Ordered stream of change events for one subscription.
///
/// The stream ends once its listener is released and every queued event was read.
#[derive(Debug)]
pub struct ChangeEventStream {
    receiver: UnboundedReceiver<ChangeEvent>,
}

impl ChangeEventStream {
    /// Returns the next queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<ChangeEvent> {
        self.receiver.next().now_or_never().flatten()
    }
}

impl Stream for ChangeEventStream {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

struct BridgeListener {
    subscription: SubscriptionId,
    resolver: InventoryResolver,
    sender: UnboundedSender<ChangeEvent>,
}

impl BridgeListener {
    fn emit_resolved(&self, package_name: &str, build: fn(Vec<ApplicationRecord>) -> ChangeEvent) {
        let records = self.resolver.resolve_for_package(package_name);
        if records.is_empty() {
            tracing::debug!(
                subscription = self.subscription.0,
                package = package_name,
                "package has no launchable activity; no event"
            );
            return;
        }
        self.emit(build(records));
    }

    fn emit(&self, event: ChangeEvent) {
        let action = event.action();
        if self.sender.unbounded_send(event).is_err() {
            tracing::debug!(
                subscription = self.subscription.0,
                action,
                "change-event subscriber is gone; event discarded"
            );
        }
    }
}

impl PackageListener for BridgeListener {
    fn on_package_added(&self, package_name: &str) {
        self.emit_resolved(package_name, |records| ChangeEvent::Added { records });
    }

    fn on_package_changed(&self, package_name: &str) {
        self.emit_resolved(package_name, |records| ChangeEvent::Changed { records });
    }

    fn on_package_removed(&self, package_name: &str) {
        self.emit(ChangeEvent::Removed {
            package_name: package_name.to_string(),
        });
    }

    fn on_packages_available(&self, package_names: &[String], _replacing: bool) {
        tracing::trace!(count = package_names.len(), "ignoring packages-available");
    }

    fn on_packages_unavailable(&self, package_names: &[String], _replacing: bool) {
        tracing::trace!(count = package_names.len(), "ignoring packages-unavailable");
    }
}
