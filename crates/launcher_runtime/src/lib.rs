//! Launchable-application inventory and package change-event runtime for the TV launcher shell.
//!
//! The runtime answers cold inventory snapshots synchronously and streams package deltas to a
//! single subscriber afterwards. OS access is injected through
//! [`launcher_host::LauncherHostServices`], so this crate never touches platform bindings.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod resolver;

use launcher_contract::{ApplicationRecord, MethodCall, MethodResponse};
use launcher_host::LauncherHostServices;

pub use bridge::{
    BridgeError, BridgeState, ChangeEventBridge, ChangeEventStream, SubscriptionHandle,
    SubscriptionId,
};
pub use config::{ConfigError, LauncherConfig};
pub use dispatch::{parse_method, DispatchError, MethodDispatcher};
pub use resolver::InventoryResolver;

/// Owner of the inventory resolver, change-event bridge, and method dispatcher.
///
/// Dropping the runtime unregisters every package listener it ever registered, including those
/// whose handles were never cancelled.
pub struct LauncherRuntime {
    config: LauncherConfig,
    resolver: InventoryResolver,
    bridge: ChangeEventBridge,
    dispatcher: MethodDispatcher,
}

impl LauncherRuntime {
    /// Wires a runtime over injected host services.
    pub fn new(services: LauncherHostServices, config: LauncherConfig) -> Self {
        let resolver = InventoryResolver::new(services.catalog);
        let bridge = ChangeEventBridge::new(resolver.clone(), services.package_events);
        let dispatcher = MethodDispatcher::new(resolver.clone(), services.commands, config.clone());
        tracing::debug!(
            method_channel = %config.method_channel,
            event_channel = %config.event_channel,
            "launcher runtime ready"
        );
        Self {
            config,
            resolver,
            bridge,
            dispatcher,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Cold snapshot of every launchable application.
    pub fn get_inventory(&self) -> Vec<ApplicationRecord> {
        self.resolver.resolve_all()
    }

    /// Opens a change-event subscription.
    ///
    /// # Errors
    ///
    /// Returns an error when the OS refuses the listener or the runtime was shut down.
    pub fn subscribe(&self) -> Result<(ChangeEventStream, SubscriptionHandle), BridgeError> {
        self.bridge.subscribe()
    }

    /// Current subscription state of the change-event bridge.
    pub fn subscription_state(&self) -> BridgeState {
        self.bridge.state()
    }

    /// Executes one method-channel call.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown methods or invalid arguments.
    pub fn handle_method(&self, call: &MethodCall) -> Result<MethodResponse, DispatchError> {
        self.dispatcher.handle_call(call)
    }

    /// Method dispatcher shared with the platform shell's channel handler.
    pub fn dispatcher(&self) -> &MethodDispatcher {
        &self.dispatcher
    }

    /// Releases every package listener and rejects further subscriptions.
    pub fn shutdown(&self) {
        tracing::debug!(
            active = self.bridge.active_subscriptions(),
            "launcher runtime shutting down"
        );
        self.bridge.shutdown();
    }
}
