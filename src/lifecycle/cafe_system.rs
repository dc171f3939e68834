use crate::kitchen::{KitchenSettings, KitchenView};
use crate::lifecycle::{CafeConfig, StoreBackend};
use crate::order_form::{ConfirmationTimings, OrderForm};
use crate::store::{Datastore, MemoryStore, RestDatastore};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The running café: one datastore shared by every order form and kitchen view.
///
/// `CafeSystem` is responsible for:
/// - **Backend selection**: starting the in-memory store actor or connecting to a hosted store
/// - **Wiring**: handing the same datastore to every form and view it creates
/// - **Shutdown**: stopping the store actor once nothing uses it anymore
///
/// # Example
///
/// ```ignore
/// let system = CafeSystem::start(&CafeConfig::default());
///
/// let form = system.order_form();
/// let mut kitchen = system.kitchen_view();
/// kitchen.mount();
///
/// // ... take orders ...
///
/// kitchen.unmount().await;
/// drop(kitchen);
/// drop(form);
/// system.shutdown().await?;
/// ```
pub struct CafeSystem {
    store: Option<Arc<dyn Datastore>>,
    kitchen: KitchenSettings,
    confirmation: ConfirmationTimings,
    /// Task handle of the in-memory store actor, if that backend is in use.
    handle: Option<JoinHandle<()>>,
}

impl CafeSystem {
    /// Starts the configured backend.
    ///
    /// A hosted backend with missing credentials does not fail start-up: the system runs
    /// without a datastore, forms reject submits with a configuration error and kitchen
    /// views stay empty.
    pub fn start(config: &CafeConfig) -> Self {
        let (store, handle) = match config.store.backend {
            StoreBackend::Memory => {
                let (actor, client) = MemoryStore::new(config.store.buffer.max(1));
                let handle = tokio::spawn(actor.run());
                let store: Arc<dyn Datastore> = Arc::new(client);
                (Some(store), Some(handle))
            }
            StoreBackend::Rest => match (&config.store.url, &config.store.api_key) {
                (Some(url), Some(key)) => {
                    let rest = RestDatastore::new(url, &config.store.table, key.clone());
                    info!(endpoint = rest.endpoint(), "Using hosted order store");
                    let store: Arc<dyn Datastore> = Arc::new(rest);
                    (Some(store), None)
                }
                _ => {
                    warn!("Hosted order store selected but url or api_key is missing");
                    (None, None)
                }
            },
        };

        Self {
            store,
            kitchen: config.kitchen,
            confirmation: config.confirmation,
            handle,
        }
    }

    /// Wraps an existing datastore, e.g. a mock.
    pub fn with_store(
        store: Option<Arc<dyn Datastore>>,
        kitchen: KitchenSettings,
        confirmation: ConfirmationTimings,
    ) -> Self {
        Self {
            store,
            kitchen,
            confirmation,
            handle: None,
        }
    }

    /// `false` when no datastore could be configured.
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// A new, empty order form.
    pub fn order_form(&self) -> OrderForm {
        OrderForm::new(self.store.clone(), self.confirmation)
    }

    /// A new, unmounted kitchen view.
    pub fn kitchen_view(&self) -> KitchenView {
        KitchenView::new(self.store.clone(), self.kitchen)
    }

    /// Shuts the system down.
    ///
    /// The in-memory store exits once its last client is gone, so drop every
    /// form and view handed out before calling this; otherwise this waits for them.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down cafe...");

        drop(self.store);

        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                error!("Order store task failed: {:?}", e);
                return Err(format!("Order store task failed: {:?}", e));
            }
        }

        info!("Cafe shutdown complete.");
        Ok(())
    }
}
