use std::sync::Arc;

use medassist_domain::ReceptionService;

use crate::{notifier::CrmDispatcher, store::DocumentBackend};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub reception: Arc<ReceptionService<DocumentBackend, CrmDispatcher>>,
    /// Handle used by the readiness probe
    pub store: DocumentBackend,
}

impl AppState {
    pub fn new(store: DocumentBackend, dispatcher: CrmDispatcher) -> Self {
        Self {
            reception: Arc::new(ReceptionService::new(store.clone(), dispatcher)),
            store,
        }
    }
}
