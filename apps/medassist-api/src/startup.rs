//! Application lifecycle: build, serve, shut down

use std::future::Future;

use axum::Router;
use medassist_domain::{
    ports::{CrmForwarder, DocumentStore},
    storage::StorageError,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    config::Config,
    notifier::CrmDispatcher,
    routes::{create_router, Mount},
    state::AppState,
    store::DocumentBackend,
};

#[derive(Error, Debug)]
pub enum StartupError {
    /// The document store did not answer the connectivity check
    #[error("Document store is unreachable: {0}")]
    StoreUnavailable(#[source] StorageError),
}

/// A fully wired server, ready to serve
pub struct Application {
    router: Router,
    store: DocumentBackend,
    dispatcher: CrmDispatcher,
}

impl Application {
    /// Verify the store, start CRM delivery and compose the router
    ///
    /// # Errors
    ///
    /// `StartupError::StoreUnavailable` when the store cannot be reached. The
    /// store handle is closed before returning.
    ///
    /// # Panics
    ///
    /// When two mounts register the same path and method.
    pub async fn build<F>(
        config: &Config,
        store: DocumentBackend,
        forwarder: F,
        mounts: Vec<Mount>,
    ) -> Result<Self, StartupError>
    where
        F: CrmForwarder + 'static,
    {
        if let Err(err) = store.verify_connection().await {
            error!(error = %err, "Document store check failed, aborting startup");
            store.close();
            return Err(StartupError::StoreUnavailable(err));
        }
        info!("Document store is reachable");

        let dispatcher = CrmDispatcher::spawn(
            forwarder,
            config.crm.retry.clone(),
            config.crm.queue_capacity,
        );
        let state = AppState::new(store.clone(), dispatcher.clone());
        let router = create_router(state, &config.http, mounts);

        info!(
            origins = ?config.http.allowed_origins,
            same_site = ?config.http.session.same_site,
            secure_cookie = config.http.session.secure,
            "HTTP middleware configured"
        );

        Ok(Self {
            router,
            store,
            dispatcher,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish
    pub async fn serve<S>(&self, listener: TcpListener, shutdown: S) -> std::io::Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Drain pending CRM deliveries, then release the store. Idempotent.
    pub async fn shutdown(&self) {
        info!("Shutting down");
        self.dispatcher.shutdown().await;
        self.store.close();
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, initiating shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating shutdown"),
    }
}
