// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing::{error, info, warn};

use self_custody_gateway::{
    acknowledgment::{AcknowledgmentStore, InMemoryAcknowledgmentStore},
    api::router,
    backend::{BackendError, HttpCustodyBackend},
    config::{AckStoreKind, Config},
    logging::init_tracing,
    state::AppState,
    storage::{
        AckDbError, FileAcknowledgmentStore, FileStorage, RedbAcknowledgmentStore, StorageError,
        StoragePaths,
    },
};

/// Time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to install rustls crypto provider")]
    CryptoProvider,

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("acknowledgment database: {0}")]
    AckDb(#[from] AckDbError),

    #[error("custody backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to load TLS certificate: {0}")]
    Tls(std::io::Error),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Self-custody gateway stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    // Must happen before any TLS operation
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| StartupError::CryptoProvider)?;

    let paths = StoragePaths::new(&config.data_dir);
    let mut storage = FileStorage::new(paths.clone());
    storage.initialize()?;

    let ack_store = open_ack_store(config.ack_store, &storage, &paths)?;
    let backend = HttpCustodyBackend::new(config.backend_url.clone(), config.backend_timeout)?;

    if config.jwt.secret.is_none() {
        warn!("JWT_SECRET not set: tokens are NOT signature-checked (development mode)");
    }

    let state = AppState::new(storage, ack_store, Arc::new(backend))
        .with_auth_config(config.jwt.clone())
        .with_history_cache_ttl(config.history_cache_ttl)
        .with_pending_stale_after(config.pending_stale_after);
    let app = router(state);

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    let addr = config.bind_addr;
    match config.tls {
        Some(tls) => {
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .map_err(StartupError::Tls)?;
            info!(%addr, backend = %config.backend_url, "Self-custody gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            info!(%addr, backend = %config.backend_url, "Self-custody gateway listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .map_err(StartupError::Serve)
        }
    }
}

fn open_ack_store(
    kind: AckStoreKind,
    storage: &FileStorage,
    paths: &StoragePaths,
) -> Result<Arc<dyn AcknowledgmentStore>, StartupError> {
    let store: Arc<dyn AcknowledgmentStore> = match kind {
        AckStoreKind::File => Arc::new(FileAcknowledgmentStore::new(storage.clone())),
        AckStoreKind::Redb => Arc::new(RedbAcknowledgmentStore::open(&paths.acknowledgment_db())?),
        AckStoreKind::Memory => {
            warn!("ACK_STORE=memory: acknowledgments are lost on restart");
            Arc::new(InMemoryAcknowledgmentStore::new())
        }
    };
    info!(store = ?kind, "Acknowledgment store ready");
    Ok(store)
}

async fn shutdown_signal(handle: Handle<std::net::SocketAddr>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            _ => {
                warn!("Could not install signal handlers, graceful shutdown disabled");
                return;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Could not install Ctrl+C handler, graceful shutdown disabled");
            return;
        }
        info!("Received Ctrl+C");
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
