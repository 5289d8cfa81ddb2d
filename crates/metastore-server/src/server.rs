use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use metastore_codec::{Format, MetadataCodec};
use metastore_store::{InMemoryMetadataStore, SharedStore};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router_with_limit;

/// HTTP front end for one shared metadata store.
pub struct MetastoreServer {
    config: ServerConfig,
    store: SharedStore,
}

impl MetastoreServer {
    pub fn new(config: ServerConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    /// Server over a fresh, empty store.
    pub fn with_empty_store(config: ServerConfig) -> Self {
        Self::new(config, Arc::new(InMemoryMetadataStore::new()))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle to the served store; mutations through it are visible to
    /// HTTP clients immediately.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router_with_limit(self.store(), self.config.max_body_bytes)
    }

    /// Populate the store from `config.snapshot`, if one is configured.
    /// Returns the number of identifiers loaded.
    pub fn load_snapshot(&self) -> ServerResult<usize> {
        let Some(path) = &self.config.snapshot else {
            return Ok(0);
        };
        let format = Format::from_extension(path).ok_or_else(|| {
            ServerError::Config(format!(
                "cannot infer snapshot format from {}",
                path.display()
            ))
        })?;
        let data = std::fs::read(path)?;
        MetadataCodec::decode_into(&*self.store, &data, format)?;
        let count = self.store.len();
        tracing::info!(path = %path.display(), %format, identifiers = count, "loaded snapshot");
        Ok(count)
    }

    /// Serve until the process is terminated.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("metastore server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("metastore server stopped");
        Ok(())
    }
}
