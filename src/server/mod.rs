mod error;
mod port;


pub use error::ServerError;
pub use port::{find_free_port, port_in_use};

use axum::Router;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Port tried first when the caller does not ask for one.
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime record of one bound static-file server. Owned exclusively by
/// the manager's registry; never persisted.
pub struct ServerHandle {
    port: u16,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Registry of running environment servers, one per environment name.
///
/// Shutdown is an explicit contract: callers must invoke [`stop`] or
/// [`stop_all`] before the manager goes away; dropping it does not
/// stop listeners. The binary wires `stop_all` to Ctrl-C.
///
/// [`stop`]: Self::stop
/// [`stop_all`]: Self::stop_all
pub struct ServerManager {
    base_dir: PathBuf,
    registry: Mutex<HashMap<String, ServerHandle>>,
}

impl ServerManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Start a static-file server for an environment and return its URL.
    ///
    /// Idempotent per name: if a server is already registered, its URL
    /// is returned unchanged and nothing rebinds. The registry lock is
    /// held across probe, bind and register, so two concurrent starts
    /// for the same name cannot both bind. A failed bind leaves no
    /// registry entry behind.
    pub async fn start(
        &self,
        env_name: &str,
        preferred_port: Option<u16>,
    ) -> Result<String, ServerError> {
        let env_path = self.base_dir.join(env_name);
        if !env_path.is_dir() {
            return Err(ServerError::EnvironmentNotFound(env_name.to_string()));
        }

        let mut registry = self.registry.lock().await;
        if let Some(handle) = registry.get(env_name) {
            return Ok(handle.url());
        }

        let mut resolved_port = preferred_port.unwrap_or(DEFAULT_PORT);
        if port::port_in_use(resolved_port).await {
            let next = resolved_port
                .checked_add(1)
                .ok_or(ServerError::NoFreePorts {
                    start: resolved_port,
                })?;
            resolved_port = port::find_free_port(next).await?;
        }

        let listener = TcpListener::bind(("127.0.0.1", resolved_port))
            .await
            .map_err(|source| ServerError::BindFailed {
                port: resolved_port,
                source,
            })?;

        let app = Router::new().fallback_service(ServeDir::new(&env_path));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let name_for_task = env_name.to_string();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = result {
                error!(env = %name_for_task, "static server exited with error: {}", e);
            }
        });

        let handle = ServerHandle {
            port: resolved_port,
            shutdown_tx,
            task,
        };
        let url = handle.url();
        registry.insert(env_name.to_string(), handle);

        info!(env = env_name, port = resolved_port, "static server started");
        Ok(url)
    }

    /// Stop the server for an environment, if one is registered.
    ///
    /// Waits for the serve task to finish so the port is released by
    /// the time this returns. No-op for unknown names.
    pub async fn stop(&self, env_name: &str) {
        let handle = self.registry.lock().await.remove(env_name);
        if let Some(handle) = handle {
            let _ = handle.shutdown_tx.send(());
            let _ = handle.task.await;
            info!(env = env_name, port = handle.port, "static server stopped");
        }
    }

    /// Stop every registered server. Safe to call with an empty registry.
    pub async fn stop_all(&self) {
        let names: Vec<String> = self.registry.lock().await.keys().cloned().collect();
        for name in names {
            self.stop(&name).await;
        }
    }

    /// URL of the running server for an environment, if any. Pure lookup.
    pub async fn url_for(&self, env_name: &str) -> Option<String> {
        self.registry
            .lock()
            .await
            .get(env_name)
            .map(ServerHandle::url)
    }

    /// Whether a server is registered for an environment.
    pub async fn is_running(&self, env_name: &str) -> bool {
        self.registry.lock().await.contains_key(env_name)
    }

    /// Number of currently registered servers.
    pub async fn running_count(&self) -> usize {
        self.registry.lock().await.len()
    }
}
