//! Server start/stop state machine
//!
//! A [`ServerLifecycle`] owns at most one listening socket and one accept
//! loop. Starting while not stopped is refused, stopping is always safe.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::config::ServerConfig;
use crate::error::{ConfigError, ServerError};
use crate::events::{Controls, ServerObserver};
use crate::http::resolver::ServeRoot;
use crate::server::listener::{self, LoopExit};

/// Current state of the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// The bound listener's accept task and the flag that ends it.
struct RunningServer {
    port: u16,
    local_addr: SocketAddr,
    running: watch::Sender<bool>,
    accept_task: JoinHandle<()>,
}

pub struct ServerLifecycle<O: ServerObserver> {
    observer: Arc<O>,
    state: Arc<Mutex<ServerState>>,
    server: Option<RunningServer>,
}

impl<O: ServerObserver> ServerLifecycle<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer: Arc::new(observer),
            state: Arc::new(Mutex::new(ServerState::Stopped)),
            server: None,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn state(&self) -> ServerState {
        read_state(&self.state)
    }

    /// Address the listener is bound to while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match self.state() {
            ServerState::Running => self.server.as_ref().map(|s| s.local_addr),
            _ => None,
        }
    }

    /// Page a browser should open while the server is running.
    pub fn page_url(&self) -> Option<Url> {
        let port = match self.state() {
            ServerState::Running => self.server.as_ref()?.port,
            _ => return None,
        };
        Url::parse(&format!("http://localhost:{}/", port)).ok()
    }

    /// Checks and reports a directory chosen by the user.
    pub async fn select_directory(&self, path: &Path) -> Result<PathBuf, ConfigError> {
        match ServeRoot::new(path).await {
            Ok(root) => {
                let selected = root.path().to_path_buf();
                self.observer
                    .on_log(&format!("Directory selected: {}", selected.display()));
                Ok(selected)
            }
            Err(e) => {
                self.observer.on_log(&e.to_string());
                Err(e)
            }
        }
    }

    /// Validates `config`, binds the listener and spawns the accept loop.
    ///
    /// Returns once the socket is bound; serving happens on a separate task.
    pub async fn start(&mut self, config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        if self.state() != ServerState::Stopped {
            let err = ServerError::AlreadyRunning;
            self.observer.on_log(&err.to_string());
            return Err(err);
        }

        // The previous accept loop may have died on its own.
        if let Some(stale) = self.server.take() {
            let _ = stale.running.send(false);
            let _ = stale.accept_task.await;
        }

        self.set_state(ServerState::Starting);

        let root = match config.validate().await {
            Ok(root) => Arc::new(root),
            Err(e) => {
                self.set_state(ServerState::Stopped);
                tracing::warn!("Rejected server configuration: {}", e);
                self.observer.on_log(&e.to_string());
                return Err(e.into());
            }
        };

        let listener = match TcpListener::bind((config.host.as_str(), config.port)).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("Failed to bind {}:{}: {}", config.host, config.port, e);
                let err = ServerError::Bind(e);
                self.set_state(ServerState::Stopped);
                self.observer.on_log(&err.to_string());
                self.observer.on_state_change(Controls::stopped());
                return Err(err);
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                let err = ServerError::Bind(e);
                self.set_state(ServerState::Stopped);
                self.observer.on_log(&err.to_string());
                self.observer.on_state_change(Controls::stopped());
                return Err(err);
            }
        };

        let root_display = root.path().display().to_string();
        let (running, running_rx) = watch::channel(true);
        let task_state = Arc::clone(&self.state);
        let task_observer = Arc::clone(&self.observer);

        let accept_task = tokio::spawn(async move {
            if let LoopExit::Failed(e) = listener::run(listener, root, running_rx).await {
                tracing::error!("Accept loop failed: {}", e);
                write_state(&task_state, ServerState::Stopped);
                task_observer.on_log("Error: Server stopped unexpectedly.");
                task_observer.on_state_change(Controls::stopped());
            }
        });

        self.server = Some(RunningServer {
            port: config.port,
            local_addr,
            running,
            accept_task,
        });
        self.set_state(ServerState::Running);

        tracing::info!(root = %root_display, addr = %local_addr, "Server running");
        self.observer
            .on_log(&format!("Server started on port: {}", config.port));
        self.observer.on_state_change(Controls::running());

        Ok(local_addr)
    }

    /// Clears the running flag and waits for the accept loop to close the
    /// listener. Calling it while stopped only resets the controls.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(server) = self.server.take() else {
            self.set_state(ServerState::Stopped);
            self.observer.on_state_change(Controls::stopped());
            return Ok(());
        };

        self.set_state(ServerState::Stopping);

        // Fails only if the loop already ended.
        let _ = server.running.send(false);
        let joined = server.accept_task.await;

        self.set_state(ServerState::Stopped);

        let outcome = match joined {
            Ok(()) => {
                self.observer.on_log("Server stopped.");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Accept loop did not shut down cleanly: {}", e);
                let err = ServerError::Stop;
                self.observer.on_log(&err.to_string());
                Err(err)
            }
        };

        self.observer.on_state_change(Controls::stopped());
        outcome
    }

    fn set_state(&self, state: ServerState) {
        write_state(&self.state, state);
    }
}

fn read_state(state: &Mutex<ServerState>) -> ServerState {
    match state.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_state(state: &Mutex<ServerState>, next: ServerState) {
    let mut guard = match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    tracing::debug!(from = ?*guard, to = ?next, "Server state");
    *guard = next;
}
