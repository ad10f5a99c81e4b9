//! Observer contract between the server core and its host.
//!
//! The core never renders anything. It reports each user-visible line
//! through [`ServerObserver::on_log`] and tells the host which controls
//! should be enabled through [`ServerObserver::on_state_change`].

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::logbook::LogDocument;

/// Which host affordances should be enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub stop: bool,
    pub open_page: bool,
    pub view_logs: bool,
}

impl Controls {
    /// After a successful start.
    pub const fn running() -> Self {
        Self {
            start: false,
            stop: true,
            open_page: true,
            view_logs: true,
        }
    }

    /// After a stop, a failed start, or at launch.
    pub const fn stopped() -> Self {
        Self {
            start: true,
            stop: false,
            open_page: false,
            view_logs: true,
        }
    }
}

pub trait ServerObserver: Send + Sync + 'static {
    fn on_log(&self, message: &str);
    fn on_state_change(&self, controls: Controls);
}

impl<T: ServerObserver + ?Sized> ServerObserver for Arc<T> {
    fn on_log(&self, message: &str) {
        (**self).on_log(message);
    }

    fn on_state_change(&self, controls: Controls) {
        (**self).on_state_change(controls);
    }
}

/// Writes every line through `tracing`. Used by the console host.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ServerObserver for TracingObserver {
    fn on_log(&self, message: &str) {
        if message.starts_with("Error:") {
            tracing::error!("{}", message);
        } else {
            tracing::info!("{}", message);
        }
    }

    fn on_state_change(&self, controls: Controls) {
        tracing::debug!(?controls, "Controls updated");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Log(String),
    Controls(Controls),
}

/// Forwards events over an unbounded channel, for hosts that own a UI
/// thread and drain events on their own schedule.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ServerObserver for ChannelObserver {
    fn on_log(&self, message: &str) {
        // Receiver gone means the host is shutting down.
        let _ = self.tx.send(ServerEvent::Log(message.to_string()));
    }

    fn on_state_change(&self, controls: Controls) {
        let _ = self.tx.send(ServerEvent::Controls(controls));
    }
}

/// The log view: a document every reported line is appended to.
#[derive(Debug, Clone, Default)]
pub struct SharedLogDocument {
    inner: Arc<Mutex<LogDocument>>,
}

impl SharedLogDocument {
    pub fn new(document: LogDocument) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Runs `f` with exclusive access to the document.
    pub fn with<R>(&self, f: impl FnOnce(&mut LogDocument) -> R) -> R {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }

    pub fn text(&self) -> String {
        self.with(|doc| doc.text().to_string())
    }
}

impl ServerObserver for SharedLogDocument {
    fn on_log(&self, message: &str) {
        self.with(|doc| doc.append(message));
    }

    fn on_state_change(&self, _controls: Controls) {}
}

/// Fans events out to two observers.
#[derive(Debug, Clone)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: ServerObserver, B: ServerObserver> ServerObserver for Tee<A, B> {
    fn on_log(&self, message: &str) {
        self.0.on_log(message);
        self.1.on_log(message);
    }

    fn on_state_change(&self, controls: Controls) {
        self.0.on_state_change(controls);
        self.1.on_state_change(controls);
    }
}
