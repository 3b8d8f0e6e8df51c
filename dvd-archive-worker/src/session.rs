//! Open discs held by the worker.
//!
//! Every open session pins the worker alive through [`KeepAlive`]. The pin
//! is released by the session's cleanup when it is closed, so an idle worker
//! with no open sessions is free to exit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dvd_archive_core::protocol::SessionId;
use dvd_archive_ifo::DiscReader;

/// Reference count of reasons for the worker to stay alive.
#[derive(Debug, Clone, Default)]
pub struct KeepAlive {
    pins: Arc<AtomicUsize>,
}

impl KeepAlive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a pin; the worker stays alive until the returned guard is dropped.
    pub fn pin(&self) -> Pin {
        self.pins.fetch_add(1, Ordering::SeqCst);
        Pin {
            pins: Arc::clone(&self.pins),
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pins.load(Ordering::SeqCst) > 0
    }
}

/// Guard returned by [`KeepAlive::pin`].
#[derive(Debug)]
pub struct Pin {
    pins: Arc<AtomicUsize>,
}

impl Drop for Pin {
    fn drop(&mut self) {
        self.pins.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A disc reader shared with the blocking task that reads from it.
pub type SharedReader = Arc<Mutex<DiscReader>>;

struct Session {
    reader: SharedReader,
    cleanup: Box<dyn FnOnce() + Send>,
}

/// Mapping from session id to reader state.
pub struct SessionTable {
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
    keep_alive: KeepAlive,
}

impl SessionTable {
    pub fn new(keep_alive: KeepAlive) -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 1,
            keep_alive,
        }
    }

    /// Register an opened disc under a fresh session id.
    pub fn insert(&mut self, reader: DiscReader) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;

        let pin = self.keep_alive.pin();
        let path = reader.path().to_path_buf();
        let cleanup = Box::new(move || {
            log::debug!("Released {}", path.display());
            drop(pin);
        });
        log::info!("Opened {id} for {}", reader.path().display());
        self.sessions.insert(
            id,
            Session {
                reader: Arc::new(Mutex::new(reader)),
                cleanup,
            },
        );
        id
    }

    pub fn reader(&self, id: SessionId) -> Option<SharedReader> {
        self.sessions.get(&id).map(|session| Arc::clone(&session.reader))
    }

    /// Close a session. Unknown ids are ignored.
    pub fn close(&mut self, id: SessionId) {
        match self.sessions.remove(&id) {
            Some(session) => {
                (session.cleanup)();
                log::info!("Closed {id}");
            }
            None => log::debug!("Close of unknown {id} ignored"),
        }
    }

    pub fn close_all(&mut self) {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Drop for SessionTable {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
