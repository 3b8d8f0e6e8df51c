//! Client side of the worker transport.
//!
//! A [`Connection`] sends request frames to a worker and matches response
//! frames back to their callers. Everything else the worker writes, and the
//! single terminal failure of the connection, arrives on the
//! [`Notification`] channel returned next to the connection.
//!
//! Two failures end a connection: [`ConverterError::ConnectionInvalid`] when
//! the worker cannot be started or writes something undecodable, and
//! [`ConverterError::ConnectionInterrupted`] when its output ends while the
//! connection is still in use. Either is reported once, then the notification
//! channel closes. A call in flight fails with the same error.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dvd_archive_core::ConverterError;
use dvd_archive_core::ReaderOutput;
use dvd_archive_core::protocol::{Request, RequestFrame, Response, WorkerFrame};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot, watch};

/// Out-of-band messages from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Output(ReaderOutput),
    /// Terminal; nothing follows it.
    Failed(ConverterError),
}

pub type Notifications = mpsc::UnboundedReceiver<Notification>;

/// How to start a worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub program: PathBuf,
    /// Passed to the worker as `--idle-timeout`; `None` leaves its default.
    pub idle_timeout: Option<Duration>,
}

impl WorkerConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            idle_timeout: None,
        }
    }
}

/// Something that can produce a fresh connection to a worker.
pub trait Connect {
    fn connect(&self) -> (Connection, Notifications);
}

impl Connect for WorkerConfig {
    fn connect(&self) -> (Connection, Notifications) {
        Connection::spawn(self)
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Shared {
    pending: Mutex<HashMap<u64, oneshot::Sender<Response>>>,
    notifications: Mutex<Option<mpsc::UnboundedSender<Notification>>>,
    failure: watch::Sender<Option<ConverterError>>,
    /// Set once the client has stopped sending; the worker's output ending
    /// afterwards is expected.
    closing: AtomicBool,
}

impl Shared {
    fn new(notifications: mpsc::UnboundedSender<Notification>) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            notifications: Mutex::new(Some(notifications)),
            failure: watch::Sender::new(None),
            closing: AtomicBool::new(false),
        }
    }

    fn failure(&self) -> Option<ConverterError> {
        *self.failure.borrow()
    }

    fn notify(&self, output: ReaderOutput) {
        if let Some(tx) = lock(&self.notifications).as_ref() {
            let _ = tx.send(Notification::Output(output));
        }
    }

    fn respond(&self, id: u64, response: Response) {
        match lock(&self.pending).remove(&id) {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => log::warn!("Response to unknown request {id} dropped"),
        }
    }

    /// Record the terminal failure. Only the first one is reported.
    fn fail(&self, error: ConverterError) {
        let first = self.failure.send_if_modified(|failure| {
            if failure.is_some() {
                return false;
            }
            *failure = Some(error);
            true
        });
        if !first {
            return;
        }
        log::warn!("Worker connection failed: {error}");
        if let Some(tx) = lock(&self.notifications).take() {
            let _ = tx.send(Notification::Failed(error));
        }
        lock(&self.pending).clear();
    }

    /// The worker's output ended.
    fn finish(&self) {
        if self.closing.load(Ordering::SeqCst) {
            log::debug!("Worker connection closed");
            lock(&self.notifications).take();
            lock(&self.pending).clear();
        } else {
            self.fail(ConverterError::ConnectionInterrupted);
        }
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// A request/response channel to one worker.
pub struct Connection {
    shared: Arc<Shared>,
    requests: mpsc::UnboundedSender<RequestFrame>,
    next_id: AtomicU64,
    worker_pid: Option<u32>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("worker_pid", &self.worker_pid)
            .field("failure", &self.shared.failure())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Start a worker process and connect to its stdin and stdout.
    ///
    /// Must be called from within a tokio runtime. A worker that cannot be
    /// started gives a connection that has already failed. Dropping the
    /// connection closes the worker's input, which makes it exit.
    pub fn spawn(config: &WorkerConfig) -> (Self, Notifications) {
        let mut command = tokio::process::Command::new(&config.program);
        if let Some(timeout) = config.idle_timeout {
            command.arg("--idle-timeout").arg(timeout.as_secs().to_string());
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                log::error!("Could not start {}: {e}", config.program.display());
                return Self::failed(ConverterError::ConnectionInvalid);
            }
        };
        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Self::failed(ConverterError::ConnectionInvalid);
        };
        log::debug!(
            "Started worker {} (pid {:?})",
            config.program.display(),
            child.id()
        );

        let (mut connection, notifications) = Self::over(stdout, stdin);
        connection.worker_pid = child.id();
        (connection, notifications)
    }

    /// Connect over an existing byte stream pair.
    ///
    /// `from_worker` carries worker frames, `to_worker` takes request frames.
    /// Must be called from within a tokio runtime.
    pub fn over<R, W>(from_worker: R, to_worker: W) -> (Self, Notifications)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (notify_tx, notifications) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::new(notify_tx));
        let (requests, request_rx) = mpsc::unbounded_channel();

        tokio::spawn(read_frames(from_worker, Arc::clone(&shared)));
        tokio::spawn(write_requests(to_worker, request_rx, Arc::clone(&shared)));

        let connection = Self {
            shared,
            requests,
            next_id: AtomicU64::new(1),
            worker_pid: None,
        };
        (connection, notifications)
    }

    fn failed(error: ConverterError) -> (Self, Notifications) {
        let (notify_tx, notifications) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::new(notify_tx));
        shared.fail(error);
        let (requests, _) = mpsc::unbounded_channel();
        let connection = Self {
            shared,
            requests,
            next_id: AtomicU64::new(1),
            worker_pid: None,
        };
        (connection, notifications)
    }

    /// The terminal failure, if the connection has failed.
    pub fn failure(&self) -> Option<ConverterError> {
        self.shared.failure()
    }

    /// Send `request` and wait for its response or for the connection to fail.
    pub async fn call(&self, request: Request) -> Result<Response, ConverterError> {
        let mut failure = self.shared.failure.subscribe();
        if let Some(error) = *failure.borrow_and_update() {
            return Err(error);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.shared.pending).insert(id, tx);
        if self.requests.send(RequestFrame { id, request }).is_err() {
            lock(&self.shared.pending).remove(&id);
            return Err(self.failure().unwrap_or(ConverterError::ConnectionInterrupted));
        }

        tokio::select! {
            response = rx => {
                response.map_err(|_| self.failure().unwrap_or(ConverterError::ConnectionInterrupted))
            }
            failed = failure.wait_for(Option::is_some) => {
                lock(&self.shared.pending).remove(&id);
                let error = failed.ok().and_then(|failure| *failure);
                Err(error.unwrap_or(ConverterError::ConnectionInterrupted))
            }
        }
    }

    /// Send a request that has no response.
    pub fn send(&self, request: Request) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if self.requests.send(RequestFrame { id, request }).is_err() {
            log::debug!("Request {id} not sent, connection is gone");
        }
    }
}

// ---------------------------------------------------------------------------
// I/O tasks
// ---------------------------------------------------------------------------

async fn read_frames<R>(from_worker: R, shared: Arc<Shared>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(from_worker).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Reading from worker failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<WorkerFrame>(&line) {
            Ok(WorkerFrame::Response { id, response }) => shared.respond(id, response),
            Ok(WorkerFrame::Output(output)) => shared.notify(output),
            Err(e) => {
                log::error!("Undecodable worker output: {e}");
                shared.fail(ConverterError::ConnectionInvalid);
                return;
            }
        }
    }
    shared.finish();
}

async fn write_requests<W>(
    mut to_worker: W,
    mut requests: mpsc::UnboundedReceiver<RequestFrame>,
    shared: Arc<Shared>,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = requests.recv().await {
        let mut line = match serde_json::to_vec(&frame) {
            Ok(line) => line,
            Err(e) => {
                log::error!("Could not encode request {}: {e}", frame.id);
                continue;
            }
        };
        line.push(b'\n');
        let written = async {
            to_worker.write_all(&line).await?;
            to_worker.flush().await
        };
        if let Err(e) = written.await {
            log::warn!("Writing to worker failed: {e}");
            shared.fail(ConverterError::ConnectionInterrupted);
            return;
        }
    }
    // The connection was dropped: let the worker see the end of its input.
    shared.closing.store(true, Ordering::SeqCst);
    let _ = to_worker.shutdown().await;
}

#[cfg(test)]
#[path = "tests/connection_tests.rs"]
mod tests;
