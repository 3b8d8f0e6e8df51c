//! The worker's request loop.
//!
//! Requests are read one JSON line at a time and handled strictly in order.
//! Disc access runs on the blocking thread pool; everything the worker writes
//! goes through a single writer task so response and output frames never
//! interleave within a line.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use dvd_archive_core::ReaderOutput;
use dvd_archive_core::protocol::{Request, RequestFrame, Response, SessionId, WorkerFrame};
use dvd_archive_ifo::DiscReader;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::session::{KeepAlive, SessionTable, SharedReader};

/// Default time an unpinned worker waits for a request before exiting.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Exit after this long without requests while no session is open.
    /// `None` waits forever.
    pub idle_timeout: Option<Duration>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
        }
    }
}

type FrameSender = mpsc::UnboundedSender<WorkerFrame>;

/// Serve requests from `input` until it closes or the worker goes idle.
///
/// All sessions are closed before returning.
pub async fn serve<R, W>(input: R, output: W, config: ServeConfig) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (frames, frame_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_frames(output, frame_rx));

    let keep_alive = KeepAlive::new();
    let mut sessions = SessionTable::new(keep_alive.clone());
    let mut lines = BufReader::new(input).lines();

    loop {
        let next = match config.idle_timeout {
            Some(limit) if !keep_alive.is_pinned() => {
                match tokio::time::timeout(limit, lines.next_line()).await {
                    Ok(next) => next,
                    Err(_) => {
                        log::info!("No request for {}s, exiting", limit.as_secs());
                        break;
                    }
                }
            }
            _ => lines.next_line().await,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::debug!("Input closed");
                break;
            }
            Err(e) => {
                log::error!("Reading requests failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let frame: RequestFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Ignoring undecodable request: {e}");
                continue;
            }
        };
        if let Some(response) = handle(frame.request, &mut sessions, &frames).await {
            let _ = frames.send(WorkerFrame::Response {
                id: frame.id,
                response,
            });
        }
    }

    sessions.close_all();
    drop(frames);
    match writer.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::other(e)),
    }
}

/// Handle one request. `Close` has no response.
async fn handle(
    request: Request,
    sessions: &mut SessionTable,
    frames: &FrameSender,
) -> Option<Response> {
    match request {
        Request::Open { path } => Some(Response::Opened {
            session: open(path, sessions).await,
        }),
        Request::ReadInfo { session } => {
            let reader = sessions.reader(session);
            Some(Response::Info {
                payload: read_info(session, reader, frames).await,
            })
        }
        Request::Close { session } => {
            sessions.close(session);
            None
        }
    }
}

async fn open(path: PathBuf, sessions: &mut SessionTable) -> Option<SessionId> {
    let opened = tokio::task::spawn_blocking(move || DiscReader::open(&path)).await;
    match opened {
        Ok(Ok(reader)) => Some(sessions.insert(reader)),
        Ok(Err(e)) => {
            log::info!("Not opening: {e}");
            None
        }
        Err(e) => {
            log::error!("Open task failed: {e}");
            None
        }
    }
}

async fn read_info(
    session: SessionId,
    reader: Option<SharedReader>,
    frames: &FrameSender,
) -> Option<String> {
    let Some(reader) = reader else {
        log::warn!("Read of unknown {session}");
        return None;
    };
    let frames = frames.clone();
    match tokio::task::spawn_blocking(move || read_blocking(&reader, &frames)).await {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Read task for {session} failed: {e}");
            None
        }
    }
}

/// Read a disc, forwarding its output as frames while the read runs.
fn read_blocking(reader: &SharedReader, frames: &FrameSender) -> Option<String> {
    let (tx, rx) = std_mpsc::channel::<ReaderOutput>();
    std::thread::scope(|scope| {
        scope.spawn(move || {
            for output in rx {
                if frames.send(WorkerFrame::Output(output)).is_err() {
                    break;
                }
            }
        });

        let reader = match reader.lock() {
            Ok(reader) => reader,
            Err(poisoned) => poisoned.into_inner(),
        };
        let payload = match reader.read_info(&tx) {
            Ok(info) => match serde_json::to_string(&info) {
                Ok(json) => Some(json),
                Err(e) => {
                    log::error!("Could not serialize {}: {e}", reader.path().display());
                    None
                }
            },
            Err(e) => {
                log::error!("Reading {} failed: {e}", reader.path().display());
                let _ = tx.send(ReaderOutput::error(e.to_string()));
                None
            }
        };
        drop(tx);
        payload
    })
}

async fn write_frames<W>(
    mut output: W,
    mut frames: mpsc::UnboundedReceiver<WorkerFrame>,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.recv().await {
        let mut line = serde_json::to_vec(&frame).map_err(io::Error::other)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    output.shutdown().await
}

#[cfg(test)]
#[path = "tests/serve_tests.rs"]
mod tests;
