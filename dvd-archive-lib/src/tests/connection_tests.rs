use super::*;
use crate::in_process::InProcessWorker;
use dvd_archive_core::protocol::SessionId;
use tokio::io::{DuplexStream, Lines};

// -- Test helpers --

/// The worker's ends of a connection, driven by hand.
struct FakeWorker {
    output: DuplexStream,
    requests: Lines<BufReader<DuplexStream>>,
}

impl FakeWorker {
    async fn write_line(&mut self, line: &str) {
        self.output.write_all(line.as_bytes()).await.unwrap();
        self.output.write_all(b"\n").await.unwrap();
    }

    async fn write_frame(&mut self, frame: &WorkerFrame) {
        self.write_line(&serde_json::to_string(frame).unwrap()).await;
    }

    async fn next_request(&mut self) -> RequestFrame {
        let line = self.requests.next_line().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }
}

fn fake_connection() -> (Connection, Notifications, FakeWorker) {
    let (client_out, worker_in) = tokio::io::duplex(4096);
    let (worker_out, client_in) = tokio::io::duplex(4096);
    let (connection, notifications) = Connection::over(client_in, client_out);
    let worker = FakeWorker {
        output: worker_out,
        requests: BufReader::new(worker_in).lines(),
    };
    (connection, notifications, worker)
}

fn open_request() -> Request {
    Request::Open {
        path: PathBuf::from("/nowhere"),
    }
}

async fn all_notifications(notifications: &mut Notifications) -> Vec<Notification> {
    let mut all = Vec::new();
    while let Some(notification) = notifications.recv().await {
        all.push(notification);
    }
    all
}

// -- Calls --

#[tokio::test]
async fn test_call_in_process_worker() {
    let tmp = tempfile::tempdir().unwrap();
    let (connection, _notifications) = InProcessWorker.connect();

    let response = connection
        .call(Request::Open {
            path: tmp.path().to_path_buf(),
        })
        .await
        .unwrap();
    assert_eq!(response, Response::Opened { session: None });
    assert_eq!(connection.failure(), None);
}

#[tokio::test]
async fn test_outputs_are_routed_to_notifications() {
    let (connection, mut notifications, mut worker) = fake_connection();

    let call = connection.call(open_request());
    let serve = async {
        let request = worker.next_request().await;
        assert_eq!(request.request, open_request());
        worker
            .write_frame(&WorkerFrame::Output(ReaderOutput::warning("careful")))
            .await;
        worker
            .write_frame(&WorkerFrame::Response {
                id: request.id,
                response: Response::Opened {
                    session: Some(SessionId(4)),
                },
            })
            .await;
    };
    let (response, ()) = tokio::join!(call, serve);

    assert_eq!(
        response.unwrap(),
        Response::Opened {
            session: Some(SessionId(4))
        }
    );
    assert_eq!(
        notifications.recv().await,
        Some(Notification::Output(ReaderOutput::warning("careful")))
    );
}

#[tokio::test]
async fn test_send_has_no_response() {
    let (connection, _notifications, mut worker) = fake_connection();
    connection.send(Request::Close {
        session: SessionId(2),
    });

    let request = worker.next_request().await;
    assert_eq!(
        request.request,
        Request::Close {
            session: SessionId(2)
        }
    );
}

// -- Failures --

#[tokio::test]
async fn test_undecodable_output_invalidates_connection() {
    let (connection, mut notifications, mut worker) = fake_connection();

    let call = connection.call(open_request());
    let serve = async {
        worker.next_request().await;
        worker.write_line("this is not a frame").await;
    };
    let (result, ()) = tokio::join!(call, serve);

    assert_eq!(result, Err(ConverterError::ConnectionInvalid));
    assert_eq!(
        all_notifications(&mut notifications).await,
        vec![Notification::Failed(ConverterError::ConnectionInvalid)]
    );
    assert_eq!(connection.failure(), Some(ConverterError::ConnectionInvalid));
}

#[tokio::test]
async fn test_worker_exit_interrupts_connection() {
    let (connection, mut notifications, worker) = fake_connection();

    let call = connection.call(open_request());
    let FakeWorker { output, requests } = worker;
    drop(output);
    assert_eq!(call.await, Err(ConverterError::ConnectionInterrupted));

    // Reported once, and later calls fail the same way.
    assert_eq!(
        all_notifications(&mut notifications).await,
        vec![Notification::Failed(ConverterError::ConnectionInterrupted)]
    );
    assert_eq!(
        connection.call(open_request()).await,
        Err(ConverterError::ConnectionInterrupted)
    );
    drop(requests);
}

#[tokio::test]
async fn test_missing_worker_program() {
    let tmp = tempfile::tempdir().unwrap();
    let config = WorkerConfig::new(tmp.path().join("no-such-worker"));
    let (connection, mut notifications) = config.connect();

    assert_eq!(connection.failure(), Some(ConverterError::ConnectionInvalid));
    assert_eq!(
        connection.call(open_request()).await,
        Err(ConverterError::ConnectionInvalid)
    );
    assert_eq!(
        all_notifications(&mut notifications).await,
        vec![Notification::Failed(ConverterError::ConnectionInvalid)]
    );
}

#[tokio::test]
async fn test_dropping_connection_closes_quietly() {
    let (connection, mut notifications) = InProcessWorker.connect();
    drop(connection);
    assert!(all_notifications(&mut notifications).await.is_empty());
}
