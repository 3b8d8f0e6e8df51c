use super::*;
use crate::connection::{Connect, Notification, Notifications};
use crate::in_process::InProcessWorker;
use dvd_archive_core::ReaderOutput;
use dvd_archive_ifo::fixtures::{sample_disc, write_video_ts};

// -- Test helpers --

fn drain(notifications: &mut Notifications) -> Vec<Notification> {
    let mut all = Vec::new();
    while let Ok(notification) = notifications.try_recv() {
        all.push(notification);
    }
    all
}

// -- Tests --

#[tokio::test]
async fn test_open_and_read() {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();
    let (connection, mut notifications) = InProcessWorker.connect();

    let reader = DvdReader::open(connection, tmp.path()).await.unwrap();
    assert_eq!(reader.path(), tmp.path());
    assert_eq!(reader.session(), SessionId(1));

    let info = reader.info().await.unwrap();
    assert_eq!(info.title_sets.len(), 1);
    assert_eq!(info.provider, "DVD-ARCHIVE-FIXTURE");

    let progress = drain(&mut notifications)
        .into_iter()
        .filter(|n| matches!(n, Notification::Output(ReaderOutput::Progress(_))))
        .count();
    assert!(progress > 0);
}

#[tokio::test]
async fn test_open_empty_directory_is_not_supported() {
    let tmp = tempfile::tempdir().unwrap();
    let (connection, _notifications) = InProcessWorker.connect();
    let result = DvdReader::open(connection, tmp.path()).await;
    assert!(matches!(result, Err(ConverterError::SourceNotSupported)));
}

#[tokio::test]
async fn test_unreadable_disc_is_a_read_error() {
    let tmp = tempfile::tempdir().unwrap();
    let video_ts = write_video_ts(tmp.path(), &sample_disc()).unwrap();
    std::fs::write(video_ts.join("VIDEO_TS.IFO"), vec![0u8; 64]).unwrap();
    let (connection, mut notifications) = InProcessWorker.connect();

    let reader = DvdReader::open(connection, tmp.path()).await.unwrap();
    assert_eq!(reader.info().await, Err(ConverterError::SourceReadError));
    assert!(drain(&mut notifications).contains(&Notification::Output(ReaderOutput::error(
        "could not read VMGI"
    ))));
}

#[tokio::test]
async fn test_sessions_are_closed_on_drop() {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();
    let (connection, mut notifications) = InProcessWorker.connect();

    let reader = DvdReader::open(connection, tmp.path()).await.unwrap();
    drop(reader);

    // The connection went with the reader; the worker shut down cleanly.
    assert_eq!(notifications.recv().await, None);
}
