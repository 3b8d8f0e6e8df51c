use super::*;
use crate::connection::WorkerConfig;
use crate::in_process::InProcessWorker;
use dvd_archive_ifo::fixtures::{sample_disc, write_video_ts};

// -- Test helpers --

fn statuses(mut rx: mpsc::UnboundedReceiver<ImportStatus>) -> Vec<ImportStatus> {
    let mut all = Vec::new();
    while let Ok(status) = rx.try_recv() {
        all.push(status);
    }
    all
}

// -- Tests --

#[tokio::test]
async fn test_import_sample_disc() {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();

    let mut importer = Importer::open(tmp.path(), &InProcessWorker).await.unwrap();
    assert_eq!(importer.source(), tmp.path());

    let (tx, rx) = mpsc::unbounded_channel();
    let info = importer.generate(tx).await.unwrap();
    assert_eq!(info.titles_by_global_index().len(), 2);

    // Every progress update of the read reached the status channel.
    let last = statuses(rx).into_iter().rev().find_map(|status| match status {
        ImportStatus::Progress(update) => Some((update.completed, update.total)),
        ImportStatus::Message { .. } => None,
    });
    assert_eq!(last, Some((2000, 2000)));
}

#[tokio::test]
async fn test_unsupported_source() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Importer::open(tmp.path(), &InProcessWorker).await;
    assert!(matches!(
        result,
        Err(ImportError::SourceNotSupported(path)) if path == tmp.path()
    ));
}

#[tokio::test]
async fn test_consistency_warnings_become_status_messages() {
    let mut disc = sample_disc();
    disc.title_set_count = 2;
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &disc).unwrap();

    let mut importer = Importer::open(tmp.path(), &InProcessWorker).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    importer.generate(tx).await.unwrap();

    let messages: Vec<(Severity, String)> = statuses(rx)
        .into_iter()
        .filter_map(|status| match status {
            ImportStatus::Message { severity, text } => Some((severity, text)),
            ImportStatus::Progress(_) => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            (Severity::Error, "could not read VTSI".to_string()),
            (Severity::Warning, "inconsistent VTS count".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_missing_worker_fails_import() {
    let tmp = tempfile::tempdir().unwrap();
    let worker = WorkerConfig::new(tmp.path().join("no-such-worker"));
    let result = Importer::open(tmp.path(), &worker).await;
    assert!(matches!(
        result,
        Err(ImportError::Converter(ConverterError::ConnectionInvalid))
    ));
}

#[test]
fn test_status_from_reader_output() {
    assert_eq!(
        ImportStatus::from(ReaderOutput::warning("odd")),
        ImportStatus::Message {
            severity: Severity::Warning,
            text: "odd".to_string()
        }
    );
}
