use std::sync::mpsc;

use super::*;
use crate::fixtures::{sample_disc, write_video_ts};
use dvd_archive_core::Severity;

// -- Test helpers --

fn read(reader: &DiscReader) -> (Result<DiscInfo, ReadError>, Vec<ReaderOutput>) {
    let (tx, rx) = mpsc::channel();
    let result = reader.read_info(&tx);
    drop(tx);
    (result, rx.iter().collect())
}

fn messages(output: &[ReaderOutput], wanted: Severity) -> Vec<String> {
    output
        .iter()
        .filter_map(|item| match item {
            ReaderOutput::Message { severity, text } if *severity == wanted => Some(text.clone()),
            _ => None,
        })
        .collect()
}

// -- Tests --

#[test]
fn test_read_sample_directory() {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();

    let reader = DiscReader::open(tmp.path()).unwrap();
    assert_eq!(reader.path(), tmp.path());

    let (result, output) = read(&reader);
    let info = result.unwrap();
    assert_eq!(info.title_sets.len(), 1);
    assert_eq!(info.titles_by_global_index().len(), 2);
    assert!(messages(&output, Severity::Warning).is_empty());
    assert!(messages(&output, Severity::Error).is_empty());
}

#[test]
fn test_empty_manager_is_not_supported() {
    let tmp = tempfile::tempdir().unwrap();
    let video_ts = tmp.path().join("VIDEO_TS");
    std::fs::create_dir(&video_ts).unwrap();
    std::fs::write(video_ts.join("VIDEO_TS.IFO"), b"").unwrap();

    let err = DiscReader::open(tmp.path()).unwrap_err();
    assert!(matches!(
        err,
        ReadError::NotSupported(AccessError::NotADisc(ref msg)) if msg == "VIDEO_TS.IFO is empty"
    ));
    assert_eq!(err.to_string(), "source not supported");
}

#[test]
fn test_missing_path_is_not_supported() {
    let tmp = tempfile::tempdir().unwrap();
    let err = DiscReader::open(&tmp.path().join("nowhere")).unwrap_err();
    assert!(matches!(err, ReadError::NotSupported(AccessError::Io(_))));
}

#[test]
fn test_declared_title_set_missing() {
    let mut disc = sample_disc();
    disc.title_set_count = 2;
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &disc).unwrap();

    let reader = DiscReader::open(tmp.path()).unwrap();
    let (result, output) = read(&reader);
    assert_eq!(result.unwrap().title_sets.len(), 1);
    assert_eq!(messages(&output, Severity::Error), vec!["could not read VTSI"]);
    assert_eq!(
        messages(&output, Severity::Warning),
        vec!["inconsistent VTS count"]
    );
}

#[test]
fn test_debug_shows_path() {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();
    let reader = DiscReader::open(tmp.path()).unwrap();
    let debug = format!("{reader:?}");
    assert!(debug.starts_with("DiscReader"));
    assert!(debug.contains(&tmp.path().display().to_string()));
}
