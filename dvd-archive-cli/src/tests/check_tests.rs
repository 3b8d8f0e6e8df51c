use std::sync::mpsc;

use super::*;
use dvd_archive_ifo::DiscReader;
use dvd_archive_ifo::fixtures::{sample_disc, write_video_ts};

// -- Test helpers --

fn sample_info() -> DiscInfo {
    let tmp = tempfile::tempdir().unwrap();
    write_video_ts(tmp.path(), &sample_disc()).unwrap();
    let (tx, _rx) = mpsc::channel();
    DiscReader::open(tmp.path()).unwrap().read_info(&tx).unwrap()
}

// -- Tests --

#[test]
fn test_summary_describes_disc() {
    let info = sample_info();
    let lines = summary(&info);

    assert_eq!(lines[0], "Provider:    DVD-ARCHIVE-FIXTURE");
    assert_eq!(lines[1], format!("Disc ID:     {}", info.disc_id_hex()));
    assert!(lines.contains(&"Title sets:  1".to_string()));
}

#[test]
fn test_summary_lists_titles_in_order() {
    let lines = summary(&sample_info());
    let titles: Vec<&String> = lines.iter().filter(|l| l.starts_with("Title ")).collect();

    assert_eq!(titles.len(), 2);
    assert!(titles[0].starts_with("Title   1:   title set 1 title 1, 2 part(s)"));
    assert!(titles[1].starts_with("Title   2:   title set 1 title 2, 1 part(s)"));
}

#[test]
fn test_blank_provider_shows_dash() {
    assert_eq!(display_or_dash("   "), "-");
    assert_eq!(display_or_dash("STUDIO"), "STUDIO");
}
