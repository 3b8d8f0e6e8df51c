use super::*;
use crate::access::InfoFile;
use crate::acquire::{NavData, RawDisc, ScanTarget};
use crate::decode::disc_info;
use crate::fixtures::{FixtureUnit, manager_ifo, nav_pack, sample_disc, title_set_ifo};
use crate::ifo::{parse_manager, parse_title_set};
use crate::nav::{NavPacket, parse_nav_pack};
use dvd_archive_core::Index;
use dvd_archive_core::model::Time;

// -- Test helpers --

fn sample_raw() -> RawDisc {
    let disc = sample_disc();
    let title_set = parse_title_set(&title_set_ifo(&disc.title_sets[0]), 1).unwrap();
    RawDisc {
        manager: parse_manager(&manager_ifo(&disc)).unwrap(),
        title_sets: [(1, title_set)].into(),
        nav: NavData::default(),
        disc_id: [0; 16],
    }
}

fn sample_info() -> DiscInfo {
    disc_info(&sample_raw()).unwrap()
}

fn declared(title_sets: usize, parts: &[u16]) -> Declared {
    Declared {
        title_sets,
        parts: parts.to_vec(),
    }
}

fn first_play_cell_rate(info: &mut DiscInfo, rate: FrameRate) {
    let start = info.start.as_mut().unwrap();
    let cell = start.cells.get_mut(&Index::new(1)).unwrap();
    cell.duration.rate = rate;
}

// -- Counts --

#[test]
fn test_declared_counts_from_manager() {
    let raw = sample_raw();
    assert_eq!(Declared::from(&raw.manager), declared(1, &[2, 1]));
}

#[test]
fn test_consistent_disc() {
    let info = sample_info();
    assert!(check(&info, &declared(1, &[2, 1])).is_empty());
}

#[test]
fn test_title_set_count_mismatch_stops_count_checks() {
    let info = sample_info();
    assert_eq!(
        check(&info, &declared(2, &[5])),
        vec![Inconsistency::TitleSetCount]
    );
}

#[test]
fn test_title_count_mismatch() {
    let info = sample_info();
    assert_eq!(
        check(&info, &declared(1, &[2, 1, 1])),
        vec![Inconsistency::TitleCount]
    );
}

#[test]
fn test_part_count_mismatch() {
    let info = sample_info();
    assert_eq!(
        check(&info, &declared(1, &[2, 2])),
        vec![Inconsistency::PartCount]
    );
}

// -- Frame rates --

#[test]
fn test_mixed_cell_rates() {
    let mut info = sample_info();
    first_play_cell_rate(&mut info, FrameRate::Fps25);
    assert_eq!(
        check(&info, &declared(1, &[2, 1])),
        vec![Inconsistency::FrameRates]
    );
}

#[test]
fn test_count_and_rate_findings_are_both_reported() {
    let mut info = sample_info();
    first_play_cell_rate(&mut info, FrameRate::Unexpected(0));
    assert_eq!(
        check(&info, &declared(3, &[2, 1])),
        vec![Inconsistency::TitleSetCount, Inconsistency::FrameRates]
    );
}

#[test]
fn test_repeated_checks_agree() {
    let mut info = sample_info();
    first_play_cell_rate(&mut info, FrameRate::Fps25);
    let declared = declared(1, &[2, 2]);
    assert_eq!(check(&info, &declared), check(&info, &declared));
}

#[test]
fn test_interaction_timestamp_rates() {
    let mut raw = sample_raw();
    let unit = FixtureUnit::with_buttons(1, 90_000, 1);
    let (pci, dsi) = parse_nav_pack(&nav_pack(0, 0, &unit, None)).unwrap();
    let packet = NavPacket {
        pci,
        dsi,
        timestamp: Some(0),
    };
    raw.nav
        .insert(InfoFile::VideoManager, ScanTarget::FirstPlay, vec![vec![packet]]);
    let mut info = disc_info(&raw).unwrap();
    assert!(check(&info, &declared(1, &[2, 1])).is_empty());

    let start = info.start.as_mut().unwrap();
    let cell = start.cells.get_mut(&Index::new(1)).unwrap();
    cell.interactions[0].linear_playback_timestamp = Some(Time::zero(FrameRate::Fps25));
    assert_eq!(
        check(&info, &declared(1, &[2, 1])),
        vec![Inconsistency::FrameRates]
    );

    // Timestamps that are unknown do not take part.
    let start = info.start.as_mut().unwrap();
    let cell = start.cells.get_mut(&Index::new(1)).unwrap();
    cell.interactions[0].linear_playback_timestamp = None;
    assert!(check(&info, &declared(1, &[2, 1])).is_empty());
}

#[test]
fn test_messages() {
    assert_eq!(Inconsistency::TitleSetCount.to_string(), "inconsistent VTS count");
    assert_eq!(Inconsistency::TitleCount.to_string(), "inconsistent title count");
    assert_eq!(Inconsistency::PartCount.to_string(), "inconsistent parts count");
    assert_eq!(Inconsistency::FrameRates.to_string(), "inconsistent frame rates");
}
