//! Raw acquisition: information files and navigation packet scans.
//!
//! Everything needed to build a [`DiscInfo`](dvd_archive_core::DiscInfo) is
//! read here, with no interpretation beyond what is needed to find the next
//! block. Progress is reported in items: one per information file, where the
//! reading of a file counts 0.1 and the scan of its program chains the
//! remaining 0.9, weighted by sectors covered.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use dvd_archive_core::bits::Bits;
use dvd_archive_core::model::ProgramChainId;
use dvd_archive_core::{ProgressId, ReaderOutput};

use crate::access::{BLOCK_SIZE, BlockReader, DiscAccess, InfoFile, MAX_TITLE_SETS, VobDomain};
use crate::error::{InformationError, ReadError};
use crate::ifo::{self, ManagerInfo, MenuUnit, RawProgramChain, TitleEntry, TitleSetInfo};
use crate::nav::{self, NavPacket};

/// Description attached to every progress update of a disc read.
pub const PROGRESS_DESCRIPTION: &str = "reading DVD information";

/// Which program chain of an information file a scan covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScanTarget {
    FirstPlay,
    ProgramChain(ProgramChainId),
}

impl ScanTarget {
    fn domain(self) -> VobDomain {
        match self {
            Self::FirstPlay => VobDomain::Menus,
            Self::ProgramChain(id) if id.language_id.is_some() => VobDomain::Menus,
            Self::ProgramChain(_) => VobDomain::Titles,
        }
    }
}

/// Navigation packets per scanned program chain, one list per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavData {
    chains: BTreeMap<(InfoFile, ScanTarget), Vec<Vec<NavPacket>>>,
}

impl NavData {
    /// Packets of each cell of a chain; `None` when the chain was not scanned.
    pub fn cells(&self, file: InfoFile, target: ScanTarget) -> Option<&[Vec<NavPacket>]> {
        self.chains.get(&(file, target)).map(Vec::as_slice)
    }

    pub fn insert(&mut self, file: InfoFile, target: ScanTarget, cells: Vec<Vec<NavPacket>>) {
        self.chains.insert((file, target), cells);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// Everything read from a disc, undecoded.
#[derive(Debug, Clone)]
pub struct RawDisc {
    pub manager: ManagerInfo,
    /// Title sets that could be read, by number.
    pub title_sets: BTreeMap<u8, TitleSetInfo>,
    pub nav: NavData,
    pub disc_id: [u8; 16],
}

/// Read the information files and scan the navigation packets of `disc`.
///
/// Only a failure to read the video manager is fatal. Title sets that cannot
/// be read and cells whose scan fails are reported on `output` and skipped.
pub fn acquire(disc: &dyn DiscAccess, output: &Sender<ReaderOutput>) -> Result<RawDisc, ReadError> {
    let mut progress = Progress::new(output);
    progress.report();

    let manager = read_manager(disc).map_err(ReadError::ManagerInformation)?;
    progress.finish_read(1);
    progress.set_expected(1 + usize::from(manager.title_set_count));

    let mut nav = NavData::default();
    let targets = manager_targets(&manager);
    scan_file(disc, InfoFile::VideoManager, &targets, &mut progress, &mut nav);

    let expected = usize::from(manager.title_set_count);
    let mut title_sets = BTreeMap::new();
    for n in 1..=MAX_TITLE_SETS {
        if title_sets.len() == expected {
            break;
        }
        let file = InfoFile::TitleSet(n);
        let title_set = match read_title_set(disc, n) {
            Ok(title_set) => title_set,
            Err(e) => {
                if u16::from(n) <= manager.title_set_count {
                    log::warn!("Could not read {}: {e}", file.ifo_name());
                    let error = ReadError::TitleSetInformation {
                        title_set: n,
                        source: e,
                    };
                    let _ = output.send(ReaderOutput::error(error.to_string()));
                } else {
                    log::debug!("No {} ({e})", file.ifo_name());
                }
                continue;
            }
        };

        progress.finish_read(1 + title_sets.len() + 1);
        let targets = title_set_targets(n, &title_set, &manager.titles);
        scan_file(disc, file, &targets, &mut progress, &mut nav);
        title_sets.insert(n, title_set);
    }
    progress.set_items(1 + title_sets.len());

    let disc_id = disc.disc_id().unwrap_or_else(|e| {
        log::warn!("Could not compute disc id: {e}");
        [0; 16]
    });

    Ok(RawDisc {
        manager,
        title_sets,
        nav,
        disc_id,
    })
}

fn read_manager(disc: &dyn DiscAccess) -> Result<ManagerInfo, InformationError> {
    let data = disc.read_info(InfoFile::VideoManager)?;
    Ok(ifo::parse_manager(&data)?)
}

fn read_title_set(disc: &dyn DiscAccess, n: u8) -> Result<TitleSetInfo, InformationError> {
    let data = disc.read_info(InfoFile::TitleSet(n))?;
    Ok(ifo::parse_title_set(&data, n)?)
}

// ---------------------------------------------------------------------------
// Scan planning
// ---------------------------------------------------------------------------

type Targets<'a> = BTreeMap<ScanTarget, &'a RawProgramChain>;

fn menu_targets<'a>(menus: &'a [MenuUnit], targets: &mut Targets<'a>) {
    for unit in menus {
        for entry in &unit.program_chains {
            let id = ProgramChainId {
                language_id: Some(unit.offset),
                program_chain_id: entry.offset,
            };
            targets.insert(ScanTarget::ProgramChain(id), &entry.program_chain);
        }
    }
}

fn manager_targets(manager: &ManagerInfo) -> Targets<'_> {
    let mut targets = Targets::new();
    if let Some(first_play) = &manager.first_play {
        targets.insert(ScanTarget::FirstPlay, first_play);
    }
    menu_targets(&manager.menus, &mut targets);
    targets
}

/// Menu chains, plus the title chains of titles that have button commands.
///
/// Title content without buttons carries no highlight information, so its
/// (usually long) scan is skipped.
fn title_set_targets<'a>(n: u8, title_set: &'a TitleSetInfo, titles: &[TitleEntry]) -> Targets<'a> {
    let mut targets = Targets::new();
    menu_targets(&title_set.menus, &mut targets);

    for entry in &title_set.program_chains {
        let interactive = titles.iter().any(|title| {
            title.title_set == n
                && title.title_set_title == entry.entry_id.bits(0..=6)
                && title.playback_type.bit(3)
        });
        if interactive {
            let id = ProgramChainId {
                language_id: None,
                program_chain_id: entry.offset,
            };
            targets.insert(ScanTarget::ProgramChain(id), &entry.program_chain);
        }
    }
    targets
}

// ---------------------------------------------------------------------------
// Navigation packet scan
// ---------------------------------------------------------------------------

fn cell_sectors(chain: &RawProgramChain) -> u64 {
    chain
        .cells
        .iter()
        .map(|cell| {
            cell.last_sector
                .checked_sub(cell.first_sector)
                .map_or(0, |span| u64::from(span) + 1)
        })
        .sum()
}

/// Scan every target of one information file, storing packets in `nav`.
///
/// Each VOB set is opened once, and only if some chain in it has cells. Per
/// cell failures keep the packets read so far; the last failure of the file
/// is reported once the whole file has been scanned.
fn scan_file(
    disc: &dyn DiscAccess,
    file: InfoFile,
    targets: &Targets<'_>,
    progress: &mut Progress<'_>,
    nav: &mut NavData,
) {
    let total = targets.values().map(|chain| cell_sectors(chain)).sum();
    progress.start_scan(total);

    let mut last_error = None;
    for domain in [VobDomain::Menus, VobDomain::Titles] {
        let chains: Vec<_> = targets
            .iter()
            .filter(|(target, _)| target.domain() == domain)
            .collect();
        if chains.iter().all(|(_, chain)| chain.cells.is_empty()) {
            continue;
        }

        let mut reader = match disc.open_vobs(file, domain) {
            Ok(reader) => reader,
            Err(e) => {
                log::warn!("Could not open {file} {domain:?} VOBs: {e}");
                last_error = Some(ReadError::StreamRead(e));
                continue;
            }
        };

        for (&target, chain) in chains {
            let mut cells = Vec::with_capacity(chain.cells.len());
            for cell in &chain.cells {
                let (packets, error) = scan_cell(reader.as_mut(), cell.first_sector, progress);
                if let Some(e) = error {
                    log::warn!("Scan of {file} cell at sector {} stopped: {e}", cell.first_sector);
                    last_error = Some(e);
                }
                cells.push(packets);
            }
            nav.insert(file, target, cells);
        }
    }

    if let Some(e) = last_error {
        let _ = progress.output.send(ReaderOutput::error(e.to_string()));
    }
}

/// Follow the chain of units starting at `first_sector` until the end of
/// the cell.
///
/// Linear playback timestamps accumulate the presentation span of each unit
/// and become unknown once a unit leaves linear playback.
pub(crate) fn scan_cell(
    reader: &mut dyn BlockReader,
    first_sector: u32,
    progress: &mut Progress<'_>,
) -> (Vec<NavPacket>, Option<ReadError>) {
    let mut packets: Vec<NavPacket> = Vec::new();
    let mut block = vec![0u8; BLOCK_SIZE];
    let mut sector = first_sector;

    loop {
        if let Err(e) = reader.read_blocks(sector, 1, &mut block) {
            return (packets, Some(ReadError::StreamRead(e)));
        }
        let Some((pci, dsi)) = nav::parse_nav_pack(&block) else {
            return (packets, Some(ReadError::MalformedNavigationPacket { sector }));
        };
        progress.add_sectors(u64::from(dsi.vobu_ea) + 1);

        let summed = match packets.last() {
            None => Some(0),
            Some(previous) => previous.timestamp.map(|ticks| {
                let span = previous.pci.end_ptm.wrapping_sub(previous.pci.start_ptm);
                ticks + u64::from(span)
            }),
        };
        let timestamp = summed.filter(|_| dsi.is_linear());
        let next = dsi.next_unit();
        packets.push(NavPacket {
            pci,
            dsi,
            timestamp,
        });

        let Some(distance) = next else {
            return (packets, None);
        };
        match sector.checked_add(distance) {
            Some(following) if distance > 0 => sector = following,
            _ => return (packets, Some(ReadError::MalformedNavigationPacket { sector })),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Weighted progress over information files, reported in thousandths.
///
/// Updates are only sent when the reported numbers change.
pub(crate) struct Progress<'a> {
    output: &'a Sender<ReaderOutput>,
    id: ProgressId,
    expected: usize,
    items: f64,
    scan_base: f64,
    scan_total: u64,
    scan_done: u64,
    last: Option<(u64, u64)>,
}

impl<'a> Progress<'a> {
    pub fn new(output: &'a Sender<ReaderOutput>) -> Self {
        Self {
            output,
            id: ProgressId::next(),
            expected: 0,
            items: 0.0,
            scan_base: 0.0,
            scan_total: 0,
            scan_done: 0,
            last: None,
        }
    }

    fn set_expected(&mut self, expected: usize) {
        self.expected = expected;
        self.report();
    }

    fn set_items(&mut self, items: usize) {
        self.items = items as f64;
        self.report();
    }

    /// The `count`-th information file has been read.
    fn finish_read(&mut self, count: usize) {
        self.items = (count - 1) as f64 + 0.1;
        self.report();
    }

    fn start_scan(&mut self, total_sectors: u64) {
        self.scan_base = self.items.floor();
        self.scan_total = total_sectors;
        self.scan_done = 0;
    }

    fn add_sectors(&mut self, sectors: u64) {
        self.scan_done += sectors;
        if self.scan_total > 0 {
            let fraction = (self.scan_done as f64 / self.scan_total as f64).min(1.0);
            self.items = self.scan_base + 0.1 + 0.9 * fraction;
            self.report();
        }
    }

    fn report(&mut self) {
        let total = 1000 * self.expected as u64;
        let completed = if total == 0 {
            0
        } else {
            ((1000.0 * self.items) as u64).min(total)
        };
        if self.last == Some((completed, total)) {
            return;
        }
        self.last = Some((completed, total));
        let _ = self.output.send(ReaderOutput::progress(
            self.id,
            completed,
            total,
            PROGRESS_DESCRIPTION,
        ));
    }
}

#[cfg(test)]
#[path = "tests/acquire_tests.rs"]
mod tests;
