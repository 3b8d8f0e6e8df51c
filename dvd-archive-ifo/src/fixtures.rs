//! Synthetic DVD-Video file structures for tests.
//!
//! Builds byte-exact information files, navigation packs and VOB files from
//! a small description, so the whole read path can be exercised without a
//! real disc. Every cell is laid out as consecutive units, each starting
//! with a navigation pack.

use std::io;
use std::path::{Path, PathBuf};

use crate::access::BLOCK_SIZE;
use crate::nav::END_OF_CELL;

/// One video object unit of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureUnit {
    pub sectors: u32,
    /// Presentation span in 90 kHz ticks.
    pub duration: u32,
    pub linear: bool,
    /// Number of menu buttons highlighted during the unit.
    pub buttons: u8,
}

impl FixtureUnit {
    pub fn plain(sectors: u32, duration: u32) -> Self {
        Self {
            sectors,
            duration,
            linear: true,
            buttons: 0,
        }
    }

    pub fn with_buttons(sectors: u32, duration: u32, buttons: u8) -> Self {
        Self {
            buttons,
            ..Self::plain(sectors, duration)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCell {
    pub first_sector: u32,
    pub playback_time: [u8; 4],
    pub units: Vec<FixtureUnit>,
}

impl FixtureCell {
    pub fn last_sector(&self) -> u32 {
        let sectors: u32 = self.units.iter().map(|unit| unit.sectors).sum();
        self.first_sector + sectors.max(1) - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureChain {
    /// Entry flag in bit 7, title number or menu type below.
    pub entry_id: u8,
    pub playback_time: [u8; 4],
    pub pre: Vec<u64>,
    pub cells: Vec<FixtureCell>,
}

/// A row of the title search pointer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureTitle {
    pub title_set: u8,
    pub title_set_title: u8,
    pub part_count: u16,
    pub playback_type: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTitleSet {
    pub menus: Vec<FixtureChain>,
    pub titles: Vec<FixtureChain>,
    /// `(program chain, program)` of each part, per title.
    pub parts: Vec<Vec<(u16, u16)>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureDisc {
    /// Title set count written to the manager, normally `title_sets.len()`.
    pub title_set_count: u16,
    pub first_play: Option<FixtureChain>,
    pub menus: Vec<FixtureChain>,
    pub titles: Vec<FixtureTitle>,
    /// Title set `n` is at index `n - 1`.
    pub title_sets: Vec<FixtureTitleSet>,
}

/// `JumpTT n` command word.
pub fn jump_title(title: u8) -> u64 {
    0x3002_0000_0000_0000 | (u64::from(title) << 16)
}

fn bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// A `dvd_time_t` at 29.97 fps.
pub fn ntsc_time(hours: u8, minutes: u8, seconds: u8, frames: u8) -> [u8; 4] {
    [bcd(hours), bcd(minutes), bcd(seconds), 0xC0 | bcd(frames)]
}

/// A `dvd_time_t` at 25 fps.
pub fn pal_time(hours: u8, minutes: u8, seconds: u8, frames: u8) -> [u8; 4] {
    [bcd(hours), bcd(minutes), bcd(seconds), 0x40 | bcd(frames)]
}

/// One title set with a root menu, an interactive two-part title and a
/// plain one-part title, behind a first-play chain and a title menu.
pub fn sample_disc() -> FixtureDisc {
    let cell = |first_sector, seconds, units| FixtureCell {
        first_sector,
        playback_time: ntsc_time(0, 0, seconds, 0),
        units,
    };
    let chain = |entry_id, seconds, cells| FixtureChain {
        entry_id,
        playback_time: ntsc_time(0, 0, seconds, 0),
        pre: Vec::new(),
        cells,
    };

    let mut first_play = chain(0, 1, vec![cell(0, 1, vec![FixtureUnit::plain(1, 90_000)])]);
    first_play.pre.push(jump_title(1));

    FixtureDisc {
        title_set_count: 1,
        first_play: Some(first_play),
        menus: vec![chain(
            0x82,
            2,
            vec![cell(
                1,
                2,
                vec![
                    FixtureUnit::with_buttons(1, 90_000, 2),
                    FixtureUnit::plain(1, 90_000),
                ],
            )],
        )],
        titles: vec![
            FixtureTitle {
                title_set: 1,
                title_set_title: 1,
                part_count: 2,
                playback_type: 0x08,
            },
            FixtureTitle {
                title_set: 1,
                title_set_title: 2,
                part_count: 1,
                playback_type: 0x00,
            },
        ],
        title_sets: vec![FixtureTitleSet {
            menus: vec![chain(
                0x83,
                1,
                vec![cell(0, 1, vec![FixtureUnit::with_buttons(1, 90_000, 1)])],
            )],
            titles: vec![
                chain(
                    0x81,
                    3,
                    vec![
                        cell(
                            0,
                            2,
                            vec![FixtureUnit::plain(2, 45_045), FixtureUnit::plain(1, 45_045)],
                        ),
                        cell(3, 1, vec![FixtureUnit::with_buttons(1, 90_000, 1)]),
                    ],
                ),
                chain(0x82, 2, vec![cell(4, 2, vec![FixtureUnit::plain(2, 180_000)])]),
            ],
            parts: vec![vec![(1, 1), (1, 2)], vec![(2, 1)]],
        }],
    }
}

// ---------------------------------------------------------------------------
// Writing to disk
// ---------------------------------------------------------------------------

/// Every file of the `VIDEO_TS` directory, by name.
pub fn video_ts_files(disc: &FixtureDisc) -> Vec<(String, Vec<u8>)> {
    let mut files = vec![("VIDEO_TS.IFO".to_string(), manager_ifo(disc))];
    let menus: Vec<&FixtureChain> = disc.first_play.iter().chain(&disc.menus).collect();
    if has_cells(&menus) {
        files.push(("VIDEO_TS.VOB".to_string(), vob(&menus)));
    }

    for (i, title_set) in disc.title_sets.iter().enumerate() {
        let n = i + 1;
        files.push((format!("VTS_{n:02}_0.IFO"), title_set_ifo(title_set)));

        let menus: Vec<&FixtureChain> = title_set.menus.iter().collect();
        if has_cells(&menus) {
            files.push((format!("VTS_{n:02}_0.VOB"), vob(&menus)));
        }
        let titles: Vec<&FixtureChain> = title_set.titles.iter().collect();
        if has_cells(&titles) {
            files.push((format!("VTS_{n:02}_1.VOB"), vob(&titles)));
        }
    }
    files
}

/// Write `disc` as `root/VIDEO_TS` and return the `VIDEO_TS` path.
pub fn write_video_ts(root: &Path, disc: &FixtureDisc) -> io::Result<PathBuf> {
    let dir = root.join("VIDEO_TS");
    std::fs::create_dir_all(&dir)?;
    for (name, data) in video_ts_files(disc) {
        std::fs::write(dir.join(name), data)?;
    }
    Ok(dir)
}

/// An ISO 9660 image with `disc` in its `VIDEO_TS` directory.
///
/// Root directory at sector 18, `VIDEO_TS` at 19, files from sector 20.
pub fn iso_image(disc: &FixtureDisc) -> Vec<u8> {
    let mut image = vec![0u8; 20 * BLOCK_SIZE];

    let mut video_ts = directory_record(&[0x00], 19, BLOCK_SIZE as u32, 0x02);
    video_ts.extend(directory_record(&[0x01], 18, BLOCK_SIZE as u32, 0x02));
    for (name, data) in video_ts_files(disc) {
        let extent = (image.len() / BLOCK_SIZE) as u32;
        image.extend_from_slice(&data);
        pad_to_sector(&mut image);
        let id = format!("{name};1");
        video_ts.extend(directory_record(id.as_bytes(), extent, data.len() as u32, 0));
    }
    image[19 * BLOCK_SIZE..19 * BLOCK_SIZE + video_ts.len()].copy_from_slice(&video_ts);

    let mut root = directory_record(&[0x00], 18, BLOCK_SIZE as u32, 0x02);
    root.extend(directory_record(&[0x01], 18, BLOCK_SIZE as u32, 0x02));
    root.extend(directory_record(b"VIDEO_TS", 19, BLOCK_SIZE as u32, 0x02));
    image[18 * BLOCK_SIZE..18 * BLOCK_SIZE + root.len()].copy_from_slice(&root);

    let pvd = 16 * BLOCK_SIZE;
    image[pvd] = 0x01;
    image[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
    image[pvd + 6] = 0x01;
    let root_record = directory_record(&[0x00], 18, BLOCK_SIZE as u32, 0x02);
    image[pvd + 156..pvd + 156 + root_record.len()].copy_from_slice(&root_record);

    let terminator = 17 * BLOCK_SIZE;
    image[terminator] = 0xFF;
    image[terminator + 1..terminator + 6].copy_from_slice(b"CD001");
    image
}

/// Both-endian ISO 9660 directory record, padded to an even length.
fn directory_record(id: &[u8], extent: u32, length: u32, flags: u8) -> Vec<u8> {
    let record_len = 33 + id.len() + (id.len() + 1) % 2;
    let mut record = vec![0u8; record_len];
    record[0] = record_len as u8;
    record[2..6].copy_from_slice(&extent.to_le_bytes());
    record[6..10].copy_from_slice(&extent.to_be_bytes());
    record[10..14].copy_from_slice(&length.to_le_bytes());
    record[14..18].copy_from_slice(&length.to_be_bytes());
    record[25] = flags;
    record[32] = id.len() as u8;
    record[33..33 + id.len()].copy_from_slice(id);
    record
}

fn has_cells(chains: &[&FixtureChain]) -> bool {
    chains.iter().any(|chain| !chain.cells.is_empty())
}

// ---------------------------------------------------------------------------
// Information files
// ---------------------------------------------------------------------------

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn pad_to_sector(buf: &mut Vec<u8>) {
    let padded = buf.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
    buf.resize(padded, 0);
}

/// Append `table` at the next sector boundary and return its sector.
fn append_table(buf: &mut Vec<u8>, table: &[u8]) -> u32 {
    pad_to_sector(buf);
    let sector = (buf.len() / BLOCK_SIZE) as u32;
    buf.extend_from_slice(table);
    pad_to_sector(buf);
    sector
}

/// NTSC MPEG-2 4:3 video, English AC-3 stereo audio and English subtitles.
fn write_attributes(mat: &mut [u8], base: usize, audio_streams: u8) {
    mat[base] = 0x40;
    mat[base + 3] = audio_streams;
    for i in 0..usize::from(audio_streams) {
        let record = base + 4 + i * 8;
        mat[record..record + 8].copy_from_slice(&[0x04, 0x01, b'e', b'n', 0, 0x01, 0, 0]);
    }
    mat[base + 0x55] = 1;
    mat[base + 0x56..base + 0x5C].copy_from_slice(&[0x01, 0, b'e', b'n', 0, 0x01]);
}

pub fn manager_ifo(disc: &FixtureDisc) -> Vec<u8> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    buf[0..12].copy_from_slice(b"DVDVIDEO-VMG");
    buf[33] = 0x11;
    put_u16(&mut buf, 38, 1);
    put_u16(&mut buf, 40, 1);
    put_u16(&mut buf, 62, disc.title_set_count);
    let provider = b"DVD-ARCHIVE-FIXTURE";
    buf[64..64 + provider.len()].copy_from_slice(provider);
    write_attributes(&mut buf, 0x100, 1);

    let titles = title_table(&disc.titles);
    let sector = append_table(&mut buf, &titles);
    put_u32(&mut buf, 0xC4, sector);

    if !disc.menus.is_empty() {
        let sector = append_table(&mut buf, &menu_table(&disc.menus));
        put_u32(&mut buf, 0xC8, sector);
    }

    if let Some(first_play) = &disc.first_play {
        let sector = append_table(&mut buf, &program_chain(first_play));
        put_u32(&mut buf, 0x84, sector * BLOCK_SIZE as u32);
    }
    let last_byte = buf.len() as u32 - 1;
    put_u32(&mut buf, 0x80, last_byte);
    buf
}

pub fn title_set_ifo(title_set: &FixtureTitleSet) -> Vec<u8> {
    let mut buf = vec![0u8; BLOCK_SIZE];
    buf[0..12].copy_from_slice(b"DVDVIDEO-VTS");
    buf[33] = 0x11;
    write_attributes(&mut buf, 0x100, 1);
    write_attributes(&mut buf, 0x200, 2);

    let sector = append_table(&mut buf, &part_table(&title_set.parts));
    put_u32(&mut buf, 0xC8, sector);

    let chains: Vec<&FixtureChain> = title_set.titles.iter().collect();
    let sector = append_table(&mut buf, &program_chain_table(&chains));
    put_u32(&mut buf, 0xCC, sector);

    if !title_set.menus.is_empty() {
        let sector = append_table(&mut buf, &menu_table(&title_set.menus));
        put_u32(&mut buf, 0xD0, sector);
    }
    buf
}

fn table_header(count: usize) -> Vec<u8> {
    let mut header = vec![0u8; 8];
    put_u16(&mut header, 0, count as u16);
    header
}

fn finish_table(mut table: Vec<u8>) -> Vec<u8> {
    let last_byte = table.len() as u32 - 1;
    put_u32(&mut table, 4, last_byte);
    table
}

fn title_table(titles: &[FixtureTitle]) -> Vec<u8> {
    let mut table = table_header(titles.len());
    for title in titles {
        let mut row = [0u8; 12];
        row[0] = title.playback_type;
        row[1] = 1;
        put_u16(&mut row, 2, title.part_count);
        row[6] = title.title_set;
        row[7] = title.title_set_title;
        table.extend_from_slice(&row);
    }
    finish_table(table)
}

fn part_table(parts: &[Vec<(u16, u16)>]) -> Vec<u8> {
    let mut table = table_header(parts.len());
    let mut offset = 8 + parts.len() * 4;
    for title in parts {
        table.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += title.len() * 4;
    }
    for &(program_chain, program) in parts.iter().flatten() {
        table.extend_from_slice(&program_chain.to_be_bytes());
        table.extend_from_slice(&program.to_be_bytes());
    }
    finish_table(table)
}

fn program_chain_table(chains: &[&FixtureChain]) -> Vec<u8> {
    let mut table = table_header(chains.len());
    let mut bodies = Vec::new();
    let mut offset = 8 + chains.len() * 8;
    for chain in chains {
        let body = program_chain(chain);
        let mut row = [0u8; 8];
        row[0] = chain.entry_id;
        put_u32(&mut row, 4, offset as u32);
        table.extend_from_slice(&row);
        offset += body.len();
        bodies.push(body);
    }
    table.extend(bodies.concat());
    finish_table(table)
}

/// A single English language unit holding `chains`.
fn menu_table(chains: &[FixtureChain]) -> Vec<u8> {
    let mut table = table_header(1);
    table.extend_from_slice(&[b'e', b'n', 0, 0x80, 0, 0, 0, 16]);
    let chains: Vec<&FixtureChain> = chains.iter().collect();
    table.extend(program_chain_table(&chains));
    finish_table(table)
}

pub fn program_chain(chain: &FixtureChain) -> Vec<u8> {
    let mut pgc = vec![0u8; 0xEC];
    let cells = chain.cells.len();
    pgc[2] = cells as u8;
    pgc[3] = cells as u8;
    pgc[4..8].copy_from_slice(&chain.playback_time);
    put_u16(&mut pgc, 0x0C, 0x8000);
    put_u32(&mut pgc, 0x1C, 0x8000_0000);
    for i in 0..16u8 {
        let entry = 0xA4 + usize::from(i) * 4;
        pgc[entry..entry + 4].copy_from_slice(&[0, 0x10 + i, 0x80, 0x80]);
    }

    let commands_offset = pgc.len() as u16;
    put_u16(&mut pgc, 0xE4, commands_offset);
    let mut commands = vec![0u8; 8];
    put_u16(&mut commands, 0, chain.pre.len() as u16);
    for word in &chain.pre {
        commands.extend_from_slice(&word.to_be_bytes());
    }
    let last = commands.len() as u16 - 1;
    put_u16(&mut commands, 6, last);
    pgc.extend(commands);

    if cells > 0 {
        let map_offset = pgc.len() as u16;
        put_u16(&mut pgc, 0xE6, map_offset);
        pgc.extend(1..=cells as u8);
        if pgc.len() % 2 == 1 {
            pgc.push(0);
        }

        let cells_offset = pgc.len() as u16;
        put_u16(&mut pgc, 0xE8, cells_offset);
        for cell in &chain.cells {
            let mut record = [0u8; 24];
            record[4..8].copy_from_slice(&cell.playback_time);
            put_u32(&mut record, 8, cell.first_sector);
            put_u32(&mut record, 20, cell.last_sector());
            pgc.extend_from_slice(&record);
        }
    }
    pgc
}

// ---------------------------------------------------------------------------
// Video objects
// ---------------------------------------------------------------------------

/// A VOB set covering every cell of `chains`, zero-filled between packs.
pub fn vob(chains: &[&FixtureChain]) -> Vec<u8> {
    let cells: Vec<&FixtureCell> = chains.iter().flat_map(|chain| &chain.cells).collect();
    let sectors = cells
        .iter()
        .map(|cell| cell.last_sector() + 1)
        .max()
        .unwrap_or(0);
    let mut data = vec![0u8; sectors as usize * BLOCK_SIZE];

    for cell in cells {
        let mut sector = cell.first_sector;
        let mut start_ptm = 0u32;
        for (i, unit) in cell.units.iter().enumerate() {
            let next = (i + 1 < cell.units.len()).then_some(unit.sectors);
            let pack = nav_pack(sector, start_ptm, unit, next);
            let offset = sector as usize * BLOCK_SIZE;
            data[offset..offset + BLOCK_SIZE].copy_from_slice(&pack);
            sector += unit.sectors;
            start_ptm += unit.duration;
        }
    }
    data
}

/// A navigation pack for the unit at `lbn`; `next` is the distance to the
/// following unit, `None` for the last unit of its cell.
pub fn nav_pack(lbn: u32, start_ptm: u32, unit: &FixtureUnit, next: Option<u32>) -> Vec<u8> {
    let mut block = vec![0u8; BLOCK_SIZE];
    block[0..4].copy_from_slice(&[0x00, 0x00, 0x01, 0xBA]);
    block[4] = 0x44;
    block[13] = 0xF8;
    block[14..18].copy_from_slice(&[0x00, 0x00, 0x01, 0xBB]);
    put_u16(&mut block, 18, 18);

    block[38..42].copy_from_slice(&[0x00, 0x00, 0x01, 0xBF]);
    put_u16(&mut block, 42, 0x03D4);
    block[44] = 0x00;
    let end_ptm = start_ptm + unit.duration;
    {
        let pci = &mut block[45..1024];
        put_u32(pci, 0, lbn);
        put_u32(pci, 12, start_ptm);
        put_u32(pci, 16, end_ptm);
        if unit.buttons > 0 {
            write_highlight(pci, start_ptm, end_ptm, unit.buttons);
        }
    }

    block[1024..1028].copy_from_slice(&[0x00, 0x00, 0x01, 0xBF]);
    put_u16(&mut block, 1028, 0x03FA);
    block[1030] = 0x01;
    let dsi = &mut block[1031..];
    put_u32(dsi, 8, unit.sectors - 1);
    put_u16(dsi, 0x20, if unit.linear { 0 } else { 0x4000 });
    put_u32(dsi, 0x13A, 0x8000_0000 | next.unwrap_or(END_OF_CELL));
    block
}

/// Buttons laid out in a row, each jumping to the title of its number.
fn write_highlight(pci: &mut [u8], start_ptm: u32, end_ptm: u32, buttons: u8) {
    put_u16(pci, 0x60, 1);
    put_u32(pci, 0x62, start_ptm);
    put_u32(pci, 0x66, end_ptm);
    put_u32(pci, 0x6A, end_ptm);
    put_u16(pci, 0x6E, 0x1000);
    pci[0x70] = 1;
    pci[0x71] = buttons;
    pci[0x72] = buttons;
    put_u32(pci, 0x76, 0x4321_F0F0);
    put_u32(pci, 0x7A, 0x8765_FFFF);

    for i in 0..buttons {
        let slot = 0x8E + usize::from(i) * 18;
        let x_start = 40 + u32::from(i) * 110;
        let x: u32 = (1 << 22) | (x_start << 12) | (x_start + 100);
        let y: u32 = (400 << 12) | 450;
        pci[slot..slot + 3].copy_from_slice(&x.to_be_bytes()[1..]);
        pci[slot + 3..slot + 6].copy_from_slice(&y.to_be_bytes()[1..]);
        pci[slot + 8] = if i > 0 { i } else { 0 };
        pci[slot + 9] = if i + 1 < buttons { i + 2 } else { 0 };
        pci[slot + 10..slot + 18].copy_from_slice(&jump_title(i + 1).to_be_bytes());
    }
}
