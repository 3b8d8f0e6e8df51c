use super::Record;
use crate::error::IfoError;

/// Program chain information (`PGC`), undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProgramChain {
    pub playback_time: [u8; 4],
    pub prohibited_ops: u32,
    pub audio_control: [u16; 8],
    pub subpicture_control: [u32; 32],
    /// Sibling program chain numbers; zero when absent.
    pub next: u16,
    pub previous: u16,
    pub up: u16,
    pub playback_mode: u8,
    pub still_time: u8,
    /// `(0, Y, Cr, Cb)` per entry.
    pub palette: [[u8; 4]; 16],
    pub commands: CommandTable,
    /// Entry cell number of each program.
    pub program_map: Vec<u8>,
    pub cells: Vec<RawCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    pub pre: Vec<u64>,
    pub post: Vec<u64>,
    pub cell: Vec<u64>,
}

/// Cell playback information, undecoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCell {
    /// Block mode and type, seamless and interleave flags.
    pub category: u8,
    /// Still-frame, restriction and karaoke type bits.
    pub attributes: u8,
    pub still_time: u8,
    /// Cell command number, zero for none.
    pub command: u8,
    pub playback_time: [u8; 4],
    pub first_sector: u32,
    pub last_sector: u32,
}

const CELL_PLAYBACK_SIZE: usize = 24;
const COMMAND_SIZE: usize = 8;

impl RawProgramChain {
    pub(crate) fn parse(pgc: Record<'_>) -> Result<Self, IfoError> {
        let program_count = pgc.u8(2)? as usize;
        let cell_count = pgc.u8(3)? as usize;

        let mut audio_control = [0u16; 8];
        for (i, slot) in audio_control.iter_mut().enumerate() {
            *slot = pgc.u16(0x0C + i * 2)?;
        }
        let mut subpicture_control = [0u32; 32];
        for (i, slot) in subpicture_control.iter_mut().enumerate() {
            *slot = pgc.u32(0x1C + i * 4)?;
        }
        let mut palette = [[0u8; 4]; 16];
        for (i, slot) in palette.iter_mut().enumerate() {
            *slot = pgc.array::<4>(0xA4 + i * 4)?;
        }

        let commands = match pgc.u16(0xE4)? as usize {
            0 => CommandTable::default(),
            offset => parse_commands(pgc.at("PGC command table", offset)?)?,
        };
        let program_map = match pgc.u16(0xE6)? as usize {
            0 => Vec::new(),
            offset => pgc.bytes(offset, program_count)?.to_vec(),
        };
        let cells = match pgc.u16(0xE8)? as usize {
            0 => Vec::new(),
            offset => {
                let table = pgc.at("cell playback table", offset)?;
                (0..cell_count)
                    .map(|i| parse_cell(&table, i * CELL_PLAYBACK_SIZE))
                    .collect::<Result<_, _>>()?
            }
        };

        Ok(Self {
            playback_time: pgc.array::<4>(4)?,
            prohibited_ops: pgc.u32(8)?,
            audio_control,
            subpicture_control,
            next: pgc.u16(0x9C)?,
            previous: pgc.u16(0x9E)?,
            up: pgc.u16(0xA0)?,
            playback_mode: pgc.u8(0xA2)?,
            still_time: pgc.u8(0xA3)?,
            palette,
            commands,
            program_map,
            cells,
        })
    }
}

fn parse_commands(table: Record<'_>) -> Result<CommandTable, IfoError> {
    let pre = table.u16(0)? as usize;
    let post = table.u16(2)? as usize;
    let cell = table.u16(4)? as usize;

    let read = |first: usize, count: usize| -> Result<Vec<u64>, IfoError> {
        (first..first + count)
            .map(|i| table.u64(8 + i * COMMAND_SIZE))
            .collect()
    };

    Ok(CommandTable {
        pre: read(0, pre)?,
        post: read(pre, post)?,
        cell: read(pre + post, cell)?,
    })
}

fn parse_cell(table: &Record<'_>, base: usize) -> Result<RawCell, IfoError> {
    Ok(RawCell {
        category: table.u8(base)?,
        attributes: table.u8(base + 1)?,
        still_time: table.u8(base + 2)?,
        command: table.u8(base + 3)?,
        playback_time: table.array::<4>(base + 4)?,
        first_sector: table.u32(base + 8)?,
        last_sector: table.u32(base + 20)?,
    })
}
