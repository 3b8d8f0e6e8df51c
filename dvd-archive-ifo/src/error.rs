use thiserror::Error;

/// Errors from the disc access layer.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path does not contain a DVD-Video file structure.
    #[error("Not a DVD-Video structure: {0}")]
    NotADisc(String),

    #[error("File not found on disc: {0}")]
    NotFound(String),

    #[error("Sector {sector} is outside of {file}")]
    OutOfRange { file: String, sector: u32 },

    #[error("Invalid ISO 9660 image: {0}")]
    InvalidImage(String),
}

impl AccessError {
    pub fn not_a_disc(msg: impl Into<String>) -> Self {
        Self::NotADisc(msg.into())
    }

    pub fn not_found(file: impl Into<String>) -> Self {
        Self::NotFound(file.into())
    }

    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }
}

/// Errors from parsing the raw layout of an information file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IfoError {
    #[error("Bad magic in {file}: expected {expected}")]
    BadMagic {
        file: String,
        expected: &'static str,
    },

    #[error("{table} truncated: need {needed} bytes at offset {offset}, have {available}")]
    Truncated {
        table: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{table} points outside the file (offset {offset})")]
    OffsetOutOfRange { table: &'static str, offset: usize },
}

/// Failures while acquiring and assembling disc information.
///
/// The `Display` texts are the messages sent on the notification channel.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The path does not look like a DVD.
    #[error("source not supported")]
    NotSupported(#[source] AccessError),

    #[error("could not read VMGI")]
    ManagerInformation(#[source] InformationError),

    #[error("could not read VTSI")]
    TitleSetInformation {
        title_set: u8,
        #[source]
        source: InformationError,
    },

    #[error("could not read VOB")]
    StreamRead(#[source] AccessError),

    #[error("NAV data not understood")]
    MalformedNavigationPacket { sector: u32 },

    #[error("DVD data not understood")]
    MalformedRecord(String),
}

impl ReadError {
    pub fn malformed_record(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }
}

/// Reading an information file fails either at the file or at its layout.
#[derive(Debug, Error)]
pub enum InformationError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Layout(#[from] IfoError),
}
