use thiserror::Error;

/// Failures reported to callers of the importer.
///
/// Deliberately coarse: details travel as messages on the notification
/// channel, so callers only need to tell the failure classes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConverterError {
    #[error("source is not a supported DVD")]
    SourceNotSupported,

    #[error("reading from the source failed")]
    SourceReadError,

    #[error("connection to the converter is invalid")]
    ConnectionInvalid,

    #[error("connection to the converter was interrupted")]
    ConnectionInterrupted,
}

impl ConverterError {
    /// Connection failures end the converter; the others only fail one request.
    pub fn is_connection_failure(self) -> bool {
        matches!(self, Self::ConnectionInvalid | Self::ConnectionInterrupted)
    }
}
