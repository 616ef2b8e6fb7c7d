//! Errors surfaced while loading a ROM or assembling a console.

/// Everything that can go wrong building or running a [`crate::Nes`].
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The iNES header, PRG-ROM, or CHR-ROM data was malformed or truncated.
    #[error("bad ROM format: {0}")]
    BadRomFormat(String),

    /// The ROM declares a mapper other than NROM (mapper 0).
    #[error("unsupported mapper {0} (only NROM is implemented)")]
    UnsupportedMapper(u8),

    /// The ROM file could not be read from disk.
    #[error("failed to read ROM file: {0}")]
    Io(#[from] std::io::Error),
}
