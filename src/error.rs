//! Error types for listing export.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No file selected.. Aborting")]
    NoDestination,

    #[error("Address {0:#x} is not inside a function. Only code blocks are supported")]
    NoCodeRegion(u64),

    #[error("invalid listing record {line}: {reason}")]
    Dump { line: usize, reason: String },

    #[error("can't open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Notices end the export without writing anything and are not failures
    pub fn is_notice(&self) -> bool {
        matches!(self, Error::NoDestination | Error::NoCodeRegion(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
