use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("maze must be at least 5x5, got {rows}x{cols}")]
    InvalidSize { rows: usize, cols: usize },
    #[error("icon must be a single visible character, got {0:?}")]
    InvalidIcon(char),
}

pub type Result<T> = std::result::Result<T, Error>;
