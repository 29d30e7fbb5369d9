//! Cross-platform application paths

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or(Error::NoDataDir)?
            .join("maze-escape");
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn scores_file(&self) -> PathBuf {
        self.data_dir.join("scores.txt")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("maze-escape.log")
    }
}

/// Where the log and the score log are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePaths {
    pub log: PathBuf,
    pub scores: PathBuf,
}

impl FilePaths {
    /// Fills the missing overrides from [`AppPaths`]. The data directory is
    /// left alone when both are given.
    pub fn resolve(log: Option<PathBuf>, scores: Option<PathBuf>) -> Result<Self> {
        match (log, scores) {
            (Some(log), Some(scores)) => Ok(Self { log, scores }),
            (log, scores) => {
                let paths = AppPaths::new()?;
                Ok(Self {
                    log: log.unwrap_or_else(|| paths.log_file()),
                    scores: scores.unwrap_or_else(|| paths.scores_file()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_are_used_as_given() {
        let td = tempfile::tempdir().unwrap();
        let log = td.path().join("run.log");
        let scores = td.path().join("nested").join("scores.txt");
        let resolved = FilePaths::resolve(Some(log.clone()), Some(scores.clone())).unwrap();
        assert_eq!(resolved, FilePaths { log, scores });
        assert!(!td.path().join("nested").exists());
    }
}
