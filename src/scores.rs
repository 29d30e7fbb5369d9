//! Rolling score log: one `yyyy-MM-dd HH:mm:ss,steps,seconds` line per
//! finished run, newest last, at most [`KEEP`] lines.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;

pub const KEEP: usize = 10;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    pub when: DateTime<Local>,
    pub steps: u32,
    pub seconds: u64,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.when.format(TIME_FORMAT),
            self.steps,
            self.seconds
        )
    }
}

#[derive(Clone, Debug)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `score`, then trims the file to the newest [`KEEP`] lines.
    pub fn append(&self, score: &Score) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{score}")?;
        drop(file);

        let lines = self.read_lines()?;
        if lines.len() > KEEP {
            let keep = &lines[lines.len() - KEEP..];
            let mut body = keep.join("\n");
            body.push('\n');
            fs::write(&self.path, body)?;
        }
        Ok(())
    }

    /// Newest `count` lines, oldest first. A missing file has no scores.
    pub fn latest(&self, count: usize) -> Result<Vec<String>> {
        let lines = match self.read_lines() {
            Ok(lines) => lines,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let start = lines.len().saturating_sub(count);
        Ok(lines[start..].to_vec())
    }

    fn read_lines(&self) -> io::Result<Vec<String>> {
        let text = fs::read_to_string(&self.path)?;
        Ok(text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_owned)
            .collect())
    }
}
