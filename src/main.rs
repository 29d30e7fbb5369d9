mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use maze_escape::paths::FilePaths;
use maze_escape::scores::ScoreLog;
use maze_escape::Args;
use tracing::{info, Level};

use crate::ui::app::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let files = FilePaths::resolve(args.log_file.clone(), args.scores.clone())?;
    init_logging(&files.log, args.verbose)?;

    let scores = ScoreLog::new(files.scores);
    let settings = args.into_settings()?;
    info!(difficulty = %settings.difficulty, seed = ?settings.seed, "starting");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = App::new(settings, scores).run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result?;
    Ok(())
}

/// Logs go to a file; stdout belongs to the alternate screen.
fn init_logging(path: &Path, verbose: bool) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();
    Ok(())
}
