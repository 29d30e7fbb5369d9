use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::QueueableCommand;
use maze_escape::scores::{ScoreLog, KEEP};
use maze_escape::stats::format_clock;
use maze_escape::{GameState, Session, Settings, Skin};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use super::audio::{self, Cue};
use super::input::{self, PlayCommand};
use super::render::{self, Renderer};

const CLOCK_REFRESH_MS: u64 = 250;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: Session,
    scores: ScoreLog,
    rng: StdRng,
}

impl App {
    pub fn new(settings: Settings, scores: ScoreLog) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            session: Session::new(settings),
            scores,
            rng,
        }
    }

    pub fn run(&mut self, stdout: &mut impl Write) -> io::Result<()> {
        loop {
            let flow = match self.session.state() {
                GameState::Menu => self.main_menu(stdout)?,
                GameState::Playing => self.play(stdout)?,
                GameState::Paused => self.pause_menu(stdout)?,
                GameState::Ended => self.end_menu(stdout)?,
            };
            if flow == Flow::Quit {
                info!("quit");
                return Ok(());
            }
        }
    }

    fn main_menu(&mut self, stdout: &mut impl Write) -> io::Result<Flow> {
        let settings = self.session.settings().clone();
        stdout.queue(Show)?;
        render::screen(stdout, &main_menu_lines(&settings))?;

        let key = input::read_key()?;
        if input::is_interrupt(&key) {
            return Ok(Flow::Quit);
        }
        match key.code {
            KeyCode::Char('1') => return self.new_run(stdout),
            KeyCode::Char('2') => self.show_scores(stdout)?,
            KeyCode::Char('3') | KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
            KeyCode::Char('4') => self.customize_skin(stdout)?,
            KeyCode::Char('5') => {
                self.session.set_settings(settings.with_sound(!settings.sound));
            }
            KeyCode::Char('6') => {
                self.session
                    .set_settings(settings.with_fog(!settings.fog.enabled));
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn new_run(&mut self, stdout: &mut impl Write) -> io::Result<Flow> {
        render::screen(
            stdout,
            &["Difficulty: 1) Easy  2) Medium  3) Hard".to_string()],
        )?;
        let key = input::read_key()?;
        let Some(difficulty) = input::difficulty_choice(&key, self.session.settings().difficulty)
        else {
            return Ok(Flow::Quit);
        };
        self.countdown(stdout)?;
        self.session.start_run(difficulty, &mut self.rng);
        Ok(Flow::Continue)
    }

    fn countdown(&self, stdout: &mut impl Write) -> io::Result<()> {
        let tick = Duration::from_millis(self.session.settings().countdown_ms);
        if tick.is_zero() {
            return Ok(());
        }
        for i in (1..=3).rev() {
            render::screen(stdout, &[format!("Starting in {i}...")])?;
            thread::sleep(tick);
        }
        Ok(())
    }

    fn play(&mut self, stdout: &mut impl Write) -> io::Result<Flow> {
        let Some(run) = self.session.run() else {
            return Ok(Flow::Continue);
        };
        let grid = run.grid();
        let mut renderer = Renderer::new(grid.rows(), grid.cols(), self.session.settings().skin);
        stdout.queue(Hide)?;

        while self.session.state() == GameState::Playing {
            self.draw(stdout, &mut renderer)?;
            if !event::poll(Duration::from_millis(CLOCK_REFRESH_MS))? {
                continue;
            }
            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                Event::Resize(_, _) => {
                    renderer.invalidate();
                    continue;
                }
                _ => continue,
            };
            if input::is_interrupt(&key) {
                return Ok(Flow::Quit);
            }
            match input::play_command(key.code) {
                Some(PlayCommand::Pause) => self.session.toggle_pause(),
                Some(PlayCommand::Move(dir)) => {
                    if let Some(outcome) = self.session.step(dir) {
                        let sound = self.session.settings().sound;
                        audio::play(stdout, Cue::from_outcome(outcome), sound);
                    }
                }
                None => {}
            }
        }

        if self.session.state() == GameState::Ended {
            self.draw(stdout, &mut renderer)?;
            self.escape_summary(stdout)?;
        }
        Ok(Flow::Continue)
    }

    fn draw(&self, stdout: &mut impl Write, renderer: &mut Renderer) -> io::Result<()> {
        if let (Some(run), Some(hud)) = (self.session.run(), self.session.hud()) {
            render::render(stdout, run, &hud, renderer)?;
        }
        Ok(())
    }

    fn escape_summary(&self, stdout: &mut impl Write) -> io::Result<()> {
        let Some(hud) = self.session.hud() else {
            return Ok(());
        };
        stdout.queue(Show)?;
        render::screen(
            stdout,
            &[
                "You escaped the maze!".to_string(),
                format!("Steps: {}", hud.steps),
                format!("Time: {}", format_clock(hud.elapsed)),
                "Press any key...".to_string(),
            ],
        )?;
        input::read_key()?;
        Ok(())
    }

    fn pause_menu(&mut self, stdout: &mut impl Write) -> io::Result<Flow> {
        stdout.queue(Show)?;
        render::screen(
            stdout,
            &[
                "=== Game Paused ===".to_string(),
                "Press P to resume".to_string(),
                "Press M (or Esc) to return to Main Menu".to_string(),
            ],
        )?;
        loop {
            let key = input::read_key()?;
            if input::is_interrupt(&key) {
                return Ok(Flow::Quit);
            }
            match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') => {
                    self.session.toggle_pause();
                    return Ok(Flow::Continue);
                }
                KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => {
                    self.session.return_to_menu();
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }
    }

    fn end_menu(&mut self, stdout: &mut impl Write) -> io::Result<Flow> {
        if let Some(score) = self.session.finish() {
            match self.scores.append(&score) {
                Ok(()) => info!(%score, "score saved"),
                Err(e) => warn!(
                    error = %e,
                    path = %self.scores.path().display(),
                    "could not save score"
                ),
            }
        }

        render::screen(
            stdout,
            &[
                "=== End Game Menu ===".to_string(),
                "1) Play Again".to_string(),
                "2) View High Scores".to_string(),
                "3) Exit".to_string(),
                "M) Main Menu".to_string(),
            ],
        )?;
        let key = input::read_key()?;
        if input::is_interrupt(&key) {
            return Ok(Flow::Quit);
        }
        match key.code {
            KeyCode::Char('1') => return self.new_run(stdout),
            KeyCode::Char('2') => self.show_scores(stdout)?,
            KeyCode::Char('3') | KeyCode::Char('q') => return Ok(Flow::Quit),
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => self.session.return_to_menu(),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn show_scores(&self, stdout: &mut impl Write) -> io::Result<()> {
        let scores = self.scores.latest(KEEP).unwrap_or_else(|e| {
            warn!(error = %e, "could not read scores");
            Vec::new()
        });
        let mut lines = vec![
            format!("High Scores (latest {KEEP})"),
            "-----------------------".to_string(),
        ];
        if scores.is_empty() {
            lines.push("(no scores yet)".to_string());
        } else {
            lines.extend(scores);
        }
        lines.push(String::new());
        lines.push("Press any key to return...".to_string());
        render::screen(stdout, &lines)?;
        input::read_key()?;
        Ok(())
    }

    fn customize_skin(&mut self, stdout: &mut impl Write) -> io::Result<()> {
        let current = self.session.settings().skin;
        let mut lines = vec![
            "=== Customize Icons/Skin ===".to_string(),
            format!("Current Player icon: {}", current.player),
            format!("Current Wall   icon: {}", current.wall),
            String::new(),
            "Enter new Player icon (single char) or press Enter to keep: ".to_string(),
        ];
        render::screen(stdout, &lines)?;
        let player = icon_key(current.player)?;

        lines.push("Enter new Wall icon (single char) or press Enter to keep: ".to_string());
        render::screen(stdout, &lines)?;
        let wall = icon_key(current.wall)?;

        lines.push(String::new());
        match Skin::new(player, wall) {
            Ok(skin) => {
                let settings = self.session.settings().with_skin(skin);
                self.session.set_settings(settings);
                lines.push(format!("Saved! Player={}, Wall={}", skin.player, skin.wall));
            }
            Err(e) => lines.push(format!("Not saved: {e}")),
        }
        lines.push("Press any key to return...".to_string());
        render::screen(stdout, &lines)?;
        input::read_key()?;
        Ok(())
    }
}

fn main_menu_lines(settings: &Settings) -> Vec<String> {
    vec![
        "=== Escape the Maze ===".to_string(),
        "1) Start Game".to_string(),
        format!("2) View High Scores (latest {KEEP})"),
        "3) Exit".to_string(),
        "4) Customize Icons/Skin".to_string(),
        format!("5) Sound: {}", on_off(settings.sound)),
        // Larger mazes widen the radius past this floor.
        format!(
            "6) Fog of War: {} (min r={})",
            on_off(settings.fog.enabled),
            settings.fog.base_radius
        ),
        "Select: ".to_string(),
    ]
}

/// Next typed character, or `keep` on Enter and other non-character keys.
fn icon_key(keep: char) -> io::Result<char> {
    let key = input::read_key()?;
    Ok(match key.code {
        KeyCode::Char(c) => c,
        _ => keep,
    })
}

fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_entry_names_the_minimum_radius() {
        let lines = main_menu_lines(&Settings::default());
        assert_eq!(lines[6], "6) Fog of War: On (min r=5)");

        let lines = main_menu_lines(&Settings::default().with_fog(false).with_sound(false));
        assert_eq!(lines[5], "5) Sound: Off");
        assert_eq!(lines[6], "6) Fog of War: Off (min r=5)");
    }
}
