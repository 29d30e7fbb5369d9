//! Game state machine: Menu, Playing, Paused, Ended.
//!
//! The session owns the live maze and the run stats. Front ends feed it
//! directions and read back grid, fog and HUD state; nothing here touches
//! the terminal.

use std::time::Duration;

use chrono::Local;
use rand::Rng;
use tracing::info;

use crate::config::{Difficulty, Settings};
use crate::generator::MazeGenerator;
use crate::grid::{Dir, Grid};
use crate::movement::{attempt_move, MoveOutcome};
use crate::scores::Score;
use crate::stats::RunStats;
use crate::visibility::FogView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    pub steps: u32,
    pub elapsed: Duration,
    pub difficulty: Difficulty,
    pub fog: bool,
}

#[derive(Debug)]
pub struct Run {
    grid: Grid,
    stats: RunStats,
    difficulty: Difficulty,
    fog: FogView,
    finished: Option<Duration>,
    scored: bool,
}

impl Run {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn fog(&self) -> &FogView {
        &self.fog
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn steps(&self) -> u32 {
        self.stats.steps()
    }

    /// Frozen once the exit is reached.
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.stats.elapsed())
    }
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    state: GameState,
    run: Option<Run>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: GameState::Menu,
            run: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Takes effect from the next run.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn start_run(&mut self, difficulty: Difficulty, rng: &mut impl Rng) {
        let (rows, cols) = self.settings.size_for(difficulty);
        let grid = MazeGenerator::new(self.settings.generator).generate(rows, cols, difficulty, rng);
        let fog = FogView::new(&grid, difficulty, &self.settings.fog);
        info!(%difficulty, rows, cols, fog_radius = ?fog.radius(), "run started");
        self.run = Some(Run {
            grid,
            stats: RunStats::start(),
            difficulty,
            fog,
            finished: None,
            scored: false,
        });
        self.state = GameState::Playing;
    }

    /// `None` unless a run is being played.
    pub fn step(&mut self, dir: Dir) -> Option<MoveOutcome> {
        if self.state != GameState::Playing {
            return None;
        }
        let run = self.run.as_mut()?;
        let outcome = attempt_move(&mut run.grid, dir);
        if let MoveOutcome::Accepted { reached_exit, .. } = outcome {
            run.stats.bump_step();
            if reached_exit {
                let elapsed = run.stats.elapsed();
                run.finished = Some(elapsed);
                self.state = GameState::Ended;
                info!(
                    steps = run.stats.steps(),
                    secs = elapsed.as_secs(),
                    "exit reached"
                );
            }
        }
        Some(outcome)
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
    }

    /// Abandons a paused run or leaves the end screen.
    pub fn return_to_menu(&mut self) {
        if matches!(self.state, GameState::Paused | GameState::Ended) {
            self.state = GameState::Menu;
            self.run = None;
        }
    }

    /// The score of a finished run, handed out once.
    pub fn finish(&mut self) -> Option<Score> {
        if self.state != GameState::Ended {
            return None;
        }
        let run = self.run.as_mut()?;
        if run.scored {
            return None;
        }
        run.scored = true;
        Some(Score {
            when: Local::now(),
            steps: run.stats.steps(),
            seconds: run.elapsed().as_secs(),
        })
    }

    pub fn hud(&self) -> Option<Hud> {
        let run = self.run.as_ref()?;
        Some(Hud {
            steps: run.steps(),
            elapsed: run.elapsed(),
            difficulty: run.difficulty(),
            fog: run.fog.is_active(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn playing(difficulty: Difficulty) -> Session {
        let mut session = Session::new(Settings::default());
        let mut rng = StdRng::seed_from_u64(17);
        session.start_run(difficulty, &mut rng);
        session
    }

    #[test]
    fn moves_only_count_while_playing() {
        let mut session = Session::new(Settings::default());
        assert_eq!(session.step(Dir::Right), None);

        let mut session = playing(Difficulty::Easy);
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Paused);
        assert_eq!(session.step(Dir::Right), None);
        assert_eq!(session.hud().unwrap().steps, 0);

        session.toggle_pause();
        assert!(session.step(Dir::Right).unwrap().is_accepted());
        assert_eq!(session.hud().unwrap().steps, 1);
    }

    #[test]
    fn rejected_moves_are_not_counted() {
        let mut session = playing(Difficulty::Easy);
        let before = session.run().unwrap().grid().clone();
        assert_eq!(session.step(Dir::Up), Some(MoveOutcome::Rejected));
        assert_eq!(session.hud().unwrap().steps, 0);
        assert_eq!(session.run().unwrap().grid(), &before);
    }

    #[test]
    fn reaching_the_exit_ends_the_run_and_scores_once() {
        let mut session = playing(Difficulty::Easy);
        for _ in 0..27 {
            session.step(Dir::Right);
        }
        for _ in 0..11 {
            session.step(Dir::Down);
        }
        assert_eq!(session.state(), GameState::Playing);
        assert_eq!(
            session.step(Dir::Down),
            Some(MoveOutcome::Accepted {
                teleported: false,
                reached_exit: true
            })
        );
        assert_eq!(session.state(), GameState::Ended);
        assert_eq!(session.step(Dir::Up), None);

        let score = session.finish().expect("first finish scores");
        assert_eq!(score.steps, 39);
        assert_eq!(session.finish(), None);

        session.return_to_menu();
        assert_eq!(session.state(), GameState::Menu);
        assert!(session.run().is_none());
    }

    #[test]
    fn hud_reports_fog_per_difficulty() {
        assert!(!playing(Difficulty::Easy).hud().unwrap().fog);
        assert!(playing(Difficulty::Hard).hud().unwrap().fog);

        let mut session = Session::new(Settings::default().with_fog(false));
        session.start_run(Difficulty::Hard, &mut StdRng::seed_from_u64(1));
        assert!(!session.hud().unwrap().fog);
    }

    #[test]
    fn runs_leave_the_configured_difficulty_alone() {
        let mut session = playing(Difficulty::Hard);
        assert_eq!(session.run().unwrap().difficulty(), Difficulty::Hard);
        assert_eq!(session.hud().unwrap().difficulty, Difficulty::Hard);
        assert_eq!(session.settings().difficulty, Difficulty::Medium);

        session.step(Dir::Up);
        session.toggle_pause();
        session.return_to_menu();
        session.start_run(Difficulty::Easy, &mut StdRng::seed_from_u64(3));
        assert_eq!(session.settings().difficulty, Difficulty::Medium);
    }

    #[test]
    fn pause_toggle_is_ignored_outside_a_run() {
        let mut session = Session::new(Settings::default());
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Menu);
        session.return_to_menu();
        assert_eq!(session.state(), GameState::Menu);
    }
}
