use std::io::Write;

use crossterm::style::Print;
use crossterm::QueueableCommand;
use maze_escape::MoveOutcome;

const BELL: char = '\x07';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Bump,
    Step,
    Teleport,
    Escape,
}

impl Cue {
    pub fn from_outcome(outcome: MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::Rejected => Cue::Bump,
            MoveOutcome::Accepted {
                reached_exit: true, ..
            } => Cue::Escape,
            MoveOutcome::Accepted {
                teleported: true, ..
            } => Cue::Teleport,
            MoveOutcome::Accepted { .. } => Cue::Step,
        }
    }

    /// A bell has no pitch, so plain steps stay silent.
    fn bells(self) -> usize {
        match self {
            Cue::Step => 0,
            Cue::Bump => 1,
            Cue::Teleport => 2,
            Cue::Escape => 3,
        }
    }
}

/// Rings the terminal bell for `cue`. Sound is cosmetic: write errors are
/// dropped.
pub fn play(out: &mut impl Write, cue: Cue, enabled: bool) {
    if !enabled || cue.bells() == 0 {
        return;
    }
    for _ in 0..cue.bells() {
        let _ = out.queue(Print(BELL));
    }
    let _ = out.flush();
}
