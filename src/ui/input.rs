use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use maze_escape::{Difficulty, Dir};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayCommand {
    Move(Dir),
    Pause,
}

pub fn play_command(code: KeyCode) -> Option<PlayCommand> {
    let cmd = match code {
        KeyCode::Up => PlayCommand::Move(Dir::Up),
        KeyCode::Down => PlayCommand::Move(Dir::Down),
        KeyCode::Left => PlayCommand::Move(Dir::Left),
        KeyCode::Right => PlayCommand::Move(Dir::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => PlayCommand::Move(Dir::Up),
            's' => PlayCommand::Move(Dir::Down),
            'a' => PlayCommand::Move(Dir::Left),
            'd' => PlayCommand::Move(Dir::Right),
            'p' => PlayCommand::Pause,
            _ => return None,
        },
        _ => return None,
    };
    Some(cmd)
}

/// `1` Easy, `3` Hard, anything else falls back to `default`. `None` on
/// Ctrl-C.
pub fn difficulty_choice(key: &KeyEvent, default: Difficulty) -> Option<Difficulty> {
    if is_interrupt(key) {
        return None;
    }
    Some(match key.code {
        KeyCode::Char('1') => Difficulty::Easy,
        KeyCode::Char('2') => Difficulty::Medium,
        KeyCode::Char('3') => Difficulty::Hard,
        _ => default,
    })
}

/// Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Blocks until a key is pressed.
pub fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}
