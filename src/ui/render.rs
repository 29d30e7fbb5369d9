use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use maze_escape::session::Run;
use maze_escape::stats::format_clock;
use maze_escape::{CellKind, Hud, Pos, Skin};

/// Columns per maze cell. Icons are one column wide (see `Skin::new`).
const CELL_W: usize = 1;
const HUD_ROWS: usize = 1;
const FOOTER_ROWS: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Exit,
    Wall,
    Floor,
    Open,
    Visited,
    Portal,
    Fog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    skin: Skin,
}

impl Renderer {
    pub fn new(rows: usize, cols: usize, skin: Skin) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Open,
                    color: Color::Reset,
                };
                rows * cols
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            skin,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render(
    stdout: &mut impl Write,
    run: &Run,
    hud: &Hud,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let grid = run.grid();
    let needed_h = (grid.rows() + HUD_ROWS + FOOTER_ROWS) as u16;
    let needed_w = (grid.cols() * CELL_W) as u16;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        stdout.queue(MoveTo(0, 0))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + HUD_ROWS as u16;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(hud);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(0, renderer.origin_y - 1))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = cell_for(run, Pos::new(row, col));
            let idx = row * grid.cols() + col;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, row, col, cell)?;
            }
        }
    }

    if renderer.needs_full {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + grid.rows() as u16))?;
        stdout.queue(Print("W/A/S/D move  P pause"))?;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

pub fn hud_line(hud: &Hud) -> String {
    format!(
        "Steps: {}  Time: {}  Difficulty: {}  Fog: {}",
        hud.steps,
        format_clock(hud.elapsed),
        hud.difficulty,
        if hud.fog { "On" } else { "Off" }
    )
}

pub fn cell_for(run: &Run, pos: Pos) -> Cell {
    let grid = run.grid();
    if run.fog().is_fogged(grid, pos) {
        return Cell {
            glyph: Glyph::Fog,
            color: Color::DarkGrey,
        };
    }
    if pos == grid.player() {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if grid.is_portal(pos) {
        return Cell {
            glyph: Glyph::Portal,
            color: Color::Magenta,
        };
    }
    match grid.cell_at(pos) {
        Some(CellKind::Wall) | None => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Some(CellKind::Floor) => Cell {
            glyph: Glyph::Floor,
            color: Color::White,
        },
        Some(CellKind::Open) => Cell {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
        Some(CellKind::VisitedFloor) => Cell {
            glyph: Glyph::Visited,
            color: Color::DarkYellow,
        },
        Some(CellKind::Player) => Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        },
        Some(CellKind::Exit) => Cell {
            glyph: Glyph::Exit,
            color: Color::Green,
        },
    }
}

fn glyph_char(glyph: Glyph, skin: &Skin) -> char {
    match glyph {
        Glyph::Player => skin.player,
        Glyph::Wall => skin.wall,
        Glyph::Exit => 'E',
        Glyph::Floor => '.',
        Glyph::Open => ' ',
        Glyph::Visited => '·',
        Glyph::Portal => 'O',
        Glyph::Fog => '░',
    }
}

fn draw_cell(
    stdout: &mut impl Write,
    renderer: &Renderer,
    row: usize,
    col: usize,
    cell: Cell,
) -> io::Result<()> {
    let ch = glyph_char(cell.glyph, &renderer.skin);
    let x_pos = renderer.origin_x + (col * CELL_W) as u16;
    let y_pos = renderer.origin_y + row as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(ch))?;
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Clears the screen and prints one line per row from the top-left.
pub fn screen(stdout: &mut impl Write, lines: &[String]) -> io::Result<()> {
    stdout.queue(Clear(ClearType::All))?;
    for (i, line) in lines.iter().enumerate() {
        stdout.queue(MoveTo(0, i as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape::{Difficulty, Dir, Session, Settings};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn session(difficulty: Difficulty, settings: Settings) -> Session {
        let mut session = Session::new(settings);
        session.start_run(difficulty, &mut StdRng::seed_from_u64(8));
        session
    }

    #[test]
    fn easy_maze_shows_markers_and_floor() {
        let session = session(Difficulty::Easy, Settings::default());
        let run = session.run().unwrap();
        assert_eq!(cell_for(run, Pos::new(1, 1)).glyph, Glyph::Player);
        assert_eq!(cell_for(run, Pos::new(13, 28)).glyph, Glyph::Exit);
        assert_eq!(cell_for(run, Pos::new(1, 2)).glyph, Glyph::Floor);
        assert_eq!(cell_for(run, Pos::new(0, 0)).glyph, Glyph::Wall);
    }

    #[test]
    fn trail_shows_behind_the_player() {
        let mut session = session(Difficulty::Easy, Settings::default());
        session.step(Dir::Right);
        let run = session.run().unwrap();
        assert_eq!(cell_for(run, Pos::new(1, 1)).glyph, Glyph::Visited);
        assert_eq!(cell_for(run, Pos::new(1, 2)).glyph, Glyph::Player);
    }

    #[test]
    fn far_cells_are_fogged_on_hard() {
        let session = session(Difficulty::Hard, Settings::default());
        let run = session.run().unwrap();
        let radius = run.fog().radius().unwrap();
        let far = Pos::new(1, 1 + radius + 1);
        assert_eq!(cell_for(run, far).glyph, Glyph::Fog);
        assert_eq!(cell_for(run, run.grid().exit()).glyph, Glyph::Exit);

        let clear = self::session(Difficulty::Hard, Settings::default().with_fog(false));
        let run = clear.run().unwrap();
        assert_ne!(cell_for(run, far).glyph, Glyph::Fog);
    }

    #[test]
    fn portals_are_drawn() {
        let session = session(Difficulty::Hard, Settings::default().with_fog(false));
        let run = session.run().unwrap();
        for (a, _) in run.grid().portals().iter() {
            assert_eq!(cell_for(run, a).glyph, Glyph::Portal);
        }
    }

    #[test]
    fn hud_shows_all_fields() {
        let hud = Hud {
            steps: 12,
            elapsed: Duration::from_secs(65),
            difficulty: Difficulty::Hard,
            fog: true,
        };
        assert_eq!(
            hud_line(&hud),
            "Steps: 12  Time: 01:05  Difficulty: Hard  Fog: On"
        );
    }

    #[test]
    fn cells_take_a_single_column() {
        let renderer = Renderer::new(3, 3, Skin::default());
        let mut out = Vec::new();
        let cell = Cell {
            glyph: Glyph::Visited,
            color: Color::DarkYellow,
        };
        draw_cell(&mut out, &renderer, 0, 0, cell).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('·').count(), 1);
        assert!(!text.contains(' '));
    }

    #[test]
    fn screen_writes_each_line() {
        let mut out = Vec::new();
        screen(&mut out, &["one".to_string(), "two".to_string()]).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("one") && text.contains("two"));
    }
}
