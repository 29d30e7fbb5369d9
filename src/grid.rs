//! Maze storage: cell kinds, positions, directions and the portal map.
//!
//! A [`Grid`] carries no generation logic. The generator builds one, the
//! movement engine mutates it, the renderer only queries it.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    /// Plain corridor floor (the Easy maze).
    Floor,
    /// Carved floor the player has not walked yet (random mazes).
    Open,
    VisitedFloor,
    Player,
    Exit,
}

impl CellKind {
    pub fn is_walkable(self) -> bool {
        self != CellKind::Wall
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns `None` when the offset would leave the non-negative quadrant.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Pos> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Pos { row, col })
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// `(dr, dc)` unit vector.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

/// Symmetric teleport map. The only way in is [`Portals::link`], so
/// `get(a) == Some(b)` always implies `get(b) == Some(a)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Portals {
    links: HashMap<Pos, Pos>,
}

impl Portals {
    /// Binds `a` and `b` both ways. Returns false, leaving the map
    /// untouched, when `a == b` or either end is already linked.
    pub fn link(&mut self, a: Pos, b: Pos) -> bool {
        if a == b || self.links.contains_key(&a) || self.links.contains_key(&b) {
            return false;
        }
        self.links.insert(a, b);
        self.links.insert(b, a);
        true
    }

    pub fn get(&self, pos: Pos) -> Option<Pos> {
        self.links.get(&pos).copied()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.links.contains_key(&pos)
    }

    pub fn pair_count(&self) -> usize {
        self.links.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Every endpoint with its partner; each pair shows up twice.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Pos)> + '_ {
        self.links.iter().map(|(a, b)| (*a, *b))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
    pub(crate) player: Pos,
    pub(crate) start: Pos,
    pub(crate) exit: Pos,
    pub(crate) portals: Portals,
}

impl Grid {
    /// A `rows x cols` grid of walls. Player, start and exit all sit at
    /// (1,1) until the generator stamps them.
    pub fn filled(rows: usize, cols: usize) -> Self {
        let origin = Pos::new(1, 1);
        Self {
            rows,
            cols,
            cells: vec![CellKind::Wall; rows * cols],
            player: origin,
            start: origin,
            exit: origin,
            portals: Portals::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn exit(&self) -> Pos {
        self.exit
    }

    pub fn portals(&self) -> &Portals {
        &self.portals
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Strictly inside the outer border.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.row >= 1 && pos.col >= 1 && pos.row + 1 < self.rows && pos.col + 1 < self.cols
    }

    pub fn cell_at(&self, pos: Pos) -> Option<CellKind> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[self.idx(pos)])
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.cell_at(pos).is_some_and(CellKind::is_walkable)
    }

    pub fn is_portal(&self, pos: Pos) -> bool {
        self.portals.contains(pos)
    }

    pub fn at_exit(&self) -> bool {
        self.player == self.exit
    }

    pub(crate) fn set(&mut self, pos: Pos, kind: CellKind) {
        let idx = self.idx(pos);
        self.cells[idx] = kind;
    }

    pub(crate) fn replace_all(&mut self, from: CellKind, to: CellKind) {
        for cell in self.cells.iter_mut().filter(|c| **c == from) {
            *cell = to;
        }
    }

    /// Interior positions, row-major.
    pub fn interior(&self) -> impl Iterator<Item = Pos> + '_ {
        (1..self.rows.saturating_sub(1))
            .flat_map(move |row| (1..self.cols.saturating_sub(1)).map(move |col| Pos { row, col }))
    }

    fn idx(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }
}
