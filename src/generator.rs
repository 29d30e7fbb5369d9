//! Procedural maze generation.
//!
//! Easy mazes are a fixed L-shaped corridor. Medium and Hard mazes are
//! carved with a randomized depth-first backtracker over the odd lattice,
//! which yields a spanning tree of the lattice cells and so always connects
//! the start to every carved cell. Medium then opens a few bottleneck walls
//! to add cycles, and both place teleport portal pairs away from the start
//! and the exit.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::Difficulty;
use crate::grid::{CellKind, Dir, Grid, Pos};

const SHORTCUT_PERCENT: usize = 6;
const PORTAL_MIN_START_DISTANCE: usize = 4;
const PORTAL_MIN_EXIT_DISTANCE: usize = 3;
const PORTAL_ATTEMPTS: usize = 4000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Share of bottleneck walls opened on Medium, at least one.
    pub shortcut_percent: usize,
    pub portal_min_start_distance: usize,
    pub portal_min_exit_distance: usize,
    /// Sampling budget shared by all portal pairs of one maze.
    pub portal_attempts: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            shortcut_percent: SHORTCUT_PERCENT,
            portal_min_start_distance: PORTAL_MIN_START_DISTANCE,
            portal_min_exit_distance: PORTAL_MIN_EXIT_DISTANCE,
            portal_attempts: PORTAL_ATTEMPTS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    settings: GeneratorSettings,
}

impl MazeGenerator {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Builds a fresh maze. Callers keep `rows` and `cols` at 5 or more.
    pub fn generate(
        &self,
        rows: usize,
        cols: usize,
        difficulty: Difficulty,
        rng: &mut impl Rng,
    ) -> Grid {
        let mut grid = Grid::filled(rows, cols);
        grid.start = Pos::new(1, 1);
        grid.exit = Pos::new(rows - 2, cols - 2);

        match difficulty {
            Difficulty::Easy => carve_corridor(&mut grid),
            Difficulty::Medium | Difficulty::Hard => {
                carve_passages(&mut grid, rng);
                open_exit(&mut grid);
                let shortcuts = if difficulty == Difficulty::Medium {
                    inject_shortcuts(&mut grid, self.settings.shortcut_percent, rng)
                } else {
                    0
                };
                grid.replace_all(CellKind::Floor, CellKind::Open);
                let wanted = difficulty.portal_pairs();
                let placed = place_portals(&mut grid, wanted, &self.settings, rng);
                debug!(rows, cols, %difficulty, shortcuts, placed, wanted, "carved maze");
            }
        }

        stamp_markers(&mut grid);
        grid
    }

    pub fn generate_seeded(
        &self,
        rows: usize,
        cols: usize,
        difficulty: Difficulty,
        seed: u64,
    ) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(rows, cols, difficulty, &mut rng)
    }
}

fn carve_corridor(grid: &mut Grid) {
    let (rows, cols) = (grid.rows(), grid.cols());
    for col in 1..cols - 1 {
        grid.set(Pos::new(1, col), CellKind::Floor);
    }
    for row in 1..rows - 1 {
        grid.set(Pos::new(row, cols - 2), CellKind::Floor);
    }
}

fn carve_passages(grid: &mut Grid, rng: &mut impl Rng) {
    let start = grid.start();
    let mut visited = vec![vec![false; grid.cols()]; grid.rows()];
    visited[start.row][start.col] = true;
    grid.set(start, CellKind::Floor);
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let neighbors = lattice_neighbors(grid, &visited, current);
        let Some(&(wall, next)) = neighbors.choose(rng) else {
            stack.pop();
            continue;
        };
        grid.set(wall, CellKind::Floor);
        grid.set(next, CellKind::Floor);
        visited[next.row][next.col] = true;
        stack.push(next);
    }
}

/// Unvisited cells two steps away, paired with the wall between.
fn lattice_neighbors(grid: &Grid, visited: &[Vec<bool>], pos: Pos) -> Vec<(Pos, Pos)> {
    let mut out = Vec::new();
    for dir in Dir::ALL {
        let (dr, dc) = dir.delta();
        let Some(next) = pos.offset(dr * 2, dc * 2) else {
            continue;
        };
        if !grid.is_interior(next) || visited[next.row][next.col] {
            continue;
        }
        let wall = Pos::new((pos.row + next.row) / 2, (pos.col + next.col) / 2);
        if grid.cell_at(wall) == Some(CellKind::Wall) {
            out.push((wall, next));
        }
    }
    out
}

/// Even dimensions put the exit off the lattice; opening its upper and
/// left neighbours ties it back in.
fn open_exit(grid: &mut Grid) {
    let exit = grid.exit();
    grid.set(exit, CellKind::Floor);
    grid.set(Pos::new(exit.row - 1, exit.col), CellKind::Floor);
    grid.set(Pos::new(exit.row, exit.col - 1), CellKind::Floor);
}

fn inject_shortcuts(grid: &mut Grid, percent: usize, rng: &mut impl Rng) -> usize {
    let candidates = bottleneck_walls(grid);
    if candidates.is_empty() {
        return 0;
    }
    let to_open = (candidates.len() * percent / 100).max(1);
    let chosen: Vec<Pos> = candidates.choose_multiple(rng, to_open).copied().collect();
    for pos in &chosen {
        grid.set(*pos, CellKind::Floor);
    }
    chosen.len()
}

/// Interior walls with floor on both sides along one axis.
fn bottleneck_walls(grid: &Grid) -> Vec<Pos> {
    let is_floor = |pos: Option<Pos>| pos.and_then(|p| grid.cell_at(p)) == Some(CellKind::Floor);
    grid.interior()
        .filter(|&pos| pos != grid.start() && pos != grid.exit())
        .filter(|&pos| grid.cell_at(pos) == Some(CellKind::Wall))
        .filter(|&pos| {
            (is_floor(pos.offset(0, -1)) && is_floor(pos.offset(0, 1)))
                || (is_floor(pos.offset(-1, 0)) && is_floor(pos.offset(1, 0)))
        })
        .collect()
}

fn place_portals(
    grid: &mut Grid,
    pairs: usize,
    settings: &GeneratorSettings,
    rng: &mut impl Rng,
) -> usize {
    let mut attempts = 0;
    while grid.portals.pair_count() < pairs && attempts < settings.portal_attempts {
        attempts += 1;
        let a = random_interior(grid, rng);
        let b = random_interior(grid, rng);
        if a == b || !portal_allowed(grid, a, settings) || !portal_allowed(grid, b, settings) {
            continue;
        }
        grid.portals.link(a, b);
    }
    let placed = grid.portals.pair_count();
    if placed < pairs {
        debug!(placed, pairs, attempts, "portal attempt budget exhausted");
    }
    placed
}

fn random_interior(grid: &Grid, rng: &mut impl Rng) -> Pos {
    Pos::new(
        rng.gen_range(1..grid.rows() - 1),
        rng.gen_range(1..grid.cols() - 1),
    )
}

fn portal_allowed(grid: &Grid, pos: Pos, settings: &GeneratorSettings) -> bool {
    grid.is_interior(pos)
        && grid.cell_at(pos) == Some(CellKind::Open)
        && pos != grid.start()
        && pos != grid.exit()
        && !grid.is_portal(pos)
        && pos.manhattan(grid.start()) >= settings.portal_min_start_distance
        && pos.manhattan(grid.exit()) >= settings.portal_min_exit_distance
}

fn stamp_markers(grid: &mut Grid) {
    let (start, exit) = (grid.start(), grid.exit());
    grid.player = start;
    grid.set(start, CellKind::Player);
    grid.set(exit, CellKind::Exit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    const SEEDS: u64 = 50;

    fn reachable(grid: &Grid, from: Pos, to: Pos) -> bool {
        let mut seen = vec![vec![false; grid.cols()]; grid.rows()];
        let mut q = VecDeque::new();
        seen[from.row][from.col] = true;
        q.push_back(from);
        while let Some(pos) = q.pop_front() {
            if pos == to {
                return true;
            }
            for dir in Dir::ALL {
                let (dr, dc) = dir.delta();
                let Some(next) = pos.offset(dr, dc) else {
                    continue;
                };
                if grid.is_walkable(next) && !seen[next.row][next.col] {
                    seen[next.row][next.col] = true;
                    q.push_back(next);
                }
            }
        }
        false
    }

    #[test]
    fn every_difficulty_is_solvable() {
        let gen = MazeGenerator::default();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let (rows, cols) = difficulty.size();
            for seed in 0..SEEDS {
                let grid = gen.generate_seeded(rows, cols, difficulty, seed);
                assert!(
                    reachable(&grid, grid.start(), grid.exit()),
                    "{difficulty} seed {seed} has no path to the exit"
                );
            }
        }
    }

    #[test]
    fn odd_and_even_sizes_are_solvable() {
        let gen = MazeGenerator::default();
        for (rows, cols) in [(5, 5), (6, 6), (7, 10), (10, 7), (20, 30), (21, 31)] {
            for seed in 0..10 {
                let grid = gen.generate_seeded(rows, cols, Difficulty::Medium, seed);
                assert!(reachable(&grid, grid.start(), grid.exit()), "{rows}x{cols} seed {seed}");
            }
        }
    }

    #[test]
    fn easy_is_a_fixed_l_corridor() {
        let gen = MazeGenerator::default();
        let a = gen.generate_seeded(15, 30, Difficulty::Easy, 1);
        let b = gen.generate_seeded(15, 30, Difficulty::Easy, 2);
        assert_eq!(a, b);
        assert!(a.portals().is_empty());
        assert_eq!(a.cell_at(Pos::new(1, 1)), Some(CellKind::Player));
        assert_eq!(a.cell_at(Pos::new(13, 28)), Some(CellKind::Exit));
        assert_eq!(a.cell_at(Pos::new(1, 5)), Some(CellKind::Floor));
        assert_eq!(a.cell_at(Pos::new(2, 1)), Some(CellKind::Wall));
        let floor = a
            .interior()
            .filter(|p| a.cell_at(*p) != Some(CellKind::Wall))
            .count();
        assert_eq!(floor, 28 + 12);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let gen = MazeGenerator::default();
        let a = gen.generate_seeded(20, 45, Difficulty::Medium, 99);
        let b = gen.generate_seeded(20, 45, Difficulty::Medium, 99);
        assert_eq!(a, b);
    }

    #[test]
    fn random_mazes_keep_walls_on_the_border_and_no_raw_floor() {
        let gen = MazeGenerator::default();
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let (rows, cols) = difficulty.size();
            let grid = gen.generate_seeded(rows, cols, difficulty, 7);
            for row in 0..rows {
                for col in 0..cols {
                    let pos = Pos::new(row, col);
                    let kind = grid.cell_at(pos).unwrap();
                    assert_ne!(kind, CellKind::Floor);
                    assert_ne!(kind, CellKind::VisitedFloor);
                    if !grid.is_interior(pos) {
                        assert_eq!(kind, CellKind::Wall);
                    }
                }
            }
        }
    }

    #[test]
    fn portals_respect_safety_distances() {
        let gen = MazeGenerator::default();
        for difficulty in [Difficulty::Medium, Difficulty::Hard] {
            let (rows, cols) = difficulty.size();
            for seed in 0..SEEDS {
                let grid = gen.generate_seeded(rows, cols, difficulty, seed);
                assert_eq!(grid.portals().pair_count(), difficulty.portal_pairs());
                for (a, b) in grid.portals().iter() {
                    assert_eq!(grid.portals().get(b), Some(a));
                    assert_ne!(a, b);
                    assert!(a.manhattan(grid.start()) >= PORTAL_MIN_START_DISTANCE);
                    assert!(a.manhattan(grid.exit()) >= PORTAL_MIN_EXIT_DISTANCE);
                    assert_eq!(grid.cell_at(a), Some(CellKind::Open));
                }
            }
        }
    }

    #[test]
    fn cramped_maze_places_what_fits() {
        let gen = MazeGenerator::default();
        let grid = gen.generate_seeded(5, 5, Difficulty::Hard, 3);
        // Every open cell of a 5x5 sits within reach of the start or exit.
        assert_eq!(grid.portals().pair_count(), 0);
        assert_eq!(grid.player(), Pos::new(1, 1));
        assert_eq!(grid.exit(), Pos::new(3, 3));
    }

    #[test]
    fn shortcuts_open_at_least_one_bottleneck() {
        let mut grid = Grid::filled(5, 7);
        for col in [1, 3, 5] {
            grid.set(Pos::new(1, col), CellKind::Floor);
        }
        assert_eq!(bottleneck_walls(&grid), vec![Pos::new(1, 2), Pos::new(1, 4)]);

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(inject_shortcuts(&mut grid, 6, &mut rng), 1);
        assert_eq!(bottleneck_walls(&grid).len(), 1);

        assert_eq!(inject_shortcuts(&mut grid, 100, &mut rng), 1);
        assert!(bottleneck_walls(&grid).is_empty());
        assert_eq!(inject_shortcuts(&mut grid, 100, &mut rng), 0);
    }

    #[test]
    fn medium_has_more_open_cells_than_hard_at_equal_size() {
        // Same seed carves the same tree; only Medium opens shortcuts on top.
        let gen = MazeGenerator::default();
        let count = |grid: &Grid| grid.interior().filter(|p| grid.is_walkable(*p)).count();
        let medium = gen.generate_seeded(21, 41, Difficulty::Medium, 11);
        let hard = gen.generate_seeded(21, 41, Difficulty::Hard, 11);
        assert!(count(&medium) > count(&hard));
    }
}
