//! Fog of war.

use crate::config::Difficulty;
use crate::grid::{CellKind, Grid, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FogSettings {
    pub enabled: bool,
    /// Lower bound on the visibility radius, in Manhattan steps.
    pub base_radius: usize,
}

/// `(min_floor, divisor)` for the size-derived radius, `None` where fog
/// never applies.
fn radius_floor(difficulty: Difficulty) -> Option<(usize, usize)> {
    match difficulty {
        Difficulty::Easy => None,
        Difficulty::Medium => Some((12, 4)),
        Difficulty::Hard => Some((10, 5)),
    }
}

/// Visibility radius for a maze of `rows x cols`, or `None` when fog is
/// off for this run.
pub fn effective_radius(
    difficulty: Difficulty,
    fog: &FogSettings,
    rows: usize,
    cols: usize,
) -> Option<usize> {
    if !fog.enabled {
        return None;
    }
    let (min_floor, divisor) = radius_floor(difficulty)?;
    let floor = min_floor.max((rows + cols) / divisor);
    Some(fog.base_radius.max(floor))
}

pub fn is_fogged(pos: Pos, player: Pos, exit: Pos, kind: CellKind, radius: Option<usize>) -> bool {
    let Some(radius) = radius else {
        return false;
    };
    if pos == player || pos == exit || kind == CellKind::VisitedFloor {
        return false;
    }
    pos.manhattan(player) > radius
}

/// Fog state for one maze, resolved once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FogView {
    radius: Option<usize>,
}

impl FogView {
    pub fn new(grid: &Grid, difficulty: Difficulty, fog: &FogSettings) -> Self {
        Self {
            radius: effective_radius(difficulty, fog, grid.rows(), grid.cols()),
        }
    }

    pub fn radius(&self) -> Option<usize> {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.radius.is_some()
    }

    /// Out-of-bounds positions are never fogged.
    pub fn is_fogged(&self, grid: &Grid, pos: Pos) -> bool {
        match grid.cell_at(pos) {
            Some(kind) => is_fogged(pos, grid.player(), grid.exit(), kind, self.radius),
            None => false,
        }
    }
}
