use crate::grid::{CellKind, Dir, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Wall or out of bounds; nothing changed.
    Rejected,
    Accepted { teleported: bool, reached_exit: bool },
}

impl MoveOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, MoveOutcome::Accepted { .. })
    }
}

/// Moves the player one cell, leaving a breadcrumb behind and following at
/// most one portal hop.
pub fn attempt_move(grid: &mut Grid, dir: Dir) -> MoveOutcome {
    let (dr, dc) = dir.delta();
    let target = match grid.player().offset(dr, dc) {
        Some(pos) if grid.is_walkable(pos) => pos,
        _ => return MoveOutcome::Rejected,
    };

    let current = grid.player();
    if current != grid.exit() {
        grid.set(current, CellKind::VisitedFloor);
    }

    let partner = grid.portals().get(target);
    let dest = partner.unwrap_or(target);
    grid.player = dest;
    let reached_exit = dest == grid.exit();
    grid.set(dest, if reached_exit { CellKind::Exit } else { CellKind::Player });

    MoveOutcome::Accepted {
        teleported: partner.is_some(),
        reached_exit,
    }
}
