/// Events emitted by the tick for the presentation layer.

use crate::domain::entity::GhostId;
use crate::domain::geometry::Cell;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GameEvent {
    DotEaten { cell: Cell },
    PowerDotEaten { cell: Cell },
    GhostEaten { id: GhostId },
    PlayerCaught { id: GhostId },
    LevelStarted { level: u32 },
}
