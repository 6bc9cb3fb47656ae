/// Entities: the player and the four ghosts.
///
/// A ghost's identity is fixed for its lifetime — it binds the targeting
/// strategy, the scatter corner and the display color. Only state and
/// position ever mutate.

use super::geometry::{Cell, Direction};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GhostId {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostId {
    pub fn name(self) -> &'static str {
        match self {
            GhostId::Blinky => "Blinky",
            GhostId::Pinky => "Pinky",
            GhostId::Inky => "Inky",
            GhostId::Clyde => "Clyde",
        }
    }
}

/// Ghost lifecycle. Every state has a successor for every input the tick
/// can produce; there is no terminal state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GhostState {
    /// Pacing the house row, counting down the exit wait.
    Inside,
    /// Climbing the house corridor toward the maze.
    Leaving,
    /// Roaming the maze under the global phase's targeting policy.
    Outside,
    /// Fleeing at random after a power dot.
    Frightened,
    /// Eaten; navigating back to the house door.
    Returning,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Cell,
    pub direction: Direction,
    /// Buffered input; adopted only when the turn-legality rules allow.
    pub requested_direction: Direction,
    /// Signed sub-cell offset, only the motion axis nonzero.
    pub fraction: (f32, f32),
}

impl Player {
    pub fn new(position: Cell) -> Self {
        Player {
            position,
            direction: Direction::None,
            requested_direction: Direction::None,
            fraction: (0.0, 0.0),
        }
    }

    /// Center of the player in screen units, sub-cell offset applied.
    pub fn screen_position(&self) -> (f32, f32) {
        let (cx, cy) = self.position.center();
        (cx + self.fraction.0, cy + self.fraction.1)
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub id: GhostId,
    pub state: GhostState,
    pub position: Cell,
    pub direction: Direction,
    /// Progress toward the next cell in `direction`, in [0, 1).
    pub fraction: f32,
    /// Last computed target; refreshed on every cell arrival while Outside.
    pub target: Cell,
    /// Cell-arrivals to wait at the house center before leaving.
    pub wait_amount: u32,
}

impl Ghost {
    pub fn new(
        id: GhostId,
        state: GhostState,
        position: Cell,
        direction: Direction,
    ) -> Self {
        Ghost {
            id,
            state,
            position,
            direction,
            fraction: 0.0,
            target: position,
            wait_amount: 0,
        }
    }

    /// Center of the ghost in screen units: cell center displaced by the
    /// fraction along the current direction.
    pub fn screen_position(&self) -> (f32, f32) {
        let (cx, cy) = self.position.center();
        let (dx, dy) = self.direction.delta();
        (cx + self.fraction * dx as f32, cy + self.fraction * dy as f32)
    }

    /// Current speed in cells per second. `multiplier` is the configured
    /// base speed; `red_multiplier` is the per-level Blinky boost, applied
    /// only while he roams.
    pub fn speed(&self, multiplier: f32, red_multiplier: f32) -> f32 {
        match self.state {
            GhostState::Inside | GhostState::Leaving | GhostState::Frightened => {
                0.5 * multiplier
            }
            GhostState::Outside => {
                if self.id == GhostId::Blinky {
                    multiplier * red_multiplier
                } else {
                    multiplier
                }
            }
            GhostState::Returning => multiplier,
        }
    }
}

/// Player speed in cells per second.
pub fn player_speed(multiplier: f32) -> f32 {
    multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_speed_by_state() {
        let mut g = Ghost::new(
            GhostId::Pinky,
            GhostState::Inside,
            Cell::new(8, 10),
            Direction::Right,
        );
        assert_eq!(g.speed(6.0, 1.2), 3.0);
        g.state = GhostState::Frightened;
        assert_eq!(g.speed(6.0, 1.2), 3.0);
        g.state = GhostState::Outside;
        assert_eq!(g.speed(6.0, 1.2), 6.0);
        g.state = GhostState::Returning;
        assert_eq!(g.speed(6.0, 1.2), 6.0);
    }

    #[test]
    fn only_roaming_blinky_gets_the_boost() {
        let mut g = Ghost::new(
            GhostId::Blinky,
            GhostState::Outside,
            Cell::new(9, 8),
            Direction::Left,
        );
        assert!((g.speed(6.0, 1.5) - 9.0).abs() < 1e-6);
        g.state = GhostState::Returning;
        assert_eq!(g.speed(6.0, 1.5), 6.0);
    }

    #[test]
    fn ghost_screen_position_leads_along_direction() {
        let mut g = Ghost::new(
            GhostId::Inky,
            GhostState::Outside,
            Cell::new(4, 4),
            Direction::Up,
        );
        g.fraction = 0.25;
        let (x, y) = g.screen_position();
        assert!((x - 4.5).abs() < 1e-6);
        assert!((y - 4.25).abs() < 1e-6);
    }
}
