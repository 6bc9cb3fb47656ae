/// World: the complete, explicitly owned state of one running round.
///
/// Everything the tick mutates lives here — there are no globals, so
/// independent simulations can coexist (which is how the tests drive the
/// engine). The presentation layer gets read-only access after the tick:
/// positions, directions, sub-cell fractions, grid flags, the HUD counters
/// and the two freeze flags below.
///
/// Freezes:
///   - `level_intro` — accumulates until `LEVEL_INTRO_SECONDS`; the sim is
///     frozen while it runs and the renderer shows the level card.
///   - `death_cause` — set by the collision resolver; the sim is frozen
///     until the presentation layer has shown its overlay and acknowledges
///     with `restart_after_death`.

use rand::Rng;

use crate::config::SpeedConfig;
use crate::domain::entity::{Ghost, GhostId, Player};
use crate::domain::grid::Grid;
use crate::sim::level::{self, LevelParams};
use crate::sim::phase::PhaseClock;

pub const LEVEL_INTRO_SECONDS: f32 = 1.0;

pub struct World {
    pub grid: Grid,
    pub player: Player,
    /// Indexed by `GhostId` discriminant: Blinky, Pinky, Inky, Clyde.
    pub ghosts: [Ghost; 4],
    pub clock: PhaseClock,
    pub params: LevelParams,
    pub speed: SpeedConfig,
    /// Monotonic within a run; reset only through `restart_after_death`.
    pub level: u32,
    /// Remaining pickups; 0 is the one and only level-advance trigger.
    pub dot_count: u32,
    /// The ghost that caught the player this round, if any.
    pub death_cause: Option<GhostId>,
    /// Seconds of level-intro elapsed so far.
    pub level_intro: f32,
}

impl World {
    pub fn new(speed: SpeedConfig, rng: &mut impl Rng) -> Self {
        level::new_round(1, speed, rng)
    }

    pub fn ghost(&self, id: GhostId) -> &Ghost {
        &self.ghosts[id as usize]
    }

    pub fn blinky(&self) -> &Ghost {
        &self.ghosts[GhostId::Blinky as usize]
    }

    pub fn in_level_intro(&self) -> bool {
        self.level_intro < LEVEL_INTRO_SECONDS
    }

    pub fn in_death_freeze(&self) -> bool {
        self.death_cause.is_some()
    }

    /// Presentation-layer acknowledgment of a capture: the run restarts
    /// from scratch at level 1.
    pub fn restart_after_death(&mut self, rng: &mut impl Rng) {
        self.level = 0;
        level::setup_level(self, rng);
    }
}
