/// Level setup: the embedded maze, per-level difficulty curves, and the
/// fresh-round constructor.
///
/// The maze is written as one string per column (x picks the string, y the
/// character), 19 columns of 22 rows. Row 10 is open at both edges — that
/// is the wrap-around tunnel — and the ghost house sits on the same row,
/// cells (8..=10, 10), behind the door wall at (9, 9).
///
/// Difficulty is a handful of linear curves over the level index that
/// saturate at level 10: scatter windows shrink, chase windows grow,
/// Blinky speeds up, and the frightened phase shortens until it vanishes.

use rand::Rng;

use crate::config::SpeedConfig;
use crate::domain::entity::{Ghost, GhostId, GhostState, Player};
use crate::domain::geometry::{Cell, Direction};
use crate::domain::grid::Grid;
use crate::sim::phase::PhaseClock;
use crate::sim::world::World;

pub const CELL_PLAYER_START: Cell = Cell::new(9, 16);
pub const CELL_OUTSIDE_GHOST_HOUSE_DOOR: Cell = Cell::new(9, 8);
pub const CELL_GHOST_HOUSE_DOOR: Cell = Cell::new(9, 9);
pub const CELL_GHOST_HOUSE_CENTER: Cell = Cell::new(9, 10);
pub const CELL_GHOST_HOUSE_LEFT_SIDE: Cell = Cell::new(8, 10);
pub const CELL_GHOST_HOUSE_RIGHT_SIDE: Cell = Cell::new(10, 10);

/// One string per column, top to bottom.
pub const LAYOUT: [&str; 19] = [
    "########## ###########",
    "#.*....### ###..*#...#",
    "#.##.#.### ###.#...#.#",
    "#.##.#.### ###.###.#.#",
    "#..................#.#",
    "#.##.##### ###.#.###.#",
    "#.##...#      .#...#.#",
    "#.##.#.# ### #.#.#.#.#",
    "#....#.  # # #...#...#",
    "####.### # # ### ###.#",
    "#....#.  # # #...#...#",
    "#.##.#.# ### #.#.#.#.#",
    "#.##...#      .#...#.#",
    "#.##.#####.###.#.###.#",
    "#..................#.#",
    "#.##.#.### ###.###.#.#",
    "#.##.#.### ###.#...#.#",
    "#.*....### ###..*#...#",
    "########## ###########",
];

const LEVEL_MAX_CHANGE: u32 = 10;

/// Per-level tuning, computed once at setup.
#[derive(Clone, Copy, Debug)]
pub struct LevelParams {
    pub scatter_min: f32,
    pub scatter_max: f32,
    pub chase_min: f32,
    pub chase_max: f32,
    pub frightened_duration: f32,
    pub red_speed_multiplier: f32,
}

impl LevelParams {
    pub fn for_level(level: u32) -> Self {
        LevelParams {
            scatter_min: falls_to(level, 5.0, 2.0),
            scatter_max: falls_to(level, 10.0, 4.0),
            chase_min: rises_to(level, 10.0, 50.0),
            chase_max: rises_to(level, 20.0, 100.0),
            frightened_duration: if level < LEVEL_MAX_CHANGE {
                (LEVEL_MAX_CHANGE - level) as f32
            } else {
                0.0
            },
            red_speed_multiplier: rises_to(level, 1.2, 1.5),
        }
    }
}

fn rises_to(level: u32, start: f32, ceiling: f32) -> f32 {
    if level >= LEVEL_MAX_CHANGE {
        return ceiling;
    }
    start + (ceiling - start) * (level as f32 / LEVEL_MAX_CHANGE as f32)
}

fn falls_to(level: u32, start: f32, floor: f32) -> f32 {
    if level >= LEVEL_MAX_CHANGE {
        return floor;
    }
    start - (start - floor) * (level as f32 / LEVEL_MAX_CHANGE as f32)
}

/// House-exit delays (in house-center arrivals), one row per level; levels
/// past 3 reuse the level-3 row.
fn house_wait_amounts(level: u32) -> [u32; 4] {
    match level {
        1 => [0, 2, 22, 42],
        2 => [0, 2, 4, 24],
        _ => [0, 2, 4, 6],
    }
}

fn spawn_ghosts(level: u32) -> [Ghost; 4] {
    let waits = house_wait_amounts(level);

    let mut ghosts = [
        Ghost::new(
            GhostId::Blinky,
            GhostState::Outside,
            CELL_OUTSIDE_GHOST_HOUSE_DOOR,
            Direction::Left,
        ),
        Ghost::new(
            GhostId::Pinky,
            GhostState::Inside,
            CELL_GHOST_HOUSE_LEFT_SIDE,
            Direction::Right,
        ),
        Ghost::new(
            GhostId::Inky,
            GhostState::Inside,
            CELL_GHOST_HOUSE_CENTER,
            Direction::Right,
        ),
        Ghost::new(
            GhostId::Clyde,
            GhostState::Inside,
            CELL_GHOST_HOUSE_RIGHT_SIDE,
            Direction::Left,
        ),
    ];

    for (ghost, wait) in ghosts.iter_mut().zip(waits) {
        ghost.wait_amount = wait;
    }
    ghosts
}

/// Build a fresh round at `level`: re-parsed maze, full dot count, everyone
/// back at their spawn, Scatter phase with freshly sampled targets.
pub fn new_round(level: u32, speed: SpeedConfig, rng: &mut impl Rng) -> World {
    let (grid, dot_count) = Grid::parse(&LAYOUT);
    let params = LevelParams::for_level(level);

    World {
        grid,
        player: Player::new(CELL_PLAYER_START),
        ghosts: spawn_ghosts(level),
        clock: PhaseClock::new(&params, rng),
        params,
        speed,
        level,
        dot_count,
        death_cause: None,
        level_intro: 0.0,
    }
}

/// Advance to the next level. Nothing survives but the level index.
pub fn setup_level(world: &mut World, rng: &mut impl Rng) {
    *world = new_round(world.level + 1, world.speed.clone(), rng);
}
