/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Level-intro gate (sim frozen while the level card shows)
///   2. Death-freeze gate (sim frozen until the UI acknowledges)
///   3. Phase clock advance (frightened expiry reverts ghosts to roaming)
///   4. Input adoption (at most one directional event per tick)
///   5. Player turn legality + motion + pickup consumption
///   6. Level advance when the maze is empty (ends the tick)
///   7. Per ghost: collision resolution, motion, cell-arrival AI
///
/// Ghost motion is blind — a ghost walks wherever it is facing, and wall
/// avoidance lives entirely in the arrival-time direction choice. The
/// player is the opposite: motion is blocked by walls every tick, and the
/// turn rules run *before* integration so a freshly granted direction can
/// act in the same tick.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::ai;
use crate::domain::entity::{player_speed, GhostId, GhostState};
use crate::domain::geometry::{
    screen_distance, step_in_direction, wrap_teleport, Cell, Direction, GRID_WIDTH,
};
use crate::domain::grid::{FLAG_BIG_DOT, FLAG_DOT, FLAG_WALL};
use crate::sim::event::GameEvent;
use crate::sim::level::{
    self, CELL_GHOST_HOUSE_CENTER, CELL_GHOST_HOUSE_DOOR, CELL_GHOST_HOUSE_LEFT_SIDE,
    CELL_GHOST_HOUSE_RIGHT_SIDE, CELL_OUTSIDE_GHOST_HOUSE_DOOR,
};
use crate::sim::phase::Phase;
use crate::sim::world::World;

/// Proximity at which player and ghost interact, in cell units.
const COLLISION_DISTANCE: f32 = 0.5;

pub fn step(
    world: &mut World,
    input: Option<Direction>,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if world.in_level_intro() {
        world.level_intro += dt;
        return events;
    }
    if world.in_death_freeze() {
        return events;
    }

    let params = world.params;
    if world.clock.advance(dt, &params, rng) {
        for ghost in world.ghosts.iter_mut() {
            if ghost.state == GhostState::Frightened {
                ghost.state = GhostState::Outside;
            }
        }
    }

    if let Some(direction) = input {
        world.player.requested_direction = direction;
    }

    resolve_player_turn(world, &mut events);
    resolve_player_motion(world, dt, &mut events);

    if world.dot_count == 0 {
        level::setup_level(world, rng);
        events.push(GameEvent::LevelStarted { level: world.level });
        return events;
    }

    resolve_ghosts(world, dt, rng, &mut events);

    events
}

fn is_wall(world: &World, cell: Cell) -> bool {
    world.grid.has_flag(cell, FLAG_WALL)
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// Apply the buffered direction under the turn-legality rules. Skipped
/// wholesale in the tunnel's virtual cell, where there are no flags to
/// consult.
fn resolve_player_turn(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.player.position.is_out_of_bounds() {
        return;
    }
    if world.player.direction == world.player.requested_direction {
        return;
    }

    let position = world.player.position;
    let direction = world.player.direction;
    let requested = world.player.requested_direction;
    let reverse = direction.opposite();

    if requested == reverse {
        // Reversing in place is always allowed when the cell behind is open.
        if !is_wall(world, step_in_direction(position, reverse, 1)) {
            world.player.direction = requested;
        }
    } else if position.x != 0 && position.x != GRID_WIDTH - 1 {
        let intermediate = step_in_direction(position, direction, 1);
        if !is_wall(world, intermediate) {
            // Corner cut: when both the cell ahead and its requested-side
            // neighbor are open, the turn lands one cell early.
            if !is_wall(world, step_in_direction(intermediate, requested, 1)) {
                world.player.position = intermediate;
                world.player.direction = requested;
                on_player_enter_cell(world, events);
            }
        } else if !is_wall(world, step_in_direction(position, requested, 1)) {
            // Blocked ahead but open to the side: turn in place. The
            // arrival hook fires on the current cell (see DESIGN.md).
            world.player.direction = requested;
            on_player_enter_cell(world, events);
        }
    }

    // Safety net, last word: an open requested-direction neighbor always
    // grants the turn, whatever the branches above decided.
    let requested_position = step_in_direction(
        world.player.position,
        world.player.requested_direction,
        1,
    );
    if !is_wall(world, requested_position) {
        world.player.direction = world.player.requested_direction;
    }
}

fn resolve_player_motion(world: &mut World, dt: f32, events: &mut Vec<GameEvent>) {
    let next = step_in_direction(world.player.position, world.player.direction, 1);
    if is_wall(world, next) {
        // Pressed against a wall: no progress, no arrival.
        world.player.fraction = (0.0, 0.0);
        return;
    }

    let advance = player_speed(world.speed.multiplier) * dt;
    match world.player.direction {
        Direction::None => {}
        Direction::Right => {
            world.player.fraction.0 += advance;
            world.player.fraction.1 = 0.0;
            if world.player.fraction.0 > 1.0 {
                world.player.position.x += 1;
                on_player_enter_cell(world, events);
            }
        }
        Direction::Up => {
            world.player.fraction.0 = 0.0;
            world.player.fraction.1 -= advance;
            if world.player.fraction.1 < -1.0 {
                world.player.position.y -= 1;
                on_player_enter_cell(world, events);
            }
        }
        Direction::Left => {
            world.player.fraction.0 -= advance;
            world.player.fraction.1 = 0.0;
            if world.player.fraction.0 < -1.0 {
                world.player.position.x -= 1;
                on_player_enter_cell(world, events);
            }
        }
        Direction::Down => {
            world.player.fraction.0 = 0.0;
            world.player.fraction.1 += advance;
            if world.player.fraction.1 > 1.0 {
                world.player.position.y += 1;
                on_player_enter_cell(world, events);
            }
        }
    }
}

/// The player's cell-arrival hook: wrap through the tunnel, then consume
/// whatever the cell holds. A power dot flips the phase clock and every
/// currently roaming ghost — housed, leaving and returning ghosts are
/// unaffected.
fn on_player_enter_cell(world: &mut World, events: &mut Vec<GameEvent>) {
    world.player.fraction = (0.0, 0.0);
    world.player.position = wrap_teleport(world.player.position);

    let position = world.player.position;
    if world.grid.has_flag(position, FLAG_DOT) {
        world.grid.remove_flag(position, FLAG_DOT);
        world.dot_count -= 1;
        events.push(GameEvent::DotEaten { cell: position });
    } else if world.grid.has_flag(position, FLAG_BIG_DOT) {
        world.grid.remove_flag(position, FLAG_BIG_DOT);
        world.dot_count -= 1;
        world.clock.frighten();
        for ghost in world.ghosts.iter_mut() {
            if ghost.state == GhostState::Outside {
                ghost.state = GhostState::Frightened;
            }
        }
        events.push(GameEvent::PowerDotEaten { cell: position });
    }
}

// ══════════════════════════════════════════════════════════════
// Ghosts
// ══════════════════════════════════════════════════════════════

fn resolve_ghosts(
    world: &mut World,
    dt: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let player_screen = world.player.screen_position();

    for idx in 0..world.ghosts.len() {
        let distance = screen_distance(player_screen, world.ghosts[idx].screen_position());
        if distance < COLLISION_DISTANCE {
            let id = world.ghosts[idx].id;
            match world.ghosts[idx].state {
                GhostState::Returning => {}
                GhostState::Frightened => {
                    world.ghosts[idx].state = GhostState::Returning;
                    events.push(GameEvent::GhostEaten { id });
                }
                _ => {
                    world.death_cause = Some(id);
                    events.push(GameEvent::PlayerCaught { id });
                }
            }
        }

        let speed = world.ghosts[idx]
            .speed(world.speed.multiplier, world.params.red_speed_multiplier);
        world.ghosts[idx].fraction += dt * speed;
        if world.ghosts[idx].fraction < 1.0 {
            continue;
        }
        world.ghosts[idx].fraction = 0.0;

        let moved =
            step_in_direction(world.ghosts[idx].position, world.ghosts[idx].direction, 1);
        world.ghosts[idx].position = wrap_teleport(moved);

        if world.ghosts[idx].position.is_out_of_bounds() {
            // Tunnel virtual cell: direction frozen until re-entry.
            continue;
        }

        ghost_arrival(world, idx, rng);
    }
}

fn ghost_arrival(world: &mut World, idx: usize, rng: &mut impl Rng) {
    match world.ghosts[idx].state {
        GhostState::Inside => inside_arrival(world, idx),
        GhostState::Leaving => leaving_arrival(world, idx),
        GhostState::Outside => outside_arrival(world, idx),
        GhostState::Frightened => frightened_arrival(world, idx, rng),
        GhostState::Returning => returning_arrival(world, idx),
    }
}

/// Pace the house row; each pass over the center burns one wait unit.
fn inside_arrival(world: &mut World, idx: usize) {
    let ghost = &mut world.ghosts[idx];
    if ghost.position == CELL_GHOST_HOUSE_LEFT_SIDE {
        ghost.direction = Direction::Right;
    } else if ghost.position == CELL_GHOST_HOUSE_RIGHT_SIDE {
        ghost.direction = Direction::Left;
    } else if ghost.position == CELL_GHOST_HOUSE_CENTER {
        if ghost.wait_amount > 0 {
            ghost.wait_amount -= 1;
        } else {
            ghost.state = GhostState::Leaving;
            ghost.direction = Direction::Up;
        }
    } else {
        unreachable!(
            "{} escaped the ghost house at {:?}",
            ghost.id.name(),
            ghost.position
        );
    }
}

fn leaving_arrival(world: &mut World, idx: usize) {
    let ghost = &mut world.ghosts[idx];
    if ghost.position.y == CELL_GHOST_HOUSE_CENTER.y {
        // Still on the house row: steer toward the center, then up.
        if ghost.position == CELL_GHOST_HOUSE_LEFT_SIDE {
            ghost.direction = Direction::Right;
        } else if ghost.position == CELL_GHOST_HOUSE_CENTER {
            ghost.direction = Direction::Up;
        } else if ghost.position == CELL_GHOST_HOUSE_RIGHT_SIDE {
            ghost.direction = Direction::Left;
        } else {
            unreachable!(
                "{} left the house row at {:?}",
                ghost.id.name(),
                ghost.position
            );
        }
    } else if ghost.position.y == CELL_GHOST_HOUSE_DOOR.y {
        // Through the door: out into the maze, direction kept.
        ghost.state = GhostState::Outside;
    } else {
        unreachable!(
            "{} lost the house corridor at {:?}",
            ghost.id.name(),
            ghost.position
        );
    }
}

fn outside_arrival(world: &mut World, idx: usize) {
    let target = compute_target(world, idx);
    let (position, direction) = {
        let ghost = &world.ghosts[idx];
        (ghost.position, ghost.direction)
    };

    let candidates = ai::open_neighbors(&world.grid, position, direction);
    let chosen = ai::choose_outside_direction(
        &candidates,
        position,
        target,
        world.player.position,
        world.player.direction,
    );

    let ghost = &mut world.ghosts[idx];
    ghost.target = target;
    ghost.direction = chosen;
}

fn frightened_arrival(world: &mut World, idx: usize, rng: &mut impl Rng) {
    let ghost = &world.ghosts[idx];
    let candidates = ai::open_neighbors(&world.grid, ghost.position, ghost.direction);
    let &(chosen, _) = candidates
        .choose(rng)
        .expect("open_neighbors never returns an empty set");
    world.ghosts[idx].direction = chosen;
}

/// Home navigation, then the fixed door sequence: force Down at the cell
/// outside the door, hold course through the door wall, turn Left at the
/// center and leave again as an ordinary ghost.
fn returning_arrival(world: &mut World, idx: usize) {
    let position = world.ghosts[idx].position;
    if position == CELL_OUTSIDE_GHOST_HOUSE_DOOR {
        world.ghosts[idx].direction = Direction::Down;
    } else if position == CELL_GHOST_HOUSE_DOOR {
        // Passing through the door: keep direction.
    } else if position == CELL_GHOST_HOUSE_CENTER {
        world.ghosts[idx].direction = Direction::Left;
        world.ghosts[idx].state = GhostState::Leaving;
    } else {
        let ghost = &world.ghosts[idx];
        let candidates = ai::open_neighbors(&world.grid, ghost.position, ghost.direction);
        world.ghosts[idx].direction =
            ai::best_direction_towards(&candidates, CELL_OUTSIDE_GHOST_HOUSE_DOOR);
    }
}

/// Dispatch the identity-bound targeting strategy with its inputs.
fn compute_target(world: &World, idx: usize) -> Cell {
    let scatter = world.clock.phase == Phase::Scatter;
    let ghost = &world.ghosts[idx];
    match ghost.id {
        GhostId::Blinky => ai::blinky_target(scatter, world.player.position),
        GhostId::Pinky => {
            let cells_from_player = screen_distance(
                ghost.screen_position(),
                world.player.screen_position(),
            ) as i32;
            ai::pinky_target(
                scatter,
                world.player.position,
                world.player.direction,
                cells_from_player,
            )
        }
        GhostId::Inky => ai::inky_target(
            scatter,
            world.player.position,
            world.player.requested_direction,
            world.blinky().position,
        ),
        GhostId::Clyde => ai::clyde_target(scatter, world.player.position, ghost.position),
    }
}
