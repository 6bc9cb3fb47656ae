/// Ghost steering and targeting.
///
/// Targeting is four pure functions, one per identity — each maps the
/// relevant slice of global state to a target cell. Steering is a two-step
/// primitive shared by the roaming, frightened and returning states:
///
///   1. `open_neighbors` — the (at most 3) adjacent cells a ghost may turn
///      into. The cell just vacated is excluded, so ghosts never reverse
///      unless the reversal is the only open neighbor. Out-of-bounds
///      neighbors count as open; that is how ghosts enter the tunnel.
///   2. `best_direction_towards` — the candidate minimizing squared grid
///      distance to the target. Ties go to the first candidate in the
///      fixed Right, Up, Left, Down order.
///
/// A cell with no open neighbor at all cannot occur on the embedded maze;
/// reaching one is a corrupted-state bug and aborts with the position.

use super::geometry::{
    grid_distance_squared, step_in_direction, Cell, Direction, DIRECTIONS,
    GRID_BOTTOM_LEFT, GRID_BOTTOM_RIGHT, GRID_TOP_LEFT, GRID_TOP_RIGHT,
};
use super::grid::{Grid, FLAG_WALL};

/// Open, non-reversing neighbors of `from`, in enumeration order.
pub fn open_neighbors(
    grid: &Grid,
    from: Cell,
    current_direction: Direction,
) -> Vec<(Direction, Cell)> {
    let reverse = current_direction.opposite();
    let mut candidates = Vec::with_capacity(3);

    for direction in DIRECTIONS {
        if direction == reverse {
            continue;
        }
        let position = step_in_direction(from, direction, 1);
        if grid.has_flag(position, FLAG_WALL) {
            continue;
        }
        candidates.push((direction, position));
    }

    if candidates.is_empty() && reverse != Direction::None {
        // Dead end: reversal is re-admitted as the sole option.
        let position = step_in_direction(from, reverse, 1);
        if !grid.has_flag(position, FLAG_WALL) {
            candidates.push((reverse, position));
        }
    }

    assert!(!candidates.is_empty(), "no open neighbor around {from:?}");
    candidates
}

/// Candidate minimizing squared grid distance to `target`; first wins ties.
pub fn best_direction_towards(candidates: &[(Direction, Cell)], target: Cell) -> Direction {
    let mut closest = i32::MAX;
    let mut best = Direction::None;

    for &(direction, position) in candidates {
        let distance = grid_distance_squared(position, target);
        if distance < closest {
            closest = distance;
            best = direction;
        }
    }

    best
}

/// Roaming-state direction choice, including the point-blank special case:
/// when the ghost sits on both its target and the player, nearest-neighbor
/// selection degenerates into a distance tie, so the ghost follows the
/// player's own direction when that exit is open.
pub fn choose_outside_direction(
    candidates: &[(Direction, Cell)],
    ghost_position: Cell,
    target: Cell,
    player_position: Cell,
    player_direction: Direction,
) -> Direction {
    if ghost_position == target
        && ghost_position == player_position
        && candidates.iter().any(|&(d, _)| d == player_direction)
    {
        return player_direction;
    }
    best_direction_towards(candidates, target)
}

// ── Targeting ──
//
// Scatter sends each ghost to its own corner; otherwise each identity has
// its personality: Blinky chases directly, Pinky ambushes ahead of the
// player, Inky mirrors the player's intent through Blinky, Clyde chases
// from afar but breaks off to his corner when close.

pub fn blinky_target(scatter: bool, player_position: Cell) -> Cell {
    if scatter {
        return GRID_TOP_RIGHT;
    }
    player_position
}

/// `cells_from_player` is the continuous Pinky-to-player distance in cell
/// units, truncated — the ambush point recedes as Pinky closes in.
pub fn pinky_target(
    scatter: bool,
    player_position: Cell,
    player_direction: Direction,
    cells_from_player: i32,
) -> Cell {
    if scatter {
        return GRID_TOP_LEFT;
    }
    step_in_direction(player_position, player_direction, cells_from_player)
}

/// Reflects a point two cells ahead of the player (along the *requested*
/// direction) through Blinky's position.
pub fn inky_target(
    scatter: bool,
    player_position: Cell,
    player_requested: Direction,
    blinky_position: Cell,
) -> Cell {
    if scatter {
        return GRID_BOTTOM_RIGHT;
    }

    let look = step_in_direction(player_position, player_requested, 2);
    Cell::new(
        blinky_position.x + (look.x - blinky_position.x) * 2,
        blinky_position.y + (look.y - blinky_position.y) * 2,
    )
}

pub fn clyde_target(scatter: bool, player_position: Cell, clyde_position: Cell) -> Cell {
    if scatter {
        return GRID_BOTTOM_LEFT;
    }

    let dx = (clyde_position.x - player_position.x) as f32;
    let dy = (clyde_position.y - player_position.y) as f32;
    if (dx * dx + dy * dy).sqrt() >= 8.0 {
        player_position
    } else {
        GRID_BOTTOM_LEFT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{GRID_HEIGHT, GRID_WIDTH};

    /// Border of walls, everything inside open, with extra walls at `walls`.
    fn grid_with_walls(walls: &[(i32, i32)]) -> Grid {
        let mut columns: Vec<Vec<u8>> = (0..GRID_WIDTH)
            .map(|x| {
                (0..GRID_HEIGHT)
                    .map(|y| {
                        if x == 0 || y == 0 || x == GRID_WIDTH - 1 || y == GRID_HEIGHT - 1 {
                            b'#'
                        } else {
                            b' '
                        }
                    })
                    .collect()
            })
            .collect();
        for &(x, y) in walls {
            columns[x as usize][y as usize] = b'#';
        }
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| String::from_utf8(c).unwrap())
            .collect();
        let refs: Vec<&str> = columns.iter().map(|s| s.as_str()).collect();
        Grid::parse(&refs).0
    }

    #[test]
    fn neighbors_exclude_reversal() {
        let grid = grid_with_walls(&[]);
        // Moving right in open space: left (the reversal) is never offered.
        let candidates = open_neighbors(&grid, Cell::new(5, 5), Direction::Right);
        let dirs: Vec<Direction> = candidates.iter().map(|&(d, _)| d).collect();
        assert_eq!(dirs, vec![Direction::Right, Direction::Up, Direction::Down]);
    }

    #[test]
    fn neighbors_readmit_reversal_in_dead_end() {
        // Pocket at (5,5): walls right, up and down — only way out is back.
        let grid = grid_with_walls(&[(6, 5), (5, 4), (5, 6)]);
        let candidates = open_neighbors(&grid, Cell::new(5, 5), Direction::Right);
        assert_eq!(candidates, vec![(Direction::Left, Cell::new(4, 5))]);
    }

    #[test]
    fn neighbors_include_tunnel_virtual_cell() {
        // A cell on the left edge column: the out-of-bounds neighbor is
        // open, which is exactly how ghosts are able to enter the tunnel.
        let grid = grid_with_walls(&[]);
        let candidates = open_neighbors(&grid, Cell::new(0, 5), Direction::Left);
        assert!(candidates.contains(&(Direction::Left, Cell::new(-1, 5))));
    }

    #[test]
    fn best_direction_prefers_first_on_tie() {
        // Target due diagonal: right and down are equidistant; the fixed
        // enumeration order makes right win.
        let candidates = vec![
            (Direction::Right, Cell::new(6, 5)),
            (Direction::Down, Cell::new(5, 6)),
        ];
        assert_eq!(
            best_direction_towards(&candidates, Cell::new(6, 6)),
            Direction::Right
        );
    }

    #[test]
    fn point_blank_follows_player_direction() {
        let candidates = vec![
            (Direction::Right, Cell::new(6, 5)),
            (Direction::Up, Cell::new(5, 4)),
        ];
        let here = Cell::new(5, 5);
        assert_eq!(
            choose_outside_direction(&candidates, here, here, here, Direction::Up),
            Direction::Up
        );
        // Player heading somewhere that is not open: normal rule applies.
        assert_eq!(
            choose_outside_direction(&candidates, here, here, here, Direction::Down),
            best_direction_towards(&candidates, here)
        );
    }

    #[test]
    fn blinky_scatters_to_top_right() {
        assert_eq!(
            blinky_target(true, Cell::new(3, 3)),
            Cell::new(GRID_WIDTH - 1, 0)
        );
        assert_eq!(blinky_target(false, Cell::new(3, 3)), Cell::new(3, 3));
    }

    #[test]
    fn pinky_leads_the_player() {
        let target = pinky_target(false, Cell::new(4, 10), Direction::Right, 3);
        assert_eq!(target, Cell::new(7, 10));
        assert_eq!(
            pinky_target(true, Cell::new(4, 10), Direction::Right, 3),
            GRID_TOP_LEFT
        );
        // A stationary player is targeted directly.
        assert_eq!(
            pinky_target(false, Cell::new(4, 10), Direction::None, 5),
            Cell::new(4, 10)
        );
    }

    #[test]
    fn inky_reflects_through_blinky() {
        // Look-ahead point: (6,10) + 2 up = (6,8); Blinky at (4,8);
        // reflection: (4,8) + 2*(2,0) = (8,8).
        let target = inky_target(false, Cell::new(6, 10), Direction::Up, Cell::new(4, 8));
        assert_eq!(target, Cell::new(8, 8));
        assert_eq!(
            inky_target(true, Cell::new(6, 10), Direction::Up, Cell::new(4, 8)),
            GRID_BOTTOM_RIGHT
        );
    }

    #[test]
    fn clyde_breaks_off_when_close() {
        let player = Cell::new(9, 10);
        // 8 cells away: still chasing.
        assert_eq!(clyde_target(false, player, Cell::new(1, 10)), player);
        // Closer than 8: flees to his corner.
        assert_eq!(
            clyde_target(false, player, Cell::new(5, 10)),
            GRID_BOTTOM_LEFT
        );
        assert_eq!(clyde_target(true, player, Cell::new(1, 10)), GRID_BOTTOM_LEFT);
    }
}
