/// Terminal renderer.
///
/// Cells are two terminal columns wide. Each frame composes an image per
/// cell and emits only the cells that changed since the last frame, so a
/// quiet maze costs almost nothing to redraw.
///
/// Walls are drawn as box-drawing segments chosen from the grid's four
/// wall-adjacency bits — a wall cell connects toward exactly the neighbors
/// that are walls themselves, which is what makes the maze read as lines
/// instead of blocks.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{self, Stdout, Write};

use crate::domain::entity::{Ghost, GhostId, GhostState};
use crate::domain::geometry::{Cell, Direction, GRID_HEIGHT, GRID_WIDTH};
use crate::domain::grid::{
    FLAG_BIG_DOT, FLAG_DOT, FLAG_WALL, FLAG_WALL_ABOVE, FLAG_WALL_BELOW,
    FLAG_WALL_TO_LEFT, FLAG_WALL_TO_RIGHT,
};
use crate::sim::level::CELL_GHOST_HOUSE_DOOR;
use crate::sim::phase::Phase;
use crate::sim::world::World;

const CELL_W: u16 = 2;

#[derive(Clone, Copy, PartialEq)]
struct CellImage {
    text: [char; 2],
    color: Color,
}

const EMPTY_IMAGE: CellImage = CellImage {
    text: [' ', ' '],
    color: Color::Reset,
};

pub struct Renderer {
    stdout: Stdout,
    last: Vec<CellImage>,
    last_hud: String,
    needs_full: bool,
    intro_shown: bool,
    origin: (u16, u16),
    message: String,
    message_frames: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            stdout: io::stdout(),
            last: vec![EMPTY_IMAGE; (GRID_WIDTH * GRID_HEIGHT) as usize],
            last_hud: String::new(),
            needs_full: true,
            intro_shown: false,
            origin: (0, 1),
            message: String::new(),
            message_frames: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.execute(EnterAlternateScreen)?;
        self.stdout.execute(Hide)?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        self.stdout.execute(Show)?;
        self.stdout.execute(LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Show a transient HUD message for `frames` rendered frames.
    pub fn set_message(&mut self, text: &str, frames: u32) {
        self.message = text.to_string();
        self.message_frames = frames;
    }

    pub fn render(&mut self, world: &World) -> io::Result<()> {
        let needed_w = GRID_WIDTH as u16 * CELL_W;
        let needed_h = GRID_HEIGHT as u16 + 2;
        let (term_w, term_h) = terminal::size()?;

        if term_w < needed_w || term_h < needed_h {
            self.stdout.queue(MoveTo(0, 0))?;
            self.stdout.queue(Clear(ClearType::All))?;
            self.stdout.queue(Print(format!(
                "Terminal too small: need {}x{}, have {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            self.stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        if world.in_level_intro() {
            self.render_level_card(world, term_w, term_h)?;
            return Ok(());
        }
        self.intro_shown = false;

        let origin = ((term_w - needed_w) / 2, (term_h - needed_h) / 2 + 1);
        if origin != self.origin {
            self.origin = origin;
            self.needs_full = true;
        }

        self.render_hud(world)?;

        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let image = compose_cell(world, Cell::new(x, y));
                let idx = (y * GRID_WIDTH + x) as usize;
                if self.needs_full || image != self.last[idx] {
                    self.last[idx] = image;
                    self.draw_cell(x as u16, y as u16, image)?;
                }
            }
        }
        self.needs_full = false;

        self.stdout.flush()
    }

    fn render_hud(&mut self, world: &World) -> io::Result<()> {
        let phase = match world.clock.phase {
            Phase::Scatter => "scatter",
            Phase::Chase => "chase",
            Phase::Frightened => "frightened",
        };
        let mut hud = format!(
            "Level {}   Dots {}   [{}]   (q quits)",
            world.level, world.dot_count, phase
        );
        if let Some(id) = world.death_cause {
            hud = format!("Caught by {}! Restarting...", id.name());
        } else if self.message_frames > 0 {
            self.message_frames -= 1;
            hud = format!("{}   {}", hud, self.message);
        }

        if self.needs_full || hud != self.last_hud {
            self.stdout.queue(MoveTo(self.origin.0, self.origin.1 - 1))?;
            self.stdout.queue(Clear(ClearType::CurrentLine))?;
            self.stdout.queue(SetForegroundColor(Color::White))?;
            self.stdout.queue(Print(&hud))?;
            self.stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }
        Ok(())
    }

    fn render_level_card(&mut self, world: &World, term_w: u16, term_h: u16) -> io::Result<()> {
        if !self.intro_shown {
            self.stdout.queue(Clear(ClearType::All))?;
            let text = format!("L E V E L  {}", world.level);
            let x = (term_w.saturating_sub(text.len() as u16)) / 2;
            self.stdout.queue(MoveTo(x, term_h / 2))?;
            self.stdout.queue(SetForegroundColor(Color::Yellow))?;
            self.stdout.queue(Print(text))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.flush()?;
            self.intro_shown = true;
            self.needs_full = true;
        }
        Ok(())
    }

    fn draw_cell(&mut self, x: u16, y: u16, image: CellImage) -> io::Result<()> {
        self.stdout
            .queue(MoveTo(self.origin.0 + x * CELL_W, self.origin.1 + y))?;
        self.stdout.queue(SetForegroundColor(image.color))?;
        let mut text = String::with_capacity(2);
        text.push(image.text[0]);
        text.push(image.text[1]);
        self.stdout.queue(Print(text))?;
        self.stdout.queue(ResetColor)?;
        Ok(())
    }
}

fn compose_cell(world: &World, cell: Cell) -> CellImage {
    if !world.player.position.is_out_of_bounds() && world.player.position == cell {
        return player_image(world.player.direction);
    }
    // Later ghosts draw over earlier ones; the player draws over all.
    for ghost in world.ghosts.iter().rev() {
        if !ghost.position.is_out_of_bounds() && ghost.position == cell {
            return ghost_image(world, ghost);
        }
    }

    if cell == CELL_GHOST_HOUSE_DOOR {
        // A wall cell in the grid, but drawn as the house door.
        return CellImage { text: ['═', '═'], color: Color::DarkRed };
    }
    if world.grid.has_flag(cell, FLAG_WALL) {
        return wall_image(world, cell);
    }
    if world.grid.has_flag(cell, FLAG_DOT) {
        return CellImage { text: ['·', ' '], color: Color::Grey };
    }
    if world.grid.has_flag(cell, FLAG_BIG_DOT) {
        return CellImage { text: ['●', ' '], color: Color::White };
    }
    EMPTY_IMAGE
}

fn player_image(direction: Direction) -> CellImage {
    let glyph = match direction {
        Direction::Right => '>',
        Direction::Up => '^',
        Direction::Left => '<',
        Direction::Down => 'v',
        Direction::None => 'o',
    };
    CellImage { text: [glyph, ' '], color: Color::Yellow }
}

fn ghost_image(world: &World, ghost: &Ghost) -> CellImage {
    match ghost.state {
        GhostState::Returning => CellImage { text: ['"', ' '], color: Color::Grey },
        GhostState::Frightened => CellImage {
            text: ['M', ' '],
            color: frightened_color(world, ghost),
        },
        _ => CellImage { text: ['M', ' '], color: identity_color(ghost.id) },
    }
}

fn identity_color(id: GhostId) -> Color {
    match id {
        GhostId::Blinky => Color::Red,
        GhostId::Pinky => Color::Magenta,
        GhostId::Inky => Color::Cyan,
        GhostId::Clyde => Color::DarkYellow,
    }
}

/// Blue while frightened, flickering back to the identity color as the
/// phase runs out: slow inside the last three seconds, fast in the last.
fn frightened_color(world: &World, ghost: &Ghost) -> Color {
    let remaining = world.clock.frightened_target - world.clock.frightened_timer;
    let flicker_speed = if remaining < 1.0 {
        0.05
    } else if remaining < 3.0 {
        0.1
    } else {
        return Color::Blue;
    };
    if (remaining / flicker_speed) as i32 % 2 == 0 {
        Color::Blue
    } else {
        identity_color(ghost.id)
    }
}

fn wall_image(world: &World, cell: Cell) -> CellImage {
    let right = world.grid.has_flag(cell, FLAG_WALL_TO_RIGHT);
    let above = world.grid.has_flag(cell, FLAG_WALL_ABOVE);
    let left = world.grid.has_flag(cell, FLAG_WALL_TO_LEFT);
    let below = world.grid.has_flag(cell, FLAG_WALL_BELOW);

    let center = match (right, above, left, below) {
        (false, false, false, false) => '▪',
        (true, false, false, false) => '╶',
        (false, true, false, false) => '╵',
        (false, false, true, false) => '╴',
        (false, false, false, true) => '╷',
        (true, true, false, false) => '└',
        (true, false, false, true) => '┌',
        (false, true, true, false) => '┘',
        (false, false, true, true) => '┐',
        (true, false, true, false) => '─',
        (false, true, false, true) => '│',
        (true, true, true, false) => '┴',
        (true, true, false, true) => '├',
        (true, false, true, true) => '┬',
        (false, true, true, true) => '┤',
        (true, true, true, true) => '┼',
    };
    let filler = if right { '─' } else { ' ' };
    CellImage { text: [center, filler], color: Color::DarkBlue }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        let mut rng = StdRng::seed_from_u64(11);
        World::new(SpeedConfig { multiplier: 6.0 }, &mut rng)
    }

    #[test]
    fn wall_segments_follow_adjacency() {
        let w = world();
        // Top-left corner of the outer border: walls right and below only.
        let image = wall_image(&w, Cell::new(0, 0));
        assert_eq!(image.text, ['┌', '─']);
        // A run along the top border connects left and right.
        let image = wall_image(&w, Cell::new(2, 0));
        assert_eq!(image.text[0], '─');
    }

    #[test]
    fn door_cell_is_drawn_as_door() {
        let w = world();
        let image = compose_cell(&w, CELL_GHOST_HOUSE_DOOR);
        assert_eq!(image.text, ['═', '═']);
    }

    #[test]
    fn player_draws_over_pickups() {
        let mut w = world();
        w.player.position = Cell::new(1, 1); // a dot cell
        let image = compose_cell(&w, Cell::new(1, 1));
        assert_eq!(image.color, Color::Yellow);
    }

    #[test]
    fn frightened_ghosts_are_blue_until_the_phase_wanes() {
        let mut w = world();
        w.ghosts[0].state = GhostState::Frightened;
        w.clock.frightened_target = 9.0;
        w.clock.frightened_timer = 1.0;
        let image = ghost_image(&w, &w.ghosts[0]);
        assert_eq!(image.color, Color::Blue);
    }
}
