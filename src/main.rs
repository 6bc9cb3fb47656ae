/// Entry point and frame loop.
///
/// The loop owns everything the simulation core deliberately does not:
/// the terminal, the measured per-frame delta time, the one-directional-
/// event-per-tick input snapshot, and the death-overlay timer whose expiry
/// acknowledges a capture and restarts the run.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::World;
use ui::input::InputState;
use ui::renderer::Renderer;

/// How long the capture overlay holds before the run restarts.
const DEATH_FREEZE_SECONDS: f32 = 1.0;

fn main() {
    let config = GameConfig::load();
    let mut rng = rand::thread_rng();
    let mut world = World::new(config.speed.clone(), &mut rng);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &config, &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Muncher!");
    println!("Reached level {}.", world.level);
}

fn game_loop(
    world: &mut World,
    renderer: &mut Renderer,
    config: &GameConfig,
    rng: &mut impl rand::Rng,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let frame_time =
        Duration::from_micros(1_000_000 / config.display.frame_rate.max(1));
    let mut last_frame = Instant::now();
    let mut death_timer = 0.0f32;

    loop {
        input.drain_events();
        if input.quit_requested() {
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if world.in_death_freeze() {
            death_timer += dt;
            if death_timer >= DEATH_FREEZE_SECONDS {
                death_timer = 0.0;
                world.restart_after_death(rng);
            }
        } else {
            let events = step::step(world, input.requested_direction(), dt, rng);
            for event in &events {
                match event {
                    GameEvent::GhostEaten { id } => {
                        renderer.set_message(&format!("{} eaten!", id.name()), 60);
                    }
                    GameEvent::LevelStarted { level } => {
                        renderer.set_message(&format!("Maze cleared! Level {level}"), 120);
                    }
                    _ => {}
                }
            }
        }

        renderer.render(world)?;

        let elapsed = now.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(())
}
