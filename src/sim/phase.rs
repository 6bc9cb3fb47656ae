/// The global behavior-phase clock.
///
/// Scatter and Chase alternate, each phase running its own accumulating
/// timer against a target duration sampled (inclusive uniform integers,
/// bounds truncated) from the level's range at every transition into the
/// phase. Frightened interrupts the cycle when a power dot is eaten; while
/// it runs, the scatter and chase timers are frozen where they were. On
/// expiry the clock resumes Scatter if its timer has not reached its
/// target, else Chase, else starts a fresh Scatter — so the cycle is total
/// even from states live play cannot reach.
///
/// The clock owns no ghost state. Whoever advances it reacts to
/// `FrightenedOver` by reverting frightened ghosts to roaming.

use rand::Rng;

use super::level::LevelParams;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Scatter,
    Chase,
    Frightened,
}

#[derive(Clone, Debug)]
pub struct PhaseClock {
    pub phase: Phase,
    pub scatter_timer: f32,
    pub scatter_target: f32,
    pub chase_timer: f32,
    pub chase_target: f32,
    pub frightened_timer: f32,
    pub frightened_target: f32,
}

impl PhaseClock {
    pub fn new(params: &LevelParams, rng: &mut impl Rng) -> Self {
        PhaseClock {
            phase: Phase::Scatter,
            scatter_timer: 0.0,
            scatter_target: sample_duration(params.scatter_min, params.scatter_max, rng),
            chase_timer: 0.0,
            chase_target: sample_duration(params.chase_min, params.chase_max, rng),
            frightened_timer: 0.0,
            frightened_target: params.frightened_duration,
        }
    }

    /// Advance by `dt` seconds. Returns `true` exactly when a Frightened
    /// phase ends this tick.
    pub fn advance(&mut self, dt: f32, params: &LevelParams, rng: &mut impl Rng) -> bool {
        match self.phase {
            Phase::Scatter => {
                self.scatter_timer += dt;
                if self.scatter_timer > self.scatter_target {
                    self.scatter_timer = 0.0;
                    self.phase = Phase::Chase;
                    self.chase_target =
                        sample_duration(params.chase_min, params.chase_max, rng);
                }
                false
            }
            Phase::Chase => {
                self.chase_timer += dt;
                if self.chase_timer > self.chase_target {
                    self.chase_timer = 0.0;
                    self.phase = Phase::Scatter;
                    self.scatter_target =
                        sample_duration(params.scatter_min, params.scatter_max, rng);
                }
                false
            }
            Phase::Frightened => {
                self.frightened_timer += dt;
                if self.frightened_timer > self.frightened_target {
                    self.frightened_timer = 0.0;
                    self.resume_interrupted(params, rng);
                    return true;
                }
                false
            }
        }
    }

    /// A power dot was eaten: enter Frightened (re-entry resets the timer).
    pub fn frighten(&mut self) {
        self.phase = Phase::Frightened;
        self.frightened_timer = 0.0;
    }

    /// Pick up whichever of Scatter/Chase had not yet run out when
    /// Frightened cut in. Scatter wins when both are still pending.
    fn resume_interrupted(&mut self, params: &LevelParams, rng: &mut impl Rng) {
        if self.scatter_timer < self.scatter_target {
            self.phase = Phase::Scatter;
        } else if self.chase_timer < self.chase_target {
            self.phase = Phase::Chase;
        } else {
            self.phase = Phase::Scatter;
            self.scatter_timer = 0.0;
            self.scatter_target = sample_duration(params.scatter_min, params.scatter_max, rng);
        }
    }
}

/// Inclusive uniform sample over the integer-truncated `[min, max]` range,
/// as seconds.
fn sample_duration(min: f32, max: f32, rng: &mut impl Rng) -> f32 {
    rng.gen_range(min as i32..=max as i32) as f32
}
