//! Per-frame simulation step
//!
//! The host calls [`tick`] once per display frame. Within a frame the order is
//! fixed: skier, camera, terrain, chaser, collisions, then scoring. Collisions
//! therefore see the end-of-frame positions.

use super::chaser::ChaserChange;
use super::collision::{player_hitbox, test_antagonist, test_obstacle};
use super::player::InputState;
use super::state::{CrashCause, GameEvent, GameState, RunPhase};

/// Turns host timestamps into frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; 0 on the first call or if time went backwards
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp (after a pause or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Bound a frame's step. Long stalls are clamped, not skipped; a non-finite
/// delta counts as no time at all.
#[inline]
pub fn clamp_delta(dt: f32, frame_cap: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, frame_cap)
}

/// Advance the run by one frame
pub fn tick(state: &mut GameState, input: &InputState, raw_dt: f32) {
    let tuning = std::sync::Arc::clone(&state.tuning);
    let dt = clamp_delta(raw_dt, tuning.frame_cap);

    match state.phase {
        RunPhase::Idle | RunPhase::LeaderboardShown => {}

        RunPhase::Crashed => {
            if state.player.advance_crash(dt, &tuning.player) {
                state.phase = RunPhase::LeaderboardShown;
                state.push_event(GameEvent::LeaderboardShown);
                log::info!(
                    "Run over: score {} in {}s",
                    state.score_points(),
                    state.time_seconds()
                );
            }
        }

        RunPhase::Running => {
            // --- Movement ---
            state
                .player
                .advance(input, state.speed, dt, &tuning.player);
            let player_pos = state.player.position;
            state.camera.follow(player_pos, &tuning.camera, dt);

            // --- Streaming ---
            state.terrain.advance(
                player_pos.z,
                &state.catalog,
                &tuning.terrain,
                &mut state.rng,
                &mut state.ids,
            );

            // --- Chaser ---
            // Only a live run rolls for or moves the chaser
            match state.chaser.update(
                player_pos.z,
                state.speed,
                dt,
                &tuning.chaser,
                &mut state.rng,
            ) {
                Some(ChaserChange::Spawned { direction, .. }) => {
                    state.push_event(GameEvent::ChaserSpawned { direction })
                }
                Some(ChaserChange::Despawned) => state.push_event(GameEvent::ChaserDespawned),
                None => {}
            }

            // --- Collisions ---
            if let Some(cause) = detect_crash(state) {
                state.player.crash();
                state.phase = RunPhase::Crashed;
                state.push_event(GameEvent::Crashed { cause });
                log::info!(
                    "Crashed into {:?} at z={:.1}, speed {:.2}",
                    cause,
                    player_pos.z,
                    state.speed
                );
                return;
            }

            // --- Progression ---
            let progression = &tuning.progression;
            state.score += dt * progression.score_rate * state.speed;
            state.speed = (state.speed + dt * progression.speed_growth_rate).min(progression.max_speed);
            state.time_survived += dt;
        }
    }
}

/// First thing the skier is touching, if any
fn detect_crash(state: &GameState) -> Option<CrashCause> {
    let hitbox = player_hitbox(state.player.position, &state.tuning.player);

    let hit = state
        .terrain
        .obstacles()
        .iter()
        .find(|o| test_obstacle(&hitbox, o, state.catalog.kind_of(o.kind)));
    if let Some(obstacle) = hit {
        return Some(CrashCause::Obstacle {
            id: obstacle.id,
            kind: obstacle.kind,
        });
    }

    if test_antagonist(&hitbox, state.chaser.position(), &state.tuning.chaser) {
        return Some(CrashCause::Chaser);
    }
    None
}
