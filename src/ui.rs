//! Session UI contract
//!
//! What the page chrome reads from a run each frame, how the leaderboard
//! table is presented, and the optional debug readouts.

use serde::Serialize;

use crate::highscores::HighScoreEntry;
use crate::sim::{Aabb, GameState, RunPhase, chaser_hitbox, obstacle_hitboxes, player_hitbox};

/// Per-frame HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u32,
    /// Speed multiplier, e.g. 1.35
    pub speed: f32,
    /// Whole seconds survived
    pub time: u32,
    pub phase: RunPhase,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score_points(),
            speed: state.speed,
            time: state.time_seconds(),
            phase: state.phase,
        }
    }

    pub fn speed_label(&self) -> String {
        format!("{:.1}x", self.speed)
    }

    pub fn time_label(&self) -> String {
        format_time(self.time)
    }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One rendered leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub name: String,
    pub score: String,
    pub time: String,
    /// The row the player just submitted
    pub highlight: bool,
}

/// Rows for display, highlighting the first entry matching `just_submitted`
pub fn leaderboard_rows(
    entries: &[HighScoreEntry],
    just_submitted: Option<(&str, u32)>,
) -> Vec<LeaderboardRow> {
    let mut highlighted = false;
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let highlight = !highlighted
                && just_submitted.is_some_and(|(name, score)| e.name == name && e.score == score);
            highlighted |= highlight;
            LeaderboardRow {
                rank: i + 1,
                name: e.name.clone(),
                score: e.score.to_string(),
                time: format_time(e.time),
                highlight,
            }
        })
        .collect()
}

/// Smoothed frames-per-second readout
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    /// Exponential average of frame time (seconds)
    avg_dt: f32,
}

impl FpsCounter {
    const SMOOTHING: f32 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw frame delta; zero and non-finite deltas are skipped
    pub fn record(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.avg_dt = if self.avg_dt == 0.0 {
            dt
        } else {
            self.avg_dt + (dt - self.avg_dt) * Self::SMOOTHING
        };
    }

    pub fn fps(&self) -> f32 {
        if self.avg_dt > 0.0 { 1.0 / self.avg_dt } else { 0.0 }
    }

    pub fn label(&self) -> String {
        format!("{:.0} fps", self.fps())
    }
}

/// What a debug collision box belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitboxOwner {
    Player,
    Obstacle(u32),
    Chaser,
}

/// A collision box as the collision tests see it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugHitbox {
    pub owner: HitboxOwner,
    pub bounds: Aabb,
}

impl DebugHitbox {
    pub fn label(&self) -> String {
        let size = self.bounds.size();
        let owner = match self.owner {
            HitboxOwner::Player => "player".to_string(),
            HitboxOwner::Obstacle(id) => format!("obstacle #{}", id),
            HitboxOwner::Chaser => "chaser".to_string(),
        };
        format!(
            "{} at ({:.1}, {:.1}, {:.1}) size {:.2}x{:.2}x{:.2}",
            owner, self.bounds.min.x, self.bounds.min.y, self.bounds.min.z, size.x, size.y, size.z
        )
    }
}

/// Every box within `range` (along z) of the skier, skier first
pub fn debug_hitboxes(state: &GameState, range: f32) -> Vec<DebugHitbox> {
    let player = state.player.position;
    let mut boxes = vec![DebugHitbox {
        owner: HitboxOwner::Player,
        bounds: player_hitbox(player, &state.tuning.player),
    }];

    for obstacle in state.terrain.obstacles() {
        if (obstacle.position.z - player.z).abs() > range {
            continue;
        }
        let kind = state.catalog.kind_of(obstacle.kind);
        boxes.extend(
            obstacle_hitboxes(obstacle, kind)
                .into_iter()
                .map(|bounds| DebugHitbox {
                    owner: HitboxOwner::Obstacle(obstacle.id),
                    bounds,
                }),
        );
    }

    if let Some(position) = state.chaser.position() {
        boxes.push(DebugHitbox {
            owner: HitboxOwner::Chaser,
            bounds: chaser_hitbox(position, &state.tuning.chaser),
        });
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Chaser, Obstacle, ObstacleId, SweepDirection};
    use glam::Vec3;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn test_snapshot_floors_values() {
        let mut state = GameState::with_defaults(1);
        state.score = 41.9;
        state.time_survived = 12.7;
        state.speed = 1.26;
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.score, 41);
        assert_eq!(hud.time, 12);
        assert_eq!(hud.speed_label(), "1.3x");
        assert_eq!(hud.time_label(), "0:12");
    }

    #[test]
    fn test_only_one_row_highlighted() {
        let entries = vec![
            HighScoreEntry {
                name: "AB".into(),
                score: 50,
                time: 5,
            },
            HighScoreEntry {
                name: "AB".into(),
                score: 50,
                time: 9,
            },
        ];
        let rows = leaderboard_rows(&entries, Some(("AB", 50)));
        assert!(rows[0].highlight);
        assert!(!rows[1].highlight);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].time, "0:09");
    }

    #[test]
    fn test_fps_counter_smooths() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.fps(), 0.0);
        fps.record(1.0 / 60.0);
        assert!((fps.fps() - 60.0).abs() < 0.01);
        fps.record(0.0);
        fps.record(f32::NAN);
        assert!((fps.fps() - 60.0).abs() < 0.01);
        fps.record(1.0);
        assert!(fps.fps() < 60.0 && fps.fps() > 8.0);
        assert_eq!(FpsCounter::new().label(), "0 fps");
    }

    #[test]
    fn test_debug_hitboxes_match_collision_boxes() {
        let mut state = GameState::with_defaults(4);
        let near = Obstacle {
            id: 900,
            kind: ObstacleId::Pole,
            position: Vec3::new(2.0, 0.0, -5.0),
        };
        let far = Obstacle {
            id: 901,
            kind: ObstacleId::Tree,
            position: Vec3::new(2.0, 0.0, -500.0),
        };
        state.terrain.insert_for_test(near.clone());
        state.terrain.insert_for_test(far);
        state.chaser = Chaser::Active {
            position: Vec3::new(-10.0, 0.0, -8.0),
            direction: SweepDirection::Right,
            spawn_z: -8.0,
        };

        let boxes = debug_hitboxes(&state, 20.0);
        assert_eq!(boxes[0].owner, HitboxOwner::Player);
        assert_eq!(
            boxes[0].bounds,
            player_hitbox(state.player.position, &state.tuning.player)
        );

        let pole: Vec<Aabb> = boxes
            .iter()
            .filter(|b| b.owner == HitboxOwner::Obstacle(900))
            .map(|b| b.bounds)
            .collect();
        assert_eq!(pole, obstacle_hitboxes(&near, state.catalog.kind_of(ObstacleId::Pole)));
        assert!(boxes.iter().all(|b| b.owner != HitboxOwner::Obstacle(901)));
        assert_eq!(boxes.last().map(|b| b.owner), Some(HitboxOwner::Chaser));
        assert!(boxes[0].label().starts_with("player at"));
    }
}
