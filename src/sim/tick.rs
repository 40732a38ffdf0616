//! One simulation step
//!
//! Order within a tick matters: the player moves first, then obstacles, then
//! collisions are tested, so an overlap created by this tick's movement is
//! caught in the same tick.

use super::collision::Body;
use super::state::{GamePhase, Simulation};

/// Directional intent for a tick (last write wins, nothing is queued)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Toward larger depth (isometric only)
    pub forward: bool,
    /// Toward smaller depth (isometric only)
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Net direction per axis in {-1, 0, 1}; opposing flags cancel
    pub fn axis(&self) -> (f32, f32) {
        let x = self.right as i8 - self.left as i8;
        let y = self.forward as i8 - self.back as i8;
        (x as f32, y as f32)
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Game over; nothing was touched
    Idle,
    /// Normal step
    Advanced,
    /// The player hit this obstacle; the game is now over
    Collided { obstacle_id: u32 },
}

/// Advance the simulation by one step
pub fn tick(sim: &mut Simulation, input: &InputState) -> TickOutcome {
    if sim.phase == GamePhase::GameOver {
        return TickOutcome::Idle;
    }

    // Move the player along controlled axes, then clamp against live bounds
    let (dx, dy) = input.axis();
    let controlled = sim.config.controlled;
    if controlled.x {
        sim.player.pos.x += dx * sim.player.speed;
    }
    if controlled.y {
        sim.player.pos.y += dy * sim.player.speed;
    }
    sim.player.pos = sim.player_bounds().clamp(sim.player.pos);

    let lane = sim.lane();
    sim.obstacles.advance(sim.obstacle_speed, &lane);

    let player = Body::new(sim.player.pos, sim.player.size);
    let hit = sim
        .obstacles
        .iter()
        .find(|o| {
            sim.config
                .collision
                .hits(&player, &Body::new(o.pos, sim.obstacles.size))
        })
        .map(|o| o.id);

    if let Some(id) = hit {
        sim.phase = GamePhase::GameOver;
        log::info!("Hit tree {} at score {}", id, sim.score + 1);
    }

    let pruned = sim.obstacles.prune(&lane);
    if pruned > 0 {
        log::debug!("Pruned {} obstacles, {} remain", pruned, sim.obstacles.len());
    }

    sim.score += 1;
    sim.time_ticks += 1;

    if sim.config.enable_difficulty_ramp {
        sim.obstacle_speed += sim.config.speed_ramp;
    }

    match hit {
        Some(obstacle_id) => TickOutcome::Collided { obstacle_id },
        None => TickOutcome::Advanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;
    use crate::sim::config::SimConfig;
    use glam::Vec2;
    use proptest::prelude::*;

    fn sim(mode: GameMode) -> Simulation {
        Simulation::new(SimConfig::for_mode(mode))
    }

    #[test]
    fn test_score_counts_ticks() {
        let mut s = sim(GameMode::TopDown);
        for _ in 0..250 {
            assert_eq!(tick(&mut s, &InputState::default()), TickOutcome::Advanced);
        }
        assert_eq!(s.score, 250);
        assert_eq!(s.time_ticks, 250);
    }

    #[test]
    fn test_opposing_inputs_cancel() {
        let mut s = sim(GameMode::Isometric);
        let start = s.player.pos;
        let input = InputState {
            forward: true,
            back: true,
            left: true,
            right: true,
        };
        tick(&mut s, &input);
        assert_eq!(s.player.pos, start);
    }

    #[test]
    fn test_isometric_moves_both_axes() {
        let mut s = sim(GameMode::Isometric);
        let input = InputState {
            forward: true,
            right: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert!((s.player.pos.x - 0.08).abs() < 1e-6);
        assert!((s.player.pos.y - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_top_down_ignores_vertical_input() {
        let mut s = sim(GameMode::TopDown);
        let y = s.player.pos.y;
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.player.pos.y, y);
    }

    #[test]
    fn test_clamped_at_left_bound() {
        let mut s = sim(GameMode::TopDown);
        let left = InputState {
            left: true,
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut s, &left);
        }
        assert_eq!(s.player.pos.x, s.player_bounds().min.x);
    }

    #[test]
    fn test_collision_detected_same_tick() {
        let mut s = sim(GameMode::TopDown);
        let left = InputState {
            left: true,
            ..Default::default()
        };
        // Park the player against the left bound
        s.player.pos.x = s.player_bounds().min.x;
        // Tree sitting on top of the player, one step short of its position
        let target = s.player.pos - Vec2::new(0.0, s.obstacle_speed);
        let id = s.obstacles.insert(target);

        assert_eq!(
            tick(&mut s, &left),
            TickOutcome::Collided { obstacle_id: id }
        );
        assert!(s.is_game_over());
    }

    #[test]
    fn test_collision_caused_by_this_ticks_movement() {
        let mut s = sim(GameMode::Isometric);
        // Out of reach now, within reach once both seal and tree move
        s.obstacles.insert(Vec2::new(0.0, 0.4 + 0.08 + s.obstacle_speed - 0.01));
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        assert!(matches!(tick(&mut s, &input), TickOutcome::Collided { .. }));
    }

    #[test]
    fn test_game_over_tick_is_noop() {
        let mut s = sim(GameMode::Isometric);
        s.obstacles.insert(Vec2::new(0.0, 0.1));
        assert!(matches!(
            tick(&mut s, &InputState::default()),
            TickOutcome::Collided { .. }
        ));
        let frozen = s.clone();
        let input = InputState {
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            assert_eq!(tick(&mut s, &input), TickOutcome::Idle);
        }
        assert_eq!(s, frozen);
    }

    #[test]
    fn test_collision_tick_still_scores_and_prunes() {
        let mut s = sim(GameMode::Isometric);
        s.obstacles.insert(Vec2::new(0.0, 0.1));
        s.obstacles.insert(Vec2::new(0.9, -0.99));
        tick(&mut s, &InputState::default());
        assert_eq!(s.score, 1);
        assert_eq!(s.obstacles.len(), 1);
    }

    #[test]
    fn test_difficulty_ramp() {
        let mut iso = sim(GameMode::Isometric);
        let mut top = sim(GameMode::TopDown);
        for _ in 0..100 {
            tick(&mut iso, &InputState::default());
            tick(&mut top, &InputState::default());
        }
        let expected = iso.config.base_obstacle_speed + 100.0 * iso.config.speed_ramp;
        assert!((iso.obstacle_speed - expected).abs() < 1e-6);
        assert_eq!(top.obstacle_speed, top.config.base_obstacle_speed);

        iso.reset();
        assert_eq!(iso.obstacle_speed, iso.config.base_obstacle_speed);
    }

    #[test]
    fn test_zero_speed_obstacle_never_collides_or_prunes() {
        let mut config = SimConfig::for_mode(GameMode::Isometric);
        config.base_obstacle_speed = 0.0;
        config.enable_difficulty_ramp = false;
        let mut s = Simulation::new(config);
        let spawn = s.lane().spawn_y;
        s.obstacles.insert(Vec2::new(0.0, spawn));

        let input = InputState {
            forward: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            assert_eq!(tick(&mut s, &input), TickOutcome::Advanced);
        }
        assert_eq!(s.obstacles.len(), 1);
        assert_eq!(s.obstacles.iter().next().map(|o| o.pos.y), Some(spawn));
    }

    #[test]
    fn test_shrinking_playfield_reclamps_player() {
        let mut s = sim(GameMode::TopDown);
        s.player.pos.x = s.player_bounds().max.x;
        s.resize(200.0, 150.0);
        tick(&mut s, &InputState::default());
        assert!(s.player_bounds().contains(s.player.pos));
    }

    fn any_input() -> impl Strategy<Value = InputState> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(forward, back, left, right)| InputState {
                forward,
                back,
                left,
                right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            iso in any::<bool>(),
            inputs in prop::collection::vec(any_input(), 1..300),
        ) {
            let mode = if iso { GameMode::Isometric } else { GameMode::TopDown };
            let mut s = sim(mode);
            for input in &inputs {
                tick(&mut s, input);
                prop_assert!(s.player_bounds().contains(s.player.pos));
            }
        }

        #[test]
        fn prop_score_equals_ticks_without_collision(n in 0u64..2000) {
            let mut s = sim(GameMode::TopDown);
            for _ in 0..n {
                tick(&mut s, &InputState::default());
            }
            prop_assert_eq!(s.score, n);
        }
    }
}
