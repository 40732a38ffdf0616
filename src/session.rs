//! Game session: drives the simulation from host frames and timers
//!
//! The session owns the spawn interval and the one-shot restart timeout. Each
//! host frame fires whatever timers are due, ticks the simulation once and
//! hands back a snapshot for drawing.
//!
//! Timers run on a game clock rather than the raw host clock: each frame
//! advances it by the host time since the previous frame, capped at
//! `MAX_FRAME_GAP_MS`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::MAX_FRAME_GAP_MS;
use crate::sim::{
    ConfigError, GamePhase, InputState, SimConfig, Simulation, Snapshot, TickOutcome, tick,
};
use crate::timer::{Scheduler, TimerId};

/// Timer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SpawnObstacle,
    Restart,
}

/// A running game with its timers
#[derive(Debug, Clone)]
pub struct GameSession {
    sim: Simulation,
    scheduler: Scheduler<SessionEvent>,
    spawn_timer: Option<TimerId>,
    restart_timer: Option<TimerId>,
    rng: Pcg32,
    seed: u64,
    started: bool,
    /// Host time of the previous frame
    last_host_ms: f64,
    /// Host time minus game time: paused time so far
    clock_offset_ms: f64,
}

impl GameSession {
    /// Build a stopped session. Call `start` to begin playing.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sim: Simulation::new(config),
            scheduler: Scheduler::new(0.0),
            spawn_timer: None,
            restart_timer: None,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            started: false,
            last_host_ms: 0.0,
            clock_offset_ms: 0.0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Active spawn timer, if spawning
    pub fn spawn_timer(&self) -> Option<TimerId> {
        self.spawn_timer
    }

    /// Pending restart, if a collision happened
    pub fn restart_timer(&self) -> Option<TimerId> {
        self.restart_timer
    }

    /// Pending timers of any kind
    pub fn active_timers(&self) -> usize {
        self.scheduler.active()
    }

    /// Begin (or resume) play at host time `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.last_host_ms = now_ms;
        // Game time carries on from where the last run left it
        self.clock_offset_ms = now_ms - self.scheduler.now_ms();
        self.started = true;
        self.reset();
        log::info!(
            "Session started in {} mode (seed {})",
            self.sim.config.mode.as_str(),
            self.seed
        );
    }

    /// Cancel every timer and stop processing frames
    pub fn stop(&mut self) {
        self.scheduler.clear_all();
        self.spawn_timer = None;
        self.restart_timer = None;
        self.started = false;
        log::info!("Session stopped at score {}", self.sim.score);
    }

    /// Fresh run: reset the simulation and restart spawning
    pub fn reset(&mut self) {
        self.sim.reset();
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.clear(id);
        }
        let interval = self.sim.config.spawn_interval_ms;
        self.spawn_timer = Some(self.scheduler.set_interval(interval, SessionEvent::SpawnObstacle));
    }

    /// Host playfield changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.sim.resize(width, height);
    }

    /// Game clock time, in ms since the session was created
    pub fn game_time_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Process one host frame at `now_ms`: due timers, then one tick
    pub fn frame(&mut self, now_ms: f64, input: &InputState) -> Snapshot {
        if !self.started {
            return self.sim.snapshot();
        }

        let gap = now_ms - self.last_host_ms;
        self.last_host_ms = now_ms;
        if gap > MAX_FRAME_GAP_MS {
            self.clock_offset_ms += gap - MAX_FRAME_GAP_MS;
            log::debug!("Frame gap of {:.0} ms treated as paused", gap);
        }
        let game_now = now_ms - self.clock_offset_ms;

        while let Some((id, event)) = self.scheduler.pop_due(game_now) {
            self.handle(id, event);
        }
        self.scheduler.settle(game_now);

        if let TickOutcome::Collided { .. } = tick(&mut self.sim, input) {
            self.on_collision();
        }

        self.sim.snapshot()
    }

    fn handle(&mut self, id: TimerId, event: SessionEvent) {
        match event {
            SessionEvent::SpawnObstacle => {
                if self.sim.phase == GamePhase::Running {
                    let lane = self.sim.lane();
                    self.sim.obstacles.spawn(&mut self.rng, &lane);
                }
            }
            SessionEvent::Restart => {
                if self.restart_timer == Some(id) {
                    self.restart_timer = None;
                }
                log::info!("Restarting after game over (score {})", self.sim.score);
                self.reset();
            }
        }
    }

    fn on_collision(&mut self) {
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.clear(id);
        }
        let delay = self.sim.config.restart_delay_ms;
        self.restart_timer = Some(self.scheduler.set_timeout(delay, SessionEvent::Restart));
        log::info!("Game over at score {}, restarting in {} ms", self.sim.score, delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn session(mode: GameMode) -> GameSession {
        let mut s = GameSession::new(SimConfig::for_mode(mode), 1234).unwrap();
        s.start(0.0);
        s
    }

    /// Step frames from `from` to exactly `to`, returning the last snapshot
    fn run_frames(s: &mut GameSession, from: f64, to: f64) -> Snapshot {
        let mut now = from;
        let mut snap = s.simulation().snapshot();
        while now < to {
            now = (now + FRAME_MS).min(to);
            snap = s.frame(now, &InputState::default());
        }
        snap
    }

    /// Force a collision on the next frame by dropping a tree on the player
    fn plant_tree_on_player(s: &mut GameSession) {
        let pos = s.sim.player.pos;
        s.sim.obstacles.insert(pos);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::for_mode(GameMode::TopDown);
        config.spawn_interval_ms = -5.0;
        assert!(GameSession::new(config, 1).is_err());
    }

    #[test]
    fn test_stopped_session_does_not_tick() {
        let mut s = GameSession::new(SimConfig::for_mode(GameMode::TopDown), 1).unwrap();
        let snap = s.frame(5000.0, &InputState::default());
        assert_eq!(snap.score, 0);
        assert!(snap.obstacles.is_empty());
    }

    #[test]
    fn test_single_spawn_timer_across_resets() {
        let mut s = session(GameMode::Isometric);
        let first = s.spawn_timer().unwrap();
        s.reset();
        s.reset();
        let current = s.spawn_timer().unwrap();
        assert_ne!(first, current);
        assert_eq!(s.active_timers(), 1);
        assert!(s.scheduler.is_active(current));
        assert!(!s.scheduler.is_active(first));
    }

    #[test]
    fn test_spawn_cadence() {
        let mut s = session(GameMode::TopDown);
        // Keep every tree on screen by freezing motion
        s.sim.obstacle_speed = 0.0;
        run_frames(&mut s, 0.0, 10_500.0);
        // Interval is 2000 ms: spawns at 2, 4, 6, 8, 10 s
        assert_eq!(s.sim.obstacles.len(), 5);
    }

    #[test]
    fn test_collision_schedules_restart() {
        let mut s = session(GameMode::TopDown);
        let mut now = 0.0;
        for _ in 0..30 {
            now += FRAME_MS;
            s.frame(now, &InputState::default());
        }
        plant_tree_on_player(&mut s);
        now += FRAME_MS;
        let snap = s.frame(now, &InputState::default());
        let hit_at = now;

        assert!(snap.game_over);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.spawn_timer().is_none());
        assert!(s.restart_timer().is_some());
        assert_eq!(s.active_timers(), 1);

        // Still over just before the delay elapses, and frozen
        let frozen_score = snap.score;
        let snap = run_frames(&mut s, hit_at, hit_at + 1999.0);
        assert!(snap.game_over);
        assert_eq!(snap.score, frozen_score);

        // Restart fires at exactly the delay; the same frame ticks once
        let snap = s.frame(hit_at + 2000.0, &InputState::default());
        assert!(!snap.game_over);
        assert_eq!(snap.score, 1);
        assert!(s.restart_timer().is_none());
        assert!(s.spawn_timer().is_some());
    }

    #[test]
    fn test_restart_equals_reset_state() {
        let mut s = session(GameMode::Isometric);
        plant_tree_on_player(&mut s);
        s.frame(10.0, &InputState::default());
        assert_eq!(s.phase(), GamePhase::GameOver);

        // Restart fires from the timer queue alone
        while let Some((id, event)) = s.scheduler.pop_due(2010.0) {
            s.handle(id, event);
        }

        let mut expected = Simulation::new(s.sim.config.clone());
        expected.playfield = s.sim.playfield;
        expected.reset();
        assert_eq!(s.sim, expected);
        assert_eq!(s.sim.score, 0);
        assert!(s.sim.obstacles.is_empty());
    }

    #[test]
    fn test_no_spawns_during_game_over() {
        let mut s = session(GameMode::Isometric);
        plant_tree_on_player(&mut s);
        s.frame(10.0, &InputState::default());
        let count = s.sim.obstacles.len();
        run_frames(&mut s, 10.0, 1900.0);
        assert_eq!(s.sim.obstacles.len(), count);
    }

    #[test]
    fn test_long_frame_gap_does_not_flood_trees() {
        let mut s = session(GameMode::Isometric);
        s.frame(16.0, &InputState::default());
        // Ten minutes with no frames, e.g. a hidden tab
        let snap = s.frame(600_016.0, &InputState::default());
        assert!(snap.obstacles.len() <= 1);
        assert_eq!(s.game_time_ms(), 16.0 + MAX_FRAME_GAP_MS);

        // Spawning carries on at the normal cadence afterwards
        let snap = run_frames(&mut s, 600_016.0, 600_016.0 + 1000.0);
        assert_eq!(snap.obstacles.len(), 1);
    }

    #[test]
    fn test_stop_cancels_everything() {
        let mut s = session(GameMode::Isometric);
        plant_tree_on_player(&mut s);
        s.frame(10.0, &InputState::default());
        s.stop();
        assert_eq!(s.active_timers(), 0);
        let snap = s.frame(10_000.0, &InputState::default());
        assert!(snap.game_over);

        s.start(10_000.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.active_timers(), 1);
    }

    #[test]
    fn test_resize_reclamps_on_next_frame() {
        let mut s = session(GameMode::TopDown);
        let right = InputState {
            right: true,
            ..Default::default()
        };
        let mut now = 0.0;
        for _ in 0..200 {
            now += FRAME_MS;
            s.frame(now, &right);
        }
        s.resize(300.0, 200.0);
        let snap = s.frame(now + FRAME_MS, &right);
        assert_eq!(snap.player, Vec2::new(275.0, 200.0 - 10.0 - 25.0));
    }

    #[test]
    fn test_same_seed_same_trees() {
        let mut a = session(GameMode::Isometric);
        let mut b = session(GameMode::Isometric);
        let mut now = 0.0;
        for _ in 0..300 {
            now += FRAME_MS;
            let sa = a.frame(now, &InputState::default());
            let sb = b.frame(now, &InputState::default());
            assert_eq!(sa, sb);
        }
    }
}
