//! One playthrough: wires the timer, spawn cadence, attack engine, pool and
//! loot together and drives them from a per-frame `tick`.
//!
//! The session is the only owner of mutable game state. Input arrives as
//! `request_action(aim)` and `choose_loot(index)`; everything observable
//! leaves through `drain_events`.

pub mod drops;

pub use drops::ExpDrop;

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{AttackEngine, Deferred, GameEvent, Outcome, SimContext};
use crate::core::config::GameConfig;
use crate::core::constants::{
    DROP_RADIUS, ENEMY_RADIUS, EXP_DROP_ABSORB_DISTANCE, EXP_DROP_HOMING_SPEED,
    EXP_DROP_INNER_DISTANCE, EXP_DROP_OUTER_DISTANCE, PLAYER_RADIUS,
};
use crate::core::geometry::{rand_within_donut, Vector2};
use crate::entities::{create_enemy, create_player, EnemyKind, Entity};
use crate::equipment::EquipmentKind;
use crate::host::{ActorHandle, ActorTemplate, BodyShape, CollisionGroup, Contact, Effect, Host};
use crate::loot::{generate_loot, LootOffer};
use crate::pool::ActorPool;
use crate::world::{opening_ring, SpawnDirector, WorldTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, `start` not yet called.
    Pending,
    Active,
    /// Waiting for loot choices; simulated time is frozen.
    Paused,
    Over,
}

pub struct Session<H> {
    config: GameConfig,
    ctx: SimContext<H>,
    timer: WorldTimer,
    spawner: SpawnDirector,
    engine: AttackEngine,
    player: Entity,
    enemies: Vec<Entity>,
    drops: Vec<ExpDrop>,
    loot_queue: VecDeque<LootOffer>,
    state: SessionState,
    outcome: Option<Outcome>,
    enemies_defeated: u32,
}

impl<H: Host> Session<H> {
    pub fn new(config: GameConfig, host: H) -> Self {
        Self {
            timer: WorldTimer::new(&config.timer),
            engine: AttackEngine::new(&config.combat, config.timer.kill_bonus),
            player: create_player(&config.player),
            ctx: SimContext::new(host),
            spawner: SpawnDirector::new(),
            enemies: Vec::new(),
            drops: Vec::new(),
            loot_queue: VecDeque::new(),
            state: SessionState::Pending,
            outcome: None,
            enemies_defeated: 0,
            config,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while actions and gameplay follow-ups may run.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies.iter().filter(|enemy| enemy.alive())
    }

    pub fn drops(&self) -> &[ExpDrop] {
        &self.drops
    }

    pub fn timer(&self) -> &WorldTimer {
        &self.timer
    }

    pub fn engine(&self) -> &AttackEngine {
        &self.engine
    }

    pub fn pool(&self) -> &ActorPool {
        &self.ctx.pool
    }

    pub fn host(&self) -> &H {
        &self.ctx.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.ctx.host
    }

    pub fn now_ms(&self) -> u64 {
        self.ctx.now_ms()
    }

    pub fn enemies_defeated(&self) -> u32 {
        self.enemies_defeated
    }

    pub fn pending_loot(&self) -> Option<&LootOffer> {
        self.loot_queue.front()
    }

    pub fn pending_loot_count(&self) -> usize {
        self.loot_queue.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.ctx.scheduler.len()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.ctx.events)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Place the player and the opening ring, and start the world tick.
    pub fn start(&mut self) {
        if self.state != SessionState::Pending {
            return;
        }

        let handle = self.ctx.host.spawn_actor(ActorTemplate::Player, Vector2::ZERO);
        self.ctx.host.attach_body(handle, BodyShape::circle(PLAYER_RADIUS));
        self.ctx.host.set_collision_group(handle, CollisionGroup::Player);
        self.player.handle = Some(handle);
        self.player.position = Vector2::ZERO;

        for at in opening_ring(self.player.position, self.config.world.opening_ring_distance) {
            self.spawn_enemy(EnemyKind::Servant, at);
        }

        self.ctx.schedule(self.config.world.first_tick_ms, Deferred::WorldTick);
        self.state = SessionState::Active;
        log::info!("session started with {} enemies", self.enemies.len());
    }

    /// Advance the simulation by `dt` seconds. Does nothing unless active.
    pub fn tick(&mut self, dt: f64, rng: &mut impl Rng) {
        if self.state != SessionState::Active {
            return;
        }

        self.ctx.advance_clock(dt);
        let report = self.timer.advance_with_report(dt);
        if let Some(milestone) = report.milestone {
            self.ctx.emit(GameEvent::MilestoneReached {
                at_seconds: milestone.at_seconds,
                boss: milestone.boss,
            });
        }
        if !report.survives {
            self.end_game(Outcome::Doomed);
            return;
        }

        self.run_due_tasks(rng);
        if self.state != SessionState::Active {
            return;
        }

        self.ctx.host.step(dt);
        self.sync_positions();

        for contact in self.ctx.host.drain_contacts() {
            if self.state == SessionState::Over {
                break;
            }
            self.handle_contact(contact, rng);
        }

        if self.state == SessionState::Active {
            self.update_drops(dt, rng);
        }
    }

    /// The player asks to act toward `aim`. Returns false if refused.
    pub fn request_action(&mut self, aim: Vector2) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.engine
            .begin_action(&mut self.ctx, &mut self.player, &mut self.enemies, aim)
    }

    /// Apply option `index` of the front loot offer. The session resumes once
    /// every queued offer has been answered.
    pub fn choose_loot(&mut self, index: usize) -> Option<EquipmentKind> {
        if self.state != SessionState::Paused {
            return None;
        }
        let info = self.loot_queue.front()?.options.get(index)?.clone();
        self.loot_queue.pop_front();

        let level = self
            .player
            .add_equipment(info.kind, info.scaling.clone())
            .level();
        log::debug!(
            "loot applied: {} level {} with {:?}",
            info.kind.name(),
            level,
            info.scaling
        );
        self.ctx.emit(GameEvent::EquipmentAdded {
            kind: info.kind,
            level,
        });

        if self.loot_queue.is_empty() {
            self.state = SessionState::Active;
        }
        Some(info.kind)
    }

    /// Resolve one physics contact. Pairs the session does not care about are
    /// ignored.
    pub fn handle_contact(&mut self, contact: Contact, rng: &mut impl Rng) {
        if self.state == SessionState::Over {
            return;
        }
        let Contact { first, second } = contact;

        if let Some((strike, enemy)) = self.strike_pair(first, second) {
            self.resolve_strike(strike, enemy, rng);
        } else if let Some(drop) = self.drop_pair(first, second) {
            self.collect_drop(drop);
        }
    }

    // ── Internals ───────────────────────────────────────────────

    fn end_game(&mut self, outcome: Outcome) {
        if self.state == SessionState::Over {
            return;
        }
        self.state = SessionState::Over;
        self.outcome = Some(outcome);
        self.timer.doom();
        self.ctx.scheduler.clear();
        self.ctx.emit(GameEvent::GameOver {
            outcome,
            elapsed: self.timer.elapsed_time,
        });
        log::info!(
            "session over: {:?} after {:.1}s, {} defeated",
            outcome,
            self.timer.elapsed_time,
            self.enemies_defeated
        );
    }

    fn pause(&mut self) {
        self.state = SessionState::Paused;
        let dropped = self.ctx.scheduler.retain(|task| !task.is_gameplay());
        log::debug!(
            "paused for {} loot offer(s), dropped {} pending follow-ups",
            self.loot_queue.len(),
            dropped
        );
    }

    fn run_due_tasks(&mut self, rng: &mut impl Rng) {
        while self.state == SessionState::Active {
            let Some(task) = self.ctx.pop_due() else {
                break;
            };
            self.run_task(task, rng);
        }
    }

    fn run_task(&mut self, task: Deferred, rng: &mut impl Rng) {
        if task.is_gameplay() && !self.is_ready() {
            log::trace!("dropping stale {:?}", task);
            return;
        }

        match task {
            Deferred::Chain { .. } => {
                self.engine
                    .run_chain(&mut self.ctx, &self.player, &self.enemies);
            }
            Deferred::PullWielder { to } => {
                self.engine.pull_wielder(&mut self.ctx, &mut self.player, to);
            }
            Deferred::FireStrike {
                info,
                strike,
                aim,
                chained,
            } => {
                self.engine.fire_deferred(
                    &mut self.ctx,
                    &self.player,
                    &self.enemies,
                    strike,
                    info,
                    aim,
                    chained,
                );
            }
            Deferred::Settle => self.engine.settle(&mut self.player),
            Deferred::RetireStrike { handle, attack } => {
                self.engine.retire(&mut self.ctx, handle, attack);
            }
            Deferred::RecycleEnemy { handle } => self.recycle_enemy(handle),
            Deferred::WorldTick => self.world_tick(rng),
        }
    }

    fn world_tick(&mut self, rng: &mut impl Rng) {
        let plan = self.spawner.plan_tick(
            &mut self.timer,
            &self.config.world,
            self.player.position,
            rng,
        );
        for (kind, at) in &plan.spawns {
            self.spawn_enemy(*kind, *at);
        }

        if plan.boss {
            self.ctx.emit(GameEvent::BossSpawned);
        } else if !plan.spawns.is_empty() {
            self.ctx.emit(GameEvent::WaveSpawned {
                tick: plan.tick,
                count: plan.spawns.len(),
            });
        }

        self.ctx
            .schedule(self.config.world.tick_interval_ms, Deferred::WorldTick);
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, at: Vector2) {
        let power = self.config.world.base_enemy_power + self.enemies_defeated as f64;
        let mut enemy = create_enemy(kind, power);

        let handle = self
            .ctx
            .pool
            .acquire(&mut self.ctx.host, ActorTemplate::Enemy(kind), at);
        self.ctx.host.attach_body(handle, BodyShape::circle(ENEMY_RADIUS));
        self.ctx.host.set_collision_group(handle, CollisionGroup::Enemy);

        enemy.handle = Some(handle);
        enemy.position = at;
        log::trace!("spawned {} with power {:.1}", enemy.key(), enemy.power());
        self.enemies.push(enemy);
    }

    fn recycle_enemy(&mut self, handle: ActorHandle) {
        let Some(index) = self
            .enemies
            .iter()
            .position(|e| e.handle == Some(handle) && !e.alive())
        else {
            return;
        };
        let enemy = self.enemies.remove(index);
        if let Some(kind) = enemy.enemy_kind {
            self.ctx
                .pool
                .push(&mut self.ctx.host, ActorTemplate::Enemy(kind), handle);
        }
    }

    fn sync_positions(&mut self) {
        if let Some(position) = self.player.handle.and_then(|h| self.ctx.host.position(h)) {
            self.player.position = position;
        }
        for enemy in self.enemies.iter_mut() {
            if let Some(position) = enemy.handle.and_then(|h| self.ctx.host.position(h)) {
                enemy.position = position;
            }
        }
    }

    fn is_enemy(&self, handle: ActorHandle) -> bool {
        self.enemies.iter().any(|e| e.handle == Some(handle))
    }

    fn strike_pair(&self, a: ActorHandle, b: ActorHandle) -> Option<(ActorHandle, ActorHandle)> {
        if self.engine.is_strike(a) && self.is_enemy(b) {
            Some((a, b))
        } else if self.engine.is_strike(b) && self.is_enemy(a) {
            Some((b, a))
        } else {
            None
        }
    }

    fn drop_pair(&self, a: ActorHandle, b: ActorHandle) -> Option<ActorHandle> {
        let player = self.player.handle?;
        let other = if a == player {
            b
        } else if b == player {
            a
        } else {
            return None;
        };
        self.drops
            .iter()
            .any(|drop| drop.handle == other)
            .then_some(other)
    }

    fn resolve_strike(&mut self, strike: ActorHandle, enemy: ActorHandle, rng: &mut impl Rng) {
        let Some(outcome) = self.engine.resolve_contact(
            &mut self.ctx,
            &mut self.timer,
            &mut self.enemies,
            strike,
            enemy,
        ) else {
            return;
        };

        if !outcome.killed {
            return;
        }
        self.enemies_defeated += 1;
        if outcome.boss_defeated() {
            self.end_game(Outcome::Victory);
            return;
        }
        self.spawn_drop(outcome.position, rng);
    }

    fn spawn_drop(&mut self, around: Vector2, rng: &mut impl Rng) {
        let at = rand_within_donut(around, EXP_DROP_INNER_DISTANCE, EXP_DROP_OUTER_DISTANCE, rng);
        let handle = self
            .ctx
            .pool
            .acquire(&mut self.ctx.host, ActorTemplate::ExpDrop, at);
        self.ctx.host.attach_body(handle, BodyShape::circle(DROP_RADIUS));
        self.ctx.host.set_collision_group(handle, CollisionGroup::Drop);
        self.drops.push(ExpDrop::new(handle, at));
    }

    fn collect_drop(&mut self, handle: ActorHandle) {
        let Some(drop) = self.drops.iter_mut().find(|d| d.handle == handle) else {
            return;
        };
        if drop.collected {
            return;
        }
        drop.collected = true;
        self.ctx.host.detach_body(handle);
        self.ctx.host.play_effect(handle, Effect::Collected);
    }

    fn update_drops(&mut self, dt: f64, rng: &mut impl Rng) {
        let target = self.player.position;
        let mut absorbed = Vec::new();
        for drop in self.drops.iter_mut() {
            if drop.home(target, EXP_DROP_HOMING_SPEED, dt, EXP_DROP_ABSORB_DISTANCE) {
                absorbed.push(drop.handle);
            } else if drop.collected {
                self.ctx.host.set_position(drop.handle, drop.position);
            }
        }

        for handle in absorbed {
            self.drops.retain(|drop| drop.handle != handle);
            self.ctx
                .pool
                .push(&mut self.ctx.host, ActorTemplate::ExpDrop, handle);
            self.gain_experience(self.config.player.exp_per_drop, rng);
        }
    }

    /// Add experience and take every level-up it pays for. Each level-up
    /// raises power and queues a loot offer; any queued offer pauses the run.
    pub fn gain_experience(&mut self, amount: f64, rng: &mut impl Rng) {
        if self.state == SessionState::Over {
            return;
        }

        self.player.add_experience(amount);
        let total = self
            .player
            .level_info
            .as_ref()
            .map_or(0.0, |info| info.experience);
        self.ctx.emit(GameEvent::ExperienceGained { amount, total });

        while let Some(level) = self.player.try_level_up() {
            self.player.battle.power += self.config.player.power_per_level;
            if let Some(handle) = self.player.handle {
                self.ctx.host.play_effect(handle, Effect::LevelUp);
            }
            self.ctx.emit(GameEvent::LevelUp {
                level,
                power: self.player.power(),
            });
            log::debug!("level up to {} (power {})", level, self.player.power());

            let player = &self.player;
            let options = generate_loot(
                &player.held_kinds(),
                |kind| player.held(kind).map(|held| held.level()),
                &self.config.loot,
                rng,
            );
            if options.is_empty() {
                continue;
            }
            self.ctx.emit(GameEvent::LootOffered {
                level,
                options: options.clone(),
            });
            self.loot_queue.push_back(LootOffer { level, options });
        }

        if !self.loot_queue.is_empty() && self.state == SessionState::Active {
            self.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> Session<HeadlessHost> {
        let mut session = Session::new(GameConfig::default(), HeadlessHost::new());
        session.start();
        session
    }

    #[test]
    fn test_start_places_opening_ring() {
        let session = session();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.enemies().len(), 5);
        assert!(session.enemies().iter().all(|e| e.power() == 3.0));
        assert!(session.player().handle.is_some());
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut session = Session::new(GameConfig::default(), HeadlessHost::new());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        session.tick(1.0, &mut rng);
        assert_eq!(session.timer().elapsed_time, 0.0);
        assert!(!session.request_action(Vector2::ZERO));
    }

    #[test]
    fn test_world_tick_spawns_first_wave() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..30 {
            session.tick(0.1, &mut rng);
        }
        assert_eq!(session.now_ms(), 3000);
        assert_eq!(session.enemies().len(), 7);
        assert!(session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::WaveSpawned { tick: 0, count: 2 })));
    }

    #[test]
    fn test_timer_expiry_ends_run_once() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        session.tick(31.0, &mut rng);
        assert_eq!(session.state(), SessionState::Over);
        assert_eq!(session.outcome(), Some(Outcome::Doomed));
        assert_eq!(session.pending_tasks(), 0);
        session.tick(1.0, &mut rng);
        let overs = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_level_up_pauses_until_every_offer_is_chosen() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        // Default chart starts 30, 108: 150 experience crosses both.
        session.gain_experience(150.0, &mut rng);
        assert_eq!(session.player().level(), 2);
        assert_eq!(session.player().power(), 6.0);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.pending_loot_count(), 2);

        let elapsed = session.timer().elapsed_time;
        session.tick(1.0, &mut rng);
        assert_eq!(session.timer().elapsed_time, elapsed);
        assert!(!session.request_action(Vector2::new(1.0, 0.0)));

        assert!(session.choose_loot(99).is_none());
        assert!(session.choose_loot(0).is_some());
        assert_eq!(session.state(), SessionState::Paused);
        assert!(session.choose_loot(0).is_some());
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.choose_loot(0).is_none());
    }
}
