//! Integration test: Attack resolution
//!
//! Drives the attack engine directly against a headless host: power
//! exchange, duplicate-contact filtering, chain continuation and chain drops.

use std::collections::HashSet;

use doomseal::combat::{AttackEngine, ChainDropReason, Deferred, GameEvent, SimContext};
use doomseal::core::config::{CombatConfig, PlayerConfig, TimerConfig};
use doomseal::core::geometry::Vector2;
use doomseal::entities::{create_enemy, create_player, EnemyKind, Entity};
use doomseal::equipment::{EquipmentKind, UpgradeStat};
use doomseal::host::{ActorHandle, ActorTemplate, BodyShape, CollisionGroup, HeadlessHost, Physics, Renderer};
use doomseal::world::WorldTimer;

struct Arena {
    ctx: SimContext<HeadlessHost>,
    engine: AttackEngine,
    timer: WorldTimer,
    player: Entity,
    enemies: Vec<Entity>,
}

/// Player at the origin with power 2 holding one dagger with `upgrades`.
fn arena(upgrades: Vec<UpgradeStat>) -> Arena {
    armed(vec![(EquipmentKind::Dagger, upgrades)])
}

/// Player at the origin with power 2 holding every listed item.
fn armed(items: Vec<(EquipmentKind, Vec<UpgradeStat>)>) -> Arena {
    let mut ctx = SimContext::new(HeadlessHost::new());
    let mut player = create_player(&PlayerConfig {
        starting_equipment: Vec::new(),
        ..PlayerConfig::default()
    });
    for (kind, upgrades) in items {
        player.add_equipment(kind, upgrades);
    }
    let handle = ctx.host.spawn_actor(ActorTemplate::Player, Vector2::ZERO);
    player.handle = Some(handle);

    Arena {
        ctx,
        engine: AttackEngine::new(&CombatConfig::default(), 1.0),
        timer: WorldTimer::new(&TimerConfig::default()),
        player,
        enemies: Vec::new(),
    }
}

impl Arena {
    fn add_enemy(&mut self, power: f64, at: Vector2) -> ActorHandle {
        let mut enemy = create_enemy(EnemyKind::Servant, power);
        let handle = self
            .ctx
            .pool
            .acquire(&mut self.ctx.host, ActorTemplate::Enemy(EnemyKind::Servant), at);
        self.ctx.host.attach_body(handle, BodyShape::circle(35.0));
        self.ctx.host.set_collision_group(handle, CollisionGroup::Enemy);
        enemy.handle = Some(handle);
        enemy.position = at;
        self.enemies.push(enemy);
        handle
    }

    fn act(&mut self, aim: Vector2) -> ActorHandle {
        assert!(self
            .engine
            .begin_action(&mut self.ctx, &mut self.player, &mut self.enemies, aim));
        self.latest_strike()
    }

    fn latest_strike(&self) -> ActorHandle {
        (0..self.ctx.host.spawn_count() as u64)
            .rev()
            .map(ActorHandle)
            .find(|handle| self.engine.is_strike(*handle))
            .expect("a live strike")
    }

    fn strikes_of(&self, kind: EquipmentKind) -> Vec<ActorHandle> {
        (0..self.ctx.host.spawn_count() as u64)
            .map(ActorHandle)
            .filter(|handle| self.engine.live_strike(*handle).is_some_and(|live| live.kind == kind))
            .collect()
    }

    /// Pop the next due task, which must be a staggered strike, and launch it.
    fn fire_next_staggered(&mut self) -> ActorHandle {
        let task = self.ctx.pop_due().expect("a due task");
        let Deferred::FireStrike {
            info,
            strike,
            aim,
            chained,
        } = task
        else {
            panic!("expected a staggered strike, got {:?}", task);
        };
        self.engine
            .fire_deferred(&mut self.ctx, &self.player, &self.enemies, strike, info, aim, chained);
        self.latest_strike()
    }

    fn resolve(&mut self, strike: ActorHandle, enemy: ActorHandle) -> Option<doomseal::combat::HitOutcome> {
        self.engine.resolve_contact(
            &mut self.ctx,
            &mut self.timer,
            &mut self.enemies,
            strike,
            enemy,
        )
    }

    fn enemy(&self, handle: ActorHandle) -> &Entity {
        self.enemies
            .iter()
            .find(|e| e.handle == Some(handle))
            .expect("enemy exists")
    }

    fn count_events(&self, matcher: impl Fn(&GameEvent) -> bool) -> usize {
        self.ctx.events.iter().filter(|e| matcher(e)).count()
    }
}

// =============================================================================
// Power Exchange Tests
// =============================================================================

#[test]
fn test_weaker_strike_subtracts_power() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));

    // Dagger base 1 plus wielder power 2.
    let outcome = arena.resolve(strike, enemy).expect("contact resolves");
    assert!(!outcome.killed);
    assert_eq!(arena.enemy(enemy).power(), 7.0);
    assert!(arena.enemy(enemy).alive());
}

#[test]
fn test_equal_power_strike_defeats_enemy() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(3.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));

    let outcome = arena.resolve(strike, enemy).expect("contact resolves");
    assert!(outcome.killed);
    assert!(!outcome.boss_defeated());
    assert!(!arena.enemy(enemy).alive());
    assert!(!arena.ctx.host.has_body(enemy));
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::EnemyDefeated { .. })),
        1
    );
}

#[test]
fn test_kill_extends_timer_up_to_ceiling() {
    let mut drained = arena(Vec::new());
    let mut full = arena(Vec::new());

    drained.timer.advance(5.0);
    assert_eq!(drained.timer.remaining(), 25.0);
    let enemy = drained.add_enemy(1.0, Vector2::new(60.0, 0.0));
    let strike = drained.act(Vector2::new(60.0, 0.0));
    drained.resolve(strike, enemy);
    assert_eq!(drained.timer.remaining(), 26.0);

    let enemy = full.add_enemy(1.0, Vector2::new(60.0, 0.0));
    let strike = full.act(Vector2::new(60.0, 0.0));
    full.resolve(strike, enemy);
    assert_eq!(full.timer.remaining(), 30.0);
}

// =============================================================================
// Duplicate Contact Tests
// =============================================================================

#[test]
fn test_resolving_same_contact_twice_changes_nothing() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));

    assert!(arena.resolve(strike, enemy).is_some());
    let events = arena.ctx.events.len();

    assert!(arena.resolve(strike, enemy).is_none());
    assert_eq!(arena.enemy(enemy).power(), 7.0);
    assert_eq!(arena.ctx.events.len(), events);
}

#[test]
fn test_dead_or_unknown_targets_are_ignored() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(1.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));

    assert!(arena.resolve(strike, enemy).is_some());
    // Unknown strike handle.
    assert!(arena.resolve(ActorHandle(9999), enemy).is_none());
    // Unknown enemy handle.
    assert!(arena.resolve(strike, ActorHandle(9999)).is_none());
}

#[test]
fn test_new_action_clears_hit_ledgers() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));

    let first = arena.act(Vector2::new(60.0, 0.0));
    arena.resolve(first, enemy);
    arena.engine.settle(&mut arena.player);

    let second = arena.act(Vector2::new(60.0, 0.0));
    assert!(arena.resolve(second, enemy).is_some());
    assert_eq!(arena.enemy(enemy).power(), 4.0);
}

#[test]
fn test_action_refused_while_attacking() {
    let mut arena = arena(Vec::new());
    arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    arena.act(Vector2::new(60.0, 0.0));
    assert!(!arena.engine.begin_action(
        &mut arena.ctx,
        &mut arena.player,
        &mut arena.enemies,
        Vector2::new(60.0, 0.0)
    ));
}

// =============================================================================
// Chain Tests
// =============================================================================

#[test]
fn test_no_chain_without_repeat() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    arena.resolve(strike, enemy);

    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::ChainQueued { .. })),
        0
    );
}

#[test]
fn test_strike_queues_at_most_one_chain() {
    let mut arena = arena(vec![UpgradeStat::Repeat]);
    let first = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let second = arena.add_enemy(10.0, Vector2::new(70.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));

    assert!(arena.resolve(strike, first).is_some());
    assert!(arena.resolve(strike, second).is_some());

    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::ChainQueued { round: 1, .. })),
        1
    );
    assert!(arena.engine.tracker().is_excluded(arena.enemy(first).key()));
    assert!(!arena.engine.tracker().is_excluded(arena.enemy(second).key()));
}

#[test]
fn test_chain_dispatches_toward_nearest_unchosen_enemy() {
    let mut arena = arena(vec![UpgradeStat::Repeat]);
    let first = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let near = arena.add_enemy(10.0, Vector2::new(0.0, 120.0));
    arena.add_enemy(10.0, Vector2::new(0.0, -300.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    arena.resolve(strike, first);

    let player = arena.player.clone();
    assert!(arena
        .engine
        .run_chain(&mut arena.ctx, &player, &arena.enemies));
    assert!(arena.engine.tracker().is_excluded(arena.enemy(near).key()));
    assert_eq!(arena.engine.tracker().count, 2);
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::StrikeLaunched { chained: true, .. })),
        1
    );
}

#[test]
fn test_chain_depth_limits_rounds() {
    let mut arena = arena(vec![UpgradeStat::Repeat]);
    let first = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let second = arena.add_enemy(10.0, Vector2::new(0.0, 120.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    arena.resolve(strike, first);

    let player = arena.player.clone();
    arena.engine.run_chain(&mut arena.ctx, &player, &arena.enemies);
    let chained = arena.latest_strike();

    // Round count is now 2; depth 1 no longer covers it.
    assert!(arena.resolve(chained, second).is_some());
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::ChainQueued { .. })),
        1
    );
}

#[test]
fn test_chain_dropped_when_target_out_of_range() {
    let mut arena = arena(vec![UpgradeStat::Repeat]);
    let first = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    arena.add_enemy(10.0, Vector2::new(1000.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    arena.resolve(strike, first);

    let player = arena.player.clone();
    assert!(!arena
        .engine
        .run_chain(&mut arena.ctx, &player, &arena.enemies));
    assert_eq!(
        arena.count_events(|e| matches!(
            e,
            GameEvent::ChainDropped {
                reason: ChainDropReason::OutOfRange
            }
        )),
        1
    );
}

#[test]
fn test_chain_dropped_when_no_target_left() {
    let mut arena = arena(vec![UpgradeStat::Repeat]);
    let only = arena.add_enemy(1.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    let outcome = arena.resolve(strike, only).expect("contact resolves");
    assert!(outcome.killed);

    let player = arena.player.clone();
    assert!(!arena
        .engine
        .run_chain(&mut arena.ctx, &player, &arena.enemies));
    assert_eq!(
        arena.count_events(|e| matches!(
            e,
            GameEvent::ChainDropped {
                reason: ChainDropReason::NoTarget
            }
        )),
        1
    );
}

#[test]
fn test_chains_queue_per_strike_not_per_item() {
    let mut arena = armed(vec![
        (EquipmentKind::Dagger, vec![UpgradeStat::Repeat]),
        (EquipmentKind::Cleave, vec![UpgradeStat::Repeat]),
    ]);
    let first = arena.add_enemy(1.0, Vector2::new(60.0, 0.0));
    let second = arena.add_enemy(1.0, Vector2::new(0.0, 60.0));
    let third = arena.add_enemy(1.0, Vector2::new(0.0, -60.0));
    arena.act(Vector2::new(60.0, 0.0));

    let dagger = arena.strikes_of(EquipmentKind::Dagger);
    let cleave = arena.strikes_of(EquipmentKind::Cleave);
    assert_eq!(dagger.len(), 1);
    assert_eq!(cleave.len(), 2);

    let resolved: HashSet<_> = [(dagger[0], first), (cleave[0], second), (cleave[1], third)]
        .into_iter()
        .map(|(strike, enemy)| {
            let outcome = arena.resolve(strike, enemy).expect("contact resolves");
            assert!(outcome.killed);
            outcome.attack
        })
        .collect();

    let queued: Vec<_> = arena
        .ctx
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ChainQueued { attack, .. } => Some(*attack),
            _ => None,
        })
        .collect();
    assert_eq!(queued.len(), 3);
    assert_eq!(queued.iter().copied().collect::<HashSet<_>>(), resolved);

    // A strike reaching an enemy that is already down queues nothing more.
    assert!(arena.resolve(dagger[0], second).is_none());
    assert!(arena.resolve(cleave[1], first).is_none());
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::ChainQueued { .. })),
        3
    );
}

// =============================================================================
// Staggered Strike Tests
// =============================================================================

#[test]
fn test_staggered_darts_launch_from_wielder_toward_nearest_living_enemy() {
    let mut arena = armed(vec![(
        EquipmentKind::Dart,
        vec![UpgradeStat::Amount, UpgradeStat::Amount],
    )]);
    arena.add_enemy(10.0, Vector2::new(200.0, 0.0));
    arena.add_enemy(10.0, Vector2::new(0.0, 300.0));
    arena.act(Vector2::new(200.0, 10.0));

    // One dart now, two waiting on the stagger.
    assert_eq!(arena.engine.live_count(), 1);
    assert_eq!(arena.ctx.scheduler.len(), 4);

    arena.player.position = Vector2::new(50.0, 0.0);
    arena.ctx.advance_clock(0.1);
    let second = arena.fire_next_staggered();
    assert_eq!(arena.ctx.host.position(second), Some(Vector2::new(50.0, 0.0)));
    let heading = arena.ctx.host.velocity(second).expect("dart moving").normalized();
    assert!((heading.x - 1.0).abs() < 1e-9 && heading.y.abs() < 1e-9);

    // The enemy by the aim point falls; the last dart turns to the other one.
    arena.enemies[0].battle.alive = false;
    arena.player.position = Vector2::new(0.0, 100.0);
    arena.ctx.advance_clock(0.1);
    let third = arena.fire_next_staggered();
    assert_eq!(arena.ctx.host.position(third), Some(Vector2::new(0.0, 100.0)));
    let heading = arena.ctx.host.velocity(third).expect("dart moving").normalized();
    assert!(heading.x.abs() < 1e-9 && (heading.y - 1.0).abs() < 1e-9);

    assert_eq!(arena.engine.live_count(), 3);
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::StrikeLaunched { chained: false, .. })),
        3
    );
}

// =============================================================================
// Strike Lifecycle Tests
// =============================================================================

#[test]
fn test_retired_strike_returns_to_pool_and_is_reused() {
    let mut arena = arena(Vec::new());
    arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    let attack = arena.engine.live_strike(strike).expect("live").attack;

    assert!(arena.engine.retire(&mut arena.ctx, strike, attack));
    assert!(!arena.engine.retire(&mut arena.ctx, strike, attack));
    assert!(!arena.ctx.host.is_visible(strike));
    assert_eq!(arena.engine.live_count(), 0);

    arena.engine.settle(&mut arena.player);
    let again = arena.act(Vector2::new(60.0, 0.0));
    assert_eq!(again, strike);
    assert_eq!(arena.ctx.pool.stats().reused, 1);
}

#[test]
fn test_thrust_stops_following_wielder_after_landing() {
    let mut arena = arena(Vec::new());
    let enemy = arena.add_enemy(10.0, Vector2::new(60.0, 0.0));
    let strike = arena.act(Vector2::new(60.0, 0.0));
    let player = arena.player.handle.expect("player actor");

    arena.resolve(strike, enemy).expect("contact resolves");
    let landed_at = arena.ctx.host.position(strike);
    arena.ctx.host.halt(strike);
    arena.ctx.host.set_position(player, Vector2::new(0.0, 200.0));
    arena.ctx.host.step(0.1);

    assert_eq!(arena.ctx.host.position(strike), landed_at);
}
