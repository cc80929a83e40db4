//! Attack resolution: one player action becomes dispatch rounds of strikes,
//! each contact is resolved as a power exchange, and resolved strikes may
//! queue a chained round against the nearest enemy not yet chosen.

use std::collections::{HashMap, HashSet};

use super::context::{Deferred, SimContext};
use super::events::{ChainDropReason, GameEvent};
use super::repeat::RepeatTracker;
use crate::core::config::CombatConfig;
use crate::core::constants::ATTACK_RADIUS;
use crate::core::geometry::Vector2;
use crate::entities::{BattleInfo, EnemyKind, Entity, EntityState};
use crate::equipment::{plan_strikes, AttackId, AttackInfo, EquipmentKind, StrikeSpec};
use crate::host::{ActorHandle, ActorTemplate, BodyShape, CollisionGroup, Effect, Host};
use crate::world::WorldTimer;

/// A strike currently in flight.
#[derive(Debug, Clone)]
pub struct LiveStrike {
    pub attack: AttackId,
    pub kind: EquipmentKind,
    pub info: AttackInfo,
    pub chained: bool,
}

/// Result of a contact that was not ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub attack: AttackId,
    pub enemy_key: String,
    pub killed: bool,
    pub position: Vector2,
    pub kind: Option<EnemyKind>,
}

impl HitOutcome {
    pub fn boss_defeated(&self) -> bool {
        self.killed && self.kind.is_some_and(|kind| kind.is_boss())
    }
}

/// Apply one strike to an enemy. Returns true when the enemy is defeated.
///
/// Power is both damage and health: a strike at least as strong as the enemy
/// kills it, a weaker one is subtracted from it.
pub fn exchange_power(attack_power: f64, enemy: &mut BattleInfo) -> bool {
    if !enemy.alive {
        return false;
    }
    if attack_power >= enemy.power {
        enemy.alive = false;
        true
    } else {
        enemy.power -= attack_power;
        false
    }
}

/// Living enemy closest to `origin` whose key is not in `excluded`.
pub fn select_nearest<'a>(
    origin: Vector2,
    enemies: &'a [Entity],
    excluded: &HashSet<String>,
) -> Option<&'a Entity> {
    enemies
        .iter()
        .filter(|enemy| enemy.alive() && !excluded.contains(enemy.key()))
        .min_by(|a, b| {
            origin
                .distance(a.position)
                .total_cmp(&origin.distance(b.position))
        })
}

#[derive(Debug)]
pub struct AttackEngine {
    config: CombatConfig,
    kill_bonus: f64,
    tracker: RepeatTracker,
    live: HashMap<ActorHandle, LiveStrike>,
    next_attack: u64,
}

impl AttackEngine {
    pub fn new(config: &CombatConfig, kill_bonus: f64) -> Self {
        Self {
            config: config.clone(),
            kill_bonus,
            tracker: RepeatTracker::new(),
            live: HashMap::new(),
            next_attack: 0,
        }
    }

    pub fn tracker(&self) -> &RepeatTracker {
        &self.tracker
    }

    pub fn live_strike(&self, handle: ActorHandle) -> Option<&LiveStrike> {
        self.live.get(&handle)
    }

    pub fn is_strike(&self, handle: ActorHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Start an action toward `aim`. Returns false if the player cannot act.
    ///
    /// Ledgers and the repeat tracker are reset before anything is dispatched.
    pub fn begin_action<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        player: &mut Entity,
        enemies: &mut [Entity],
        aim: Vector2,
    ) -> bool {
        if !player.alive() || !player.ready() {
            return false;
        }

        self.tracker.reset();
        player.reset_hits();
        for enemy in enemies.iter_mut() {
            enemy.reset_hits();
        }

        player.set_state(EntityState::Attacking);
        ctx.emit(GameEvent::ActionStarted { aim });
        self.dispatch(ctx, player, enemies, aim, false);
        ctx.schedule(self.config.settle_window_ms, Deferred::Settle);
        true
    }

    /// One dispatch round over every held item. A chained round only invokes
    /// items whose chain depth covers the current round count.
    fn dispatch<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        player: &Entity,
        enemies: &[Entity],
        target: Vector2,
        chained: bool,
    ) -> usize {
        let round = self.tracker.count;
        let mut launched = 0;

        for equipment in &player.equipment {
            let info = equipment.compute_attack_bundle(&player.battle);
            if chained && info.chain_depth < round {
                continue;
            }

            let strikes = plan_strikes(
                equipment.kind(),
                &info,
                player.position,
                target,
                self.config.dart_stagger_ms,
            );
            for strike in strikes {
                if strike.delay_ms == 0 {
                    self.launch(ctx, player, enemies, strike, info.clone(), target, chained);
                } else {
                    let delay = strike.delay_ms;
                    ctx.schedule(
                        delay,
                        Deferred::FireStrike {
                            info: info.clone(),
                            strike,
                            aim: target,
                            chained,
                        },
                    );
                }
                launched += 1;
            }
        }

        self.tracker.count += 1;
        log::trace!(
            "dispatch round {} ({}): {} strikes",
            round,
            if chained { "chained" } else { "initial" },
            launched
        );
        launched
    }

    /// Put one strike into the world.
    #[allow(clippy::too_many_arguments)]
    pub fn launch<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        player: &Entity,
        enemies: &[Entity],
        mut strike: StrikeSpec,
        info: AttackInfo,
        aim: Vector2,
        chained: bool,
    ) -> AttackId {
        if strike.homing {
            if let Some(target) = select_nearest(aim, enemies, &HashSet::new()) {
                let direction = strike.origin.direction_to(target.position);
                if direction != Vector2::ZERO {
                    strike.direction = direction;
                    strike.angle_degrees = direction.angle_degrees();
                }
            }
        }

        let attack = AttackId(self.next_attack);
        self.next_attack += 1;

        let template = ActorTemplate::Strike(strike.kind);
        let handle = ctx.pool.acquire(&mut ctx.host, template, strike.origin);
        ctx.host.attach_body(handle, BodyShape::circle(ATTACK_RADIUS));
        ctx.host.set_collision_group(handle, CollisionGroup::Attack);
        if strike.tethered {
            if let Some(anchor) = player.handle {
                ctx.host.tether(handle, anchor);
            }
        }
        ctx.host.apply_impulse(handle, strike.direction, info.travel_speed);

        ctx.schedule(
            strike.kind.base_stats().lifetime_ms,
            Deferred::RetireStrike { handle, attack },
        );
        ctx.emit(GameEvent::StrikeLaunched {
            attack,
            equipment: strike.kind,
            chained,
        });

        self.live.insert(
            handle,
            LiveStrike {
                attack,
                kind: strike.kind,
                info,
                chained,
            },
        );
        attack
    }

    /// Launch a staggered strike from wherever the wielder stands now.
    #[allow(clippy::too_many_arguments)]
    pub fn fire_deferred<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        player: &Entity,
        enemies: &[Entity],
        mut strike: StrikeSpec,
        info: AttackInfo,
        aim: Vector2,
        chained: bool,
    ) -> AttackId {
        strike.origin = player.position;
        self.launch(ctx, player, enemies, strike, info, aim, chained)
    }

    /// Return a strike whose lifetime ended. Stale retirements are ignored.
    pub fn retire<H: Host>(&mut self, ctx: &mut SimContext<H>, handle: ActorHandle, attack: AttackId) -> bool {
        if self.live.get(&handle).map(|live| live.attack) != Some(attack) {
            return false;
        }
        match self.live.remove(&handle) {
            Some(live) => {
                ctx.pool.push(&mut ctx.host, ActorTemplate::Strike(live.kind), handle);
                true
            }
            None => false,
        }
    }

    /// Resolve a contact between a live strike and an enemy actor.
    ///
    /// Ignored (returns `None`) when the strike is unknown, the enemy is gone
    /// or already dead, or this strike or its equipment already registered
    /// against the enemy during the current action. Resolving the same
    /// contact twice therefore changes nothing the second time.
    pub fn resolve_contact<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        timer: &mut WorldTimer,
        enemies: &mut [Entity],
        strike: ActorHandle,
        enemy: ActorHandle,
    ) -> Option<HitOutcome> {
        let live = self.live.get(&strike)?;
        let attack = live.attack;
        let info = live.info.clone();

        let target = enemies.iter_mut().find(|e| e.handle == Some(enemy))?;
        if !target.alive() || target.confirm_hit(attack, &info.equipment_key) {
            return None;
        }

        target.register_hit(attack, &info.equipment_key);
        ctx.host.untether(strike);
        let before = target.power();
        let killed = exchange_power(info.power, &mut target.battle);
        let outcome = HitOutcome {
            attack,
            enemy_key: target.key().to_string(),
            killed,
            position: target.position,
            kind: target.enemy_kind,
        };

        if killed {
            timer.extend(self.kill_bonus);
            ctx.host.play_effect(enemy, Effect::Defeated);
            ctx.host.detach_body(enemy);
            ctx.schedule(self.config.death_effect_ms, Deferred::RecycleEnemy { handle: enemy });
            ctx.emit(GameEvent::EnemyDefeated {
                enemy_key: outcome.enemy_key.clone(),
                kind: outcome.kind,
                position: outcome.position,
            });
            ctx.emit(GameEvent::TimeExtended {
                remaining: timer.remaining(),
            });
            if info.pulls_wielder_to_target {
                ctx.schedule(
                    self.config.pull_delay_ms,
                    Deferred::PullWielder {
                        to: outcome.position,
                    },
                );
            }
            log::debug!("{} defeated by {:?} ({} >= {})", outcome.enemy_key, attack, info.power, before);
        } else {
            ctx.host.play_effect(enemy, Effect::Hit);
            ctx.emit(GameEvent::EnemyHit {
                enemy_key: outcome.enemy_key.clone(),
                damage: info.power,
                remaining: target.power(),
            });
        }

        self.continue_chain(ctx, attack, &info, &outcome.enemy_key);
        Some(outcome)
    }

    /// Queue a chained round from a resolved strike, at most once per strike
    /// and only while the strike's chain depth covers the round count.
    fn continue_chain<H: Host>(
        &mut self,
        ctx: &mut SimContext<H>,
        attack: AttackId,
        info: &AttackInfo,
        enemy_key: &str,
    ) {
        if !self.tracker.record_attack(attack) {
            return;
        }
        if info.chain_depth < self.tracker.count {
            return;
        }
        self.tracker.exclude(enemy_key);
        ctx.schedule(self.config.chain_delay_ms, Deferred::Chain { attack });
        ctx.emit(GameEvent::ChainQueued {
            attack,
            round: self.tracker.count,
        });
    }

    /// Run a queued chain: nearest unchosen living enemy within range.
    pub fn run_chain<H: Host>(&mut self, ctx: &mut SimContext<H>, player: &Entity, enemies: &[Entity]) -> bool {
        let Some(target) = select_nearest(player.position, enemies, self.tracker.excluded()) else {
            log::debug!("chain dropped: no target left");
            ctx.emit(GameEvent::ChainDropped {
                reason: ChainDropReason::NoTarget,
            });
            return false;
        };

        let distance = player.position.distance(target.position);
        if distance > self.config.chain_range {
            log::debug!("chain dropped: nearest target {:.0} away", distance);
            ctx.emit(GameEvent::ChainDropped {
                reason: ChainDropReason::OutOfRange,
            });
            return false;
        }

        let key = target.key().to_string();
        let position = target.position;
        self.tracker.exclude(&key);
        self.dispatch(ctx, player, enemies, position, true);
        true
    }

    /// Move the wielder onto a defeated target.
    pub fn pull_wielder<H: Host>(&self, ctx: &mut SimContext<H>, player: &mut Entity, to: Vector2) {
        player.position = to;
        if let Some(handle) = player.handle {
            ctx.host.set_position(handle, to);
        }
        ctx.emit(GameEvent::WielderPulled { to });
    }

    /// End of the post-action window.
    pub fn settle(&self, player: &mut Entity) {
        player.set_state(EntityState::Idle);
    }
}
