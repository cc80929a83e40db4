//! Shared simulation context handed by reference to every component that
//! touches the host, the actor pool, the deferred-task queue or the event log.

use crate::core::geometry::Vector2;
use crate::core::scheduler::{Scheduler, TaskToken};
use crate::equipment::{AttackId, AttackInfo, StrikeSpec};
use crate::host::{ActorHandle, Host};
use crate::pool::ActorPool;

use super::events::GameEvent;

/// Follow-up work scheduled on simulated time.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    // ── Gameplay: dropped once the session is no longer active ──
    /// Retarget to the nearest unchosen enemy and dispatch a chained round.
    Chain { attack: AttackId },
    /// Snap the wielder onto a defeated target.
    PullWielder { to: Vector2 },
    /// A staggered strike waiting for its launch time.
    FireStrike {
        info: AttackInfo,
        strike: StrikeSpec,
        aim: Vector2,
        chained: bool,
    },

    // ── Housekeeping: waits out a pause, dropped when the run ends ──
    /// End of the post-action window; the wielder may act again.
    Settle,
    RetireStrike {
        handle: ActorHandle,
        attack: AttackId,
    },
    /// Death effect finished; return the enemy actor to the pool.
    RecycleEnemy { handle: ActorHandle },
    WorldTick,
}

impl Deferred {
    pub fn is_gameplay(&self) -> bool {
        matches!(
            self,
            Deferred::Chain { .. } | Deferred::PullWielder { .. } | Deferred::FireStrike { .. }
        )
    }
}

pub struct SimContext<H> {
    pub host: H,
    pub pool: ActorPool,
    pub scheduler: Scheduler<Deferred>,
    pub events: Vec<GameEvent>,
    clock_seconds: f64,
    now_ms: u64,
}

impl<H: Host> SimContext<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            pool: ActorPool::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            clock_seconds: 0.0,
            now_ms: 0,
        }
    }

    /// Simulated milliseconds since the session started.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn advance_clock(&mut self, dt: f64) {
        self.clock_seconds += dt.max(0.0);
        self.now_ms = (self.clock_seconds * 1000.0).round() as u64;
    }

    pub fn schedule(&mut self, delay_ms: u64, task: Deferred) -> TaskToken {
        self.scheduler.schedule(self.now_ms, delay_ms, task)
    }

    pub fn pop_due(&mut self) -> Option<Deferred> {
        self.scheduler.pop_due(self.now_ms).map(|(_, task)| task)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
