//! Contracts with the render and physics collaborators.
//!
//! The simulation never inspects visual state. It asks the host to spawn,
//! move and hide actors, and polls it for contacts once per tick.

pub mod headless;

pub use headless::HeadlessHost;

use crate::core::geometry::Vector2;
use crate::entities::EnemyKind;
use crate::equipment::EquipmentKind;

/// Opaque identity of a host-side actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

/// Template an actor is spawned from. Pooled actors are matched on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorTemplate {
    Player,
    Enemy(EnemyKind),
    Strike(EquipmentKind),
    ExpDrop,
}

impl ActorTemplate {
    pub fn key(&self) -> &'static str {
        match self {
            ActorTemplate::Player => "bandit",
            ActorTemplate::Enemy(kind) => kind.sprite_key(),
            ActorTemplate::Strike(kind) => kind.key(),
            ActorTemplate::ExpDrop => "exp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionGroup {
    Player,
    Enemy,
    Attack,
    Drop,
}

impl CollisionGroup {
    /// Whether bodies in these two groups report contacts with each other.
    pub fn interacts_with(&self, other: CollisionGroup) -> bool {
        matches!(
            (self, other),
            (CollisionGroup::Attack, CollisionGroup::Enemy)
                | (CollisionGroup::Enemy, CollisionGroup::Attack)
                | (CollisionGroup::Drop, CollisionGroup::Player)
                | (CollisionGroup::Player, CollisionGroup::Drop)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle { radius: f64 },
}

impl BodyShape {
    pub fn circle(radius: f64) -> Self {
        BodyShape::Circle { radius }
    }

    pub fn radius(&self) -> f64 {
        match self {
            BodyShape::Circle { radius } => *radius,
        }
    }
}

/// Named one-shot effects the simulation asks the renderer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Hit,
    Defeated,
    LevelUp,
    Collected,
}

/// Two bodies started touching. Order carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub first: ActorHandle,
    pub second: ActorHandle,
}

impl Contact {
    pub fn involves(&self, handle: ActorHandle) -> bool {
        self.first == handle || self.second == handle
    }
}

pub trait Renderer {
    fn spawn_actor(&mut self, template: ActorTemplate, position: Vector2) -> ActorHandle;
    /// Completion is reported by the caller's own scheduled follow-up.
    fn play_effect(&mut self, handle: ActorHandle, effect: Effect);
    fn destroy(&mut self, handle: ActorHandle);
    fn set_position(&mut self, handle: ActorHandle, position: Vector2);
    fn set_alpha(&mut self, handle: ActorHandle, alpha: f64);
    fn set_visible(&mut self, handle: ActorHandle, visible: bool);
}

pub trait Physics {
    fn attach_body(&mut self, handle: ActorHandle, shape: BodyShape);
    fn detach_body(&mut self, handle: ActorHandle);
    fn set_collision_group(&mut self, handle: ActorHandle, group: CollisionGroup);
    /// Set velocity to `direction * magnitude`, in world units per second.
    fn apply_impulse(&mut self, handle: ActorHandle, direction: Vector2, magnitude: f64);
    fn halt(&mut self, handle: ActorHandle);
    /// Make `handle` move relative to `anchor` from now on.
    fn tether(&mut self, handle: ActorHandle, anchor: ActorHandle);
    fn untether(&mut self, handle: ActorHandle);
    fn position(&self, handle: ActorHandle) -> Option<Vector2>;
    fn step(&mut self, dt: f64);
    /// Contacts that began since the last call.
    fn drain_contacts(&mut self) -> Vec<Contact>;
}

/// Everything a session needs from its environment.
pub trait Host: Renderer + Physics {}

impl<T: Renderer + Physics> Host for T {}
