use crate::core::geometry::Vector2;
use crate::host::ActorHandle;

/// Experience left behind by a defeated enemy.
///
/// Sits still until the player touches it, then homes in and is absorbed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpDrop {
    pub handle: ActorHandle,
    pub position: Vector2,
    pub collected: bool,
}

impl ExpDrop {
    pub fn new(handle: ActorHandle, position: Vector2) -> Self {
        Self {
            handle,
            position,
            collected: false,
        }
    }

    /// Move toward `target` for `dt` seconds if collected. Returns true once
    /// within `absorb_distance` of it.
    pub fn home(&mut self, target: Vector2, speed: f64, dt: f64, absorb_distance: f64) -> bool {
        if !self.collected {
            return false;
        }
        self.position = self.position.step_toward(target, speed * dt);
        self.position.distance(target) <= absorb_distance
    }
}
