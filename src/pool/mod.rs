//! Recycling cache for transient actors (strikes, enemies, experience drops).
//!
//! A pushed actor is hidden and detached from physics, then handed back out
//! on the next request for the same template instead of spawning a new one.

use std::collections::HashMap;

use crate::core::geometry::Vector2;
use crate::host::{ActorHandle, ActorTemplate, Host};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub created: usize,
    pub reused: usize,
    pub returned: usize,
}

#[derive(Debug, Default)]
pub struct ActorPool {
    cache: HashMap<&'static str, Vec<ActorHandle>>,
    stats: PoolStats,
}

impl ActorPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Number of parked actors for `template`.
    pub fn available(&self, template: ActorTemplate) -> usize {
        self.cache.get(template.key()).map_or(0, Vec::len)
    }

    pub fn contains(&self, template: ActorTemplate, handle: ActorHandle) -> bool {
        self.cache
            .get(template.key())
            .is_some_and(|parked| parked.contains(&handle))
    }

    /// Deactivate `handle` and park it under `template`.
    pub fn push<H: Host>(&mut self, host: &mut H, template: ActorTemplate, handle: ActorHandle) {
        let parked = self.cache.entry(template.key()).or_default();
        if parked.contains(&handle) {
            return;
        }
        host.untether(handle);
        host.detach_body(handle);
        host.set_visible(handle, false);
        parked.push(handle);
        self.stats.returned += 1;
    }

    /// Reactivate a parked actor for `template`, if one exists. The caller
    /// attaches a body, since shape and group depend on the use.
    pub fn retrieve<H: Host>(
        &mut self,
        host: &mut H,
        template: ActorTemplate,
        position: Vector2,
    ) -> Option<ActorHandle> {
        let handle = self.cache.get_mut(template.key())?.pop()?;
        host.set_position(handle, position);
        host.set_alpha(handle, 1.0);
        host.set_visible(handle, true);
        self.stats.reused += 1;
        Some(handle)
    }

    /// Parked actor if available, otherwise a freshly spawned one.
    pub fn acquire<H: Host>(&mut self, host: &mut H, template: ActorTemplate, position: Vector2) -> ActorHandle {
        if let Some(handle) = self.retrieve(host, template, position) {
            return handle;
        }
        self.stats.created += 1;
        host.spawn_actor(template, position)
    }
}
