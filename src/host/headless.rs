//! In-memory host for tests and the balance simulator.
//!
//! Bodies are circles integrated with constant velocity. A contact is reported
//! once when two bodies of interacting groups begin to overlap.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{ActorHandle, ActorTemplate, BodyShape, CollisionGroup, Contact, Effect, Physics, Renderer};
use crate::core::geometry::Vector2;

#[derive(Debug, Clone)]
struct Body {
    template: ActorTemplate,
    position: Vector2,
    velocity: Vector2,
    shape: Option<BodyShape>,
    group: Option<CollisionGroup>,
    visible: bool,
    alpha: f64,
    /// Anchor and offset from it.
    tether: Option<(ActorHandle, Vector2)>,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_handle: u64,
    bodies: BTreeMap<ActorHandle, Body>,
    touching: HashSet<(ActorHandle, ActorHandle)>,
    pending: Vec<Contact>,
    effects: Vec<(ActorHandle, Effect)>,
    impulses: Vec<(ActorHandle, Vector2, f64)>,
    spawned: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actors created through `spawn_actor` over the host's lifetime.
    pub fn spawn_count(&self) -> usize {
        self.spawned
    }

    pub fn actor_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn effects(&self) -> &[(ActorHandle, Effect)] {
        &self.effects
    }

    pub fn impulses(&self) -> &[(ActorHandle, Vector2, f64)] {
        &self.impulses
    }

    /// Forget recorded effects and impulses. Long runs call this every frame.
    pub fn clear_log(&mut self) {
        self.effects.clear();
        self.impulses.clear();
    }

    pub fn template(&self, handle: ActorHandle) -> Option<ActorTemplate> {
        self.bodies.get(&handle).map(|b| b.template)
    }

    pub fn is_visible(&self, handle: ActorHandle) -> bool {
        self.bodies.get(&handle).is_some_and(|b| b.visible)
    }

    pub fn alpha(&self, handle: ActorHandle) -> Option<f64> {
        self.bodies.get(&handle).map(|b| b.alpha)
    }

    pub fn has_body(&self, handle: ActorHandle) -> bool {
        self.bodies.get(&handle).is_some_and(|b| b.shape.is_some())
    }

    pub fn velocity(&self, handle: ActorHandle) -> Option<Vector2> {
        self.bodies.get(&handle).map(|b| b.velocity)
    }

    /// Queue a contact directly, bypassing the overlap test.
    pub fn inject_contact(&mut self, first: ActorHandle, second: ActorHandle) {
        self.pending.push(Contact { first, second });
    }

    fn forget_contacts_of(&mut self, handle: ActorHandle) {
        self.touching.retain(|(a, b)| *a != handle && *b != handle);
    }

    fn detect_contacts(&mut self) {
        let active: Vec<(ActorHandle, Vector2, f64, CollisionGroup)> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.visible)
            .filter_map(|(handle, body)| {
                let shape = body.shape?;
                let group = body.group?;
                Some((*handle, body.position, shape.radius(), group))
            })
            .collect();

        let mut now_touching = HashSet::new();
        for (i, (a, pos_a, radius_a, group_a)) in active.iter().enumerate() {
            for (b, pos_b, radius_b, group_b) in &active[i + 1..] {
                if !group_a.interacts_with(*group_b) {
                    continue;
                }
                if pos_a.distance(*pos_b) > radius_a + radius_b {
                    continue;
                }
                let pair = (*a, *b);
                if !self.touching.contains(&pair) {
                    self.pending.push(Contact {
                        first: *a,
                        second: *b,
                    });
                }
                now_touching.insert(pair);
            }
        }
        self.touching = now_touching;
    }
}

impl Renderer for HeadlessHost {
    fn spawn_actor(&mut self, template: ActorTemplate, position: Vector2) -> ActorHandle {
        let handle = ActorHandle(self.next_handle);
        self.next_handle += 1;
        self.spawned += 1;
        self.bodies.insert(
            handle,
            Body {
                template,
                position,
                velocity: Vector2::ZERO,
                shape: None,
                group: None,
                visible: true,
                alpha: 1.0,
                tether: None,
            },
        );
        log::trace!("spawned {} as {:?}", template.key(), handle);
        handle
    }

    fn play_effect(&mut self, handle: ActorHandle, effect: Effect) {
        self.effects.push((handle, effect));
    }

    fn destroy(&mut self, handle: ActorHandle) {
        self.bodies.remove(&handle);
        self.forget_contacts_of(handle);
    }

    fn set_position(&mut self, handle: ActorHandle, position: Vector2) {
        let anchor_position = self
            .bodies
            .get(&handle)
            .and_then(|b| b.tether)
            .and_then(|(anchor, _)| self.bodies.get(&anchor))
            .map(|anchor| anchor.position);

        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
            if let (Some((anchor, _)), Some(anchor_position)) = (body.tether, anchor_position) {
                body.tether = Some((anchor, position - anchor_position));
            }
        }
    }

    fn set_alpha(&mut self, handle: ActorHandle, alpha: f64) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_visible(&mut self, handle: ActorHandle, visible: bool) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.visible = visible;
        }
        if !visible {
            self.forget_contacts_of(handle);
        }
    }
}

impl Physics for HeadlessHost {
    fn attach_body(&mut self, handle: ActorHandle, shape: BodyShape) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.shape = Some(shape);
        }
    }

    fn detach_body(&mut self, handle: ActorHandle) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.shape = None;
            body.group = None;
            body.velocity = Vector2::ZERO;
        }
        self.forget_contacts_of(handle);
    }

    fn set_collision_group(&mut self, handle: ActorHandle, group: CollisionGroup) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.group = Some(group);
        }
    }

    fn apply_impulse(&mut self, handle: ActorHandle, direction: Vector2, magnitude: f64) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = direction.normalized().scaled(magnitude);
            self.impulses.push((handle, direction, magnitude));
        }
    }

    fn halt(&mut self, handle: ActorHandle) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = Vector2::ZERO;
        }
    }

    fn tether(&mut self, handle: ActorHandle, anchor: ActorHandle) {
        let Some(anchor_position) = self.bodies.get(&anchor).map(|b| b.position) else {
            return;
        };
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.tether = Some((anchor, body.position - anchor_position));
        }
    }

    fn untether(&mut self, handle: ActorHandle) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.tether = None;
        }
    }

    fn position(&self, handle: ActorHandle) -> Option<Vector2> {
        self.bodies.get(&handle).map(|b| b.position)
    }

    fn step(&mut self, dt: f64) {
        for body in self.bodies.values_mut().filter(|b| b.tether.is_none()) {
            body.position = body.position + body.velocity.scaled(dt);
        }

        let anchors: HashMap<ActorHandle, Vector2> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.tether.is_none())
            .map(|(handle, b)| (*handle, b.position))
            .collect();

        for body in self.bodies.values_mut() {
            let Some((anchor, offset)) = body.tether else {
                continue;
            };
            let offset = offset + body.velocity.scaled(dt);
            match anchors.get(&anchor) {
                Some(anchor_position) => {
                    body.tether = Some((anchor, offset));
                    body.position = *anchor_position + offset;
                }
                None => {
                    body.tether = None;
                    body.position = body.position + body.velocity.scaled(dt);
                }
            }
        }

        self.detect_contacts();
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.pending)
    }
}
