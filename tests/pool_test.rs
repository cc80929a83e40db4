//! Integration test: Actor pool
//!
//! Returned actors are deactivated and the same handles come back on the
//! next request for their template.

use doomseal::core::geometry::Vector2;
use doomseal::entities::EnemyKind;
use doomseal::equipment::EquipmentKind;
use doomseal::host::{ActorTemplate, BodyShape, CollisionGroup, HeadlessHost, Physics};
use doomseal::pool::ActorPool;

// =============================================================================
// Reuse Tests
// =============================================================================

#[test]
fn test_pushed_actor_is_reused_by_identity() {
    let mut host = HeadlessHost::new();
    let mut pool = ActorPool::new();
    let template = ActorTemplate::Strike(EquipmentKind::Fan);

    let first = pool.acquire(&mut host, template, Vector2::ZERO);
    pool.push(&mut host, template, first);
    let again = pool.acquire(&mut host, template, Vector2::new(5.0, 5.0));

    assert_eq!(first, again);
    assert_eq!(host.spawn_count(), 1);
    assert_eq!(host.position(again), Some(Vector2::new(5.0, 5.0)));
    assert!(host.is_visible(again));
    assert_eq!(host.alpha(again), Some(1.0));
}

#[test]
fn test_templates_do_not_share_parked_actors() {
    let mut host = HeadlessHost::new();
    let mut pool = ActorPool::new();
    let strike = ActorTemplate::Strike(EquipmentKind::Dagger);
    let enemy = ActorTemplate::Enemy(EnemyKind::Servant);

    let handle = pool.acquire(&mut host, strike, Vector2::ZERO);
    pool.push(&mut host, strike, handle);

    assert!(pool.retrieve(&mut host, enemy, Vector2::ZERO).is_none());
    assert_eq!(pool.available(strike), 1);
    assert_eq!(pool.available(enemy), 0);
}

#[test]
fn test_push_deactivates_actor() {
    let mut host = HeadlessHost::new();
    let mut pool = ActorPool::new();
    let template = ActorTemplate::ExpDrop;

    let handle = pool.acquire(&mut host, template, Vector2::ZERO);
    host.attach_body(handle, BodyShape::circle(10.0));
    host.set_collision_group(handle, CollisionGroup::Drop);
    host.apply_impulse(handle, Vector2::new(1.0, 0.0), 50.0);

    pool.push(&mut host, template, handle);
    assert!(!host.is_visible(handle));
    assert!(!host.has_body(handle));
    assert_eq!(host.velocity(handle), Some(Vector2::ZERO));
    assert!(pool.contains(template, handle));
}

#[test]
fn test_stats_track_created_and_reused() {
    let mut host = HeadlessHost::new();
    let mut pool = ActorPool::new();
    let template = ActorTemplate::Strike(EquipmentKind::Dart);

    let a = pool.acquire(&mut host, template, Vector2::ZERO);
    let b = pool.acquire(&mut host, template, Vector2::ZERO);
    pool.push(&mut host, template, a);
    pool.push(&mut host, template, b);
    pool.acquire(&mut host, template, Vector2::ZERO);

    let stats = pool.stats();
    assert_eq!(stats.created, 2);
    assert_eq!(stats.reused, 1);
    assert_eq!(stats.returned, 2);
}
