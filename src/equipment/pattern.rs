//! Strike geometry: turns one attack bundle into the individual strikes a
//! variant launches (origin, heading, launch delay).

use super::types::{AttackInfo, EquipmentKind};
use crate::core::geometry::Vector2;

/// Degrees between neighbouring fan strikes.
pub const FAN_SPREAD_DEGREES: f64 = 15.0;
/// Degrees between extra dagger thrusts granted by shot bonuses.
pub const DAGGER_SPREAD_DEGREES: f64 = 8.0;
/// Sideways reach of the first cleave pair.
pub const CLEAVE_FLANK_OFFSET: f64 = 100.0;
/// Rotation applied to cleave sprites relative to the aim.
pub const CLEAVE_ANGLE_OFFSET_DEGREES: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StrikeSpec {
    pub kind: EquipmentKind,
    pub origin: Vector2,
    pub direction: Vector2,
    pub angle_degrees: f64,
    pub flipped: bool,
    pub delay_ms: u64,
    /// Retarget to the enemy nearest the aim point when launched.
    pub homing: bool,
    /// Rides with the wielder until it lands on an enemy.
    pub tethered: bool,
}

impl StrikeSpec {
    fn immediate(kind: EquipmentKind, origin: Vector2, direction: Vector2) -> Self {
        Self {
            kind,
            origin,
            direction,
            angle_degrees: direction.angle_degrees(),
            flipped: false,
            delay_ms: 0,
            homing: false,
            tethered: false,
        }
    }
}

fn aim_direction(wielder: Vector2, target: Vector2) -> Vector2 {
    let direction = wielder.direction_to(target);
    if direction == Vector2::ZERO {
        Vector2::new(1.0, 0.0)
    } else {
        direction
    }
}

/// Offsets centred on zero: 3 strikes at 15° give -15, 0, +15.
fn spread_offsets(count: usize, spacing: f64) -> impl Iterator<Item = f64> {
    let center = (count as f64 - 1.0) / 2.0;
    (0..count).map(move |i| (i as f64 - center) * spacing)
}

/// Plan every strike `kind` launches for one dispatch.
pub fn plan_strikes(
    kind: EquipmentKind,
    info: &AttackInfo,
    wielder: Vector2,
    target: Vector2,
    stagger_ms: u64,
) -> Vec<StrikeSpec> {
    let count = info.strikes();
    let direction = aim_direction(wielder, target);
    let base_angle = direction.angle_degrees();

    match kind {
        EquipmentKind::Dagger => spread_offsets(count, DAGGER_SPREAD_DEGREES)
            .map(|offset| {
                let heading = Vector2::from_degrees(base_angle + offset);
                StrikeSpec {
                    tethered: true,
                    ..StrikeSpec::immediate(kind, wielder, heading)
                }
            })
            .collect(),

        EquipmentKind::Fan => spread_offsets(count, FAN_SPREAD_DEGREES)
            .map(|offset| {
                let heading = Vector2::from_degrees(base_angle + offset);
                StrikeSpec::immediate(kind, wielder, heading)
            })
            .collect(),

        EquipmentKind::Cleave => (0..count)
            .map(|i| {
                let flipped = i % 2 == 0;
                let sideways = if flipped {
                    direction.left_normal()
                } else {
                    direction.right_normal()
                };
                let space = 1.0 + (i / 2) as f64 * 0.5;
                let origin = wielder
                    - sideways.scaled(CLEAVE_FLANK_OFFSET * space)
                    - direction.scaled(CLEAVE_FLANK_OFFSET * (space - 1.0));
                let mut angle = base_angle - CLEAVE_ANGLE_OFFSET_DEGREES;
                if flipped {
                    angle += 90.0;
                }
                StrikeSpec {
                    angle_degrees: angle,
                    flipped,
                    ..StrikeSpec::immediate(kind, origin, direction)
                }
            })
            .collect(),

        EquipmentKind::Dart => (0..count)
            .map(|i| StrikeSpec {
                delay_ms: stagger_ms * i as u64,
                homing: true,
                ..StrikeSpec::immediate(kind, wielder, direction)
            })
            .collect(),
    }
}
