//! Plain 2D math shared by every system: vectors, bounds, weighted draws,
//! and annulus sampling for spawn placement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `degrees`, measured clockwise from +x in screen space.
    pub fn from_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(radians.cos(), radians.sin())
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the unit vector, or zero for a zero-length input.
    pub fn normalized(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= f64::EPSILON {
            return Self::ZERO;
        }
        Self::new(self.x / magnitude, self.y / magnitude)
    }

    pub fn scaled(&self, value: f64) -> Self {
        Self::new(self.x * value, self.y * value)
    }

    pub fn distance(&self, other: Vector2) -> f64 {
        (*self - other).magnitude()
    }

    pub fn direction_to(&self, target: Vector2) -> Self {
        (target - *self).normalized()
    }

    /// Angle of this vector in degrees, in (-180, 180].
    pub fn angle_degrees(&self) -> f64 {
        self.y.atan2(self.x) * 180.0 / PI
    }

    /// Left-hand perpendicular of the normalized vector.
    pub fn left_normal(&self) -> Self {
        let unit = self.normalized();
        Self::new(unit.y, -unit.x)
    }

    /// Right-hand perpendicular of the normalized vector.
    pub fn right_normal(&self) -> Self {
        let unit = self.normalized();
        Self::new(-unit.y, unit.x)
    }

    /// Moves `self` toward `target` by at most `step`, never overshooting.
    pub fn step_toward(&self, target: Vector2, step: f64) -> Self {
        let offset = target - *self;
        let distance = offset.magnitude();
        if distance <= step {
            return target;
        }
        *self + offset.normalized().scaled(step)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scaled(rhs)
    }
}

/// Axis-aligned rectangle stored as min-x, min-y, max-x, max-y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn around(point: Vector2) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Smallest bounds enclosing every point; `None` for an empty slice.
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::around(*first);
        for point in rest {
            bounds.push(*point);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: Vector2, inclusive: bool) -> bool {
        if inclusive {
            point.x >= self.min_x
                && point.x <= self.max_x
                && point.y >= self.min_y
                && point.y <= self.max_y
        } else {
            point.x > self.min_x && point.x < self.max_x && point.y > self.min_y && point.y < self.max_y
        }
    }

    /// Grows the bounds so that `point` lies inside.
    pub fn push(&mut self, point: Vector2) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn expand(&self, value: f64) -> Self {
        Self::new(
            self.min_x - value,
            self.min_y - value,
            self.max_x + value,
            self.max_y + value,
        )
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Weighted random index over non-negative weights.
///
/// Negative weights count as zero. When every weight is zero the draw falls
/// back to a uniform pick over all indices. Returns `None` for an empty slice.
pub fn rand_weighted(weights: &[f64], rng: &mut impl Rng) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(rng.gen_range(0..weights.len()));
    }

    let roll = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    let mut last_positive = 0;
    for (index, weight) in weights.iter().enumerate() {
        let weight = weight.max(0.0);
        if weight <= 0.0 {
            continue;
        }
        acc += weight;
        last_positive = index;
        if roll < acc {
            return Some(index);
        }
    }

    // Float rounding can leave roll == total; land on the last drawable entry.
    Some(last_positive)
}

/// Uniform point inside the annulus between `inner` and `outer` around `center`.
pub fn rand_within_donut(center: Vector2, inner: f64, outer: f64, rng: &mut impl Rng) -> Vector2 {
    let (inner, outer) = if inner <= outer {
        (inner.max(0.0), outer.max(0.0))
    } else {
        (outer.max(0.0), inner.max(0.0))
    };

    let angle = rng.gen_range(0.0..(2.0 * PI));
    // Area-uniform radius: sqrt of a uniform draw between the squared radii.
    let radius = if outer - inner <= f64::EPSILON {
        inner
    } else {
        rng.gen_range((inner * inner)..(outer * outer)).sqrt()
    };

    Vector2::new(
        center.x + angle.cos() * radius,
        center.y + angle.sin() * radius,
    )
}
