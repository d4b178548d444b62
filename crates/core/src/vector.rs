//! Two-dimensional vector value type.
//!
//! [`Vector`] is a plain `Copy` value. Non-mutating arithmetic goes through
//! the `+`, `-` and `*` operators plus the `normalized`/`capped` methods;
//! the in-place forms (`+=`, `-=`, `*=`, `normalize`, `cap`) are what the
//! trajectory stepping loop uses.
//!
//! Besides its components every vector carries a *true magnitude*: the
//! length recorded right after a field evaluation. In-place operations never
//! touch it, so a vector that has been normalized or capped for display
//! still remembers how strong the field really was at that point.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 2D vector with a separately tracked true magnitude.
///
/// Equality compares components only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    true_mag: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector {
        x: 0.0,
        y: 0.0,
        true_mag: 0.0,
    };

    /// Creates a vector whose true magnitude is its current length.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            true_mag: x.hypot(y),
        }
    }

    /// Euclidean length of the current components.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Length recorded by the last [`Vector::record_true_magnitude`] (or at
    /// construction).
    pub fn true_magnitude(&self) -> f64 {
        self.true_mag
    }

    /// Snapshots the current length as the true magnitude.
    pub fn record_true_magnitude(&mut self) {
        self.true_mag = self.magnitude();
    }

    /// Scales to unit length in place. The zero vector stays zero.
    pub fn normalize(&mut self) {
        let mag = self.magnitude();
        if mag == 0.0 {
            self.x = 0.0;
            self.y = 0.0;
            return;
        }
        self.x /= mag;
        self.y /= mag;
    }

    /// Returns a fresh unit vector in the same direction, or zero.
    pub fn normalized(&self) -> Vector {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Vector::ZERO;
        }
        Vector::new(self.x / mag, self.y / mag)
    }

    /// Clamps the length to `max_mag` in place, leaving shorter vectors alone.
    pub fn cap(&mut self, max_mag: f64) {
        if self.magnitude() > max_mag {
            self.normalize();
            *self *= max_mag;
        }
    }

    /// Copy of `self` clamped to `max_mag`. The true magnitude is carried over.
    pub fn capped(&self, max_mag: f64) -> Vector {
        let mut res = *self;
        res.cap(max_mag);
        res
    }

    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise product.
    pub fn mul_elementwise(&self, other: Vector) -> Vector {
        Vector::new(self.x * other.x, self.y * other.y)
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: Vector) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Inclusive containment test against the rectangle at `(rx, ry)` with
    /// size `rw × rh`. NaN components are never inside.
    pub fn within_rect(&self, rx: f64, ry: f64, rw: f64, rh: f64) -> bool {
        self.x >= rx && self.x <= rx + rw && self.y >= ry && self.y <= ry + rh
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Vector {
    fn default() -> Self {
        Vector::ZERO
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, s: f64) -> Vector {
        Vector::new(self.x * s, self.y * s)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f64> for Vector {
    fn mul_assign(&mut self, s: f64) {
        self.x *= s;
        self.y *= s;
    }
}

impl From<[f64; 2]> for Vector {
    fn from([x, y]: [f64; 2]) -> Self {
        Vector::new(x, y)
    }
}

impl From<Vector> for [f64; 2] {
    fn from(v: Vector) -> Self {
        [v.x, v.y]
    }
}

impl From<DVec2> for Vector {
    fn from(v: DVec2) -> Self {
        Vector::new(v.x, v.y)
    }
}

impl From<Vector> for DVec2 {
    fn from(v: Vector) -> Self {
        DVec2::new(v.x, v.y)
    }
}
