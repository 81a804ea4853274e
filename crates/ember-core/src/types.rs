//! Spatial and common types

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_array(arr: [f32; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }

    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Angle of this vector in radians, measured from the +X axis
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Unit vector pointing at `angle` radians from the +X axis
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// This vector rotated 90 degrees counter-clockwise
    pub fn rotated_90(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// RGBA color with components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_array(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for Color {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a + other.a,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Self) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
        self.a += other.a;
    }
}

impl Mul<f32> for Color {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            r: self.r * scalar,
            g: self.g * scalar,
            b: self.b * scalar,
            a: self.a * scalar,
        }
    }
}

/// Axis-aligned bounding rectangle accumulated from points.
///
/// A cleared rect is empty: the first encapsulated point initializes the
/// bounds, later points grow them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
    empty: bool,
}

impl Default for Rect {
    fn default() -> Self {
        Self::new()
    }
}

impl Rect {
    pub fn new() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        self.min = Vec2::ZERO;
        self.max = Vec2::ZERO;
        self.empty = true;
    }

    /// Grow the rect to contain `point`
    pub fn encapsulate(&mut self, point: Vec2) {
        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
        } else {
            self.min.x = self.min.x.min(point.x);
            self.min.y = self.min.y.min(point.y);
            self.max.x = self.max.x.max(point.x);
            self.max.y = self.max.y.max(point.y);
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        !self.empty
            && point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);

        let sum = v1 + v2;
        assert_eq!(sum, Vec2::new(4.0, 6.0));

        let diff = v2 - v1;
        assert_eq!(diff, Vec2::new(2.0, 2.0));

        let scaled = v1 * 2.0;
        assert_eq!(scaled, Vec2::new(2.0, 4.0));

        assert!((v1.dot(&v2) - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_normalized_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_angle() {
        assert!((Vec2::new(1.0, 0.0).angle()).abs() < 1e-6);
        assert!((Vec2::new(0.0, 1.0).angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let v = Vec2::from_angle(0.7);
        assert!((v.angle() - 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_vec2_rotated_90() {
        let v = Vec2::new(1.0, 0.0).rotated_90();
        assert!((v.x).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
        // Rotation preserves length and is perpendicular
        let w = Vec2::new(2.0, 3.0);
        assert!((w.rotated_90().dot(&w)).abs() < 1e-6);
    }

    #[test]
    fn test_color_arithmetic() {
        let c = Color::new(0.2, 0.4, 0.6, 0.8);
        let d = c + Color::new(0.1, 0.1, 0.1, 0.1) * 2.0;
        assert!((d.r - 0.4).abs() < 1e-6);
        assert!((d.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_encapsulate() {
        let mut r = Rect::new();
        assert!(r.is_empty());

        r.encapsulate(Vec2::new(1.0, 2.0));
        assert!(!r.is_empty());
        assert_eq!(r.min, Vec2::new(1.0, 2.0));
        assert_eq!(r.max, Vec2::new(1.0, 2.0));

        r.encapsulate(Vec2::new(-1.0, 5.0));
        assert_eq!(r.min, Vec2::new(-1.0, 2.0));
        assert_eq!(r.max, Vec2::new(1.0, 5.0));
        assert!((r.width() - 2.0).abs() < 1e-6);
        assert!((r.height() - 3.0).abs() < 1e-6);

        assert!(r.contains(Vec2::new(0.0, 3.0)));
        assert!(!r.contains(Vec2::new(2.0, 3.0)));

        r.clear();
        assert!(r.is_empty());
        assert!(!r.contains(Vec2::ZERO));
    }
}
