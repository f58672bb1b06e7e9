//! Rotated coordinate frames.
//!
//! Every element owns a local (unrotated) frame; world space applies the element's rotation
//! about its rect center. `Space` is the pure transform between the two. The zero-angle case is
//! an exact no-op: no trig runs and the input point is returned bit-identical, which keeps
//! unrotated documents on the fast path everywhere rotation awareness is threaded through.

use crate::geom::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Space {
    center: Point,
    angle: f64,
    sin: f64,
    cos: f64,
}

impl Space {
    pub fn new(center: Point, angle: f64) -> Self {
        let (sin, cos) = if angle == 0.0 {
            (0.0, 1.0)
        } else {
            angle.sin_cos()
        };
        Self {
            center,
            angle,
            sin,
            cos,
        }
    }

    pub fn for_rect(rect: &Rect, rotation: f64) -> Self {
        Self::new(rect.center(), rotation)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Local point to world space.
    pub fn to_world(&self, p: Point) -> Point {
        if self.angle == 0.0 {
            return p;
        }
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        Point {
            x: self.center.x + dx * self.cos - dy * self.sin,
            y: self.center.y + dx * self.sin + dy * self.cos,
        }
    }

    /// World point back to the local frame.
    pub fn from_world(&self, p: Point) -> Point {
        if self.angle == 0.0 {
            return p;
        }
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        Point {
            x: self.center.x + dx * self.cos + dy * self.sin,
            y: self.center.y - dx * self.sin + dy * self.cos,
        }
    }

    /// Vector-only rotation into world space (no translation).
    pub fn rotate(&self, v: Point) -> Point {
        if self.angle == 0.0 {
            return v;
        }
        Point {
            x: v.x * self.cos - v.y * self.sin,
            y: v.x * self.sin + v.y * self.cos,
        }
    }

    /// Vector-only rotation back into the local frame.
    pub fn unrotate(&self, v: Point) -> Point {
        if self.angle == 0.0 {
            return v;
        }
        Point {
            x: v.x * self.cos + v.y * self.sin,
            y: -v.x * self.sin + v.y * self.cos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    fn close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn zero_angle_is_identity() {
        let s = Space::new(point(10.0, 10.0), 0.0);
        let p = point(3.5, -7.25);
        assert_eq!(s.to_world(p), p);
        assert_eq!(s.from_world(p), p);
        assert_eq!(s.rotate(p), p);
    }

    #[test]
    fn quarter_turn_about_center() {
        let s = Space::new(point(0.0, 0.0), std::f64::consts::FRAC_PI_2);
        close(s.to_world(point(1.0, 0.0)), point(0.0, 1.0));
        close(s.from_world(point(0.0, 1.0)), point(1.0, 0.0));
    }

    #[test]
    fn world_round_trip_preserves_points() {
        let s = Space::new(point(4.0, -2.0), 0.7331);
        let p = point(13.0, 5.0);
        close(s.from_world(s.to_world(p)), p);
        close(s.unrotate(s.rotate(p)), p);
    }
}
