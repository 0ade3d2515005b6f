//! Page-space geometry. The origin sits at the bottom-left corner of a page
//! and `y` grows upwards, so `top()` is always `y + height`.
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing layout coordinates.
pub const EPS: f32 = 1e-4;

/// Stand-in for an unbounded extent, e.g. the height of an area used to
/// measure content before rotating it.
pub const INF: f32 = 1e6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn move_right(&mut self, dx: f32) -> &mut Self {
        self.x += dx;
        self
    }

    pub fn move_up(&mut self, dy: f32) -> &mut Self {
        self.y += dy;
        self
    }

    pub fn move_down(&mut self, dy: f32) -> &mut Self {
        self.y -= dy;
        self
    }

    /// Shrinks the rectangle by the given side values, or grows it back
    /// outwards when `reverse` is set.
    pub fn apply_margins(
        &self,
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
        reverse: bool,
    ) -> Rect {
        let sign = if reverse { -1.0 } else { 1.0 };
        Rect {
            x: self.x + left * sign,
            y: self.y + bottom * sign,
            width: self.width - (left + right) * sign,
            height: self.height - (top + bottom) * sign,
        }
    }

    /// The smallest rectangle enclosing both `a` and `b`.
    pub fn common_rectangle(a: &Rect, b: &Rect) -> Rect {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let right = a.right().max(b.right());
        let top = a.top().max(b.top());
        Rect::new(x, y, right - x, top - y)
    }

    /// Corners in counter-clockwise order starting at the bottom-left.
    pub fn to_points(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.top()),
            Point::new(self.x, self.top()),
        ]
    }

    /// Bounding box of a set of points.
    pub fn from_points(points: &[Point]) -> Rect {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if points.is_empty() {
            return Rect::default();
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// A 2D affine transform using the PDF matrix convention:
/// `(x, y) -> (a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::identity()
        }
    }

    /// Counter-clockwise rotation around the origin, angle in radians.
    pub fn rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Returns the transform that applies `self` first and `next` afterwards.
    pub fn then(&self, next: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let points = rect.to_points().map(|p| self.transform_point(p));
        Rect::from_points(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_margins_round_trip() {
        let rect = Rect::new(36.0, 36.0, 523.28, 769.89);
        let inner = rect.apply_margins(10.0, 5.5, 3.25, 7.0, false);
        assert!((inner.x - 43.0).abs() < EPS);
        assert!((inner.width - 510.78).abs() < 1e-3);
        let restored = inner.apply_margins(10.0, 5.5, 3.25, 7.0, true);
        assert!((restored.x - rect.x).abs() < EPS);
        assert!((restored.y - rect.y).abs() < EPS);
        assert!((restored.width - rect.width).abs() < 1e-3);
        assert!((restored.height - rect.height).abs() < 1e-3);
    }

    #[test]
    fn test_common_rectangle() {
        let a = Rect::new(0.0, 10.0, 50.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 5.0);
        let c = Rect::common_rectangle(&a, &b);
        assert_eq!(c, Rect::new(0.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn test_quarter_turn_swaps_extents() {
        let rect = Rect::new(0.0, 0.0, 40.0, 10.0);
        let rotated = AffineTransform::rotation(std::f32::consts::FRAC_PI_2).transform_rect(&rect);
        assert!((rotated.width - 10.0).abs() < 1e-3);
        assert!((rotated.height - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_then_applies_in_order() {
        let t = AffineTransform::rotation(std::f32::consts::FRAC_PI_2)
            .then(&AffineTransform::translation(5.0, 0.0));
        let p = t.transform_point(Point::new(1.0, 0.0));
        assert!((p.x - 5.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }
}
