//! Closed parametric curves for the track animation.

use core::f32::consts::TAU;

/// A point on the track plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A direction vector on the track plane (not necessarily unit length).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f32,
    /// Vertical component.
    pub dy: f32,
}

impl Vector {
    /// Create a vector.
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Angle of the vector in degrees, normalized to `[0, 360)`.
    pub fn angle_deg(&self) -> f32 {
        normalize_deg(self.dy.atan2(self.dx).to_degrees())
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_deg(deg: f32) -> f32 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// A closed curve `C(t)` over `t ∈ [0, 1)` with its tangent.
///
/// Increasing `t` is the forward direction of travel. `tangent(t)` must
/// point along increasing `t`; its length is irrelevant.
pub trait Curve {
    /// Position at parameter `t`.
    fn point(&self, t: f32) -> Point;

    /// Tangent direction at parameter `t`.
    fn tangent(&self, t: f32) -> Vector;
}

/// Axis-aligned ellipse centered on the origin.
///
/// `t = 0` is the rightmost point; increasing `t` sweeps towards `+y`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipse {
    /// Horizontal semi-axis.
    pub radius_x: f32,
    /// Vertical semi-axis.
    pub radius_y: f32,
}

impl Ellipse {
    /// Create an ellipse.
    pub const fn new(radius_x: f32, radius_y: f32) -> Self {
        Self { radius_x, radius_y }
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new(1.0, 0.6)
    }
}

impl Curve for Ellipse {
    fn point(&self, t: f32) -> Point {
        let theta = t * TAU;
        Point::new(self.radius_x * theta.cos(), self.radius_y * theta.sin())
    }

    fn tangent(&self, t: f32) -> Vector {
        let theta = t * TAU;
        Vector::new(-self.radius_x * theta.sin(), self.radius_y * theta.cos())
    }
}

/// Stadium (two semicircles joined by straights), parameterized by arc
/// length.
///
/// Starting at the bottom of the right-hand semicircle, the curve runs
/// around the right arc, back along the `y = +radius` straight, around the
/// left arc, and home along the `y = -radius` straight.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stadium {
    /// Radius of each semicircle.
    pub radius: f32,
    /// Length of each straight.
    pub straight: f32,
}

impl Stadium {
    /// Create a stadium.
    pub const fn new(radius: f32, straight: f32) -> Self {
        Self { radius, straight }
    }

    fn arc_len(&self) -> f32 {
        core::f32::consts::PI * self.radius
    }

    /// Total length of the closed track.
    pub fn total_len(&self) -> f32 {
        2.0 * self.arc_len() + 2.0 * self.straight
    }

    /// Segment containing `t` and the distance already travelled into it.
    fn locate(&self, t: f32) -> (Segment, f32) {
        let arc = self.arc_len();
        let mut d = t.clamp(0.0, 1.0) * self.total_len();
        if d < arc {
            return (Segment::RightArc, d);
        }
        d -= arc;
        if d < self.straight {
            return (Segment::TopStraight, d);
        }
        d -= self.straight;
        if d < arc {
            return (Segment::LeftArc, d);
        }
        d -= arc;
        (Segment::BottomStraight, d)
    }
}

impl Default for Stadium {
    fn default() -> Self {
        Self::new(35.0, 50.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Segment {
    RightArc,
    TopStraight,
    LeftArc,
    BottomStraight,
}

impl Curve for Stadium {
    fn point(&self, t: f32) -> Point {
        use core::f32::consts::{FRAC_PI_2, PI};

        let half = self.straight / 2.0;
        let (segment, d) = self.locate(t);
        match segment {
            Segment::RightArc => {
                let a = -FRAC_PI_2 + PI * (d / self.arc_len());
                Point::new(half + self.radius * a.cos(), self.radius * a.sin())
            }
            Segment::TopStraight => Point::new(half - d, self.radius),
            Segment::LeftArc => {
                let a = FRAC_PI_2 + PI * (d / self.arc_len());
                Point::new(-half + self.radius * a.cos(), self.radius * a.sin())
            }
            Segment::BottomStraight => Point::new(-half + d, -self.radius),
        }
    }

    fn tangent(&self, t: f32) -> Vector {
        use core::f32::consts::{FRAC_PI_2, PI};

        let (segment, d) = self.locate(t);
        match segment {
            Segment::RightArc => {
                let a = -FRAC_PI_2 + PI * (d / self.arc_len());
                Vector::new(-a.sin(), a.cos())
            }
            Segment::TopStraight => Vector::new(-1.0, 0.0),
            Segment::LeftArc => {
                let a = FRAC_PI_2 + PI * (d / self.arc_len());
                Vector::new(-a.sin(), a.cos())
            }
            Segment::BottomStraight => Vector::new(1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn ellipse_cardinal_points() {
        let e = Ellipse::new(2.0, 1.0);
        let p = e.point(0.0);
        assert!(close(p.x, 2.0) && close(p.y, 0.0));
        let p = e.point(0.25);
        assert!(close(p.x, 0.0) && close(p.y, 1.0));
    }

    #[test]
    fn ellipse_tangent_is_not_radius_angle() {
        // At 45° of parameter the true tangent of a flattened ellipse
        // differs from the perpendicular of the radius vector.
        let e = Ellipse::new(2.0, 1.0);
        let t = 0.125;
        let p = e.point(t);
        let radius_perp = Vector::new(-p.y, p.x).angle_deg();
        let tangent = e.tangent(t).angle_deg();
        assert!((radius_perp - tangent).abs() > 5.0);
    }

    #[test]
    fn stadium_is_closed() {
        let s = Stadium::default();
        let start = s.point(0.0);
        let end = s.point(0.99999);
        assert!((start.x - end.x).abs() < 0.1);
        assert!((start.y - end.y).abs() < 0.1);
    }

    #[test]
    fn stadium_segments() {
        let s = Stadium::new(10.0, 20.0);
        // Start: bottom of the right arc
        let p = s.point(0.0);
        assert!(close(p.x, 10.0) && close(p.y, -10.0));
        // Tangent on the top straight points towards -x
        let arc = core::f32::consts::PI * 10.0;
        let t_top = (arc + 5.0) / s.total_len();
        assert_eq!(s.tangent(t_top), Vector::new(-1.0, 0.0));
        let p = s.point(t_top);
        assert!(close(p.x, 5.0) && close(p.y, 10.0));
    }

    #[test]
    fn stadium_tangent_continuous_at_joins() {
        let s = Stadium::new(10.0, 20.0);
        let arc = core::f32::consts::PI * 10.0;
        let join = arc / s.total_len();
        let before = s.tangent(join - 1e-4).angle_deg();
        let after = s.tangent(join + 1e-4).angle_deg();
        assert!((before - after).abs() < 1.0);
    }

    #[test]
    fn angle_normalization() {
        assert!(close(normalize_deg(-90.0), 270.0));
        assert!(close(normalize_deg(450.0), 90.0));
        assert!(close(Vector::new(0.0, -1.0).angle_deg(), 270.0));
    }
}
