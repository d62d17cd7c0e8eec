use massmail_core::geom::{Point, Vector, vector};
use std::ops::Add;

pub fn scale(k: f64, v: Vector) -> Vector {
    v * k
}

/// Point + vector or vector + vector.
pub fn sum<T: Add<Vector, Output = T>>(a: T, b: Vector) -> T {
    a + b
}

/// Unit vector perpendicular to the segment `p0 -> p1`, rotated a quarter turn from the
/// segment direction. `None` for a zero-length segment.
pub fn unit_normal(p0: Point, p1: Point) -> Option<Vector> {
    let n = vector(p0.y - p1.y, p1.x - p0.x);
    let len = n.length();
    if !(len.is_finite() && len > 0.0) {
        return None;
    }
    Some(n / len)
}

/// Twice the signed area (shoelace sum). Negative for the winding [`crate::hull`] expects.
pub fn signed_area2(points: &[Point]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a.x * b.y - b.x * a.y;
    }
    acc
}

pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}
