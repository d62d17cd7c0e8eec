//! Convex hulls and their padded, rounded outlines.
//!
//! Winding convention: a hull is listed counter-clockwise *as seen on screen* (y grows
//! downwards), which is a negative shoelace sum in raw coordinates. With that order the normal
//! from [`unit_normal`] points away from the interior and every arc is drawn with sweep flag 0.

use crate::fmt::fmt_path_into;
use crate::vector::{cross, distance_to_segment, scale, signed_area2, sum, unit_normal};
use massmail_core::geom::{Point, vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc of `radius` ending at `to` (small arc, sweep flag 0).
    Arc { radius: f64, to: Point },
}

impl PathCommand {
    pub fn end(&self) -> Point {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => p,
            Self::Arc { to, .. } => to,
        }
    }
}

/// A closed outline: one `MoveTo` followed by lines and arcs returning to the start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullPath {
    commands: Vec<PathCommand>,
}

impl HullPath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.commands.first().map(PathCommand::end)
    }

    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(PathCommand::end)
    }

    pub fn write_svg_path_data(&self, out: &mut String) {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match *cmd {
                PathCommand::MoveTo(p) => {
                    out.push_str("M ");
                    push_point(out, p);
                }
                PathCommand::LineTo(p) => {
                    out.push_str("L ");
                    push_point(out, p);
                }
                PathCommand::Arc { radius, to } => {
                    out.push_str("A ");
                    fmt_path_into(out, radius);
                    out.push(',');
                    fmt_path_into(out, radius);
                    out.push_str(",0,0,0,");
                    push_point(out, to);
                }
            }
        }
    }

    pub fn to_svg_path_data(&self) -> String {
        let mut out = String::new();
        self.write_svg_path_data(&mut out);
        out
    }
}

impl std::fmt::Display for HullPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_svg_path_data())
    }
}

fn push_point(out: &mut String, p: Point) {
    fmt_path_into(out, p.x);
    out.push(',');
    fmt_path_into(out, p.y);
}

/// Andrew's monotone chain. Duplicates and collinear points are dropped; fewer than three
/// distinct points come back unchanged apart from deduplication.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);

    // The chain is counter-clockwise in y-up terms; flip it to the on-screen convention.
    lower.reverse();
    lower
}

/// Closes a convex polygon with arcs of radius `padding` around each vertex.
///
/// The input must already be a convex hull. Either winding is accepted; it is normalized to
/// the convention described in the module docs so the outline always bulges outwards.
pub fn rounded_hull(points: &[Point], padding: f64) -> HullPath {
    let mut pts: Vec<Point> = points.to_vec();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }

    match pts.len() {
        0 => HullPath::default(),
        1 => rounded_hull1(pts[0], padding),
        2 => rounded_hull2(pts[0], pts[1], padding),
        _ => {
            if signed_area2(&pts) > 0.0 {
                pts.reverse();
            }
            rounded_hull_n(&pts, padding)
        }
    }
}

fn rounded_hull1(p: Point, padding: f64) -> HullPath {
    let top = sum(p, vector(0.0, -padding));
    let bottom = sum(p, vector(0.0, padding));
    HullPath {
        commands: vec![
            PathCommand::MoveTo(top),
            PathCommand::Arc {
                radius: padding,
                to: bottom,
            },
            PathCommand::Arc {
                radius: padding,
                to: top,
            },
        ],
    }
}

fn rounded_hull2(a: Point, b: Point, padding: f64) -> HullPath {
    let Some(n) = unit_normal(a, b) else {
        return rounded_hull1(a, padding);
    };
    let offset = scale(padding, n);
    let inv = scale(-1.0, offset);

    let p0 = sum(a, offset);
    let p1 = sum(b, offset);
    let p2 = sum(b, inv);
    let p3 = sum(a, inv);

    HullPath {
        commands: vec![
            PathCommand::MoveTo(p0),
            PathCommand::LineTo(p1),
            PathCommand::Arc {
                radius: padding,
                to: p2,
            },
            PathCommand::LineTo(p3),
            PathCommand::Arc {
                radius: padding,
                to: p0,
            },
        ],
    }
}

fn rounded_hull_n(pts: &[Point], padding: f64) -> HullPath {
    let n = pts.len();
    let mut segments: Vec<(Point, Point)> = Vec::with_capacity(n);
    for i in 0..n {
        let p0 = if i == 0 { pts[n - 1] } else { pts[i - 1] };
        let p1 = pts[i];
        let Some(normal) = unit_normal(p0, p1) else {
            continue;
        };
        let offset = scale(padding, normal);
        segments.push((sum(p0, offset), sum(p1, offset)));
    }

    let Some(&(_, last_end)) = segments.last() else {
        return HullPath::default();
    };

    let mut commands = Vec::with_capacity(segments.len() * 2 + 1);
    commands.push(PathCommand::MoveTo(last_end));
    for &(start, end) in &segments {
        commands.push(PathCommand::Arc {
            radius: padding,
            to: start,
        });
        commands.push(PathCommand::LineTo(end));
    }
    HullPath { commands }
}

/// Whether `p` falls inside the rounded outline of the convex `hull` padded by `padding`.
pub fn rounded_hull_contains(hull: &[Point], padding: f64, p: Point) -> bool {
    match hull.len() {
        0 => false,
        1 => (p - hull[0]).length() <= padding,
        _ => {
            if hull.len() >= 3 && convex_polygon_contains(hull, p) {
                return true;
            }
            let n = hull.len();
            (0..n).any(|i| distance_to_segment(p, hull[i], hull[(i + 1) % n]) <= padding)
        }
    }
}

fn convex_polygon_contains(hull: &[Point], p: Point) -> bool {
    let n = hull.len();
    let mut sign = 0.0f64;
    for i in 0..n {
        let c = cross(hull[i], hull[(i + 1) % n], p);
        if c == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}
