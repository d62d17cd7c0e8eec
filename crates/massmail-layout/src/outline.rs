use crate::cache::ClusterGeometry;
use crate::hull::{HullPath, rounded_hull, rounded_hull_contains};
use massmail_core::ClusterId;
use massmail_core::geom::Point;

/// The rendered boundary of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutline {
    pub id: ClusterId,
    /// Convex hull of the cluster's points (on-screen counter-clockwise).
    pub hull: Vec<Point>,
    pub path: HullPath,
    pub padding: f64,
}

impl ClusterOutline {
    /// `None` for a cluster without placed members.
    pub fn from_geometry(geometry: &ClusterGeometry, padding: f64) -> Option<Self> {
        if geometry.is_empty() {
            return None;
        }
        let hull = geometry.hull();
        let path = rounded_hull(&hull, padding);
        Some(Self {
            id: geometry.id.clone(),
            hull,
            path,
            padding,
        })
    }

    pub fn contains(&self, p: Point) -> bool {
        rounded_hull_contains(&self.hull, self.padding, p)
    }
}

/// The topmost outline containing `p`. Outlines are given in draw order, so later ones win.
pub fn hit_test(outlines: &[ClusterOutline], p: Point) -> Option<&ClusterOutline> {
    outlines.iter().rev().find(|o| o.contains(p))
}
