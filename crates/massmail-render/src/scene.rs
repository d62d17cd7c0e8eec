//! A flat, serializable snapshot of what one view draws.

use crate::Result;
use massmail_core::geom::{BoundingBox, Point};
use massmail_core::{ClusterId, EmailId, LayoutMode};
use massmail_layout::ExplorerState;
use massmail_layout::position::label_anchor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for ScenePoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEmail {
    pub index: EmailId,
    pub x: f64,
    pub y: f64,
    pub cluster_id: ClusterId,
    /// `false` when a keyword selection is active and the content matches none of it.
    pub emphasized: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneCluster {
    pub id: ClusterId,
    pub label: String,
    /// SVG path data of the padded, rounded outline.
    pub path: String,
    pub label_anchor: ScenePoint,
    pub bounding_box: BoundingBox,
    pub members: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub mode: LayoutMode,
    pub canvas: SceneSize,
    pub selected_keywords: Vec<String>,
    /// Clusters in draw order.
    pub clusters: Vec<SceneCluster>,
    pub emails: Vec<SceneEmail>,
    /// Extent of everything drawn: outlines (with their padding), labels and points.
    pub bounds: Option<BoundingBox>,
}

impl Scene {
    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }

    pub fn cluster(&self, id: &ClusterId) -> Option<&SceneCluster> {
        self.clusters.iter().find(|c| &c.id == id)
    }

    pub fn email(&self, index: EmailId) -> Option<&SceneEmail> {
        self.emails.iter().find(|e| e.index == index)
    }
}

/// Snapshots the state under its current mode and keyword selection. Clusters without placed
/// members and emails that cannot be placed are left out (and logged).
pub fn build_scene(state: &mut ExplorerState) -> Scene {
    let ids: Vec<ClusterId> = state.dataset().clusters().map(|c| c.id.clone()).collect();
    let mut clusters = Vec::with_capacity(ids.len());
    for id in &ids {
        match scene_cluster(state, id) {
            Ok(Some(c)) => clusters.push(c),
            Ok(None) => tracing::debug!(cluster = %id, "empty cluster not drawn"),
            Err(err) => tracing::warn!(cluster = %id, %err, "cluster not drawn"),
        }
    }

    let mut emails = Vec::new();
    for (index, p) in state.positions() {
        let Ok(email) = state.dataset().email(index) else {
            continue;
        };
        emails.push(SceneEmail {
            index,
            x: p.x,
            y: p.y,
            cluster_id: email.cluster_id.clone(),
            emphasized: state.filter().is_emphasized(email),
            tooltip: email.tooltip().to_string(),
        });
    }

    let view = state.config().view;
    let padding = state.config().hull.padding;
    let label_room = padding + state.config().hull.label_offset;
    let bounds = scene_bounds(&clusters, &emails, padding, label_room);

    Scene {
        mode: state.mode(),
        canvas: SceneSize {
            width: view.canvas_width,
            height: view.canvas_height,
        },
        selected_keywords: state.filter().selected().to_vec(),
        clusters,
        emails,
        bounds,
    }
}

fn scene_cluster(state: &mut ExplorerState, id: &ClusterId) -> Result<Option<SceneCluster>> {
    let Some(outline) = state.outline(id)? else {
        return Ok(None);
    };
    let Some(bbox) = state.bounding_box(id)? else {
        return Ok(None);
    };
    let hull = state.config().hull;
    let label = state
        .dataset()
        .cluster(id)
        .map(|c| c.label.clone())
        .unwrap_or_default();
    Ok(Some(SceneCluster {
        id: id.clone(),
        label,
        path: outline.path.to_svg_path_data(),
        label_anchor: label_anchor(&bbox, &hull).into(),
        bounding_box: bbox,
        members: state.dataset().member_count(id),
    }))
}

fn scene_bounds(
    clusters: &[SceneCluster],
    emails: &[SceneEmail],
    padding: f64,
    label_room: f64,
) -> Option<BoundingBox> {
    let outlines = clusters.iter().map(|c| {
        let b = &c.bounding_box;
        BoundingBox::new(
            b.left - padding,
            b.top - label_room,
            b.right + padding,
            b.bottom + padding,
        )
    });
    let points = emails
        .iter()
        .filter_map(|e| BoundingBox::from_points([Point::new(e.x, e.y)]));
    outlines.chain(points).reduce(|a, b| a.union(&b))
}
