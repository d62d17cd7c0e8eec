//! The per-mode position function.
//!
//! ORIGINAL mode is a uniform affine map of the embedding onto the canvas. EXPLODED mode takes
//! the ORIGINAL position and adds the translation of the email's cluster, chosen by shelf
//! packing the clusters in dataset order (see [`place_cluster`]).

use crate::cache::ClusterGeometryCache;
use crate::error::Result;
use massmail_core::geom::{BoundingBox, Point, Vector, point};
use massmail_core::{
    Dataset, EmailId, Embedding, Error as CoreError, ExplodedConfig, HullConfig, LayoutMode,
    ViewConfig,
};

pub fn to_screen(view: &ViewConfig, embedding: Embedding) -> Point {
    let s = view.scale();
    point(
        (embedding.x - view.origin_x) * s,
        (embedding.y - view.origin_y) * s,
    )
}

/// Inverse of [`to_screen`].
pub fn to_embedding(view: &ViewConfig, p: Point) -> Embedding {
    let s = view.scale();
    Embedding::new(p.x / s + view.origin_x, p.y / s + view.origin_y)
}

/// ORIGINAL-mode position of an email.
pub fn original_position(dataset: &Dataset, view: &ViewConfig, email: EmailId) -> Result<Point> {
    let e = dataset.email(email)?;
    let embedding = e.embedding.ok_or(CoreError::MissingEmbedding {
        index: email.index(),
    })?;
    Ok(to_screen(view, embedding))
}

/// Translation that moves a cluster with untranslated box `local` next to the previously
/// placed cluster `prev`.
///
/// - no previous cluster: the box's top-left lands on the origin;
/// - `prev.right + local.width` under the row limit: right of `prev`, `horizontal_gap` apart,
///   tops aligned;
/// - otherwise: a new row, `row_offset` below `prev.top`, left edges aligned.
pub fn place_cluster(
    prev: Option<&BoundingBox>,
    local: &BoundingBox,
    config: &ExplodedConfig,
) -> Vector {
    let target = match prev {
        None => point(0.0, 0.0),
        Some(prev) if prev.right + local.width < config.row_width_limit => {
            point(prev.right + config.horizontal_gap, prev.top)
        }
        Some(prev) => point(prev.left, prev.top + config.row_offset),
    };
    target - local.top_left()
}

/// Screen position of `email` under `mode`. Deterministic for an unchanged dataset.
pub fn position(
    cache: &mut ClusterGeometryCache,
    dataset: &Dataset,
    email: EmailId,
    mode: LayoutMode,
) -> Result<Point> {
    let base = original_position(dataset, &cache.config().view, email)?;
    let p = match mode {
        LayoutMode::Original => base,
        LayoutMode::Exploded => {
            let cluster = &dataset.email(email)?.cluster_id;
            base + cache.geometry(dataset, cluster, mode)?.offset
        }
    };
    tracing::trace!(%email, %mode, x = p.x, y = p.y, "position");
    Ok(p)
}

/// Where a cluster's label is centered: above the padded outline.
pub fn label_anchor(bbox: &BoundingBox, hull: &HullConfig) -> Point {
    point(bbox.center_x(), bbox.top - hull.padding - hull.label_offset)
}
