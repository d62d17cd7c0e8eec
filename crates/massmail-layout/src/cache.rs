use crate::error::Result;
use crate::hull::{HullPath, convex_hull, rounded_hull};
use crate::position::{original_position, place_cluster};
use massmail_core::geom::{BoundingBox, Point, Vector, vector};
use massmail_core::{
    ClusterId, Dataset, EmailId, Error as CoreError, LayoutConfig, LayoutMode, Revision,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Projected points of one cluster under one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGeometry {
    pub id: ClusterId,
    /// Placed members in dataset order. Members without an embedding are left out.
    pub points: Vec<(EmailId, Point)>,
    /// `None` when no member could be placed.
    pub bbox: Option<BoundingBox>,
    /// Translation applied on top of the ORIGINAL positions (zero in ORIGINAL mode).
    pub offset: Vector,
}

impl ClusterGeometry {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn hull(&self) -> Vec<Point> {
        let pts: Vec<Point> = self.points.iter().map(|(_, p)| *p).collect();
        convex_hull(&pts)
    }

    pub fn outline(&self, padding: f64) -> HullPath {
        rounded_hull(&self.hull(), padding)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
}

/// Lazily computed cluster geometry keyed by `(cluster id, mode)`.
///
/// Entries belong to exactly one dataset revision. Presenting a different dataset drops every
/// entry, as does an explicit [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct ClusterGeometryCache {
    config: LayoutConfig,
    revision: Option<Revision>,
    entries: FxHashMap<(ClusterId, LayoutMode), Arc<ClusterGeometry>>,
    stats: CacheStats,
}

impl Default for ClusterGeometryCache {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ClusterGeometryCache {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            revision: None,
            entries: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        if self.config != config {
            self.config = config;
            self.invalidate();
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "cluster geometry invalidated");
        }
        self.entries.clear();
        self.revision = None;
        self.stats.invalidations += 1;
    }

    fn sync(&mut self, dataset: &Dataset) {
        if self.revision != Some(dataset.revision()) {
            if self.revision.is_some() {
                self.invalidate();
            }
            self.revision = Some(dataset.revision());
        }
    }

    pub fn cluster_points(
        &mut self,
        dataset: &Dataset,
        cluster: &ClusterId,
        mode: LayoutMode,
    ) -> Result<Vec<Point>> {
        let g = self.geometry(dataset, cluster, mode)?;
        Ok(g.points.iter().map(|(_, p)| *p).collect())
    }

    pub fn cluster_bounding_box(
        &mut self,
        dataset: &Dataset,
        cluster: &ClusterId,
        mode: LayoutMode,
    ) -> Result<Option<BoundingBox>> {
        Ok(self.geometry(dataset, cluster, mode)?.bbox)
    }

    pub fn geometry(
        &mut self,
        dataset: &Dataset,
        cluster: &ClusterId,
        mode: LayoutMode,
    ) -> Result<Arc<ClusterGeometry>> {
        self.sync(dataset);
        if let Some(g) = self.entries.get(&(cluster.clone(), mode)) {
            self.stats.hits += 1;
            return Ok(Arc::clone(g));
        }
        let Some(position) = dataset.cluster_position(cluster) else {
            return Err(CoreError::UnknownCluster {
                id: cluster.clone(),
            }
            .into());
        };

        match mode {
            LayoutMode::Original => {
                self.stats.misses += 1;
                let g = Arc::new(self.compute_original(dataset, cluster));
                self.entries.insert((cluster.clone(), mode), Arc::clone(&g));
                Ok(g)
            }
            LayoutMode::Exploded => self.resolve_exploded(dataset, cluster, position),
        }
    }

    fn compute_original(&self, dataset: &Dataset, cluster: &ClusterId) -> ClusterGeometry {
        let view = &self.config.view;
        let mut points = Vec::new();
        for (id, _) in dataset.members(cluster) {
            match original_position(dataset, view, id) {
                Ok(p) => points.push((id, p)),
                Err(err) => tracing::warn!(email = %id, %err, "email skipped"),
            }
        }
        let bbox = BoundingBox::from_points(points.iter().map(|(_, p)| *p));
        ClusterGeometry {
            id: cluster.clone(),
            points,
            bbox,
            offset: vector(0.0, 0.0),
        }
    }

    /// Places clusters `0..=position` left to right, reusing whatever is already cached and
    /// threading the previous placed box forward. Empty clusters take no room.
    fn resolve_exploded(
        &mut self,
        dataset: &Dataset,
        cluster: &ClusterId,
        position: usize,
    ) -> Result<Arc<ClusterGeometry>> {
        let mut prev: Option<BoundingBox> = None;
        let mut resolved: Option<Arc<ClusterGeometry>> = None;

        for c in dataset.clusters().take(position + 1) {
            let key = (c.id.clone(), LayoutMode::Exploded);
            let cached = self.entries.get(&key).cloned();
            let g = match cached {
                Some(g) => g,
                None => {
                    let local = self.geometry(dataset, &c.id, LayoutMode::Original)?;
                    self.stats.misses += 1;
                    let g = Arc::new(match local.bbox {
                        Some(bbox) => {
                            let offset =
                                place_cluster(prev.as_ref(), &bbox, &self.config.exploded);
                            tracing::debug!(
                                cluster = %c.id,
                                dx = offset.x,
                                dy = offset.y,
                                "cluster placed"
                            );
                            ClusterGeometry {
                                id: c.id.clone(),
                                points: local
                                    .points
                                    .iter()
                                    .map(|(i, p)| (*i, *p + offset))
                                    .collect(),
                                bbox: Some(bbox.translate(offset)),
                                offset,
                            }
                        }
                        None => ClusterGeometry {
                            id: c.id.clone(),
                            points: Vec::new(),
                            bbox: None,
                            offset: vector(0.0, 0.0),
                        },
                    });
                    self.entries.insert(key, Arc::clone(&g));
                    g
                }
            };
            if let Some(bbox) = g.bbox {
                prev = Some(bbox);
            }
            resolved = Some(g);
        }

        resolved.ok_or_else(|| {
            CoreError::UnknownCluster {
                id: cluster.clone(),
            }
            .into()
        })
    }
}
