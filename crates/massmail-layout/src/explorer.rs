use crate::cache::ClusterGeometryCache;
use crate::error::{Error, Result};
use crate::interact::{DragEnd, DragSession};
use crate::outline::{ClusterOutline, hit_test};
use crate::position::{label_anchor, position, to_embedding};
use massmail_core::geom::{BoundingBox, Point};
use massmail_core::{
    ClusterId, Dataset, DropOutcome, DropTarget, EmailId, KeywordFilter, LayoutConfig, LayoutMode,
    apply_drop, reposition_email,
};

/// Everything one view needs between events: the current dataset, the active mode, the
/// selected keywords, derived geometry and the drag in progress (if any).
#[derive(Debug)]
pub struct ExplorerState {
    dataset: Dataset,
    mode: LayoutMode,
    cache: ClusterGeometryCache,
    filter: KeywordFilter,
    drag: Option<DragSession>,
}

impl ExplorerState {
    pub fn new(dataset: Dataset, config: LayoutConfig) -> Self {
        Self {
            dataset,
            mode: LayoutMode::default(),
            cache: ClusterGeometryCache::new(config),
            filter: KeywordFilter::default(),
            drag: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &LayoutConfig {
        self.cache.config()
    }

    pub fn cache(&self) -> &ClusterGeometryCache {
        &self.cache
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    pub fn filter(&self) -> &KeywordFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut KeywordFilter {
        &mut self.filter
    }

    pub fn select_keywords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = KeywordFilter::new(words);
    }

    /// Publishes a new dataset. Derived geometry is dropped in the same step, so nothing can
    /// pair the new dataset with old geometry.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.cache.invalidate();
        self.dataset = dataset;
        self.drag = None;
    }

    pub fn position(&mut self, email: EmailId) -> Result<Point> {
        position(&mut self.cache, &self.dataset, email, self.mode)
    }

    /// Positions of every placeable email; the others are logged and skipped.
    pub fn positions(&mut self) -> Vec<(EmailId, Point)> {
        let ids: Vec<EmailId> = self.dataset.email_ids().collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            match self.position(id) {
                Ok(p) => out.push((id, p)),
                Err(err) => tracing::warn!(email = %id, %err, "email not placed"),
            }
        }
        out
    }

    pub fn outline(&mut self, cluster: &ClusterId) -> Result<Option<ClusterOutline>> {
        let padding = self.config().hull.padding;
        let g = self.cache.geometry(&self.dataset, cluster, self.mode)?;
        Ok(ClusterOutline::from_geometry(&g, padding))
    }

    /// Outlines of all non-empty clusters in draw order.
    pub fn outlines(&mut self) -> Vec<ClusterOutline> {
        let ids: Vec<ClusterId> = self.dataset.clusters().map(|c| c.id.clone()).collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.outline(id) {
                Ok(Some(o)) => out.push(o),
                Ok(None) => {}
                Err(err) => tracing::warn!(cluster = %id, %err, "cluster not outlined"),
            }
        }
        out
    }

    pub fn bounding_box(&mut self, cluster: &ClusterId) -> Result<Option<BoundingBox>> {
        self.cache.cluster_bounding_box(&self.dataset, cluster, self.mode)
    }

    pub fn label_anchor(&mut self, cluster: &ClusterId) -> Result<Option<Point>> {
        let hull = self.config().hull;
        let bbox = self.bounding_box(cluster)?;
        Ok(bbox.map(|b| label_anchor(&b, &hull)))
    }

    /// The cluster whose outline is under `p`, topmost first.
    pub fn hit_test(&mut self, p: Point) -> Option<ClusterId> {
        let outlines = self.outlines();
        hit_test(&outlines, p).map(|o| o.id.clone())
    }

    pub fn begin_drag(&mut self, email: EmailId) -> Result<()> {
        if let Some(active) = &self.drag {
            return Err(Error::DragInProgress {
                index: active.email().index(),
            });
        }
        let at = self.position(email)?;
        self.drag = Some(DragSession::begin(email, at));
        Ok(())
    }

    pub fn drag_to(&mut self, p: Point) -> Result<()> {
        let session = self.drag.as_mut().ok_or(Error::DragNotStarted)?;
        session.update(p);
        Ok(())
    }

    /// Position of the dragged email while the drag is in progress.
    pub fn staged_position(&self) -> Option<(EmailId, Point)> {
        self.drag.map(|s| (s.email(), s.current()))
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Ends the active drag at its last staged position; the drop target is whatever outline
    /// lies under that point.
    pub fn end_drag(&mut self) -> Result<DropOutcome> {
        let session = self.drag.take().ok_or(Error::DragNotStarted)?;
        let target = match self.hit_test(session.current()) {
            Some(id) => DropTarget::Cluster(id),
            None => DropTarget::EmptySpace,
        };
        self.finish_drag(session.finish(target))
    }

    /// Commits a finished drag: applies the membership rule and, in ORIGINAL mode, keeps the
    /// email where it was released by rewriting its embedding.
    pub fn finish_drag(&mut self, end: DragEnd) -> Result<DropOutcome> {
        let (mut next, outcome) = apply_drop(&self.dataset, end.email, &end.target)?;
        if self.mode == LayoutMode::Original {
            let embedding = to_embedding(&self.config().view, end.release);
            next = reposition_email(&next, end.email, embedding)?;
        }
        tracing::debug!(email = %end.email, ?outcome, "drag committed");
        self.replace_dataset(next);
        Ok(outcome)
    }
}
