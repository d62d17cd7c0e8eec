#![forbid(unsafe_code)]

//! Layout and geometry for the massmail cluster explorer.
//!
//! - [`position`]: maps an email to screen space under a [`LayoutMode`]
//!   (`ORIGINAL` affine view, or `EXPLODED` shelf packing of clusters).
//! - [`cache`]: per-cluster point sets and bounding boxes, memoized per dataset revision.
//! - [`hull`]: convex hulls and the padded, rounded outlines drawn around clusters.
//! - [`explorer`]: the state one view threads through pointer and control events.

pub mod cache;
pub mod error;
pub mod explorer;
pub mod fmt;
pub mod hull;
pub mod interact;
pub mod outline;
pub mod position;
pub mod relax;
pub mod vector;

pub use cache::{CacheStats, ClusterGeometry, ClusterGeometryCache};
pub use error::{Error, Result};
pub use explorer::ExplorerState;
pub use hull::{HullPath, PathCommand, convex_hull, rounded_hull};
pub use interact::{DragEnd, DragSession};
pub use massmail_core::LayoutMode;
pub use outline::{ClusterOutline, hit_test};
pub use position::{
    label_anchor, original_position, place_cluster, position, to_embedding, to_screen,
};
pub use relax::{RelaxOptions, relax};
