#![forbid(unsafe_code)]

//! Dataset model for the massmail cluster explorer.
//!
//! A dataset is an ordered list of clusters, a collection of emails (each pointing at a cluster
//! and carrying a 2D embedding) and an independent keyword list used for filtering. Everything
//! geometric is derived from it by `massmail-layout`.

pub mod config;
pub mod error;
pub mod filter;
pub mod geom;
pub mod model;
pub mod mutate;
pub mod source;

pub use config::{ConfigLayer, ExplodedConfig, HullConfig, LayoutConfig, ViewConfig};
pub use error::{Error, Result};
pub use filter::KeywordFilter;
pub use geom::{BoundingBox, Point, Vector};
pub use model::{
    Cluster, ClusterId, Dataset, DatasetData, Email, EmailId, Embedding, Keyword, LayoutMode,
    Revision,
};
pub use mutate::{
    DropOutcome, DropTarget, apply_drop, create_singleton_cluster, move_email_to_cluster,
    reposition_email, reposition_emails,
};
pub use source::{DatasetSource, FileSource, InlineSource, fetch_dataset, load_dataset};
