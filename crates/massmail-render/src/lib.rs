#![forbid(unsafe_code)]

//! Turns an [`ExplorerState`](massmail_layout::ExplorerState) into something drawable: a
//! serializable [`Scene`] and an SVG document.

pub mod scene;
pub mod svg;

pub use scene::{Scene, SceneCluster, SceneEmail, ScenePoint, build_scene};
pub use svg::{SvgRenderOptions, render_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] massmail_layout::Error),
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
