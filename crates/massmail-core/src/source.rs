use crate::error::Result;
use crate::model::Dataset;
use std::future::Future;
use std::path::PathBuf;

/// Where the dataset JSON comes from. Fetching is a one-shot request: no retry, no timeout.
pub trait DatasetSource {
    fn fetch(&self) -> impl Future<Output = Result<String>>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Dataset JSON already in memory.
#[derive(Debug, Clone)]
pub struct InlineSource(pub String);

impl DatasetSource for InlineSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub async fn fetch_dataset<S: DatasetSource>(source: &S) -> Result<Dataset> {
    let text = source.fetch().await?;
    Dataset::from_json_str(&text)
}

/// Like [`fetch_dataset`], but a failed fetch or parse only leaves the view empty.
pub async fn load_dataset<S: DatasetSource>(source: &S) -> Option<Dataset> {
    match fetch_dataset(source).await {
        Ok(dataset) => {
            tracing::debug!(
                clusters = dataset.cluster_count(),
                emails = dataset.emails().len(),
                "dataset loaded"
            );
            Some(dataset)
        }
        Err(err) => {
            tracing::warn!(%err, "dataset unavailable");
            None
        }
    }
}
