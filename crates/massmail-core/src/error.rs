use crate::model::{ClusterId, EmailId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dataset JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset has no email at index {index}")]
    UnknownEmail { index: usize },

    #[error("cluster {id} is not part of the dataset")]
    UnknownCluster { id: ClusterId },

    #[error("email {index} has no embedding")]
    MissingEmbedding { index: usize },

    #[error("invalid layout config: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    pub fn unknown_email(email: EmailId) -> Self {
        Self::UnknownEmail {
            index: email.index(),
        }
    }
}
