#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] massmail_core::Error),

    #[error("no drag in progress")]
    DragNotStarted,

    #[error("email {index} is already being dragged")]
    DragInProgress { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
