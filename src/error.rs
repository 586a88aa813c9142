use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Transform panicked at index {index}: {message}")]
    TransformPanicked { index: usize, message: String },
    #[error("Cannot allocate an output buffer for {len} elements")]
    AllocationFailed { len: usize },
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[cfg(feature = "future")]
    #[error("Parallel map was canceled before producing a result")]
    Canceled(#[from] futures::channel::oneshot::Canceled),
}
