use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{FutureExt, channel::oneshot};

use crate::{error::MapError, mapper::ParallelMapper};

/// Resolves to the output of a parallel map running on a rayon pool.
///
/// Dropping the future does not stop the work already dispatched; its
/// result is discarded once every element has been transformed.
pub struct ParMapFuture<T> {
    rx: oneshot::Receiver<Result<Vec<T>, MapError>>,
}

impl<T> Future for ParMapFuture<T> {
    type Output = Result<Vec<T>, MapError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.rx.poll_unpin(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(canceled)) => Poll::Ready(Err(canceled.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl ParallelMapper {
    /// Runs [`ParallelMapper::try_map`] on the mapper's pool without
    /// blocking the calling task.
    pub fn map_async<E, T, F>(&self, input: Vec<E>, transform: F) -> ParMapFuture<T>
    where
        E: Send + Sync + 'static,
        T: Send + 'static,
        F: Fn(&E) -> T + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel();
        if input.is_empty() {
            let _ = tx.send(Ok(Vec::new()));
        } else {
            let mapper = self.clone();
            self.spawn(move || {
                let _ = tx.send(mapper.try_map(&input, transform));
            });
        }
        ParMapFuture { rx }
    }
}

pub trait ParallelMapFuture<E> {
    fn par_map_async<F, T>(self, map_op: F) -> ParMapFuture<T>
    where
        F: Fn(&E) -> T + Send + Sync + 'static,
        T: Send + 'static;
}

impl<E> ParallelMapFuture<E> for Vec<E>
where
    E: Send + Sync + 'static,
{
    fn par_map_async<F, T>(self, map_op: F) -> ParMapFuture<T>
    where
        F: Fn(&E) -> T + Send + Sync + 'static,
        T: Send + 'static,
    {
        ParallelMapper::default().map_async(self, map_op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_par_map_async() {
        let output = vec![0u64, 1, 2, 3, 4]
            .par_map_async(|n| (0..=*n).sum::<u64>())
            .await
            .unwrap();
        assert_eq!(output, vec![0, 1, 3, 6, 10]);
    }

    #[tokio::test]
    async fn test_par_map_async_empty() {
        let output = Vec::<u64>::new().par_map_async(|n| *n).await.unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_map_async_on_dedicated_pool() {
        let mapper = ParallelMapper::with_threads(2).unwrap();
        let input = (0..1000).collect::<Vec<u32>>();
        let output = mapper.map_async(input.clone(), |n| n * 2).await.unwrap();
        assert_eq!(output, input.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_map_async_reports_panic() {
        let result = (0..10u32)
            .collect::<Vec<_>>()
            .par_map_async(|n| if *n == 6 { panic!("six") } else { *n })
            .await;
        match result {
            Err(MapError::TransformPanicked { index, message }) => {
                assert_eq!(index, 6);
                assert_eq!(message, "six");
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("panicking transform produced an output"),
        }
    }
}
