use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::sync::oneshot;

use super::error::DirectoryError;

/// Completion handle for a queued write.
///
/// Awaiting it yields the write's outcome. Dropping it does not cancel the
/// write; the writer task finishes it regardless.
#[derive(Debug)]
#[must_use = "writes run without being awaited; drop the handle explicitly to ignore the outcome"]
pub struct WriteHandle<T> {
    rx: oneshot::Receiver<Result<(), DirectoryError>>,
    value: Option<T>,
}

impl<T> WriteHandle<T> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<(), DirectoryError>>, value: T) -> Self {
        Self { rx, value: Some(value) }
    }

    /// A handle that is already resolved with `err`.
    pub(crate) fn failed(err: DirectoryError, value: T) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self::new(rx, value)
    }
}

impl<T: Unpin> Future for WriteHandle<T> {
    type Output = Result<T, DirectoryError>;

    /// Polling again after the handle has resolved yields `StoreUnavailable`.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.value.is_none() {
            return Poll::Ready(Err(DirectoryError::handle_spent()));
        }

        let outcome = ready!(Pin::new(&mut this.rx).poll(cx));
        let value = this.value.take();
        Poll::Ready(match outcome {
            Ok(Ok(())) => value.ok_or_else(DirectoryError::handle_spent),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DirectoryError::writer_stopped()),
        })
    }
}
