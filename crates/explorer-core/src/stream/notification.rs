use futures::stream::{self, Stream, StreamExt};

/// One notification observed on a fallible source stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T, E> {
    Next(T),
    Error(E),
    Complete,
}

/// Turn a fallible stream into an explicit notification sequence.
///
/// The first `Err` is terminal: it is reported as [`Notification::Error`]
/// and the source is dropped without being polled again. A source that
/// ends without error reports [`Notification::Complete`] exactly once.
pub fn materialize<S, T, E>(source: S) -> impl Stream<Item = Notification<T, E>>
where
    S: Stream<Item = Result<T, E>>,
{
    stream::unfold(Some(Box::pin(source)), |state| async move {
        let mut source = state?;
        match source.next().await {
            Some(Ok(value)) => Some((Notification::Next(value), Some(source))),
            Some(Err(err)) => Some((Notification::Error(err), None)),
            None => Some((Notification::Complete, None)),
        }
    })
}

/// Values of a fallible stream up to (not including) its first error.
pub(crate) fn until_error<S, T, E>(source: S) -> impl Stream<Item = T>
where
    S: Stream<Item = Result<T, E>>,
{
    materialize(source).filter_map(|notification| async move {
        match notification {
            Notification::Next(value) => Some(value),
            Notification::Error(_) => {
                tracing::trace!("inner stream failed; treating it as completed");
                None
            }
            Notification::Complete => None,
        }
    })
}

/// The first error of a fallible stream, values discarded.
pub(crate) fn first_error<S, T, E>(source: S) -> impl Stream<Item = E>
where
    S: Stream<Item = Result<T, E>>,
{
    materialize(source).filter_map(|notification| async move {
        match notification {
            Notification::Error(err) => Some(err),
            Notification::Next(_) | Notification::Complete => None,
        }
    })
}
