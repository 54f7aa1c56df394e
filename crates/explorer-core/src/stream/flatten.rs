//! Flattening combinators for higher-order streams (streams of streams).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, SelectAll, Stream, StreamExt};

// ==============================================================================
// Switch Latest
// ==============================================================================

/// Follow only the most recent inner stream.
///
/// Each inner stream that arrives on `outer` replaces the current one,
/// which is dropped right away. The output completes once `outer` has
/// completed and the last inner stream has finished.
pub fn switch_latest<O>(outer: O) -> SwitchLatest<O>
where
    O: Stream,
    O::Item: Stream,
{
    SwitchLatest {
        outer: Some(Box::pin(outer)),
        inner: None,
    }
}

/// Stream returned by [`switch_latest`].
#[must_use = "streams do nothing unless polled"]
pub struct SwitchLatest<O: Stream> {
    outer: Option<Pin<Box<O>>>,
    inner: Option<Pin<Box<O::Item>>>,
}

impl<O> Stream for SwitchLatest<O>
where
    O: Stream,
    O::Item: Stream,
{
    type Item = <O::Item as Stream>::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // Drain the outer stream first so a newer inner stream always wins
        // over values still queued on the one it supersedes.
        while let Some(outer) = this.outer.as_mut() {
            match outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(inner)) => {
                    if this.inner.is_some() {
                        tracing::trace!("switching to newer inner stream");
                    }
                    this.inner = Some(Box::pin(inner));
                }
                Poll::Ready(None) => this.outer = None,
                Poll::Pending => break,
            }
        }

        if let Some(inner) = this.inner.as_mut() {
            match inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                Poll::Ready(None) => this.inner = None,
                Poll::Pending => return Poll::Pending,
            }
        }

        if this.outer.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<O> FusedStream for SwitchLatest<O>
where
    O: Stream,
    O::Item: Stream,
{
    fn is_terminated(&self) -> bool {
        self.outer.is_none() && self.inner.is_none()
    }
}

// ==============================================================================
// Merge All
// ==============================================================================

/// Follow every inner stream at once, never cancelling any of them.
///
/// Items are forwarded in the order the inner streams produce them. The
/// output completes once `outer` and every inner stream have completed.
pub fn merge_all<O>(outer: O) -> MergeAll<O>
where
    O: Stream,
    O::Item: Stream,
{
    MergeAll {
        outer: Some(Box::pin(outer)),
        inners: SelectAll::new(),
    }
}

/// Stream returned by [`merge_all`].
#[must_use = "streams do nothing unless polled"]
pub struct MergeAll<O: Stream> {
    outer: Option<Pin<Box<O>>>,
    inners: SelectAll<Pin<Box<O::Item>>>,
}

impl<O> MergeAll<O>
where
    O: Stream,
    O::Item: Stream,
{
    /// Number of inner streams still being followed.
    pub fn live_inners(&self) -> usize {
        self.inners.len()
    }
}

impl<O> Stream for MergeAll<O>
where
    O: Stream,
    O::Item: Stream,
{
    type Item = <O::Item as Stream>::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        while let Some(outer) = this.outer.as_mut() {
            match outer.as_mut().poll_next(cx) {
                Poll::Ready(Some(inner)) => this.inners.push(Box::pin(inner)),
                Poll::Ready(None) => this.outer = None,
                Poll::Pending => break,
            }
        }

        if !this.inners.is_empty() {
            match this.inners.poll_next_unpin(cx) {
                Poll::Ready(Some(item)) => return Poll::Ready(Some(item)),
                // Every inner stream has finished; fall through and decide
                // based on the outer stream.
                Poll::Ready(None) => {}
                Poll::Pending => return Poll::Pending,
            }
        }

        if this.outer.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<O> FusedStream for MergeAll<O>
where
    O: Stream,
    O::Item: Stream,
{
    fn is_terminated(&self) -> bool {
        self.outer.is_none() && self.inners.is_empty()
    }
}
