use std::fmt::Debug;
use std::future::Future;

use futures::stream::{self, StreamExt};

use super::combine::Named;
use super::notification::{materialize, Notification};

/// Label used when the caller does not provide one.
pub const DEFAULT_DEBUG_LABEL: &str = "stream";

/// Destination for debug-sink reports.
pub trait DebugWriter {
    fn value(&self, label: &str, stream: &str, value: &dyn Debug);
    fn error(&self, label: &str, stream: &str, error: &dyn Debug);
    fn completed(&self, label: &str, stream: &str);
}

/// Reports every notification as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWriter;

impl DebugWriter for TracingWriter {
    fn value(&self, label: &str, stream: &str, value: &dyn Debug) {
        tracing::debug!(label = %label, stream = %stream, "{stream} -> {value:?}");
    }

    fn error(&self, label: &str, stream: &str, error: &dyn Debug) {
        // Alternate formatting pretty-prints nested error structures.
        tracing::debug!(label = %label, stream = %stream, "{stream} error: {error:#?}");
    }

    fn completed(&self, label: &str, stream: &str) {
        tracing::debug!(label = %label, stream = %stream, "{stream} completed");
    }
}

/// Log every notification of `sources` through [`TracingWriter`].
///
/// The returned future runs until every source has finished; spawn it to
/// keep the tap alive, drop it to detach.
pub fn dbg<'a, T, E, I>(sources: I, label: impl Into<String>) -> impl Future<Output = ()> + 'a
where
    I: IntoIterator<Item = Named<'a, T, E>>,
    T: Debug + 'a,
    E: Debug + 'a,
{
    dbg_with(sources, label, TracingWriter)
}

/// Like [`dbg`], reporting to a caller-supplied writer.
///
/// Reports arrive in the order the sources produce them. Per source,
/// values come first, followed by exactly one error or completion report.
pub fn dbg_with<'a, T, E, I, W>(
    sources: I,
    label: impl Into<String>,
    writer: W,
) -> impl Future<Output = ()> + 'a
where
    I: IntoIterator<Item = Named<'a, T, E>>,
    T: Debug + 'a,
    E: Debug + 'a,
    W: DebugWriter + 'a,
{
    let label = label.into();
    let mut events = stream::select_all(sources.into_iter().map(|named| {
        let (field, source) = named.into_parts();
        Box::pin(materialize(source).map(move |notification| (field.clone(), notification)))
    }));

    async move {
        tracing::trace!(label = %label, streams = events.len(), "debug sink attached");
        while let Some((stream, notification)) = events.next().await {
            match notification {
                Notification::Next(value) => writer.value(&label, &stream, &value),
                Notification::Error(err) => writer.error(&label, &stream, &err),
                Notification::Complete => writer.completed(&label, &stream),
            }
        }
    }
}
