//! Snapshot combiner: latest value of every named source, re-emitted
//! whenever any one of them produces.

use std::collections::{BTreeMap, HashSet};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, FusedStream, Stream, StreamExt};
use serde::{Serialize, Serializer};

use crate::error::StreamError;

/// Trailing marker conventionally appended to keys that name a stream.
pub const STREAM_MARKER: char = '$';

// ==============================================================================
// Presence
// ==============================================================================

/// Latest known value of one source, or `Absent` before its first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presence<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Self::Absent => Presence::Absent,
            Self::Present(value) => Presence::Present(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

/// `Absent` serializes as `null`, so snapshots read naturally as JSON.
impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(value) => serializer.serialize_some(value),
        }
    }
}

// ==============================================================================
// Snapshot
// ==============================================================================

/// Point-in-time view holding one [`Presence`] per combined source,
/// keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot<T> {
    fields: BTreeMap<String, Presence<T>>,
}

impl<T> Snapshot<T> {
    pub fn get(&self, field: &str) -> Option<&Presence<T>> {
        self.fields.get(field)
    }

    /// The value of `field`, if that source has produced one.
    pub fn value(&self, field: &str) -> Option<&T> {
        match self.fields.get(field)? {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
        }
    }

    /// `true` once every source has produced at least one value.
    pub fn is_complete(&self) -> bool {
        self.fields.values().all(Presence::is_present)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Presence<T>)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, Presence<T>)> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = (K, Presence<T>)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        }
    }
}

// ==============================================================================
// Named Sources
// ==============================================================================

/// A source stream paired with the snapshot field it feeds.
pub struct Named<'a, T, E> {
    field: String,
    source: BoxStream<'a, Result<T, E>>,
}

impl<'a, T, E> Named<'a, T, E> {
    pub fn new<S>(field: impl Into<String>, source: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'a,
    {
        Self {
            field: field.into(),
            source: source.boxed(),
        }
    }

    /// Name a source by a raw key such as `"blocks$"`; one trailing
    /// [`STREAM_MARKER`] is stripped to form the field name.
    pub fn from_marked_key<S>(key: &str, source: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'a,
    {
        let field = key.strip_suffix(STREAM_MARKER).unwrap_or(key);
        Self::new(field, source)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub(crate) fn into_parts(self) -> (String, BoxStream<'a, Result<T, E>>) {
        (self.field, self.source)
    }
}

impl<T, E> std::fmt::Debug for Named<'_, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Named").field("field", &self.field).finish()
    }
}

// ==============================================================================
// Combiner
// ==============================================================================

/// Combine named sources into a stream of [`Snapshot`]s.
///
/// The first item is the all-`Absent` snapshot; after that one snapshot
/// is yielded per value produced by any source. The first source error
/// is yielded as `Err` and ends the combined stream. The stream completes
/// once every source has completed; an empty source set yields nothing.
pub fn combine<'a, T, E, I>(sources: I) -> Result<Combine<'a, T, E>, StreamError>
where
    I: IntoIterator<Item = Named<'a, T, E>>,
{
    let mut seen = HashSet::new();
    let mut slots = Vec::new();
    for named in sources {
        let (field, source) = named.into_parts();
        if !seen.insert(field.clone()) {
            return Err(StreamError::DuplicateField(field));
        }
        slots.push(Slot {
            field,
            source: Some(source),
            latest: Presence::Absent,
        });
    }

    Ok(Combine {
        slots,
        primed: false,
        failed: false,
        cursor: 0,
    })
}

struct Slot<'a, T, E> {
    field: String,
    /// `None` once the source has completed.
    source: Option<BoxStream<'a, Result<T, E>>>,
    latest: Presence<T>,
}

/// Stream returned by [`combine`].
#[must_use = "streams do nothing unless polled"]
pub struct Combine<'a, T, E> {
    slots: Vec<Slot<'a, T, E>>,
    primed: bool,
    failed: bool,
    /// Slot polled first on the next wakeup, rotated so a busy source
    /// cannot starve the others. Items already queued on several sources
    /// are therefore taken in rotation order, not send order.
    cursor: usize,
}

impl<T: Clone, E> Combine<'_, T, E> {
    fn snapshot(&self) -> Snapshot<T> {
        self.slots
            .iter()
            .map(|slot| (slot.field.clone(), slot.latest.clone()))
            .collect()
    }

    fn all_completed(&self) -> bool {
        self.slots.iter().all(|slot| slot.source.is_none())
    }
}

// No field is structurally pinned: sources are boxed and `latest` is only
// ever replaced.
impl<T, E> Unpin for Combine<'_, T, E> {}

impl<T: Clone, E> Stream for Combine<'_, T, E> {
    type Item = Result<Snapshot<T>, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.failed {
            return Poll::Ready(None);
        }
        if !this.primed {
            this.primed = true;
            if this.slots.is_empty() {
                return Poll::Ready(None);
            }
            return Poll::Ready(Some(Ok(this.snapshot())));
        }

        let len = this.slots.len();
        for offset in 0..len {
            let index = (this.cursor + offset) % len;
            let slot = &mut this.slots[index];
            let Some(source) = slot.source.as_mut() else {
                continue;
            };

            match source.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(value))) => {
                    slot.latest = Presence::Present(value);
                    this.cursor = (index + 1) % len;
                    return Poll::Ready(Some(Ok(this.snapshot())));
                }
                Poll::Ready(Some(Err(err))) => {
                    tracing::debug!(field = %slot.field, "combined source failed; closing snapshot stream");
                    this.failed = true;
                    for slot in &mut this.slots {
                        slot.source = None;
                    }
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    tracing::trace!(field = %slot.field, "combined source completed");
                    slot.source = None;
                }
                Poll::Pending => {}
            }
        }

        if this.all_completed() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}

impl<T: Clone, E> FusedStream for Combine<'_, T, E> {
    fn is_terminated(&self) -> bool {
        self.failed || (self.primed && self.all_completed())
    }
}
