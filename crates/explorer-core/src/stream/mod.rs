//! Reactive stream composition.
//!
//! Source streams are `futures` streams of `Result<T, E>`: `Ok` items are
//! values, the first `Err` is a terminal failure and end-of-stream is
//! completion. The combinators here build derived streams out of them:
//!
//! - [`combine`] merges named sources into keyed [`Snapshot`]s.
//! - [`drop_errors`] / [`extract_errors`] split a stream of operations
//!   into a value channel and an error channel.
//! - [`dbg`] taps a set of named sources for diagnostics.
//!
//! Everything is poll-driven; nothing is spawned and no locks are taken.

mod combine;
mod debug;
mod flatten;
mod notification;
mod split;

pub use combine::{combine, Combine, Named, Presence, Snapshot, STREAM_MARKER};
pub use debug::{dbg, dbg_with, DebugWriter, TracingWriter, DEFAULT_DEBUG_LABEL};
pub use flatten::{merge_all, switch_latest, MergeAll, SwitchLatest};
pub use notification::{materialize, Notification};
pub use split::{drop_errors, extract_errors, ExtractedError};
