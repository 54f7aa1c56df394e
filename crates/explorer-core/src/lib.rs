pub mod address;
pub mod config;
pub mod error;
pub mod list;
pub mod stream;
pub mod tx;
pub mod types;

#[cfg(test)]
mod test_util;

pub use config::ExplorerConfig;
pub use error::{ErrorResponse, ResponseError, SourceError, StreamError};
pub use stream::{combine, dbg, drop_errors, extract_errors, ExtractedError, Named, Presence, Snapshot};
