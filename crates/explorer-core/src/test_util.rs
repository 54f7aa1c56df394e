//! Shared test helpers for `explorer-core` unit tests.
//!
//! Builders for source errors and explorer transactions, a deterministic
//! single-poll helper for driving streams, and a debug writer that records
//! reports instead of logging them.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, Once};

use bitcoin::hashes::Hash;
use bitcoin::Txid;
use futures::{FutureExt, Stream, StreamExt};

use crate::error::{ErrorResponse, SourceError};
use crate::stream::DebugWriter;
use crate::types::{Tx, TxIn, TxOut};

static TRACING_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("explorer_core=trace")),
            )
            .with_test_writer()
            .try_init();
    });
}

// ==============================================================================
// Stream Helpers
// ==============================================================================

/// Poll `stream` once. `None` means it is pending; `Some(None)` means it
/// has completed.
pub fn next_ready<S: Stream + Unpin>(stream: &mut S) -> Option<Option<S::Item>> {
    stream.next().now_or_never()
}

pub fn transport_error(message: &str) -> SourceError {
    SourceError::Transport(message.into())
}

pub fn response_error(body: Option<serde_json::Value>, text: Option<&str>) -> SourceError {
    SourceError::Response(ErrorResponse {
        status: 500,
        body,
        text: text.map(str::to_string),
    })
}

// ==============================================================================
// Debug Writer
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugRecord {
    Value {
        label: String,
        stream: String,
        value: String,
    },
    Error {
        label: String,
        stream: String,
        error: String,
    },
    Completed {
        label: String,
        stream: String,
    },
}

#[derive(Clone, Default)]
pub struct RecordingWriter {
    records: Arc<Mutex<Vec<DebugRecord>>>,
}

impl RecordingWriter {
    pub fn records(&self) -> Vec<DebugRecord> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, record: DebugRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl DebugWriter for RecordingWriter {
    fn value(&self, label: &str, stream: &str, value: &dyn Debug) {
        self.push(DebugRecord::Value {
            label: label.into(),
            stream: stream.into(),
            value: format!("{value:?}"),
        });
    }

    fn error(&self, label: &str, stream: &str, error: &dyn Debug) {
        self.push(DebugRecord::Error {
            label: label.into(),
            stream: stream.into(),
            error: format!("{error:?}"),
        });
    }

    fn completed(&self, label: &str, stream: &str) {
        self.push(DebugRecord::Completed {
            label: label.into(),
            stream: stream.into(),
        });
    }
}

// ==============================================================================
// Transaction Builders
// ==============================================================================

pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

pub fn make_tx(vin: Vec<TxIn>, vout: Vec<TxOut>) -> Tx {
    Tx {
        txid: txid_from_byte(1),
        vin,
        vout,
    }
}

pub fn input_with_sequence(sequence: u32) -> TxIn {
    TxIn {
        txid: Some(txid_from_byte(2)),
        vout: Some(0),
        sequence,
        is_coinbase: false,
    }
}

/// An input that opts out of RBF.
pub fn final_input() -> TxIn {
    input_with_sequence(0xFFFF_FFFF)
}

pub fn explicit_output(sats: u64) -> TxOut {
    TxOut {
        value: Some(sats),
        ..TxOut::default()
    }
}

pub fn asset_output(asset: &str) -> TxOut {
    TxOut {
        value: Some(1000),
        asset: Some(asset.into()),
        ..TxOut::default()
    }
}

/// An output with blinded value and asset.
pub fn blinded_output() -> TxOut {
    TxOut {
        value: None,
        assetcommitment: Some("0a".repeat(33)),
        ..TxOut::default()
    }
}
