//! Transaction classification helpers used when rendering a transaction.
//!
//! All functions are pure and read only the fields the explorer API
//! serves; asset-aware helpers take the native asset from
//! [`ExplorerConfig`].

use bitcoin::Amount;

use crate::config::ExplorerConfig;
use crate::types::{Tx, TxOut};

/// Label for outputs whose asset is blinded.
pub const UNKNOWN_ASSET_LABEL: &str = "[Unknown]";

/// Number of asset-id characters shown for non-native assets.
const ASSET_ID_PREVIEW_LEN: usize = 8;

// ==============================================================================
// Output Classification
// ==============================================================================

/// `true` if any output hides its value.
#[must_use]
pub fn is_any_confidential(tx: &Tx) -> bool {
    tx.vout.iter().any(|out| out.value.is_none())
}

/// `true` if any output is a peg-out to the parent chain.
#[must_use]
pub fn is_any_pegout(tx: &Tx) -> bool {
    tx.vout
        .iter()
        .any(|out| is_set(&out.pegout_scriptpubkey_type))
}

/// A transaction signals opt-in RBF if any input has a sequence number
/// below `0xFFFFFFFE`.
#[must_use]
pub fn is_rbf(tx: &Tx) -> bool {
    tx.vin.iter().any(|input| input.sequence < 0xFFFF_FFFE)
}

/// An output is native when it carries neither an explicit asset nor an
/// asset commitment, or when its asset is the configured native asset.
#[must_use]
pub fn is_native_out(out: &TxOut, config: &ExplorerConfig) -> bool {
    (!is_set(&out.asset) && !is_set(&out.assetcommitment))
        || out.asset.as_deref() == Some(config.native_asset_id.as_str())
}

#[must_use]
pub fn is_all_native(tx: &Tx, config: &ExplorerConfig) -> bool {
    tx.vout.iter().all(|out| is_native_out(out, config))
}

/// Sum of all known output values. Blinded outputs count as zero.
#[must_use]
pub fn out_total(tx: &Tx) -> Amount {
    let sats = tx
        .vout
        .iter()
        .filter_map(|out| out.value)
        .fold(0u64, u64::saturating_add);
    Amount::from_sat(sats)
}

/// Display label for an output's asset: the native label, a shortened
/// asset id in brackets, or [`UNKNOWN_ASSET_LABEL`].
#[must_use]
pub fn out_asset_label(out: &TxOut, config: &ExplorerConfig) -> String {
    if is_native_out(out, config) {
        return config.native_asset_label.clone();
    }
    match &out.asset {
        Some(asset) => {
            let preview: String = asset.chars().take(ASSET_ID_PREVIEW_LEN).collect();
            format!("[{preview}]")
        }
        None => UNKNOWN_ASSET_LABEL.to_string(),
    }
}

fn is_set(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}
