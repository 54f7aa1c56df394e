//! Transaction types as the explorer API serves them.
//!
//! Field names follow the Esplora JSON layout, so a response body
//! deserializes straight into [`Tx`]. Unknown fields are ignored. On
//! confidential chains an output's value and asset may be blinded, which
//! is why both are optional.

use bitcoin::{Amount, Txid};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Transaction Types
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub txid: Txid,
    #[serde(default)]
    pub vin: Vec<TxIn>,
    #[serde(default)]
    pub vout: Vec<TxOut>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Funding transaction; `None` for coinbase inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<u32>,
    pub sequence: u32,
    #[serde(default)]
    pub is_coinbase: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Value in satoshis; `None` when the amount is blinded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_address: Option<String>,
    /// Hex asset id; `None` when the asset is blinded or the chain has a
    /// single asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assetcommitment: Option<String>,
    /// Set on peg-out outputs to the script type on the parent chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pegout_scriptpubkey_type: Option<String>,
}

impl TxOut {
    pub fn amount(&self) -> Option<Amount> {
        self.value.map(Amount::from_sat)
    }
}
