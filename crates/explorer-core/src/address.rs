//! Confidential address handling.
//!
//! A base58 confidential address is laid out as
//! `blind prefix (1) | version (1) | blinding pubkey (33) | hash (20)`.
//! Dropping the prefix and the blinding key leaves the ordinary
//! `version | hash` address the explorer indexes by.

use std::borrow::Cow;

use bitcoin::base58;

const CONFIDENTIAL_PAYLOAD_LEN: usize = 55;
const HASH_LEN: usize = 20;

/// Strip the blinding key from a confidential base58check address.
///
/// Anything that does not decode as a confidential address with the
/// given `blind_prefix` is returned unchanged.
#[must_use]
pub fn try_unconfidential_address(addr: &str, blind_prefix: u8) -> Cow<'_, str> {
    match unconfidential(addr, blind_prefix) {
        Some(unblinded) => Cow::Owned(unblinded),
        None => Cow::Borrowed(addr),
    }
}

fn unconfidential(addr: &str, blind_prefix: u8) -> Option<String> {
    let payload = base58::decode_check(addr).ok()?;
    if payload.len() != CONFIDENTIAL_PAYLOAD_LEN || payload[0] != blind_prefix {
        return None;
    }

    let mut unblinded = Vec::with_capacity(1 + HASH_LEN);
    unblinded.push(payload[1]);
    unblinded.extend_from_slice(&payload[CONFIDENTIAL_PAYLOAD_LEN - HASH_LEN..]);
    Some(base58::encode_check(&unblinded))
}
