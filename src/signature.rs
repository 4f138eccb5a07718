// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Passphrase signatures.
//!
//! A signature lets a poster show up under a stable handle without an
//! account. It is a display fingerprint only: no salt, no secret, and it must
//! never be used to authenticate anyone.

use base64::Engine;
use sha3::{Digest, Sha3_256};

/// Characters of the encoded digest kept in the signature.
const SIGNATURE_LEN: usize = 10;

/// Derive the display signature for `passphrase`, e.g. `!Xk3v9QpLa0`.
pub fn derive(passphrase: &str) -> String {
    let digest = Sha3_256::digest(passphrase.as_bytes());
    let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    format!("!{}", &encoded[..SIGNATURE_LEN])
}

/// Signature for an optional passphrase; empty passphrases sign nothing.
pub fn derive_optional(passphrase: Option<&str>) -> Option<String> {
    passphrase.filter(|p| !p.is_empty()).map(derive)
}
