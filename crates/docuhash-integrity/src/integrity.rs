// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Digest primitives — SHA-2 family hashing with explicit algorithm selection.

use docuhash_core::DigestAlgorithm;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Compute the raw digest of `data` with `algorithm`.
pub fn digest_bytes(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Compute the digest of `data` and return it as a lowercase hex string.
///
/// Used for page digests and for the content address of each code image.
pub fn hash_bytes(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    hex::encode(digest_bytes(algorithm, data))
}
