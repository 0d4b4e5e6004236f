// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! docuhash-integrity — Content fingerprinting for tamper-evident contracts.
//!
//! Turns an extracted text model into per-page and whole-document digests,
//! lays those digests out as verification payloads for QR encoding, and
//! checks scanned payloads against a recomputed fingerprint.

pub mod fingerprint;
pub mod integrity;
pub mod payload;
pub mod verify;

// PUBLIC API: Re-export the pipeline entry points
pub use fingerprint::{fingerprint, fingerprint_model};
pub use integrity::{digest_bytes, hash_bytes};
pub use payload::{ParsedPayload, compose_payloads, parse_payload, split_fingerprint};
pub use verify::{FingerprintComparison, PayloadVerdict, compare_fingerprints, verify_payload};
