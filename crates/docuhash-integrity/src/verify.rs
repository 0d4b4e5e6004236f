// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification — compare a recomputed fingerprint against scanned payloads or
// against a previously recorded fingerprint.

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{Fingerprint, PageLabel};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::payload::{ParsedPayload, parse_payload};

/// Outcome of checking one scanned payload against a recomputed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadVerdict {
    /// 1-based page number claimed by the payload.
    pub page: usize,
    /// The page digest in the payload equals the recomputed digest of that page.
    pub page_matches: bool,
    /// The document digest in the payload equals the recomputed document digest.
    pub document_matches: bool,
    /// The page count in the payload equals the recomputed page count.
    pub page_count_matches: bool,
}

impl PayloadVerdict {
    pub fn is_valid(&self) -> bool {
        self.page_matches && self.document_matches && self.page_count_matches
    }
}

/// Check the text of one scanned code against `fingerprint`.
///
/// `label` is the page label template the codes were generated with.
///
/// Fails when the payload is malformed or its digests are not as long as the
/// fingerprint's algorithm produces, which means the codes were generated
/// with another algorithm. A payload that parses but does not match yields a
/// verdict with the mismatching fields set to `false`.
#[instrument(skip_all)]
pub fn verify_payload(
    fingerprint: &Fingerprint,
    label: &PageLabel,
    payload_text: &str,
) -> Result<PayloadVerdict> {
    let parsed = parse_payload(payload_text, label)?;

    let expected_len = fingerprint.algorithm.hex_len();
    for (what, digest) in [
        ("page", &parsed.page_digest),
        ("document", &parsed.document_digest),
    ] {
        if digest.len() != expected_len {
            return Err(DocuhashError::Payload(format!(
                "{what} digest has {} hex characters, {} produces {expected_len}; \
                 were the codes generated with another algorithm?",
                digest.len(),
                fingerprint.algorithm
            )));
        }
    }

    let verdict = judge(fingerprint, &parsed);

    if verdict.is_valid() {
        info!(page = verdict.page, "Payload matches document");
    } else {
        warn!(
            page = verdict.page,
            page_matches = verdict.page_matches,
            document_matches = verdict.document_matches,
            page_count_matches = verdict.page_count_matches,
            "Payload does not match document"
        );
    }
    Ok(verdict)
}

fn judge(fingerprint: &Fingerprint, parsed: &ParsedPayload) -> PayloadVerdict {
    let page_matches = fingerprint
        .pages
        .get(parsed.index())
        .is_some_and(|digest| *digest == parsed.page_digest);

    PayloadVerdict {
        page: parsed.page,
        page_matches,
        document_matches: fingerprint.document == parsed.document_digest,
        page_count_matches: fingerprint.page_count() == parsed.total,
    }
}

/// Differences between a recorded fingerprint and a recomputed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintComparison {
    /// 0-based indices of pages present in both whose digests differ.
    pub mismatched_pages: Vec<usize>,
    pub expected_pages: usize,
    pub actual_pages: usize,
    pub document_matches: bool,
}

impl FingerprintComparison {
    pub fn is_identical(&self) -> bool {
        self.document_matches
            && self.mismatched_pages.is_empty()
            && self.expected_pages == self.actual_pages
    }
}

/// Compare two fingerprints page by page.
pub fn compare_fingerprints(expected: &Fingerprint, actual: &Fingerprint) -> FingerprintComparison {
    let mismatched_pages = expected
        .pages
        .iter()
        .zip(actual.pages.iter())
        .enumerate()
        .filter(|(_, (e, a))| e != a)
        .map(|(index, _)| index)
        .collect();

    FingerprintComparison {
        mismatched_pages,
        expected_pages: expected.page_count(),
        actual_pages: actual.page_count(),
        document_matches: expected.algorithm == actual.algorithm
            && expected.document == actual.document,
    }
}
