// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification payloads — the text drawn into each QR code.
//
// Layout (one field per line, joined with '\n', no trailing newline):
//
//   <name>
//   <author>
//   <email>
//   <page label, e.g. "Страница 2 из 5">
//
//   <page digest, 16 hex chars per line>
//
//   <document digest, 16 hex chars per line>

use docuhash_core::config::DIGEST_CHUNK_WIDTH;
use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{FingerprintedDocument, PageLabel};
use tracing::{debug, instrument};

/// Break a hex digest into fixed-width lines for legibility inside a code.
///
/// Joining the chunks with no separator gives back `hex` exactly. A trailing
/// chunk shorter than the width is kept.
pub fn split_fingerprint(hex: &str) -> Vec<&str> {
    debug_assert!(hex.is_ascii(), "digest must be hex");
    (0..hex.len())
        .step_by(DIGEST_CHUNK_WIDTH)
        .map(|start| &hex[start..(start + DIGEST_CHUNK_WIDTH).min(hex.len())])
        .collect()
}

/// Build one verification payload per page, in page order.
#[instrument(skip_all, fields(pages = doc.fingerprint.page_count()))]
pub fn compose_payloads(doc: &FingerprintedDocument, label: &PageLabel) -> Vec<String> {
    let total = doc.fingerprint.page_count();
    let document_lines = split_fingerprint(&doc.fingerprint.document);

    let payloads: Vec<String> = doc
        .fingerprint
        .pages
        .iter()
        .enumerate()
        .map(|(index, page_digest)| {
            let mut lines: Vec<&str> = Vec::with_capacity(8 + document_lines.len() * 2);
            let page_label = label.render(index + 1, total);

            lines.push(&doc.meta.name);
            lines.push(&doc.meta.author);
            lines.push(&doc.meta.email);
            lines.push(&page_label);
            lines.push("");
            lines.extend(split_fingerprint(page_digest));
            lines.push("");
            lines.extend(document_lines.iter().copied());

            lines.join("\n")
        })
        .collect();

    debug!(count = payloads.len(), "Payloads composed");
    payloads
}

/// Fields recovered from a scanned verification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPayload {
    pub name: String,
    pub author: String,
    pub email: String,
    /// 1-based page number.
    pub page: usize,
    pub total: usize,
    pub page_digest: String,
    pub document_digest: String,
}

impl ParsedPayload {
    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.page.saturating_sub(1)
    }
}

/// Parse the text of a scanned code back into its fields.
///
/// `label` must be the template the payload was composed with; the page
/// label line is matched against it literally.
pub fn parse_payload(text: &str, label: &PageLabel) -> Result<ParsedPayload> {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.trim_end_matches('\n').split('\n').collect();

    if lines.len() < 7 {
        return Err(DocuhashError::Payload(format!(
            "expected at least 7 lines, found {}",
            lines.len()
        )));
    }

    let (page, total) = label.parse(lines[3]).ok_or_else(|| {
        DocuhashError::Payload(format!(
            "page label {:?} does not match template {:?}",
            lines[3], label.0
        ))
    })?;
    if !lines[4].trim().is_empty() {
        return Err(DocuhashError::Payload(
            "missing blank line after page label".into(),
        ));
    }

    let digest_lines = &lines[5..];
    let separator = digest_lines
        .iter()
        .position(|line| line.trim().is_empty())
        .ok_or_else(|| {
            DocuhashError::Payload("missing blank line between page and document digests".into())
        })?;

    let page_digest = join_digest(&digest_lines[..separator], "page")?;
    let document_digest = join_digest(&digest_lines[separator + 1..], "document")?;

    if page == 0 || page > total {
        return Err(DocuhashError::Payload(format!(
            "page {page} out of range 1..={total}"
        )));
    }

    Ok(ParsedPayload {
        name: lines[0].to_owned(),
        author: lines[1].to_owned(),
        email: lines[2].to_owned(),
        page,
        total,
        page_digest,
        document_digest,
    })
}

fn join_digest(lines: &[&str], what: &str) -> Result<String> {
    let digest: String = lines.iter().map(|line| line.trim()).collect();
    if digest.is_empty() {
        return Err(DocuhashError::Payload(format!("{what} digest is empty")));
    }
    if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DocuhashError::Payload(format!(
            "{what} digest contains non-hex characters"
        )));
    }
    Ok(digest.to_ascii_lowercase())
}
