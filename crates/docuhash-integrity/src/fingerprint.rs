// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fingerprint engine — per-page text digests and a digest-of-digests over the
// whole document.

use std::borrow::Cow;

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{
    DigestAlgorithm, DocumentMeta, Fingerprint, FingerprintedDocument, RunEncoding, TextModel,
    TextPage,
};
use percent_encoding::percent_decode_str;
use tracing::{debug, info, instrument};

use crate::integrity::digest_bytes;

/// Fingerprint `model` and attach the result to `meta`.
pub fn fingerprint(
    model: &TextModel,
    meta: DocumentMeta,
    algorithm: DigestAlgorithm,
) -> Result<FingerprintedDocument> {
    Ok(FingerprintedDocument {
        meta,
        fingerprint: fingerprint_model(model, algorithm)?,
    })
}

/// Compute the fingerprint of `model`.
///
/// Each page digest covers the decoded runs of that page concatenated in run
/// order. The document digest covers the raw page digests concatenated in page
/// order. A page without runs digests to `H("")`.
#[instrument(skip_all, fields(pages = model.page_count(), algorithm = %algorithm))]
pub fn fingerprint_model(model: &TextModel, algorithm: DigestAlgorithm) -> Result<Fingerprint> {
    let mut pages = Vec::with_capacity(model.page_count());
    let mut raw_digests = Vec::with_capacity(model.page_count() * algorithm.output_len());

    for (index, page) in model.pages.iter().enumerate() {
        let text = page_text(page, model.encoding).map_err(|reason| {
            DocuhashError::Parse(format!("page {}: {}", index + 1, reason))
        })?;
        let digest = digest_bytes(algorithm, text.as_bytes());

        debug!(
            page = index + 1,
            runs = page.runs.len(),
            text_len = text.len(),
            "Page digested"
        );

        pages.push(hex::encode(&digest));
        raw_digests.extend_from_slice(&digest);
    }

    let document = hex::encode(digest_bytes(algorithm, &raw_digests));
    info!(pages = pages.len(), "Document fingerprinted");

    Ok(Fingerprint {
        algorithm,
        pages,
        document,
    })
}

/// Concatenate the decoded runs of one page.
fn page_text(page: &TextPage, encoding: RunEncoding) -> std::result::Result<String, String> {
    let mut text = String::new();
    for (index, run) in page.runs.iter().enumerate() {
        text.push_str(&decode_run(run, encoding).map_err(|err| format!("run {index}: {err}"))?);
    }
    Ok(text)
}

fn decode_run(run: &str, encoding: RunEncoding) -> std::result::Result<Cow<'_, str>, String> {
    match encoding {
        RunEncoding::Plain => Ok(Cow::Borrowed(run)),
        RunEncoding::Percent => percent_decode_str(run)
            .decode_utf8()
            .map_err(|err| format!("percent-decoded text is not UTF-8: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::hash_bytes;

    fn meta() -> DocumentMeta {
        DocumentMeta::new("Договор №ПЕГАС-01/14", "Слинько В. Д.", "v@example.org")
    }

    fn model(pages: &[&[&str]]) -> TextModel {
        TextModel::plain(
            pages
                .iter()
                .map(|runs| TextPage::new(runs.iter().map(|r| r.to_string()).collect()))
                .collect(),
        )
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let m = model(&[&["Hello, ", "world"], &["page two"]]);
        let first = fingerprint(&m, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        let second = fingerprint(&m, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        assert_eq!(first, second);
    }

    #[test]
    fn page_digest_covers_concatenated_runs() {
        let m = model(&[&["Hello, ", "world"]]);
        let doc = fingerprint(&m, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        assert_eq!(
            doc.fingerprint.pages[0],
            hash_bytes(DigestAlgorithm::Sha512, b"Hello, world")
        );
        assert_eq!(doc.fingerprint.page_count(), 1);
        assert_eq!(doc.meta, meta());
    }

    #[test]
    fn document_digest_is_over_raw_page_digests() {
        let m = model(&[&["one"], &["two"], &["three"]]);
        let fp = fingerprint(&m, meta(), DigestAlgorithm::Sha512)
            .expect("fingerprint")
            .fingerprint;

        let raw: Vec<u8> = fp
            .pages
            .iter()
            .flat_map(|hex_digest| hex::decode(hex_digest).expect("valid hex"))
            .collect();
        assert_eq!(fp.document, hash_bytes(DigestAlgorithm::Sha512, &raw));

        let hex_concat: String = fp.pages.concat();
        assert_ne!(
            fp.document,
            hash_bytes(DigestAlgorithm::Sha512, hex_concat.as_bytes())
        );
    }

    #[test]
    fn empty_page_digests_empty_string() {
        let m = model(&[&["text"], &[]]);
        let fp = fingerprint(&m, meta(), DigestAlgorithm::Sha512)
            .expect("fingerprint")
            .fingerprint;
        assert_eq!(fp.pages[1], hash_bytes(DigestAlgorithm::Sha512, b""));
    }

    #[test]
    fn empty_document_has_no_page_digests() {
        let fp = fingerprint(&TextModel::default(), meta(), DigestAlgorithm::Sha512)
            .expect("fingerprint")
            .fingerprint;
        assert!(fp.pages.is_empty());
        assert_eq!(fp.document, hash_bytes(DigestAlgorithm::Sha512, b""));
    }

    #[test]
    fn reordering_pages_changes_document_digest() {
        let forward = model(&[&["a"], &["b"]]);
        let reversed = model(&[&["b"], &["a"]]);
        let f = fingerprint(&forward, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        let r = fingerprint(&reversed, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        assert_ne!(f.fingerprint.document, r.fingerprint.document);
    }

    #[test]
    fn reordering_runs_changes_page_digest() {
        let forward = model(&[&["ab", "cd"]]);
        let swapped = model(&[&["cd", "ab"]]);
        let f = fingerprint(&forward, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        let s = fingerprint(&swapped, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        assert_ne!(f.fingerprint.pages[0], s.fingerprint.pages[0]);
    }

    #[test]
    fn percent_runs_are_decoded_before_hashing() {
        let encoded = TextModel::new(
            vec![TextPage::new(vec![
                "%D0%94%D0%BE%D0%B3%D0%BE%D0%B2%D0%BE%D1%80".into(),
                "%20%E2%84%96".into(),
            ])],
            RunEncoding::Percent,
        );
        let plain = model(&[&["Договор", " №"]]);

        let e = fingerprint(&encoded, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        let p = fingerprint(&plain, meta(), DigestAlgorithm::Sha512).expect("fingerprint");
        assert_eq!(e.fingerprint, p.fingerprint);
    }

    #[test]
    fn plain_runs_are_not_decoded() {
        let m = model(&[&["100%20"]]);
        let fp = fingerprint(&m, meta(), DigestAlgorithm::Sha512)
            .expect("fingerprint")
            .fingerprint;
        assert_eq!(fp.pages[0], hash_bytes(DigestAlgorithm::Sha512, b"100%20"));
    }

    #[test]
    fn invalid_utf8_after_decoding_is_parse_failure() {
        let m = TextModel::new(vec![TextPage::new(vec!["%FF%FE".into()])], RunEncoding::Percent);
        let result = fingerprint(&m, meta(), DigestAlgorithm::Sha512);
        assert!(matches!(result, Err(DocuhashError::Parse(_))));
    }

    #[test]
    fn algorithm_is_recorded() {
        let m = model(&[&["x"]]);
        let fp = fingerprint(&m, meta(), DigestAlgorithm::Sha256)
            .expect("fingerprint")
            .fingerprint;
        assert_eq!(fp.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(fp.pages[0].len(), 64);
        assert_eq!(fp.document.len(), 64);
    }
}
