// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Docuhash fingerprinting pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{DocuhashError, Result};

/// Identifying metadata supplied by the caller before the pipeline runs.
///
/// Values are free text and may contain non-ASCII characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub name: String,
    pub author: String,
    pub email: String,
}

impl DocumentMeta {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            email: email.into(),
        }
    }

    /// Reject values that would break the line layout of a payload.
    ///
    /// Each field occupies exactly one payload line, so control characters
    /// (line breaks in particular) are not allowed.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("author", &self.author),
            ("email", &self.email),
        ];
        for (field, value) in fields {
            if value.chars().any(char::is_control) {
                return Err(DocuhashError::Config(format!(
                    "document {field} must not contain line breaks or control characters"
                )));
            }
        }
        Ok(())
    }
}

/// How the runs of a [`TextModel`] are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEncoding {
    /// Runs hold the extracted text verbatim.
    #[default]
    Plain,
    /// Runs are percent-escaped (as emitted by pdf2json-style exporters).
    Percent,
}

/// One physical page: an ordered sequence of text runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextPage {
    pub runs: Vec<String>,
}

impl TextPage {
    pub fn new(runs: Vec<String>) -> Self {
        Self { runs }
    }
}

/// Text extracted from a source document, pages in physical order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextModel {
    pub pages: Vec<TextPage>,
    #[serde(default)]
    pub encoding: RunEncoding,
}

impl TextModel {
    pub fn new(pages: Vec<TextPage>, encoding: RunEncoding) -> Self {
        Self { pages, encoding }
    }

    /// Convenience constructor for plain (unescaped) runs.
    pub fn plain(pages: Vec<TextPage>) -> Self {
        Self::new(pages, RunEncoding::Plain)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Hash function used for page, document and content-address digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    #[default]
    Sha512,
}

impl DigestAlgorithm {
    /// Lowercase algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Parse an algorithm name, accepting the dashed spellings too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Some(Self::Sha256),
            "sha384" | "sha-384" => Some(Self::Sha384),
            "sha512" | "sha-512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Raw digest length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Length of the lowercase hex encoding.
    pub fn hex_len(&self) -> usize {
        self.output_len() * 2
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-page and whole-document digests of a text model.
///
/// `document` is the digest of the raw page-digest bytes concatenated in page
/// order, not of their hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub algorithm: DigestAlgorithm,
    pub pages: Vec<String>,
    pub document: String,
}

impl Fingerprint {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Document metadata with its fingerprint attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintedDocument {
    pub meta: DocumentMeta,
    pub fingerprint: Fingerprint,
}

/// Template for the "page i of n" line of a verification payload.
///
/// `{page}` is replaced by the 1-based page number, `{total}` by the page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageLabel(pub String);

impl PageLabel {
    pub const PAGE_PLACEHOLDER: &'static str = "{page}";
    pub const TOTAL_PLACEHOLDER: &'static str = "{total}";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn render(&self, page: usize, total: usize) -> String {
        self.0
            .replace(Self::PAGE_PLACEHOLDER, &page.to_string())
            .replace(Self::TOTAL_PLACEHOLDER, &total.to_string())
    }

    /// Whether both placeholders are present.
    pub fn is_complete(&self) -> bool {
        self.0.contains(Self::PAGE_PLACEHOLDER) && self.0.contains(Self::TOTAL_PLACEHOLDER)
    }

    /// Recover `(page, total)` from a line rendered with this template.
    ///
    /// The literal text around the placeholders must match exactly and every
    /// placeholder must hold a decimal number. A placeholder used more than
    /// once must hold the same number each time.
    pub fn parse(&self, line: &str) -> Option<(usize, usize)> {
        match_label(&self.tokens(), line, None, None)
    }

    fn tokens(&self) -> Vec<LabelToken<'_>> {
        let mut tokens = Vec::new();
        let mut rest = self.0.as_str();

        loop {
            let next = [
                (Self::PAGE_PLACEHOLDER, LabelToken::Page),
                (Self::TOTAL_PLACEHOLDER, LabelToken::Total),
            ]
            .into_iter()
            .filter_map(|(placeholder, token)| {
                rest.find(placeholder).map(|at| (at, placeholder.len(), token))
            })
            .min_by_key(|(at, _, _)| *at);

            match next {
                Some((at, len, token)) => {
                    if at > 0 {
                        tokens.push(LabelToken::Text(&rest[..at]));
                    }
                    tokens.push(token);
                    rest = &rest[at + len..];
                }
                None => {
                    if !rest.is_empty() {
                        tokens.push(LabelToken::Text(rest));
                    }
                    return tokens;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LabelToken<'a> {
    Text(&'a str),
    Page,
    Total,
}

fn match_label(
    tokens: &[LabelToken<'_>],
    line: &str,
    page: Option<usize>,
    total: Option<usize>,
) -> Option<(usize, usize)> {
    let Some((token, rest)) = tokens.split_first() else {
        return if line.is_empty() {
            Some((page?, total?))
        } else {
            None
        };
    };

    match token {
        LabelToken::Text(text) => match_label(rest, line.strip_prefix(text)?, page, total),
        LabelToken::Page | LabelToken::Total => {
            let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
            // Longest number first; shorter ones only if the remainder fails.
            (1..=digits).rev().find_map(|len| {
                let value: usize = line[..len].parse().ok()?;
                let (page, total) = match token {
                    LabelToken::Page => (Some(bind(page, value)?), total),
                    _ => (page, Some(bind(total, value)?)),
                };
                match_label(rest, &line[len..], page, total)
            })
        }
    }
}

/// `value`, unless the slot already holds a different number.
fn bind(slot: Option<usize>, value: usize) -> Option<usize> {
    match slot {
        Some(bound) if bound != value => None,
        _ => Some(value),
    }
}

impl Default for PageLabel {
    fn default() -> Self {
        Self::new("Страница {page} из {total}")
    }
}

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Where an image goes on a page, in points, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x_pt: f32,
    pub y_pt: f32,
    pub width_pt: f32,
    pub height_pt: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label_renders_one_based_page() {
        let label = PageLabel::default();
        assert_eq!(label.render(1, 3), "Страница 1 из 3");
        assert!(label.is_complete());
    }

    #[test]
    fn label_parses_its_own_rendering() {
        let label = PageLabel::default();
        assert_eq!(label.parse("Страница 12 из 40"), Some((12, 40)));
        assert_eq!(label.parse("Страница 1 из 3 "), None);
        assert_eq!(label.parse("Page 1 of 3"), None);
    }

    #[test]
    fn label_with_digits_in_its_text() {
        let label = PageLabel::new("Rev 2: page {page} of {total}");
        assert_eq!(label.parse(&label.render(3, 3)), Some((3, 3)));
        assert_eq!(label.parse("Rev 3: page 3 of 3"), None);
    }

    #[test]
    fn label_with_total_before_page() {
        let label = PageLabel::new("{total} pages, this is {page}");
        assert_eq!(label.parse(&label.render(1, 3)), Some((1, 3)));
    }

    #[test]
    fn label_with_adjacent_placeholders() {
        let label = PageLabel::new("{page}{total}");
        // Ambiguous splits resolve to the longest page number.
        assert_eq!(label.parse("123"), Some((12, 3)));
    }

    #[test]
    fn repeated_placeholder_must_agree() {
        let label = PageLabel::new("{page}/{total} ({page})");
        assert_eq!(label.parse("2/5 (2)"), Some((2, 5)));
        assert_eq!(label.parse("2/5 (3)"), None);
    }

    #[test]
    fn meta_rejects_line_breaks() {
        assert!(DocumentMeta::new("Contract", "Author", "a@example.org").validate().is_ok());
        assert!(DocumentMeta::new("Договор №1", "Слинько", "v@example.org").validate().is_ok());
        for meta in [
            DocumentMeta::new("Contract\nAnnex", "Author", "a@example.org"),
            DocumentMeta::new("Contract", "Author\r", "a@example.org"),
            DocumentMeta::new("Contract", "Author", "a@example.org\t"),
        ] {
            assert!(matches!(meta.validate(), Err(DocuhashError::Config(_))));
        }
    }

    #[test]
    fn label_without_total_is_incomplete() {
        assert!(!PageLabel::new("Page {page}").is_complete());
    }

    #[test]
    fn digest_hex_lengths() {
        assert_eq!(DigestAlgorithm::Sha256.hex_len(), 64);
        assert_eq!(DigestAlgorithm::Sha384.hex_len(), 96);
        assert_eq!(DigestAlgorithm::Sha512.hex_len(), 128);
    }

    #[test]
    fn algorithm_names_round_trip() {
        for alg in [
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            assert_eq!(DigestAlgorithm::from_name(alg.name()), Some(alg));
        }
        assert_eq!(
            DigestAlgorithm::from_name("SHA-512"),
            Some(DigestAlgorithm::Sha512)
        );
        assert_eq!(DigestAlgorithm::from_name("md5"), None);
    }

    #[test]
    fn text_model_defaults_to_plain_runs() {
        let model: TextModel = serde_json::from_str(r#"{"pages":[{"runs":["a"]}]}"#)
            .expect("deserialize text model");
        assert_eq!(model.encoding, RunEncoding::Plain);
        assert_eq!(model.page_count(), 1);
    }
}
