// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF text reader — extracts per-page text runs from a source PDF using the
// `lopdf` crate.

use std::path::Path;

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{TextModel, TextPage};
use lopdf::Document;
use tracing::{debug, info, instrument};

use crate::source::TextModelSource;

/// Extracts a [`TextModel`] from PDF files.
///
/// Each page becomes one [`TextPage`]; its runs are the non-empty lines of the
/// text lopdf extracts from that page, in content-stream order. Runs are
/// stored plain (no escaping).
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextReader;

impl PdfTextReader {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text model from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn load_bytes(&self, data: &[u8]) -> Result<TextModel> {
        let document = Document::load_mem(data).map_err(|err| {
            DocuhashError::Parse(format!("failed to load PDF from memory: {}", err))
        })?;
        self.extract(&document)
    }

    /// Extract the text model from an already-loaded document.
    pub fn extract(&self, document: &Document) -> Result<TextModel> {
        if document.is_encrypted() {
            return Err(DocuhashError::Parse(
                "encrypted PDFs are not supported".to_string(),
            ));
        }

        // lopdf pages are keyed by 1-indexed page number, in ascending order.
        let pages = document.get_pages();
        let mut text_pages = Vec::with_capacity(pages.len());

        for &page_number in pages.keys() {
            let text = document.extract_text(&[page_number]).map_err(|err| {
                DocuhashError::Parse(format!(
                    "failed to extract text from page {}: {}",
                    page_number, err
                ))
            })?;

            let runs: Vec<String> = text
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect();

            debug!(page_number, runs = runs.len(), "Page text extracted");
            text_pages.push(TextPage::new(runs));
        }

        Ok(TextModel::plain(text_pages))
    }
}

impl TextModelSource for PdfTextReader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> Result<TextModel> {
        info!("Opening PDF: {}", path.display());

        let document = Document::load(path).map_err(|err| {
            DocuhashError::Parse(format!("failed to open {}: {}", path.display(), err))
        })?;

        let model = self.extract(&document)?;
        info!(pages = model.page_count(), "Text model extracted");
        Ok(model)
    }
}
