// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdf2json export reader.
//
// Accepts the JSON produced by pdf2json-style exporters, either bare
// (`{"Pages": [...]}`) or wrapped (`{"formImage": {"Pages": [...]}}`). Every
// text item carries runs whose `T` field is percent-escaped.

use std::path::Path;

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{RunEncoding, TextModel, TextPage};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::source::TextModelSource;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Export {
    Wrapped {
        #[serde(rename = "formImage")]
        form_image: ExportDocument,
    },
    Bare(ExportDocument),
}

#[derive(Debug, Deserialize)]
struct ExportDocument {
    #[serde(rename = "Pages")]
    pages: Vec<ExportPage>,
}

#[derive(Debug, Deserialize)]
struct ExportPage {
    #[serde(rename = "Texts", default)]
    texts: Vec<ExportText>,
}

#[derive(Debug, Deserialize)]
struct ExportText {
    #[serde(rename = "R", default)]
    runs: Vec<ExportRun>,
}

#[derive(Debug, Deserialize)]
struct ExportRun {
    #[serde(rename = "T")]
    text: String,
}

/// Reads a [`TextModel`] from a pdf2json JSON export.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pdf2JsonSource;

impl Pdf2JsonSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse an export held in memory.
    pub fn parse(&self, json: &str) -> Result<TextModel> {
        let export: Export = serde_json::from_str(json)
            .map_err(|err| DocuhashError::Parse(format!("invalid pdf2json export: {err}")))?;

        let document = match export {
            Export::Wrapped { form_image } => form_image,
            Export::Bare(document) => document,
        };

        let pages = document
            .pages
            .into_iter()
            .map(|page| {
                TextPage::new(
                    page.texts
                        .into_iter()
                        .flat_map(|text| text.runs.into_iter().map(|run| run.text))
                        .collect(),
                )
            })
            .collect();

        Ok(TextModel::new(pages, RunEncoding::Percent))
    }
}

impl TextModelSource for Pdf2JsonSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> Result<TextModel> {
        let json = std::fs::read_to_string(path).map_err(|err| {
            DocuhashError::Parse(format!("failed to read {}: {}", path.display(), err))
        })?;
        let model = self.parse(&json)?;
        info!(pages = model.page_count(), "Text model loaded from pdf2json export");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_export_flattens_texts_and_runs() {
        let json = r#"{"Pages":[
            {"Texts":[{"R":[{"T":"Hello%2C%20"},{"T":"world"}]},{"R":[{"T":"!"}]}]},
            {"Texts":[]}
        ]}"#;
        let model = Pdf2JsonSource::new().parse(json).expect("parse");
        assert_eq!(model.encoding, RunEncoding::Percent);
        assert_eq!(model.page_count(), 2);
        assert_eq!(model.pages[0].runs, vec!["Hello%2C%20", "world", "!"]);
        assert!(model.pages[1].runs.is_empty());
    }

    #[test]
    fn wrapped_export_is_accepted() {
        let json = r#"{"formImage":{"Pages":[{"Texts":[{"R":[{"T":"x"}]}]}]}}"#;
        let model = Pdf2JsonSource::new().parse(json).expect("parse");
        assert_eq!(model.pages[0].runs, vec!["x"]);
    }

    #[test]
    fn page_without_texts_key_is_empty() {
        let model = Pdf2JsonSource::new()
            .parse(r#"{"Pages":[{}]}"#)
            .expect("parse");
        assert_eq!(model.pages, vec![TextPage::default()]);
    }

    #[test]
    fn invalid_json_is_parse_failure() {
        assert!(matches!(
            Pdf2JsonSource::new().parse("{\"Pages\": 3}"),
            Err(DocuhashError::Parse(_))
        ));
    }
}
