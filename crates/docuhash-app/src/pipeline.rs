// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline — text model → fingerprint → payloads → codes → verification PDF.
//
// Parsing, fingerprinting and PDF writing are blocking and run on the tokio
// blocking pool. Code encoding is the only fan-out point; the assembler starts
// only once every code has been written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{DocumentMeta, Fingerprint, FingerprintedDocument, TextModel};
use docuhash_core::PipelineConfig;
use docuhash_document::{
    ArtifactAssembler, CodeEncoder, CodeRenderer, Pdf2JsonSource, PdfAuthor, PdfTextReader,
    QrRenderer, TextModelSource,
};
use docuhash_integrity::{PayloadVerdict, compose_payloads, fingerprint_model, verify_payload};
use serde::Serialize;
use tracing::{info, instrument};

/// What a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub fingerprint: Fingerprint,
    /// Payload text per source page, in page order.
    pub payloads: Vec<String>,
    /// Code image per source page, in page order.
    pub code_files: Vec<PathBuf>,
    pub artifact_path: PathBuf,
}

/// One configured fingerprinting pipeline.
///
/// The text source and code renderer default to the PDF reader and the QR
/// renderer and can be swapped out.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    source: Arc<dyn TextModelSource>,
    renderer: Arc<dyn CodeRenderer>,
}

impl Pipeline {
    /// Validate `config` and build a pipeline with the default adapters.
    ///
    /// Sources ending in `.json` are read as pdf2json exports; anything else
    /// as PDF.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source: source_for_path(&config.source_path),
            renderer: Arc::new(QrRenderer::new(config.qr_module_px)),
            config,
        })
    }

    pub fn with_source(mut self, source: Arc<dyn TextModelSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn CodeRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    // -- Stages ---------------------------------------------------------------

    /// Extract the text model of the configured source.
    pub async fn load_model(&self) -> Result<TextModel> {
        let source = Arc::clone(&self.source);
        let path = self.config.source_path.clone();

        tokio::task::spawn_blocking(move || source.load(&path))
            .await
            .map_err(|err| DocuhashError::Parse(format!("text extraction task failed: {err}")))?
    }

    /// Fingerprint the configured source without attaching metadata.
    pub async fn compute_fingerprint(&self) -> Result<Fingerprint> {
        let model = self.load_model().await?;
        let algorithm = self.config.algorithm;

        tokio::task::spawn_blocking(move || fingerprint_model(&model, algorithm))
            .await
            .map_err(|err| DocuhashError::Parse(format!("fingerprint task failed: {err}")))?
    }

    /// Fingerprint the configured source and attach it to `meta`.
    ///
    /// `meta` is checked before the source is read.
    pub async fn fingerprint(&self, meta: DocumentMeta) -> Result<FingerprintedDocument> {
        meta.validate()?;
        Ok(FingerprintedDocument {
            meta,
            fingerprint: self.compute_fingerprint().await?,
        })
    }

    /// Run every stage and write the verification document.
    ///
    /// On failure, code images written before the failing stage stay on disk
    /// and no verification document is written.
    #[instrument(skip_all, fields(source = %self.config.source_path.display(), output = %self.config.output_path.display()))]
    pub async fn run(&self, meta: DocumentMeta) -> Result<PipelineOutput> {
        let doc = self.fingerprint(meta).await?;
        let payloads = compose_payloads(&doc, &self.config.page_label);

        let encoder = CodeEncoder::new(
            Arc::clone(&self.renderer),
            &self.config.codes_dir,
            self.config.algorithm,
        );
        let code_files = encoder
            .encode_all(payloads.clone(), self.config.max_concurrent_encodes)
            .await?;

        let artifact_path = assemble(
            ArtifactAssembler::new(self.config.layout),
            doc.meta.name.clone(),
            self.config.output_path.clone(),
            code_files.clone(),
        )
        .await?;

        info!(
            pages = doc.fingerprint.page_count(),
            artifact = %artifact_path.display(),
            "Pipeline complete"
        );

        Ok(PipelineOutput {
            fingerprint: doc.fingerprint,
            payloads,
            code_files,
            artifact_path,
        })
    }

    /// Check scanned payload texts against the configured source.
    ///
    /// Page labels are matched against the configured template. Verdicts are
    /// returned in the order of `payloads`.
    pub async fn verify(&self, payloads: &[String]) -> Result<Vec<PayloadVerdict>> {
        let fingerprint = self.compute_fingerprint().await?;
        payloads
            .iter()
            .map(|payload| verify_payload(&fingerprint, &self.config.page_label, payload))
            .collect()
    }
}

async fn assemble(
    assembler: ArtifactAssembler,
    title: String,
    output_path: PathBuf,
    code_files: Vec<PathBuf>,
) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || {
        let mut author = PdfAuthor::new(title, assembler.layout().page_size());
        assembler.assemble(&mut author, &output_path, &code_files)
    })
    .await
    .map_err(|err| DocuhashError::Write(format!("assembly task failed: {err}")))?
}

fn source_for_path(path: &Path) -> Arc<dyn TextModelSource> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Arc::new(Pdf2JsonSource::new())
    } else {
        Arc::new(PdfTextReader::new())
    }
}
