// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocuhashError, Result};
use crate::types::{DigestAlgorithm, PageLabel, PageSize, Placement};

/// Width of one digest chunk in a verification payload.
pub const DIGEST_CHUNK_WIDTH: usize = 16;

/// PDF points per centimetre.
pub const POINTS_PER_CM: f32 = 28.3464;

/// Page geometry of the verification document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactLayout {
    /// Page width in points (595 = A4).
    pub page_width_pt: f32,
    /// Page height in points (842 = A4).
    pub page_height_pt: f32,
    /// Code offset from the left page edge, in centimetres.
    pub code_x_cm: f32,
    /// Code offset from the top page edge, in centimetres.
    pub code_y_cm: f32,
    /// Side length of the square code, in centimetres.
    pub code_size_cm: f32,
}

impl ArtifactLayout {
    pub fn page_size(&self) -> PageSize {
        PageSize {
            width_pt: self.page_width_pt,
            height_pt: self.page_height_pt,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            x_pt: self.code_x_cm * POINTS_PER_CM,
            y_pt: self.code_y_cm * POINTS_PER_CM,
            width_pt: self.code_size_cm * POINTS_PER_CM,
            height_pt: self.code_size_cm * POINTS_PER_CM,
        }
    }
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            page_width_pt: 595.0,
            page_height_pt: 842.0,
            code_x_cm: 1.0,
            code_y_cm: 2.0,
            code_size_cm: 5.0,
        }
    }
}

/// Settings for one pipeline run.
///
/// Loaded from JSON; every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source document to fingerprint.
    pub source_path: PathBuf,
    /// Where the verification document is written.
    pub output_path: PathBuf,
    /// Directory holding content-addressed code images. Must exist before encoding.
    pub codes_dir: PathBuf,
    /// Hash used for every digest in the run.
    pub algorithm: DigestAlgorithm,
    /// Template for the "page i of n" payload line.
    pub page_label: PageLabel,
    pub layout: ArtifactLayout,
    /// Upper bound on codes rendered at once.
    pub max_concurrent_encodes: usize,
    /// Pixel size of one QR module.
    pub qr_module_px: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("source.pdf"),
            output_path: PathBuf::from("fingerprint.pdf"),
            codes_dir: PathBuf::from("codes"),
            algorithm: DigestAlgorithm::default(),
            page_label: PageLabel::default(),
            layout: ArtifactLayout::default(),
            max_concurrent_encodes: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            qr_module_px: 8,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Check the invariants the pipeline relies on. Call once at startup.
    pub fn validate(&self) -> Result<()> {
        let hex_len = self.algorithm.hex_len();
        if hex_len % DIGEST_CHUNK_WIDTH != 0 {
            return Err(DocuhashError::Config(format!(
                "{} hex length {} is not a multiple of {}",
                self.algorithm, hex_len, DIGEST_CHUNK_WIDTH
            )));
        }

        let layout = &self.layout;
        let dimensions = [
            layout.page_width_pt,
            layout.page_height_pt,
            layout.code_size_cm,
        ];
        if dimensions.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(DocuhashError::Config(
                "page size and code size must be positive".into(),
            ));
        }
        if layout.code_x_cm < 0.0 || layout.code_y_cm < 0.0 {
            return Err(DocuhashError::Config(
                "code offset must not be negative".into(),
            ));
        }

        if self.max_concurrent_encodes == 0 {
            return Err(DocuhashError::Config(
                "max_concurrent_encodes must be at least 1".into(),
            ));
        }
        if self.qr_module_px == 0 {
            return Err(DocuhashError::Config(
                "qr_module_px must be at least 1".into(),
            ));
        }

        if !self.page_label.is_complete() {
            return Err(DocuhashError::Config(format!(
                "page label {:?} must contain {} and {}",
                self.page_label.0,
                PageLabel::PAGE_PLACEHOLDER,
                PageLabel::TOTAL_PLACEHOLDER
            )));
        }
        if self.page_label.0.chars().any(char::is_control) {
            return Err(DocuhashError::Config(
                "page label must fit on one line".into(),
            ));
        }

        Ok(())
    }
}
