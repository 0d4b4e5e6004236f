// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR code renderer — draws a payload as a PNG using the `qrcode` and `image`
// crates.

use std::path::Path;

use image::Luma;
use qrcode::{EcLevel, QrCode};
use tracing::{debug, instrument};

/// Draws text as a scannable code image at a destination path.
///
/// Errors are returned as plain strings; the encoder wraps them into
/// `DocuhashError::Encode` together with the target path.
pub trait CodeRenderer: Send + Sync {
    fn render(&self, text: &str, destination: &Path) -> Result<(), String>;
}

/// Renders payloads as QR codes in PNG format.
///
/// Output depends only on the text and the renderer settings, so identical
/// payloads produce byte-identical files.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    /// Error-correction level.
    ec_level: EcLevel,
    /// Pixel size of one QR module.
    module_px: u32,
}

impl QrRenderer {
    pub fn new(module_px: u32) -> Self {
        Self {
            ec_level: EcLevel::M,
            module_px: module_px.max(1),
        }
    }

    /// Render `text` into an in-memory grayscale image.
    pub fn render_image(&self, text: &str) -> Result<image::GrayImage, String> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)
            .map_err(|err| format!("payload cannot be QR-encoded: {err}"))?;

        Ok(code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_px, self.module_px)
            .build())
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(8)
    }
}

impl CodeRenderer for QrRenderer {
    #[instrument(skip(self, text), fields(text_len = text.len(), path = %destination.display()))]
    fn render(&self, text: &str, destination: &Path) -> Result<(), String> {
        let image = self.render_image(text)?;
        image
            .save_with_format(destination, image::ImageFormat::Png)
            .map_err(|err| format!("failed to write {}: {err}", destination.display()))?;

        debug!(width = image.width(), height = image.height(), "QR code written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_square_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("code.png");
        QrRenderer::default()
            .render("Страница 1 из 1", &path)
            .expect("render");

        let img = image::open(&path).expect("decode png");
        assert_eq!(img.width(), img.height());
        assert!(img.width() > 0);
    }

    #[test]
    fn same_text_same_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let renderer = QrRenderer::new(4);
        renderer.render("payload", &a).expect("render");
        renderer.render("payload", &b).expect("render");
        assert_eq!(
            std::fs::read(&a).expect("read a"),
            std::fs::read(&b).expect("read b")
        );
    }

    #[test]
    fn oversized_payload_fails() {
        let text = "x".repeat(8000);
        assert!(QrRenderer::default().render_image(&text).is_err());
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("code.png");
        assert!(QrRenderer::default().render("payload", &path).is_err());
    }
}
