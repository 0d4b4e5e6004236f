// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification document writer — lays code images out one per page using
// `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use docuhash_core::config::ArtifactLayout;
use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{PageSize, Placement};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Authoring capability used by the assembler.
///
/// A fresh author already holds one page; `add_page` appends another and makes
/// it current.
pub trait DocumentAuthor {
    fn add_page(&mut self, size: PageSize);
    fn place_image(&mut self, image: &Path, placement: &Placement) -> Result<()>;
    fn write_to(&mut self, path: &Path) -> Result<()>;
}

/// Builds the verification document in memory, then writes it in one go.
pub struct PdfAuthor {
    title: String,
    document: PdfDocument,
    /// Size and operations of each page, in order. Never empty.
    pages: Vec<(PageSize, Vec<Op>)>,
}

impl PdfAuthor {
    /// Start a document whose first page has the given size.
    pub fn new(title: impl Into<String>, first_page: PageSize) -> Self {
        let title = title.into();
        Self {
            document: PdfDocument::new(&title),
            title,
            pages: vec![(first_page, Vec::new())],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialise the document built so far.
    pub fn render_bytes(&mut self) -> Vec<u8> {
        self.document.pages = self
            .pages
            .iter()
            .map(|(size, ops)| {
                PdfPage::new(
                    pt_to_mm(size.width_pt),
                    pt_to_mm(size.height_pt),
                    ops.clone(),
                )
            })
            .collect();

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        self.document.save(&PdfSaveOptions::default(), &mut warnings)
    }
}

impl DocumentAuthor for PdfAuthor {
    fn add_page(&mut self, size: PageSize) {
        self.pages.push((size, Vec::new()));
    }

    #[instrument(skip(self, placement), fields(image = %image.display()))]
    fn place_image(&mut self, image: &Path, placement: &Placement) -> Result<()> {
        let bytes = std::fs::read(image).map_err(|err| {
            DocuhashError::Write(format!("failed to read code {}: {}", image.display(), err))
        })?;
        let dynamic_image = ::image::load_from_memory(&bytes).map_err(|err| {
            DocuhashError::Write(format!("failed to decode code {}: {}", image.display(), err))
        })?;

        let img_width = dynamic_image.width() as usize;
        let img_height = dynamic_image.height() as usize;
        if img_width == 0 || img_height == 0 {
            return Err(DocuhashError::Write(format!(
                "code {} is empty",
                image.display()
            )));
        }

        // Convert to RGB8 for printpdf.
        let rgb_image = dynamic_image.to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.document.add_image(&raw);

        // At 72 dpi one pixel is one point, so the scale is the target size in
        // points over the pixel size.
        let dpi: f32 = 72.0;
        let scale_x = placement.width_pt / img_width as f32;
        let scale_y = placement.height_pt / img_height as f32;

        // Placement is measured from the top-left corner; PDF space starts at
        // the bottom-left.
        let (page_size, ops) = self
            .pages
            .last_mut()
            .ok_or_else(|| DocuhashError::Write("document has no pages".into()))?;
        let translate_y = page_size.height_pt - placement.y_pt - placement.height_pt;

        ops.push(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.x_pt)),
                translate_y: Some(Pt(translate_y)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(dpi),
                rotate: None,
            },
        });

        debug!(img_width, img_height, scale_x, scale_y, "Code placed on page");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path.display(), pages = self.pages.len()))]
    fn write_to(&mut self, path: &Path) -> Result<()> {
        let bytes = self.render_bytes();
        std::fs::write(path, &bytes).map_err(|err| {
            DocuhashError::Write(format!("failed to write {}: {}", path.display(), err))
        })?;
        info!(title = %self.title, bytes = bytes.len(), "Wrote verification PDF to {}", path.display());
        Ok(())
    }
}

fn pt_to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Lays code images out in the verification document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactAssembler {
    layout: ArtifactLayout,
}

impl ArtifactAssembler {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Place one code per page and write the document to `output_path`.
    ///
    /// `code_files` is in source page order; the document gets them in
    /// reverse, so the last source page's code lands on the first page. The
    /// first code uses the author's initial page, every later one adds a page.
    #[instrument(skip(self, author, code_files), fields(output = %output_path.display(), codes = code_files.len()))]
    pub fn assemble<A: DocumentAuthor>(
        &self,
        author: &mut A,
        output_path: &Path,
        code_files: &[PathBuf],
    ) -> Result<PathBuf> {
        let placement = self.layout.placement();

        for (index, code_file) in code_files.iter().rev().enumerate() {
            if index != 0 {
                author.add_page(self.layout.page_size());
            }
            author.place_image(code_file, &placement)?;
        }

        author.write_to(output_path)?;
        info!("Verification document assembled");
        Ok(output_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        AddPage,
        Place(PathBuf),
        Write(PathBuf),
    }

    #[derive(Default)]
    struct RecordingAuthor {
        events: Vec<Event>,
        fail_write: bool,
    }

    impl DocumentAuthor for RecordingAuthor {
        fn add_page(&mut self, _size: PageSize) {
            self.events.push(Event::AddPage);
        }

        fn place_image(&mut self, image: &Path, _placement: &Placement) -> Result<()> {
            self.events.push(Event::Place(image.to_path_buf()));
            Ok(())
        }

        fn write_to(&mut self, path: &Path) -> Result<()> {
            if self.fail_write {
                return Err(DocuhashError::Write("disk full".into()));
            }
            self.events.push(Event::Write(path.to_path_buf()));
            Ok(())
        }
    }

    fn write_png(path: &Path) {
        let img = ::image::GrayImage::from_pixel(21, 21, ::image::Luma([0u8]));
        img.save(path).expect("write png");
    }

    #[test]
    fn codes_are_placed_in_reverse_order() {
        let codes: Vec<PathBuf> = ["code0.png", "code1.png", "code2.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let mut author = RecordingAuthor::default();

        let out = ArtifactAssembler::default()
            .assemble(&mut author, Path::new("fingerprint.pdf"), &codes)
            .expect("assemble");

        assert_eq!(out, PathBuf::from("fingerprint.pdf"));
        assert_eq!(
            author.events,
            vec![
                Event::Place("code2.png".into()),
                Event::AddPage,
                Event::Place("code1.png".into()),
                Event::AddPage,
                Event::Place("code0.png".into()),
                Event::Write("fingerprint.pdf".into()),
            ]
        );
    }

    #[test]
    fn no_codes_writes_initial_page_only() {
        let mut author = RecordingAuthor::default();
        ArtifactAssembler::default()
            .assemble(&mut author, Path::new("empty.pdf"), &[])
            .expect("assemble");
        assert_eq!(author.events, vec![Event::Write("empty.pdf".into())]);
    }

    #[test]
    fn write_error_propagates() {
        let mut author = RecordingAuthor {
            fail_write: true,
            ..RecordingAuthor::default()
        };
        let result = ArtifactAssembler::default().assemble(
            &mut author,
            Path::new("fingerprint.pdf"),
            &[PathBuf::from("code0.png")],
        );
        assert!(matches!(result, Err(DocuhashError::Write(_))));
    }

    #[test]
    fn pdf_has_one_page_per_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let codes: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("code{i}.png"));
                write_png(&path);
                path
            })
            .collect();
        let output = dir.path().join("fingerprint.pdf");
        let layout = ArtifactLayout::default();
        let mut author = PdfAuthor::new("Contract", layout.page_size());

        ArtifactAssembler::new(layout)
            .assemble(&mut author, &output, &codes)
            .expect("assemble");

        assert_eq!(author.page_count(), 3);
        let written = lopdf::Document::load(&output).expect("reload pdf");
        assert_eq!(written.get_pages().len(), 3);
    }

    #[test]
    fn code_is_drawn_at_fixed_offset_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let code = dir.path().join("code.png");
        ::image::GrayImage::from_pixel(100, 100, ::image::Luma([0u8]))
            .save(&code)
            .expect("write png");
        let output = dir.path().join("fingerprint.pdf");
        let layout = ArtifactLayout::default();
        let mut author = PdfAuthor::new("Contract", layout.page_size());

        ArtifactAssembler::new(layout)
            .assemble(&mut author, &output, &[code])
            .expect("assemble");

        let written = lopdf::Document::load(&output).expect("reload pdf");
        let page_id = *written.get_pages().values().next().expect("one page");

        let media_box: Vec<f32> = written
            .get_object(page_id)
            .and_then(|page| page.as_dict())
            .and_then(|page| page.get(b"MediaBox"))
            .and_then(|media_box| media_box.as_array())
            .expect("media box")
            .iter()
            .map(|value| value.as_float().expect("number"))
            .collect();
        assert_close(&media_box, &[0.0, 0.0, 595.0, 842.0]);

        let content = lopdf::content::Content::decode(
            &written.get_page_content(page_id).expect("page content"),
        )
        .expect("decode content");
        let transform: Vec<f32> = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("image transform")
            .operands
            .iter()
            .map(|value| value.as_float().expect("number"))
            .collect();

        // 5 cm square, 1 cm from the left, 2 cm from the top of an A4 page.
        assert_close(&transform, &[141.732, 0.0, 0.0, 141.732, 28.3464, 643.5752]);
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.05, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn unreadable_code_is_write_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut author = PdfAuthor::new("Contract", ArtifactLayout::default().page_size());
        let result = author.place_image(
            &dir.path().join("missing.png"),
            &ArtifactLayout::default().placement(),
        );
        assert!(matches!(result, Err(DocuhashError::Write(_))));
    }

    #[test]
    fn unwritable_output_is_write_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut author = PdfAuthor::new("Contract", ArtifactLayout::default().page_size());
        let result = author.write_to(&dir.path().join("missing").join("out.pdf"));
        assert!(matches!(result, Err(DocuhashError::Write(_))));
    }
}
