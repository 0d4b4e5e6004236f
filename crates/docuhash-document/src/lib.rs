// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docuhash-document — Document I/O for the Docuhash pipeline.
//
// Provides the text model adapters (PDF via lopdf, pdf2json exports), the QR
// code encoder that writes content-addressed images, and the assembler that
// lays those images out in the verification PDF.

pub mod code;
pub mod pdf;
pub mod source;

// Re-export the primary structs so callers can use `docuhash_document::CodeEncoder` etc.
pub use code::encoder::CodeEncoder;
pub use code::renderer::{CodeRenderer, QrRenderer};
pub use pdf::pdf2json::Pdf2JsonSource;
pub use pdf::reader::PdfTextReader;
pub use pdf::writer::{ArtifactAssembler, DocumentAuthor, PdfAuthor};
pub use source::TextModelSource;
