// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading source text and writing the verification document.

pub mod pdf2json;
pub mod reader;
pub mod writer;

pub use pdf2json::Pdf2JsonSource;
pub use reader::PdfTextReader;
pub use writer::{ArtifactAssembler, DocumentAuthor, PdfAuthor};
