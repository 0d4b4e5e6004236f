// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text model adapter interface.

use std::path::Path;

use docuhash_core::error::Result;
use docuhash_core::types::TextModel;

/// Turns a source document into ordered pages of text runs.
///
/// Implementations report structural failures as `DocuhashError::Parse`.
/// Loading is blocking; async callers run it on `spawn_blocking`.
pub trait TextModelSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<TextModel>;
}
