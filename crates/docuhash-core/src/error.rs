// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docuhash.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Docuhash operations.
///
/// Every pipeline stage propagates these unchanged; nothing is retried.
#[derive(Debug, Error)]
pub enum DocuhashError {
    // -- Pipeline stages --
    /// The source document could not be read or its text model is malformed.
    #[error("source document could not be parsed: {0}")]
    Parse(String),

    /// A single code failed to render. Fatal for the whole batch.
    #[error("failed to encode code {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    /// The verification document could not be written.
    #[error("failed to write verification document: {0}")]
    Write(String),

    // -- Verification --
    #[error("malformed verification payload: {0}")]
    Payload(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocuhashError>;
