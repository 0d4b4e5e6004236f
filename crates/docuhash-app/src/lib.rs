// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docuhash — pipeline wiring shared by the `docuhash` binary and its tests.

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineOutput};
