// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Code module — rendering payloads into content-addressed QR images.

pub mod encoder;
pub mod renderer;

pub use encoder::CodeEncoder;
pub use renderer::{CodeRenderer, QrRenderer};
