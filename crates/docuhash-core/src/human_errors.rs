// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages.
//
// The pipeline never retries, so the only decision left to the operator is
// whether they can fix something and run again.

use crate::error::DocuhashError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operator must change something (path, permissions, config).
    ActionRequired,
    /// The input itself is unusable; running again will not help.
    Permanent,
}

/// A plain-language error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What to try next.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `DocuhashError` into a `HumanError` for the terminal.
pub fn humanize_error(err: &DocuhashError) -> HumanError {
    match err {
        // -- Pipeline stages --
        DocuhashError::Parse(detail) => HumanError {
            message: "The source document couldn't be read.".into(),
            suggestion: format!(
                "Check that the file is an unencrypted, undamaged PDF. No fingerprint was produced. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        DocuhashError::Encode { path, reason } => HumanError {
            message: "A verification code couldn't be created.".into(),
            suggestion: format!(
                "Make sure the codes directory exists and is writable ({}). Codes written before the failure were kept. ({reason})",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        DocuhashError::Write(detail) => HumanError {
            message: "The verification document couldn't be saved.".into(),
            suggestion: format!(
                "Check that the output folder exists and there is free disk space. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        // -- Verification --
        DocuhashError::Payload(detail) => HumanError {
            message: "The scanned code text doesn't read as a verification payload.".into(),
            suggestion: format!(
                "Scan the code again and save its full text, including blank lines. \
                 Use the same --algorithm and page label the codes were generated with. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        // -- Configuration --
        DocuhashError::Config(detail) => HumanError {
            message: "The configuration or document details are invalid.".into(),
            suggestion: format!("Fix the setting and run again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        // -- Storage --
        DocuhashError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file couldn't be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "A file couldn't be read or written.".into(),
                    suggestion: format!("Check permissions and free disk space. ({io_err})"),
                    severity: Severity::ActionRequired,
                }
            }
        }

        DocuhashError::Serialization(detail) => HumanError {
            message: "A JSON file couldn't be understood.".into(),
            suggestion: format!("Check the file for typos. ({detail})"),
            severity: Severity::ActionRequired,
        },
    }
}
