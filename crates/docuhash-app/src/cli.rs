// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docuhash",
    about = "Tamper-evidence fingerprints for contracts",
    long_about = "Fingerprint the text of each page of a PDF, encode the digests as QR codes, \
                  and assemble them into a companion verification PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file (every field optional)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (sets RUST_LOG=debug if not already set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fingerprint a document and write its verification PDF
    Generate {
        /// Document name printed in every code
        #[arg(long)]
        name: String,

        /// Author printed in every code
        #[arg(long)]
        author: String,

        /// Author e-mail printed in every code
        #[arg(long)]
        email: String,

        /// Source document (.pdf, or a pdf2json .json export)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Verification PDF to write (default: fingerprint.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for code images (default: codes)
        #[arg(long)]
        codes_dir: Option<PathBuf>,

        /// Digest algorithm: sha256, sha384 or sha512 (default: sha512)
        #[arg(long)]
        algorithm: Option<String>,
    },

    /// Print the per-page and document digests of a document
    Fingerprint {
        /// Source document (.pdf, or a pdf2json .json export)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Digest algorithm: sha256, sha384 or sha512 (default: sha512)
        #[arg(long)]
        algorithm: Option<String>,

        /// Output machine-readable JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Check scanned code texts against a document
    Verify {
        /// Text files, each holding the full text of one scanned code
        #[arg(short, long, required = true, num_args = 1..)]
        payload: Vec<PathBuf>,

        /// Source document (.pdf, or a pdf2json .json export)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Digest algorithm used when the codes were generated (default: sha512)
        #[arg(long)]
        algorithm: Option<String>,

        /// Output machine-readable JSON to stdout
        #[arg(long)]
        json: bool,
    },
}
