// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command runner — turns parsed arguments into a configured pipeline.

use std::path::PathBuf;

use docuhash_app::Pipeline;
use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::{DigestAlgorithm, DocumentMeta};
use docuhash_core::PipelineConfig;
use docuhash_integrity::split_fingerprint;
use tracing::info;

use crate::cli::{Cli, Commands};

/// How a command finished when it did not fail outright.
pub enum Outcome {
    Success,
    /// Verification ran but at least one payload did not match.
    Mismatch,
}

pub async fn run(cli: Cli) -> Result<Outcome> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            name,
            author,
            email,
            source,
            output,
            codes_dir,
            algorithm,
        } => {
            apply_overrides(&mut config, source, algorithm)?;
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(codes_dir) = codes_dir {
                config.codes_dir = codes_dir;
            }

            // The encoder expects the codes directory to exist.
            std::fs::create_dir_all(&config.codes_dir)?;

            let pipeline = Pipeline::new(config)?;
            let output = pipeline
                .run(DocumentMeta::new(name, author, email))
                .await?;

            info!(codes = output.code_files.len(), "Verification document ready");
            println!("{}", output.artifact_path.display());
            Ok(Outcome::Success)
        }

        Commands::Fingerprint {
            source,
            algorithm,
            json,
        } => {
            apply_overrides(&mut config, source, algorithm)?;
            let fingerprint = Pipeline::new(config)?.compute_fingerprint().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&fingerprint)?);
            } else {
                for (index, digest) in fingerprint.pages.iter().enumerate() {
                    println!("page {}:\n  {}", index + 1, split_fingerprint(digest).join("\n  "));
                }
                println!(
                    "document:\n  {}",
                    split_fingerprint(&fingerprint.document).join("\n  ")
                );
            }
            Ok(Outcome::Success)
        }

        Commands::Verify {
            payload,
            source,
            algorithm,
            json,
        } => {
            apply_overrides(&mut config, source, algorithm)?;

            let texts = payload
                .iter()
                .map(std::fs::read_to_string)
                .collect::<std::io::Result<Vec<_>>>()?;
            let verdicts = Pipeline::new(config)?.verify(&texts).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdicts)?);
            } else {
                for (file, verdict) in payload.iter().zip(&verdicts) {
                    let status = if verdict.is_valid() { "OK" } else { "MODIFIED" };
                    println!("{}: page {} {}", file.display(), verdict.page, status);
                }
            }

            if verdicts.iter().all(|verdict| verdict.is_valid()) {
                Ok(Outcome::Success)
            } else {
                Ok(Outcome::Mismatch)
            }
        }
    }
}

fn apply_overrides(
    config: &mut PipelineConfig,
    source: Option<PathBuf>,
    algorithm: Option<String>,
) -> Result<()> {
    if let Some(source) = source {
        config.source_path = source;
    }
    if let Some(name) = algorithm {
        config.algorithm = DigestAlgorithm::from_name(&name)
            .ok_or_else(|| DocuhashError::Config(format!("unknown digest algorithm {name:?}")))?;
    }
    Ok(())
}
