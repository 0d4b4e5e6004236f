// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Code encoder — turns verification payloads into content-addressed images.
//
// Each image is named `<codes_dir>/<hash(payload)>.png`. Pages are
// independent, so `encode_all` renders them concurrently on the blocking
// pool; results are slotted back by page index before returning.

use std::path::PathBuf;
use std::sync::Arc;

use docuhash_core::error::{DocuhashError, Result};
use docuhash_core::types::DigestAlgorithm;
use docuhash_integrity::hash_bytes;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::renderer::CodeRenderer;

/// File extension of every code image.
pub const CODE_EXTENSION: &str = "png";

/// Writes payloads as code images into a content-addressed directory.
///
/// Cheap to clone; the renderer is shared behind an `Arc`.
#[derive(Clone)]
pub struct CodeEncoder {
    renderer: Arc<dyn CodeRenderer>,
    codes_dir: PathBuf,
    algorithm: DigestAlgorithm,
}

impl CodeEncoder {
    /// `codes_dir` must already exist.
    pub fn new(
        renderer: Arc<dyn CodeRenderer>,
        codes_dir: impl Into<PathBuf>,
        algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            renderer,
            codes_dir: codes_dir.into(),
            algorithm,
        }
    }

    /// Content address of `payload`: where its image is (or will be) stored.
    pub fn code_path(&self, payload: &str) -> PathBuf {
        let address = hash_bytes(self.algorithm, payload.as_bytes());
        self.codes_dir.join(format!("{address}.{CODE_EXTENSION}"))
    }

    /// Render one payload and return the path of its image.
    pub fn encode(&self, payload: &str) -> Result<PathBuf> {
        let path = self.code_path(payload);
        self.renderer
            .render(payload, &path)
            .map_err(|reason| DocuhashError::Encode {
                path: path.clone(),
                reason,
            })?;

        debug!(path = %path.display(), "Code encoded");
        Ok(path)
    }

    /// Render every payload, at most `max_concurrent` at a time.
    ///
    /// The returned paths are in the same order as `payloads`, whatever the
    /// completion order. Every task is awaited before returning; if any page
    /// failed, the failure with the lowest page index is returned and no
    /// paths are.
    #[instrument(skip_all, fields(pages = payloads.len(), max_concurrent))]
    pub async fn encode_all(
        &self,
        payloads: Vec<String>,
        max_concurrent: usize,
    ) -> Result<Vec<PathBuf>> {
        let total = payloads.len();
        let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
        let mut tasks = JoinSet::new();

        for (index, payload) in payloads.into_iter().enumerate() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|err| DocuhashError::Encode {
                    path: self.codes_dir.clone(),
                    reason: format!("encoder semaphore closed: {err}"),
                })?;
            let encoder = self.clone();

            tasks.spawn_blocking(move || {
                let result = encoder.encode(&payload);
                drop(permit);
                (index, result)
            });
        }

        let mut slots: Vec<Option<PathBuf>> = vec![None; total];
        let mut first_failure: Option<(usize, DocuhashError)> = None;

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|err| DocuhashError::Encode {
                path: self.codes_dir.clone(),
                reason: format!("encode task failed: {err}"),
            })?;

            match result {
                Ok(path) => slots[index] = Some(path),
                Err(err) => {
                    warn!(page = index + 1, error = %err, "Code encoding failed");
                    if first_failure.as_ref().is_none_or(|(failed, _)| index < *failed) {
                        first_failure = Some((index, err));
                    }
                }
            }
        }

        if let Some((_, err)) = first_failure {
            return Err(err);
        }

        let paths = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| DocuhashError::Encode {
                    path: self.codes_dir.clone(),
                    reason: format!("no result for page {}", index + 1),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(codes = paths.len(), "All codes encoded");
        Ok(paths)
    }
}
