// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch recognition on a bounded worker pool.
//
// Each image runs on the blocking thread pool; a semaphore caps how many run
// at once so detector inference cannot exhaust memory. Images share nothing
// but the read-only recognizer, and a failure stays with its own image.

use std::path::PathBuf;
use std::sync::Arc;

use tactus_core::error::{Result, TactusError};
use tactus_core::types::Recognition;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use super::pipeline::Recognizer;

/// Result for one image of a batch.
#[derive(Debug)]
pub struct ImageOutcome {
    pub source: PathBuf,
    pub result: Result<Recognition>,
}

impl ImageOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Recognise every image in `paths`, at most `max_concurrency` at a time.
///
/// Returns one outcome per input path, in input order.
#[instrument(skip_all, fields(images = paths.len(), max_concurrency = max_concurrency))]
pub async fn recognize_batch(
    recognizer: Arc<Recognizer>,
    paths: Vec<PathBuf>,
    max_concurrency: usize,
) -> Vec<ImageOutcome> {
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    info!("batch recognition started");

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let recognizer = Arc::clone(&recognizer);
        let task_path = path.clone();
        let source = path.display().to_string();

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|err| {
                TactusError::Worker(format!("worker pool closed: {err}")).in_image(&source)
            })?;
            tokio::task::spawn_blocking(move || recognizer.recognize_path(&task_path))
                .await
                .map_err(|err| TactusError::Worker(err.to_string()).in_image(&source))?
        });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => Err(TactusError::Worker(err.to_string()).in_image(path.display().to_string())),
        };
        if let Err(err) = &result {
            warn!(error = %err, "image failed");
        }
        outcomes.push(ImageOutcome {
            source: path,
            result,
        });
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(
        succeeded = outcomes.len() - failed,
        failed,
        "batch recognition finished"
    );
    outcomes
}
