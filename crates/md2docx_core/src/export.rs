//! Off-thread export with one build in flight per document.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::block::ParsedBlock;
use crate::config::Config;
use crate::docx::render_docx;
use crate::error::ExportError;

/// Runs DOCX builds on the blocking pool so the caller's runtime stays
/// responsive. A second export requested while one is running fails with
/// [`ExportError::InProgress`] instead of queueing.
pub struct Exporter {
    config: Arc<Config>,
    in_flight: Mutex<()>,
}

impl Exporter {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            in_flight: Mutex::new(()),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Build the package for `blocks`. The returned bytes are complete; on
    /// error nothing is returned.
    pub async fn export(&self, blocks: Vec<ParsedBlock>) -> Result<Vec<u8>, ExportError> {
        let _guard = self.begin().inspect_err(|_| {
            warn!("export requested while another export is running");
        })?;

        let started = Instant::now();
        let count = blocks.len();
        let config = Arc::clone(&self.config);
        info!(blocks = count, "export started");

        let result = tokio::task::spawn_blocking(move || render_docx(&blocks, &config))
            .await
            .map_err(|e| ExportError::Aborted(e.to_string()))?;

        match &result {
            Ok(bytes) => info!(
                blocks = count,
                bytes = bytes.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "export finished"
            ),
            Err(e) => error!(stage = %e.stage(), "export failed: {e}"),
        }
        result
    }

    pub(crate) fn begin(&self) -> Result<MutexGuard<'_, ()>, ExportError> {
        self.in_flight.try_lock().map_err(|_| ExportError::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportStage;
    use crate::parser::parse;

    #[tokio::test]
    async fn second_export_is_rejected_while_one_runs() {
        let exporter = Exporter::new(Config::compiled_default());
        let guard = exporter.begin().unwrap();
        assert!(exporter.is_exporting());

        let err = exporter.export(parse("text")).await.unwrap_err();
        assert!(matches!(err, ExportError::InProgress));
        assert_eq!(err.stage(), ExportStage::Schedule);

        drop(guard);
        assert!(!exporter.is_exporting());
        assert!(exporter.export(parse("text")).await.is_ok());
    }

    #[tokio::test]
    async fn empty_document_exports() {
        let exporter = Exporter::new(Config::compiled_default());
        let bytes = exporter.export(Vec::new()).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn repeated_exports_are_identical() {
        let exporter = Exporter::new(Config::compiled_default());
        let blocks = parse("# Notes\n\nUser: 你好\n\n- **one**");
        let first = exporter.export(blocks.clone()).await.unwrap();
        let second = exporter.export(blocks).await.unwrap();
        assert_eq!(first, second);
    }
}
